pub mod domains;
pub mod subdomains;

pub use domains::{
    DomainPage, ListingQuery, PerPage, parse_domain_input, parse_removal_form, require_domains,
};
pub use subdomains::SubdomainGenerator;

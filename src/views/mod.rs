//! Server-rendered HTML pages.

use axum::http::StatusCode;
use axum::response::Html;
use std::fmt::Write as _;

use crate::db::ProviderAccount;
use crate::provider::BatchOutcome;
use crate::service::subdomains::Suggestion;
use crate::service::{DomainPage, PerPage};

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.4em;text-align:left}\
.error{color:#b00020}.ok{color:#1b7f3b}nav a{margin-right:1em}textarea{width:100%}";

/// Escape text for element content and double-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, signed_in: bool, body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<nav><a href="/dashboard">Dashboard</a><a href="/accounts">Accounts</a><a href="/logout">Log out</a></nav>"#
    } else {
        ""
    };
    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title} | dnsdesk</title>\
         <style>{STYLE}</style></head><body>{nav}<h1>{title}</h1>{body}</body></html>",
        title = escape(title),
    ))
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"{}<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button></form>
<p><a href="/register">Register the operator account</a></p>"#,
        error_banner(error)
    );
    layout("Log in", false, &body)
}

pub fn register_page(error: Option<&str>, already_registered: bool) -> Html<String> {
    let form = if already_registered {
        r#"<p>An operator is already registered. <a href="/">Log in</a></p>"#.to_string()
    } else {
        r#"<form method="post" action="/register">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Register</button></form>"#
            .to_string()
    };
    layout("Register", false, &format!("{}{form}", error_banner(error)))
}

fn account_rows(accounts: &[ProviderAccount], with_delete: bool) -> String {
    if accounts.is_empty() {
        return "<p>No provider accounts yet.</p>".to_string();
    }
    let mut rows = String::from("<table><tr><th>Name</th><th>Created</th><th></th></tr>");
    for account in accounts {
        let delete = if with_delete {
            format!(
                r#" <a href="/accounts/{}/delete" onclick="return confirm('Delete this account?')">Delete</a>"#,
                account.id
            )
        } else {
            String::new()
        };
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td><a href="/domains/{}">Domains</a>{delete}</td></tr>"#,
            escape(&account.display_name),
            account.created_at.format("%Y-%m-%d %H:%M"),
            account.id,
        );
    }
    rows.push_str("</table>");
    rows
}

pub fn dashboard_page(accounts: &[ProviderAccount]) -> Html<String> {
    let body = format!(
        r#"<p>{} provider account(s). <a href="/accounts">Manage accounts</a></p>{}"#,
        accounts.len(),
        account_rows(accounts, false)
    );
    layout("Dashboard", true, &body)
}

pub fn accounts_page(accounts: &[ProviderAccount]) -> Html<String> {
    let body = format!(
        r#"{}<h2>Add account</h2><form method="post" action="/accounts">
<label>Name <input name="name" required></label>
<label>API key <input name="api_key" type="password" required></label>
<button type="submit">Add</button></form>"#,
        account_rows(accounts, true)
    );
    layout("Provider accounts", true, &body)
}

fn listing_href(account_id: i64, page: usize, per_page: PerPage, search: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("page", &page.to_string())
        .append_pair("per_page", &per_page.label())
        .append_pair("search", search)
        .finish();
    format!("/domains/{account_id}?{query}")
}

pub fn domains_page(
    account: &ProviderAccount,
    listing: &DomainPage,
    main_domains: &[&str],
    suggestions: &[Suggestion],
) -> Html<String> {
    let id = account.id;
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<form method="get" action="/domains/{id}">
<input name="search" value="{}" placeholder="Search">
<input name="per_page" value="{}" size="4">
<button type="submit">Filter</button></form>
<p>{} domain(s), page {} of {}</p>"#,
        escape(&listing.search),
        escape(&listing.per_page.label()),
        listing.total,
        listing.page,
        listing.pages,
    );

    let _ = write!(
        body,
        r#"<form method="post" action="/domains/{id}/delete"><table><tr><th></th><th>Domain</th><th>State</th></tr>"#
    );
    for domain in &listing.domains {
        let _ = write!(
            body,
            r#"<tr><td><input type="checkbox" name="domain_ids" value="{}"></td><td>{}</td><td>{}</td></tr>"#,
            domain.id,
            escape(&domain.name),
            escape(domain.state.as_deref().unwrap_or("")),
        );
    }
    body.push_str(
        r#"</table><label>Or names to delete<textarea name="domains" rows="3"></textarea></label>
<button type="submit">Delete selected</button></form>"#,
    );

    if listing.page > 1 {
        let _ = write!(
            body,
            r#"<a href="{}">Previous</a> "#,
            escape(&listing_href(id, listing.page - 1, listing.per_page, &listing.search))
        );
    }
    if listing.page < listing.pages {
        let _ = write!(
            body,
            r#"<a href="{}">Next</a>"#,
            escape(&listing_href(id, listing.page + 1, listing.per_page, &listing.search))
        );
    }

    let _ = write!(
        body,
        r#"<h2>Add domains</h2><form method="post" action="/domains/{id}/add">
<textarea name="domains" rows="5" placeholder="one per line or comma separated"></textarea>
<button type="submit">Add</button></form>"#
    );

    let options: String = main_domains
        .iter()
        .map(|d| format!(r#"<option value="{0}">{0}</option>"#, escape(d)))
        .collect();
    let _ = write!(
        body,
        r#"<h2>Generate subdomains</h2><form method="post" action="/domains/{id}/generate">
<select name="main_domain">{options}</select>
<input name="count" type="number" min="1" max="50" value="10">
<label><input type="checkbox" name="use_prefix" value="true" checked> prefix</label>
<label><input type="checkbox" name="use_suffix" value="true" checked> suffix</label>
<button type="submit">Generate and add</button></form>
<h2>Custom subdomain</h2><form method="post" action="/domains/{id}/add-custom">
<input name="subdomain_name" required><select name="main_domain">{options}</select>
<button type="submit">Add</button></form>"#
    );

    if !suggestions.is_empty() {
        body.push_str("<h3>Suggestions</h3><ul>");
        for s in suggestions {
            let _ = write!(body, "<li>{}</li>", escape(&s.full_domain));
        }
        body.push_str("</ul>");
    }

    layout(&format!("Domains of {}", account.display_name), true, &body)
}

pub fn batch_result_page(
    account: &ProviderAccount,
    action: &str,
    outcome: &BatchOutcome,
) -> Html<String> {
    let mut body = format!(
        "<p>{} of {} succeeded.</p>",
        outcome.succeeded.len(),
        outcome.total()
    );
    if !outcome.succeeded.is_empty() {
        body.push_str(r#"<h2>Succeeded</h2><ul class="ok">"#);
        for name in &outcome.succeeded {
            let _ = write!(body, "<li>{}</li>", escape(name));
        }
        body.push_str("</ul>");
    }
    if !outcome.failed.is_empty() {
        body.push_str(r#"<h2>Failed</h2><ul class="error">"#);
        for (name, err) in &outcome.failed {
            let _ = write!(
                body,
                "<li>{}: {}</li>",
                escape(name),
                escape(&err.to_string())
            );
        }
        body.push_str("</ul>");
    }
    let _ = write!(
        body,
        r#"<p><a href="/domains/{}">Back to domains</a></p>"#,
        account.id
    );
    layout(&format!("{action} result"), true, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<p class="error">{}</p><p><a href="/dashboard">Back</a></p>"#,
        escape(message)
    );
    layout(title, false, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use chrono::Utc;

    fn account() -> ProviderAccount {
        ProviderAccount {
            id: 7,
            operator_id: 1,
            display_name: "<acct>".to_string(),
            api_key: "secret-key".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn markup_is_escaped() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        let Html(page) = dashboard_page(&[account()]);
        assert!(page.contains("&lt;acct&gt;"));
        assert!(!page.contains("secret-key"));
    }

    #[test]
    fn batch_result_lists_both_sides() {
        let mut outcome = BatchOutcome::default();
        outcome.record("a.com".to_string(), Ok(()));
        outcome.record(
            "b.com".to_string(),
            Err(ProviderError::Remote {
                status: 400,
                message: "Invalid domain".into(),
            }),
        );
        let Html(page) = batch_result_page(&account(), "Add", &outcome);
        assert!(page.contains("1 of 2 succeeded"));
        assert!(page.contains("<li>a.com</li>"));
        assert!(page.contains("b.com: provider returned 400: Invalid domain"));
    }

    #[test]
    fn pagination_links_keep_search() {
        let href = listing_href(3, 2, PerPage::Limit(5), "a b");
        assert_eq!(href, "/domains/3?page=2&per_page=5&search=a+b");
    }
}

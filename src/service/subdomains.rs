//! Random and custom subdomain names under Dynu's shared parent domains.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::DeskError;

pub const MAX_GENERATED: usize = 50;
const MAX_LABEL_LEN: usize = 63;

pub const MAIN_DOMAINS: &[&str] = &[
    "accesscam.org",
    "camdvr.org",
    "casacam.net",
    "ddnsfree.com",
    "ddnsgeek.com",
    "freeddns.org",
    "giize.com",
    "gleeze.com",
    "kozow.com",
    "loseyourip.com",
    "mywire.org",
    "ooguy.com",
    "theworkpc.com",
    "webredirect.org",
    "1cooldns.com",
    "bumbleshrimp.com",
    "dynu.net",
    "dynuddns.com",
    "ddnsguru.com",
    "mysynology.net",
];

const PREFIXES: &[&str] = &[
    "my", "home", "office", "work", "dev", "test", "demo", "app", "web", "api", "secure",
    "private", "public", "main", "primary", "backup", "temp", "local", "remote", "cloud",
    "mobile", "desktop", "server", "client", "admin", "user", "guest", "live", "stage", "prod",
    "beta", "alpha", "v1", "v2", "new", "old",
];

const WORDS: &[&str] = &[
    "camera", "monitor", "device", "system", "network", "server", "client", "hub", "gateway",
    "router", "switch", "access", "control", "security", "stream", "video", "audio", "data",
    "file", "backup", "storage", "cloud", "sync", "share", "connect", "link", "bridge", "tunnel",
    "proxy", "cache", "queue", "service", "app", "tool", "utility", "helper", "manager",
    "viewer", "editor", "player", "recorder", "scanner", "detector", "sensor", "alarm", "alert",
    "notify", "message", "mail", "chat", "voice", "call", "meeting", "conference",
];

const SUFFIXES: &[&str] = &[
    "cam", "dvr", "nvr", "cctv", "ip", "hd", "4k", "pro", "plus", "max", "mini", "lite", "basic",
    "advanced", "premium", "standard", "custom", "special", "secure", "safe", "guard", "watch",
    "view", "see", "look", "eye", "lens", "focus", "zoom", "pan", "tilt", "fixed", "mobile",
    "wireless", "wired", "indoor", "outdoor", "night", "day", "auto", "manual", "smart", "ai",
    "cloud", "local", "remote", "direct", "live", "record", "playback", "archive",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub subdomain: String,
    pub main_domain: String,
    pub full_domain: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubdomainGenerator;

impl SubdomainGenerator {
    pub fn main_domains(&self) -> &'static [&'static str] {
        MAIN_DOMAINS
    }

    /// A dash-joined label: always one word, plus an optional prefix and suffix.
    /// A lone word always gets one of the two added.
    pub fn generate_name<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        use_prefix: bool,
        use_suffix: bool,
    ) -> String {
        let mut parts = Vec::with_capacity(3);
        if use_prefix && rng.random_bool(0.5) {
            parts.push(pick(rng, PREFIXES));
        }
        parts.push(pick(rng, WORDS));
        if use_suffix && rng.random_bool(0.5) {
            parts.push(pick(rng, SUFFIXES));
        }
        if parts.len() == 1 {
            if rng.random_bool(0.5) {
                parts.insert(0, pick(rng, PREFIXES));
            } else {
                parts.push(pick(rng, SUFFIXES));
            }
        }
        parts.join("-")
    }

    /// Up to `count` (capped at 50) distinct names under `main_domain`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        main_domain: &str,
        count: usize,
        use_prefix: bool,
        use_suffix: bool,
    ) -> Result<Vec<String>, DeskError> {
        let main_domain = ensure_main_domain(main_domain)?;
        let count = count.min(MAX_GENERATED);

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(count);
        for _ in 0..count.saturating_mul(3) {
            if out.len() >= count {
                break;
            }
            let full = format!(
                "{}.{main_domain}",
                self.generate_name(rng, use_prefix, use_suffix)
            );
            if seen.insert(full.clone()) {
                out.push(full);
            }
        }
        Ok(out)
    }

    /// Sanitize a user-chosen label and attach it to `main_domain`.
    pub fn custom(&self, name: &str, main_domain: &str) -> Result<String, DeskError> {
        let main_domain = ensure_main_domain(main_domain)?;
        if name.trim().is_empty() {
            return Err(DeskError::Validation(
                "Subdomain name cannot be empty".to_string(),
            ));
        }

        let mut label = String::with_capacity(name.len());
        for c in name.trim().to_lowercase().chars() {
            let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            };
            if c == '-' && label.ends_with('-') {
                continue;
            }
            label.push(c);
        }
        let label = label.trim_matches('-');

        if label.is_empty() {
            return Err(DeskError::Validation(
                "Subdomain name contains only invalid characters".to_string(),
            ));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DeskError::Validation(format!(
                "Subdomain name is too long (max {MAX_LABEL_LEN} characters)"
            )));
        }
        Ok(format!("{label}.{main_domain}"))
    }

    pub fn suggestions<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Suggestion> {
        (0..count)
            .map(|_| {
                let main_domain = pick(rng, MAIN_DOMAINS).to_string();
                let subdomain = self.generate_name(rng, true, true);
                Suggestion {
                    full_domain: format!("{subdomain}.{main_domain}"),
                    subdomain,
                    main_domain,
                }
            })
            .collect()
    }
}

fn ensure_main_domain(main_domain: &str) -> Result<&'static str, DeskError> {
    let wanted = main_domain.trim();
    MAIN_DOMAINS
        .iter()
        .copied()
        .find(|d| d.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            DeskError::Validation(format!(
                "Main domain '{wanted}' is not in the allowed list"
            ))
        })
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_names_have_two_or_three_parts() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = SubdomainGenerator;
        for _ in 0..200 {
            let name = generator.generate_name(&mut rng, true, true);
            let parts = name.split('-').count();
            assert!((2..=3).contains(&parts), "{name}");
        }
    }

    #[test]
    fn generate_is_unique_capped_and_scoped() {
        let mut rng = StdRng::seed_from_u64(42);
        let generator = SubdomainGenerator;
        let names = generator
            .generate(&mut rng, "dynu.net", 500, true, true)
            .expect("allowed main domain");
        assert!(!names.is_empty());
        assert!(names.len() <= MAX_GENERATED);
        assert!(names.iter().all(|n| n.ends_with(".dynu.net")));
        let distinct: HashSet<_> = names.iter().collect();
        assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn unknown_main_domain_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let generator = SubdomainGenerator;
        assert!(matches!(
            generator.generate(&mut rng, "example.com", 3, true, true),
            Err(DeskError::Validation(_))
        ));
        assert!(generator.custom("cam", "example.com").is_err());
    }

    #[test]
    fn custom_names_are_sanitized() {
        let generator = SubdomainGenerator;
        assert_eq!(
            generator.custom("  My Cool__Cam!! ", "mywire.org").expect("valid"),
            "my-cool-cam.mywire.org"
        );
        assert!(matches!(
            generator.custom("", "mywire.org"),
            Err(DeskError::Validation(_))
        ));
        assert!(generator.custom("***", "mywire.org").is_err());
        assert!(generator.custom(&"a".repeat(64), "mywire.org").is_err());
        assert!(generator.custom(&"a".repeat(63), "mywire.org").is_ok());
    }

    #[test]
    fn suggestions_use_listed_main_domains() {
        let mut rng = StdRng::seed_from_u64(3);
        let suggestions = SubdomainGenerator.suggestions(&mut rng, 5);
        assert_eq!(suggestions.len(), 5);
        for s in suggestions {
            assert!(MAIN_DOMAINS.contains(&s.main_domain.as_str()));
            assert_eq!(s.full_domain, format!("{}.{}", s.subdomain, s.main_domain));
        }
    }
}

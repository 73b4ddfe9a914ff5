//! Subdomain slug rules
//!
//! A slug is the subdomain label a company is reachable under, e.g.
//! `smith-scaffolding-ltd.workdoc360.com`.

/// Alphanumeric characters kept from a company name. Hyphens do not count.
pub const MAX_SLUG_ALPHANUMERICS: usize = 20;

/// DNS label length limit.
pub const MAX_SLUG_LEN: usize = 63;

/// Labels used by the platform itself.
pub const RESERVED_SLUGS: &[&str] = &[
    "admin", "api", "app", "assets", "auth", "billing", "blog", "cdn", "dashboard", "dev",
    "docs", "ftp", "help", "login", "mail", "portal", "smtp", "staging", "static", "status",
    "support", "test", "www",
];

/// Derive a slug from a company name.
///
/// Lowercases ASCII letters, drops every other character except whitespace
/// and hyphens, turns each run of whitespace and hyphens into a single
/// hyphen, trims hyphens at both ends and stops after
/// [`MAX_SLUG_ALPHANUMERICS`] letters and digits. The result may be empty
/// when the name has no ASCII letters or digits.
///
/// ```
/// use workdoc_core::utils::slug::generate_slug;
///
/// assert_eq!(generate_slug("Smith Scaffolding Ltd"), "smith-scaffolding-ltd");
/// assert_eq!(generate_slug("Smith's Scaffolding"), "smiths-scaffolding");
/// ```
#[must_use]
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len().min(MAX_SLUG_LEN));
    let mut alphanumerics = 0;
    let mut separator_pending = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if alphanumerics == MAX_SLUG_ALPHANUMERICS {
                break;
            }
            if separator_pending && !slug.is_empty() {
                slug.push('-');
            }
            separator_pending = false;
            slug.push(c.to_ascii_lowercase());
            alphanumerics += 1;
        } else if c.is_whitespace() || c == '-' {
            separator_pending = true;
        }
    }

    slug
}

/// Whether `slug` is a usable subdomain label: 1-63 characters of `a-z`,
/// `0-9` and `-`, no hyphen at either end and no consecutive hyphens.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Whether `slug` belongs to the platform.
#[must_use]
pub fn is_reserved_slug(slug: &str) -> bool {
    RESERVED_SLUGS.contains(&slug)
}

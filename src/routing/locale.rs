//! Locale stripping for donation paths.
//!
//! Legacy donation URLs carry one or more locale segments (`/en-US/`,
//! `/fr/`, ...) in front of the page name. All of them collapse onto the
//! canonical `/donate/` tree, keeping only a small set of known subpages.

/// Subpages that survive normalization; anything else lands on `/donate/`.
pub const DONATION_SUBPATHS: [&str; 3] = ["faq", "help", "ways-to-give"];

const DONATION_ROOT: &str = "/donate/";

/// Rewrite a request path into its canonical `/donate/` form.
///
/// Accepts the path with or without its leading slash.
pub fn normalize_donation_path(path: &str) -> String {
    let remaining = path
        .split('/')
        .filter(|segment| !segment.is_empty() && !is_locale_code(segment))
        .collect::<Vec<_>>()
        .join("/");

    if DONATION_SUBPATHS.contains(&remaining.as_str()) {
        format!("{DONATION_ROOT}{remaining}")
    } else {
        DONATION_ROOT.to_string()
    }
}

/// `ll`, `ll-CC` or `ll-Cc`, e.g. `en`, `en-US`, `fr-Ca`.
pub fn is_locale_code(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    match bytes {
        [a, b] => a.is_ascii_lowercase() && b.is_ascii_lowercase(),
        [a, b, b'-', c, d] => {
            a.is_ascii_lowercase()
                && b.is_ascii_lowercase()
                && c.is_ascii_uppercase()
                && d.is_ascii_alphabetic()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_codes() {
        assert!(is_locale_code("en"));
        assert!(is_locale_code("en-US"));
        assert!(is_locale_code("fr-Ca"));

        assert!(!is_locale_code("EN"));
        assert!(!is_locale_code("en-us"));
        assert!(!is_locale_code("eng"));
        assert!(!is_locale_code("en_US"));
        assert!(!is_locale_code("faq"));
        assert!(!is_locale_code("custom-en-section"));
    }

    #[test]
    fn test_known_subpaths_survive() {
        assert_eq!(normalize_donation_path("en-US/help"), "/donate/help");
        assert_eq!(normalize_donation_path("/en-US/es-MX/faq"), "/donate/faq");
        assert_eq!(normalize_donation_path("ways-to-give"), "/donate/ways-to-give");
        assert_eq!(normalize_donation_path("/de/help/"), "/donate/help");
    }

    #[test]
    fn test_unknown_paths_collapse_to_root() {
        assert_eq!(normalize_donation_path("fr/unapproved-path"), "/donate/");
        assert_eq!(normalize_donation_path("/custom-en-section"), "/donate/");
        assert_eq!(normalize_donation_path("en-US/help/more"), "/donate/");
        assert_eq!(normalize_donation_path("/en-US/"), "/donate/");
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(normalize_donation_path(""), "/donate/");
        assert_eq!(normalize_donation_path("/"), "/donate/");
        assert_eq!(normalize_donation_path("//"), "/donate/");
    }
}

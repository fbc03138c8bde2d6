//! Common utility functions for lens modules
//!
//! Helpers for turning user supplied target lists into the form the lookup
//! sites expect.

/// Split a comma separated list, trimming entries and dropping empty ones
///
/// # Examples
///
/// ```
/// use hfinder::lens::utils::split_list;
///
/// assert_eq!(split_list("1.2.3.0/24, 1.2.4.0/24,"), vec!["1.2.3.0/24", "1.2.4.0/24"]);
/// assert!(split_list(" , ").is_empty());
/// ```
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize an ASN to the `AS<number>` form used in bgp.he.net paths
///
/// Bare numbers get the `AS` prefix and a lower-case prefix is upper-cased.
/// Anything else is passed through untouched.
///
/// # Examples
///
/// ```
/// use hfinder::lens::utils::normalize_asn;
///
/// assert_eq!(normalize_asn("13335"), "AS13335");
/// assert_eq!(normalize_asn("as13335"), "AS13335");
/// assert_eq!(normalize_asn("AS13335"), "AS13335");
/// ```
pub fn normalize_asn(asn: &str) -> String {
    let asn = asn.trim();
    if !asn.is_empty() && asn.chars().all(|c| c.is_ascii_digit()) {
        return format!("AS{}", asn);
    }
    match asn.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => format!("AS{}", &asn[2..]),
        _ => asn.to_string(),
    }
}

/// Path segment for a CIDR on robtex.com: `/` becomes `-`
pub fn cidr_path_segment(cidr: &str) -> String {
    cidr.replace('/', "-")
}

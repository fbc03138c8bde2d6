//! Result rendering lens
//!
//! Filters a [`HostnameIndex`] by hostname regex and renders it as plain text
//! lines in one of three layouts:
//!
//! | Mode | Line format |
//! |------|-------------|
//! | `HostIps` (default) | `<hostname>: <ip> <ip> ...` |
//! | `Fqdn` | `<hostname>` |
//! | `Hosts` | `<ip> <hostname> <hostname> ...` (like `/etc/hosts`) |

use crate::lens::index::HostnameIndex;
use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Types
// =============================================================================

/// Output layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Hostname followed by its IPs (default)
    #[default]
    HostIps,
    /// Hostnames only
    Fqdn,
    /// IP followed by its hostnames
    Hosts,
}

impl RenderMode {
    /// Pick a mode from the CLI flags; `hosts` wins over `fqdn`
    pub fn from_flags(hosts: bool, fqdn: bool) -> Self {
        match (hosts, fqdn) {
            (true, _) => Self::Hosts,
            (false, true) => Self::Fqdn,
            (false, false) => Self::HostIps,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostIps => write!(f, "host-ips"),
            Self::Fqdn => write!(f, "fqdn"),
            Self::Hosts => write!(f, "hosts"),
        }
    }
}

/// Compiled hostname filter; an absent pattern accepts everything
#[derive(Debug, Clone, Default)]
pub struct HostFilter {
    pattern: Option<Regex>,
}

impl HostFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => {
                Some(Regex::new(p).map_err(|e| anyhow!("Invalid regex pattern: {}", e))?)
            }
            _ => None,
        };
        Ok(Self { pattern })
    }

    /// Unanchored match, like `grep`
    pub fn matches(&self, hostname: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |re| re.is_match(hostname))
    }
}

// =============================================================================
// Args
// =============================================================================

/// Arguments controlling how results are printed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct RenderArgs {
    /// Generate /etc/hosts like output (IP followed by hostnames)
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub hosts: bool,

    /// Only display found FQDNs
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub fqdn: bool,

    /// Only keep hostnames matching this regex
    #[cfg_attr(feature = "cli", clap(long, value_name = "REGEX"))]
    pub filter: Option<String>,
}

impl RenderArgs {
    pub fn mode(&self) -> RenderMode {
        RenderMode::from_flags(self.hosts, self.fqdn)
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Renders a hostname index as text lines
///
/// Construct it before doing any lookups: an invalid filter pattern is
/// reported by [`RenderLens::new`].
///
/// # Example
///
/// ```
/// use hfinder::lens::index::HostnameIndex;
/// use hfinder::lens::render::{RenderArgs, RenderLens};
///
/// let index: HostnameIndex = [("www.example.com", "192.0.2.10")].into_iter().collect();
/// let lens = RenderLens::new(&RenderArgs::default()).unwrap();
/// assert_eq!(lens.render(&index), vec!["www.example.com: 192.0.2.10"]);
/// ```
#[derive(Debug, Clone)]
pub struct RenderLens {
    mode: RenderMode,
    filter: HostFilter,
}

impl RenderLens {
    pub fn new(args: &RenderArgs) -> Result<Self> {
        Ok(Self {
            mode: args.mode(),
            filter: HostFilter::new(args.filter.as_deref())?,
        })
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Hostnames (and their IPs) that pass the filter
    pub fn filtered(&self, index: &HostnameIndex) -> HostnameIndex {
        index.retain_hostnames(|h| self.filter.matches(h))
    }

    /// Render the filtered index, one output line per entry
    pub fn render(&self, index: &HostnameIndex) -> Vec<String> {
        let index = self.filtered(index);
        match self.mode {
            RenderMode::Hosts => index
                .by_ip()
                .into_iter()
                .map(|(ip, hostnames)| {
                    format!("{} {}", ip, hostnames.into_iter().collect::<Vec<_>>().join(" "))
                })
                .collect(),
            RenderMode::Fqdn => index.hostnames().map(str::to_string).collect(),
            RenderMode::HostIps => index
                .iter()
                .map(|(hostname, ips)| {
                    let ips: Vec<&str> = ips.iter().map(String::as_str).collect();
                    format!("{}: {}", hostname, ips.join(" "))
                })
                .collect(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn sample() -> HostnameIndex {
        let first: HostnameIndex = [("host1.example.com", "1.2.3.4")].into_iter().collect();
        let second: HostnameIndex = [("host2.example.com", "1.2.3.5")].into_iter().collect();
        HostnameIndex::from_partials(vec![first, second])
    }

    fn lens(hosts: bool, fqdn: bool, filter: Option<&str>) -> RenderLens {
        RenderLens::new(&RenderArgs {
            hosts,
            fqdn,
            filter: filter.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn test_mode_priority() {
        assert_eq!(RenderMode::from_flags(true, true), RenderMode::Hosts);
        assert_eq!(RenderMode::from_flags(true, false), RenderMode::Hosts);
        assert_eq!(RenderMode::from_flags(false, true), RenderMode::Fqdn);
        assert_eq!(RenderMode::from_flags(false, false), RenderMode::HostIps);
        assert_eq!(RenderMode::default(), RenderMode::HostIps);
    }

    #[test]
    fn test_invalid_filter() {
        let err = RenderLens::new(&RenderArgs {
            filter: Some("host(".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid regex pattern"));
    }

    #[test]
    fn test_empty_filter_accepts_all() {
        let filter = HostFilter::new(Some("")).unwrap();
        assert!(filter.matches("anything.example.com"));
        assert!(HostFilter::new(None).unwrap().matches(""));
    }

    #[test]
    fn test_render_fqdn() {
        let mut lines = lens(false, true, None).render(&sample());
        lines.sort();
        assert_eq!(lines, vec!["host1.example.com", "host2.example.com"]);
    }

    #[test]
    fn test_render_hosts() {
        let lines = lens(true, true, None).render(&sample());
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.starts_with("1.2.3.4 host1.example.com")));
        assert!(lines.iter().any(|l| l.starts_with("1.2.3.5 host2.example.com")));
    }

    #[test]
    fn test_render_hosts_groups_hostnames() {
        let index: HostnameIndex = [
            ("a.example.com", "10.0.0.1"),
            ("b.example.com", "10.0.0.1"),
            ("b.example.com", "10.0.0.2"),
        ]
        .into_iter()
        .collect();

        let lines = lens(true, false, None).render(&index);
        assert_eq!(
            lines,
            vec!["10.0.0.1 a.example.com b.example.com", "10.0.0.2 b.example.com"]
        );
    }

    #[test]
    fn test_render_default_round_trip() {
        let index: HostnameIndex = [
            ("mail.example.com", "192.0.2.1"),
            ("mail.example.com", "192.0.2.2"),
            ("www.example.com", "192.0.2.3"),
            ("www.example.org", "198.51.100.7"),
        ]
        .into_iter()
        .collect();
        let lens = lens(false, false, Some(r"\.example\.com$"));

        let parsed: BTreeMap<String, BTreeSet<String>> = lens
            .render(&index)
            .iter()
            .map(|line| {
                let (host, ips) = line.split_once(": ").unwrap();
                (
                    host.to_string(),
                    ips.split(' ').map(str::to_string).collect(),
                )
            })
            .collect();

        let expected: BTreeMap<String, BTreeSet<String>> = lens
            .filtered(&index)
            .iter()
            .map(|(h, ips)| (h.clone(), ips.clone()))
            .collect();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_filter_applies_to_every_mode() {
        let index = sample();
        for (hosts, fqdn) in [(false, false), (false, true), (true, false)] {
            let output = lens(hosts, fqdn, Some("host2")).render(&index).join("\n");
            assert!(output.contains("host2.example.com"));
            assert!(!output.contains("host1.example.com"));
            assert!(!output.contains("1.2.3.4"));
        }
    }

    #[test]
    fn test_filter_is_unanchored() {
        let filter = HostFilter::new(Some("mail")).unwrap();
        assert!(filter.matches("smtp.mail.example.com"));
        assert!(!filter.matches("www.example.com"));
    }

    #[test]
    fn test_render_missing_ip() {
        let index: HostnameIndex = [("orphan.example.com", "")].into_iter().collect();
        assert_eq!(
            lens(false, false, None).render(&index),
            vec!["orphan.example.com: "]
        );
    }

    #[test]
    fn test_render_empty_index() {
        assert!(lens(false, false, None).render(&HostnameIndex::new()).is_empty());
    }
}

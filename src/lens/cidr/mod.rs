//! CIDR to hostname lens
//!
//! Looks up a CIDR block on robtex.com and collects every hostname listed on
//! the page together with the IP address shown next to it.

use crate::fetch::PageFetcher;
use crate::lens::index::HostnameIndex;
use crate::lens::utils::cidr_path_segment;
use anyhow::{anyhow, Result};
use rayon::prelude::*;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

pub const ROBTEX_CIDR_BASE_URL: &str = "https://www.robtex.com/cidr/";
pub const DNS_LOOKUP_PREFIX: &str = "https://www.robtex.com/dns-lookup/";
pub const IP_LOOKUP_PREFIX: &str = "https://www.robtex.com/ip-lookup/";

pub struct CidrLens<'a, F: PageFetcher> {
    fetcher: &'a F,
}

impl<'a, F: PageFetcher> CidrLens<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Look up one CIDR block
    ///
    /// Returns an empty index when the page cannot be fetched or parsed.
    pub fn resolve(&self, cidr: &str) -> HostnameIndex {
        let url = format!("{}{}", ROBTEX_CIDR_BASE_URL, cidr_path_segment(cidr));

        let body = match self.fetcher.fetch(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!("skipping {}: failed to fetch {}: {}", cidr, url, e);
                return HostnameIndex::new();
            }
        };

        match parse_hostnames(&body) {
            Ok(index) => {
                debug!("{}: {} hostnames", cidr, index.len());
                index
            }
            Err(e) => {
                warn!("skipping {}: {}", cidr, e);
                HostnameIndex::new()
            }
        }
    }

    /// Look up every CIDR block on the current rayon pool and merge the results
    pub fn resolve_all(&self, cidrs: &[String]) -> HostnameIndex {
        cidrs
            .par_iter()
            .map(|cidr| self.resolve(cidr))
            .reduce(HostnameIndex::new, HostnameIndex::merge)
    }
}

/// Extract hostname/IP pairs from a robtex.com CIDR page
pub fn parse_hostnames(html: &str) -> Result<HostnameIndex> {
    let host_links = prefix_selector(DNS_LOOKUP_PREFIX)?;
    let ip_links = prefix_selector(IP_LOOKUP_PREFIX)?;

    let document = Html::parse_document(html);
    let index: HostnameIndex = document
        .select(&host_links)
        .filter_map(|anchor| {
            let hostname = anchor.value().attr("href")?.strip_prefix(DNS_LOOKUP_PREFIX)?;
            let ip = co_located_ip(anchor, &ip_links).unwrap_or_default();
            Some((hostname.to_string(), ip))
        })
        .collect();
    Ok(index)
}

/// Find the IP shown next to a hostname anchor
///
/// robtex.com renders each row as `<tr><td><a dns-lookup/></td> ... <a
/// ip-lookup/> ...</tr>`, so the IP link lives under the anchor's grandparent.
/// Returns `None` when the row has no IP link.
pub fn co_located_ip(anchor: ElementRef<'_>, ip_links: &Selector) -> Option<String> {
    let row = anchor.parent()?.parent().and_then(ElementRef::wrap)?;
    let href = row
        .select(ip_links)
        .find_map(|link| link.value().attr("href"))?;
    Some(href.strip_prefix(IP_LOOKUP_PREFIX).unwrap_or(href).to_string())
}

fn prefix_selector(prefix: &str) -> Result<Selector> {
    let css = format!("a[href^='{}']", prefix);
    Selector::parse(&css).map_err(|e| anyhow!("invalid selector '{}': {}", css, e))
}

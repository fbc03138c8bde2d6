//! ASN to prefix lens
//!
//! Expands ASNs into the IPv4 prefixes they announce by scraping the prefix
//! table of the bgp.he.net AS page.
//!
//! # Example
//!
//! ```rust,ignore
//! use hfinder::fetch::UreqFetcher;
//! use hfinder::lens::asn::AsnLens;
//! use std::time::Duration;
//!
//! let fetcher = UreqFetcher::new(Duration::from_secs(30));
//! let lens = AsnLens::new(&fetcher);
//! let prefixes = lens.resolve(&["AS13335".to_string()]);
//! ```

use crate::fetch::PageFetcher;
use crate::lens::utils::normalize_asn;
use anyhow::{anyhow, Result};
use rayon::prelude::*;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

// =============================================================================
// Types
// =============================================================================

pub const BGP_HE_BASE_URL: &str = "https://bgp.he.net/";

/// Rows of the IPv4 prefix table on an AS page
const PREFIX_ROW_SELECTOR: &str = "#table_prefixes4 tbody tr";

/// A prefix discovered while expanding an ASN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnPrefix {
    /// ASN as it was requested
    pub asn: String,
    /// Announced prefix in CIDR notation
    pub prefix: String,
}

/// Called once per discovered prefix, as soon as it is found
pub type AsnProgressCallback = Arc<dyn Fn(&AsnPrefix) + Send + Sync>;

// =============================================================================
// Lens
// =============================================================================

pub struct AsnLens<'a, F: PageFetcher> {
    fetcher: &'a F,
    progress: Option<AsnProgressCallback>,
}

impl<'a, F: PageFetcher> AsnLens<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            progress: None,
        }
    }

    /// Report each prefix as soon as its ASN page is parsed
    ///
    /// The callback runs on the worker that fetched the ASN, so with more than
    /// one job the reports of different ASNs interleave. Only the list returned
    /// by [`AsnLens::resolve`] keeps the input order.
    pub fn with_progress(mut self, callback: AsnProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Expand every ASN into its prefixes
    ///
    /// ASNs are fetched in parallel on the current rayon pool. Results keep
    /// the ASN input order and prefixes repeated across ASNs are kept. An ASN
    /// whose page cannot be fetched or parsed contributes nothing.
    pub fn resolve(&self, asns: &[String]) -> Vec<String> {
        asns.par_iter()
            .map(|asn| self.resolve_one(asn))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Expand a single ASN, returning an empty list on any failure
    pub fn resolve_one(&self, asn: &str) -> Vec<String> {
        let url = format!("{}{}", BGP_HE_BASE_URL, normalize_asn(asn));

        let body = match self.fetcher.fetch(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!("skipping {}: failed to fetch {}: {}", asn, url, e);
                return vec![];
            }
        };

        let prefixes = match parse_prefixes(&body) {
            Ok(prefixes) => prefixes,
            Err(e) => {
                warn!("skipping {}: {}", asn, e);
                return vec![];
            }
        };
        debug!("{} announces {} prefixes", asn, prefixes.len());

        if let Some(cb) = &self.progress {
            for prefix in &prefixes {
                cb(&AsnPrefix {
                    asn: asn.to_string(),
                    prefix: prefix.clone(),
                });
            }
        }

        prefixes
    }
}

/// Extract prefixes from a bgp.he.net AS page
///
/// Takes the link text from the first cell of every row in the IPv4 prefix
/// table, trimmed. Empty cells are skipped.
pub fn parse_prefixes(html: &str) -> Result<Vec<String>> {
    let rows = selector(PREFIX_ROW_SELECTOR)?;
    let cell = selector("td")?;
    let link = selector("a")?;

    let document = Html::parse_document(html);
    let mut prefixes = vec![];
    for row in document.select(&rows) {
        let Some(first) = row.select(&cell).next() else {
            continue;
        };
        let text: String = first.select(&link).flat_map(|a| a.text()).collect();
        let prefix = text.trim();
        if !prefix.is_empty() {
            prefixes.push(prefix.to_string());
        }
    }
    Ok(prefixes)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector '{}': {}", css, e))
}

// =============================================================================
// Tests
// =============================================================================

//! Hostname discovery lens
//!
//! Runs a full lookup for a list of CIDR blocks or ASNs: ASNs are expanded to
//! prefixes first, every prefix is looked up on robtex.com, and the partial
//! results are merged into one [`HostnameIndex`].
//!
//! Lookups run on a dedicated rayon pool of `jobs` threads. A single failed
//! lookup never fails the batch; it only contributes nothing.

use crate::fetch::PageFetcher;
use crate::lens::asn::{AsnLens, AsnProgressCallback};
use crate::lens::cidr::CidrLens;
use crate::lens::index::HostnameIndex;
use crate::lens::utils::split_list;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Types
// =============================================================================

/// What to look up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscoverTarget {
    /// CIDR blocks, looked up directly
    Cidrs(Vec<String>),
    /// ASNs, expanded to their announced prefixes first
    Asns(Vec<String>),
}

/// Counters describing one discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    /// Number of CIDRs or ASNs requested
    pub targets: usize,
    /// Number of CIDR pages queried (after ASN expansion)
    pub cidrs_queried: usize,
    /// Distinct hostnames found
    pub hostnames: usize,
}

/// Result of a discovery run
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub index: HostnameIndex,
    pub summary: DiscoverySummary,
}

// =============================================================================
// Args
// =============================================================================

/// Lookup targets as given on the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct DiscoverArgs {
    /// CIDR(s), single or multiple separated by commas
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub cidr: Option<String>,

    /// ASN(s), single or multiple separated by commas
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub asn: Option<String>,
}

impl DiscoverArgs {
    /// Turn the raw arguments into a target list
    ///
    /// CIDRs take precedence when both are given. Fails when neither list has
    /// at least one entry.
    pub fn target(&self) -> Result<DiscoverTarget> {
        let cidrs = self.cidr.as_deref().map(split_list).unwrap_or_default();
        if !cidrs.is_empty() {
            return Ok(DiscoverTarget::Cidrs(cidrs));
        }

        let asns = self.asn.as_deref().map(split_list).unwrap_or_default();
        if !asns.is_empty() {
            return Ok(DiscoverTarget::Asns(asns));
        }

        Err(anyhow!("Invalid parameters. Please provide either -c or -a"))
    }
}

// =============================================================================
// Lens
// =============================================================================

pub struct DiscoverLens<'a, F: PageFetcher> {
    fetcher: &'a F,
    jobs: usize,
    progress: Option<AsnProgressCallback>,
}

impl<'a, F: PageFetcher> DiscoverLens<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            jobs: 1,
            progress: None,
        }
    }

    /// Number of concurrent lookups (at least one)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Report prefixes as ASNs are expanded
    ///
    /// With more than one job, prefixes of different ASNs arrive interleaved.
    pub fn with_progress(mut self, callback: AsnProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn discover(&self, target: &DiscoverTarget) -> Result<Discovery> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| anyhow!("Unable to start lookup workers: {}", e))?;

        Ok(pool.install(|| self.run(target)))
    }

    fn run(&self, target: &DiscoverTarget) -> Discovery {
        let (targets, cidrs) = match target {
            DiscoverTarget::Cidrs(cidrs) => (cidrs.len(), cidrs.clone()),
            DiscoverTarget::Asns(asns) => {
                let mut lens = AsnLens::new(self.fetcher);
                if let Some(cb) = &self.progress {
                    lens = lens.with_progress(cb.clone());
                }
                let prefixes = lens.resolve(asns);
                info!("{} ASNs expanded to {} prefixes", asns.len(), prefixes.len());
                (asns.len(), prefixes)
            }
        };

        let index = CidrLens::new(self.fetcher).resolve_all(&cidrs);
        let summary = DiscoverySummary {
            targets,
            cidrs_queried: cidrs.len(),
            hostnames: index.len(),
        };
        Discovery { index, summary }
    }
}

// =============================================================================
// Tests
// =============================================================================

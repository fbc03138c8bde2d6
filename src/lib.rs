#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! hfinder - find hostnames inside CIDR blocks and ASNs
//!
//! hfinder looks up which hostnames resolve inside a network range by reading
//! two public sites: bgp.he.net (ASN to announced prefixes) and robtex.com
//! (CIDR to hostnames). It can be used as both a command-line application and
//! a library.
//!
//! # Architecture
//!
//! - **[`fetch`]**: the [`PageFetcher`] seam and its shared `ureq` implementation
//! - **[`lens`]**: lookup, aggregation and rendering logic
//!   - `asn`: ASN to prefix expansion
//!   - `cidr`: CIDR to hostname lookup
//!   - `index`: the merged hostname -> IP set index
//!   - `discover`: end to end lookup over a bounded worker pool
//!   - `render`: hostname filter and the three text layouts
//! - **[`config`]**: configuration management
//!
//! Failed lookups are skipped and only reported through `tracing` at `warn`
//! level, so a run with an unreachable site prints nothing rather than failing.
//!
//! # Example
//!
//! ```rust,ignore
//! use hfinder::{DiscoverLens, DiscoverTarget, UreqFetcher};
//! use std::time::Duration;
//!
//! let fetcher = UreqFetcher::new(Duration::from_secs(30));
//! let target = DiscoverTarget::Cidrs(vec!["192.0.2.0/24".to_string()]);
//! let discovery = DiscoverLens::new(&fetcher).discover(&target)?;
//!
//! for (hostname, ips) in &discovery.index {
//!     println!("{} -> {:?}", hostname, ips);
//! }
//! ```

pub mod config;
pub mod fetch;
pub mod lens;

pub use config::HfinderConfig;
pub use fetch::{FetchError, PageFetcher, UreqFetcher, USER_AGENT};

pub use lens::asn::{AsnLens, AsnPrefix, AsnProgressCallback};
pub use lens::cidr::CidrLens;
pub use lens::discover::{DiscoverArgs, DiscoverLens, DiscoverTarget, Discovery, DiscoverySummary};
pub use lens::index::HostnameIndex;
pub use lens::render::{HostFilter, RenderArgs, RenderLens, RenderMode};

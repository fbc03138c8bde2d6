//! Lens module
//!
//! Lenses bundle one piece of lookup logic with its argument and output
//! types, so the CLI only wires them together.
//!
//! | Lens | Purpose | Dependencies |
//! |------|---------|--------------|
//! | `AsnLens` | ASN -> announced IPv4 prefixes (bgp.he.net) | scraper, rayon |
//! | `CidrLens` | CIDR -> hostnames and IPs (robtex.com) | scraper, rayon |
//! | `DiscoverLens` | ASN/CIDR list -> merged hostname index | rayon |
//! | `RenderLens` | hostname index -> filtered text lines | regex |
//!
//! # Usage
//!
//! ```rust,ignore
//! use hfinder::fetch::UreqFetcher;
//! use hfinder::lens::discover::{DiscoverLens, DiscoverTarget};
//! use hfinder::lens::render::{RenderArgs, RenderLens};
//! use std::time::Duration;
//!
//! let render = RenderLens::new(&RenderArgs::default())?;
//! let fetcher = UreqFetcher::new(Duration::from_secs(30));
//! let target = DiscoverTarget::Asns(vec!["AS13335".to_string()]);
//! let discovery = DiscoverLens::new(&fetcher).with_jobs(4).discover(&target)?;
//! for line in render.render(&discovery.index) {
//!     println!("{}", line);
//! }
//! ```

pub mod utils;

// Hostname -> IP aggregation
pub mod index;

// AsnLens - ASN to prefix expansion
pub mod asn;

// CidrLens - hostnames inside a CIDR block
pub mod cidr;

// DiscoverLens - end to end lookup of a target list
pub mod discover;

// RenderLens - filtering and text output
pub mod render;

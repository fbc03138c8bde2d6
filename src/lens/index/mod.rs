//! Hostname index
//!
//! [`HostnameIndex`] maps each hostname to the set of IP addresses it was seen
//! with. Partial indexes from individual CIDR lookups are folded together with
//! [`HostnameIndex::merge`]; the result does not depend on the merge order.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Hostname -> set of IP addresses
///
/// IP strings are kept as the lookup page printed them. An empty string means
/// the hostname row had no co-located IP link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostnameIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl HostnameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hostname/IP pair
    pub fn insert(&mut self, hostname: impl Into<String>, ip: impl Into<String>) {
        self.entries
            .entry(hostname.into())
            .or_default()
            .insert(ip.into());
    }

    /// Union `other` into `self`, consuming both
    pub fn merge(mut self, other: HostnameIndex) -> HostnameIndex {
        for (hostname, ips) in other.entries {
            match self.entries.entry(hostname) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(ips);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    slot.get_mut().extend(ips);
                }
            }
        }
        self
    }

    /// Fold any number of partial indexes into one
    pub fn from_partials<I>(partials: I) -> HostnameIndex
    where
        I: IntoIterator<Item = HostnameIndex>,
    {
        partials
            .into_iter()
            .fold(HostnameIndex::new(), HostnameIndex::merge)
    }

    /// Keep only hostnames accepted by `keep`
    pub fn retain_hostnames<F>(&self, mut keep: F) -> HostnameIndex
    where
        F: FnMut(&str) -> bool,
    {
        HostnameIndex {
            entries: self
                .entries
                .iter()
                .filter(|(hostname, _)| keep(hostname))
                .map(|(hostname, ips)| (hostname.clone(), ips.clone()))
                .collect(),
        }
    }

    /// Invert into IP -> set of hostnames
    pub fn by_ip(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut inverted: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (hostname, ips) in &self.entries {
            for ip in ips {
                inverted
                    .entry(ip.as_str())
                    .or_default()
                    .insert(hostname.as_str());
            }
        }
        inverted
    }

    pub fn get(&self, hostname: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(hostname)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, BTreeSet<String>> {
        self.entries.iter()
    }

    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct hostnames
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H, I> FromIterator<(H, I)> for HostnameIndex
where
    H: Into<String>,
    I: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (H, I)>>(iter: T) -> Self {
        let mut index = HostnameIndex::new();
        for (hostname, ip) in iter {
            index.insert(hostname, ip);
        }
        index
    }
}

impl<'a> IntoIterator for &'a HostnameIndex {
    type Item = (&'a String, &'a BTreeSet<String>);
    type IntoIter = btree_map::Iter<'a, String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

//! Core domain types.
//!
//! This module defines the tagged structs shared across the crate:
//! - `Router`: one entry of the looking glass router directory
//! - `IpVersion`: the IP version a summary query targets
//! - `RouterSummary`: the structured result of one summary query

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::summary::SummaryMetrics;

/// A queryable router from the looking glass directory.
///
/// The identity key for lookups is the `(ixp, city, country)` triple; `id` is
/// the opaque identifier the remote service assigns and requires for queries.
/// A `Router` is immutable once parsed and lives for one directory
/// fetch/cache cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    /// Opaque identifier assigned by the remote service.
    pub id: String,
    /// Internet exchange point name.
    pub ixp: String,
    /// City the exchange operates in.
    pub city: String,
    /// Country the exchange operates in.
    pub country: String,
}

impl Router {
    /// Returns true when this router's identity triple matches exactly.
    pub fn matches(&self, ixp: &str, city: &str, country: &str) -> bool {
        self.ixp == ixp && self.city == city && self.country == country
    }
}

/// IP version of the BGP summary to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    /// IPv4 summary (`summary` query)
    Ipv4,
    /// IPv6 summary (`v6_summary` query)
    Ipv6,
}

impl IpVersion {
    /// Wire/database representation (`"ipv4"` / `"ipv6"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::Ipv4 => "ipv4",
            IpVersion::Ipv6 => "ipv6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured outcome of one summary query against one router.
///
/// Numeric fields carry the `-1` sentinel when the raw summary was
/// unavailable or unparsable; "missing" is a valid, explicit state rather
/// than an error. A record is never mutated after creation; re-querying a
/// router produces a new record that replaces the prior one in storage,
/// keyed by the identity triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSummary {
    /// Internet exchange point name.
    pub ixp: String,
    /// City the exchange operates in.
    pub city: String,
    /// Country the exchange operates in.
    pub country: String,
    /// IP version the summary was requested for.
    pub ip_version: IpVersion,
    /// Local AS number of the router.
    pub local_asn: i32,
    /// Number of RIB entries.
    pub rib_entries: i32,
    /// Number of peers.
    pub number_of_peers: i32,
    /// Total number of neighbors.
    pub number_of_neighbors: i32,
}

impl RouterSummary {
    /// Builds a summary record for `router` from parsed metrics.
    pub fn from_metrics(router: &Router, ip_version: IpVersion, metrics: SummaryMetrics) -> Self {
        Self {
            ixp: router.ixp.clone(),
            city: router.city.clone(),
            country: router.country.clone(),
            ip_version,
            local_asn: metrics.local_asn,
            rib_entries: metrics.rib_entries,
            number_of_peers: metrics.number_of_peers,
            number_of_neighbors: metrics.number_of_neighbors,
        }
    }
}

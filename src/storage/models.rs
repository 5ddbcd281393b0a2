// storage/models.rs
// Persisted record types

use chrono::Utc;
use serde::Serialize;

use crate::models::RouterSummary;

/// The persisted shape of a router summary.
///
/// Matches the `ixp_info` table column set in every backend; the flat-file
/// store serializes it verbatim. `date_added` is stamped with the current
/// UTC time when the record is built, immediately before the write.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    /// Internet exchange point name (part of the primary key).
    pub ixp: String,
    /// City of the exchange (part of the primary key).
    pub ixp_city: String,
    /// Country of the exchange (part of the primary key).
    pub ixp_country: String,
    /// IP version the summary was requested for (`ipv4` / `ipv6`).
    pub ixp_ip_version: String,
    /// Local AS number, `-1` when unknown.
    pub ixp_local_asn: i32,
    /// RIB entry count, `-1` when unknown.
    pub ixp_rib_entries: i32,
    /// Peer count, `-1` when unknown.
    pub ixp_number_of_peers: i32,
    /// Neighbor count, `-1` when unknown.
    pub ixp_number_of_neighbors: i32,
    /// UTC write timestamp (RFC 3339).
    pub date_added: String,
}

impl SummaryRecord {
    /// Builds the record for `summary`, stamping `date_added` with now.
    pub fn from_summary(summary: &RouterSummary) -> Self {
        Self {
            ixp: summary.ixp.clone(),
            ixp_city: summary.city.clone(),
            ixp_country: summary.country.clone(),
            ixp_ip_version: summary.ip_version.to_string(),
            ixp_local_asn: summary.local_asn,
            ixp_rib_entries: summary.rib_entries,
            ixp_number_of_peers: summary.number_of_peers,
            ixp_number_of_neighbors: summary.number_of_neighbors,
            date_added: Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IpVersion, Router};
    use crate::summary::SummaryMetrics;

    #[test]
    fn test_record_maps_summary_fields() {
        let router = Router {
            id: "4".to_string(),
            ixp: "BeirutIX".to_string(),
            city: "Beirut".to_string(),
            country: "Lebanon".to_string(),
        };
        let summary = RouterSummary::from_metrics(
            &router,
            IpVersion::Ipv4,
            SummaryMetrics {
                local_asn: 65000,
                rib_entries: 120000,
                number_of_peers: 45,
                number_of_neighbors: 50,
            },
        );

        let record = SummaryRecord::from_summary(&summary);
        assert_eq!(record.ixp, "BeirutIX");
        assert_eq!(record.ixp_city, "Beirut");
        assert_eq!(record.ixp_country, "Lebanon");
        assert_eq!(record.ixp_ip_version, "ipv4");
        assert_eq!(record.ixp_local_asn, 65000);
        assert_eq!(record.ixp_rib_entries, 120000);
        assert_eq!(record.ixp_number_of_peers, 45);
        assert_eq!(record.ixp_number_of_neighbors, 50);
        assert!(!record.date_added.is_empty());
    }
}

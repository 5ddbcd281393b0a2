//! Free-text BGP summary parsing.
//!
//! The looking glass returns router status as free text. This module
//! extracts the four numeric fields by locating fixed label phrases and
//! taking the first run of digits after each one.
//!
//! Parsing policy: `parse_summary` surfaces a field-level error for any
//! missing label, and `parse_or_unknown` is the degradation point: callers
//! that just want a record use it and receive the `-1` sentinel in every
//! field when the text is absent or unparsable.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::error_handling::SummaryParseError;

/// Sentinel value for a metric that could not be obtained.
pub const UNKNOWN_METRIC: i32 = -1;

const LABEL_LOCAL_ASN: &str = "local AS number";
const LABEL_RIB_ENTRIES: &str = "RIB entries";
const LABEL_PEERS: &str = "Peers";
const LABEL_NEIGHBORS: &str = "Total number of neighbors";

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit regex is valid"));

/// The four numeric fields of a BGP summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryMetrics {
    /// Local AS number of the router.
    pub local_asn: i32,
    /// Number of RIB entries.
    pub rib_entries: i32,
    /// Number of peers.
    pub number_of_peers: i32,
    /// Total number of neighbors.
    pub number_of_neighbors: i32,
}

impl SummaryMetrics {
    /// All fields set to the `-1` sentinel: an explicit "unknown" state,
    /// not an error.
    pub fn unknown() -> Self {
        Self {
            local_asn: UNKNOWN_METRIC,
            rib_entries: UNKNOWN_METRIC,
            number_of_peers: UNKNOWN_METRIC,
            number_of_neighbors: UNKNOWN_METRIC,
        }
    }
}

/// Extracts the first run of digits after `label` in `text`.
fn field_after_label(text: &str, label: &'static str) -> Result<i32, SummaryParseError> {
    let start = text
        .find(label)
        .ok_or(SummaryParseError::MissingField { field: label })?;
    let digits = DIGIT_RUN
        .find(&text[start + label.len()..])
        .ok_or(SummaryParseError::MissingField { field: label })?;
    digits
        .as_str()
        .parse::<i32>()
        .map_err(|_| SummaryParseError::InvalidNumber {
            field: label,
            value: digits.as_str().to_string(),
        })
}

/// Parses the four numeric fields out of raw summary text.
///
/// Runs of repeated whitespace are collapsed to a single space and the ends
/// trimmed before the labels are located. Any missing label (or a label with
/// no digits after it) yields a [`SummaryParseError`] naming the field.
pub fn parse_summary(raw: &str) -> Result<SummaryMetrics, SummaryParseError> {
    let collapsed = WHITESPACE_RUNS.replace_all(raw, " ");
    let text = collapsed.trim();

    Ok(SummaryMetrics {
        local_asn: field_after_label(text, LABEL_LOCAL_ASN)?,
        rib_entries: field_after_label(text, LABEL_RIB_ENTRIES)?,
        number_of_peers: field_after_label(text, LABEL_PEERS)?,
        number_of_neighbors: field_after_label(text, LABEL_NEIGHBORS)?,
    })
}

/// Parses raw summary text, degrading to the sentinel record on failure.
///
/// `None` and empty input mean the router produced no usable data; both
/// yield a record with every field `-1`. Unparsable text is logged with the
/// offending field and degrades the same way.
pub fn parse_or_unknown(raw: Option<&str>) -> SummaryMetrics {
    let Some(text) = raw else {
        debug!("No summary text available, recording unknown metrics");
        return SummaryMetrics::unknown();
    };
    if text.trim().is_empty() {
        debug!("Empty summary text, recording unknown metrics");
        return SummaryMetrics::unknown();
    }
    match parse_summary(text) {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!("Failed to parse summary text: {e}");
            SummaryMetrics::unknown()
        }
    }
}

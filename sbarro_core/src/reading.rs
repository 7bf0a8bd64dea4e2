//! Detection label parsing and reading extraction.
//!
//! A label packs a tray count and the time the batch was first seen into the
//! detection's class name: `prefix_count_YYYYMMDD_HHMMSS`. The prefix is
//! ignored and everything after the count is kept verbatim.

use std::num::IntErrorKind;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Format of `current_timestamp`, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The two fields carried by a detection label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub total_trays: i64,
    pub initial_timestamp: String,
}

impl Label {
    /// Parse `prefix_count_datepart[_datepart...]`.
    ///
    /// Fails with [`Error::MalformedLabel`] when the label has fewer than three
    /// `_` separated tokens, when the count is not an integer, or when the
    /// date part is empty.
    pub fn parse(label: &str) -> Result<Self> {
        let mut parts = label.splitn(3, '_');
        let _prefix = parts.next();

        let (Some(count), Some(initial_timestamp)) = (parts.next(), parts.next()) else {
            return Err(Error::malformed(
                label,
                "expected prefix_count_timestamp with at least three tokens",
            ));
        };

        if initial_timestamp.is_empty() {
            return Err(Error::malformed(label, "initial timestamp is empty"));
        }

        let total_trays = count.parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Error::malformed(label, format!("count {count:?} is out of range"))
            }
            _ => Error::malformed(label, format!("count {count:?} is not an integer")),
        })?;

        Ok(Self {
            total_trays,
            initial_timestamp: initial_timestamp.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub current_timestamp: String,
    pub initial_timestamp: String,
    pub total_trays: i64,
}

/// Result of one poll, serialized as `{"readings": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readings {
    pub readings: Vec<Reading>,
}

impl Readings {
    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl From<Vec<Reading>> for Readings {
    fn from(readings: Vec<Reading>) -> Self {
        Self { readings }
    }
}

/// Turn a batch of detection labels into readings stamped with `now`.
///
/// One reading per label, in input order. The first malformed label aborts
/// the batch.
pub fn extract<I, S>(labels: I, now: NaiveDateTime) -> Result<Vec<Reading>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let current_timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    labels
        .into_iter()
        .map(|label| {
            let Label {
                total_trays,
                initial_timestamp,
            } = Label::parse(label.as_ref())?;
            Ok(Reading {
                current_timestamp: current_timestamp.clone(),
                initial_timestamp,
                total_trays,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 10)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid date")
    }

    #[test]
    fn parses_count_and_date_parts() {
        let label = Label::parse("pizza_12_20241209_184330").expect("well-formed");
        assert_eq!(label.total_trays, 12);
        assert_eq!(label.initial_timestamp, "20241209_184330");
    }

    #[test]
    fn keeps_every_trailing_token() {
        let label = Label::parse("tray_3_2024_12_09_18_43_30").expect("well-formed");
        assert_eq!(label.total_trays, 3);
        assert_eq!(label.initial_timestamp, "2024_12_09_18_43_30");
    }

    #[test]
    fn single_date_part_is_enough() {
        let label = Label::parse("x_0_20241209").expect("well-formed");
        assert_eq!(label.total_trays, 0);
        assert_eq!(label.initial_timestamp, "20241209");
    }

    #[test]
    fn signed_count_parses() {
        assert_eq!(Label::parse("p_-4_1").expect("signed").total_trays, -4);
        assert_eq!(Label::parse("p_+4_1").expect("signed").total_trays, 4);
    }

    #[test]
    fn non_integer_count_is_rejected() {
        let err = Label::parse("pizza_abc_20241209_184330").unwrap_err();
        assert!(err.is_malformed_label());
        assert!(err.to_string().contains("pizza_abc_20241209_184330"));
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn oversized_count_is_out_of_range() {
        for label in ["p_99999999999999999999_20241209", "p_-99999999999999999999_20241209"] {
            let err = Label::parse(label).unwrap_err();
            assert!(err.is_malformed_label());
            assert!(err.to_string().contains("is out of range"), "{err}");
            assert!(!err.to_string().contains("not an integer"));
        }
    }

    #[test]
    fn too_few_tokens_are_rejected() {
        for label in ["", "pizza", "pizza_12"] {
            let err = Label::parse(label).unwrap_err();
            assert!(err.is_malformed_label(), "{label:?} should be rejected");
        }
    }

    #[test]
    fn empty_date_part_is_rejected() {
        let err = Label::parse("pizza_12_").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedLabel { ref label, .. } if label == "pizza_12_"
        ));
    }

    #[test]
    fn extract_matches_reference_scenario() {
        let readings = extract(["pizza_12_20241209_184330"], at(8, 0, 0)).expect("extract");
        assert_eq!(
            readings,
            vec![Reading {
                current_timestamp: "2024-12-10 08:00:00".to_string(),
                initial_timestamp: "20241209_184330".to_string(),
                total_trays: 12,
            }]
        );
    }

    #[test]
    fn extract_empty_batch() {
        let readings = extract(Vec::<String>::new(), at(8, 0, 0)).expect("extract");
        assert!(readings.is_empty());
    }

    #[test]
    fn extract_preserves_order_and_length() {
        let labels = vec![
            "a_1_20241201_000001".to_string(),
            "b_2_20241202_000002".to_string(),
            "c_3_20241203_000003".to_string(),
        ];
        let readings = extract(&labels, at(23, 59, 59)).expect("extract");
        assert_eq!(readings.len(), labels.len());
        let trays: Vec<i64> = readings.iter().map(|r| r.total_trays).collect();
        assert_eq!(trays, vec![1, 2, 3]);
        assert!(
            readings
                .iter()
                .all(|r| r.current_timestamp == "2024-12-10 23:59:59")
        );
    }

    #[test]
    fn extract_stops_at_first_malformed_label() {
        let err = extract(["ok_1_20241201", "bad_x_20241201", "ok_2_20241201"], at(8, 0, 0))
            .unwrap_err();
        assert!(err.to_string().contains("bad_x_20241201"));
    }

    #[test]
    fn reading_serializes_with_expected_keys() {
        let readings =
            Readings::from(extract(["pizza_12_20241209_184330"], at(8, 0, 0)).expect("extract"));
        let value = serde_json::to_value(&readings).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "readings": [{
                    "current_timestamp": "2024-12-10 08:00:00",
                    "initial_timestamp": "20241209_184330",
                    "total_trays": 12
                }]
            })
        );
    }
}

//! Per-vital time series: date-keyed readings and the windowing used for
//! display.
//!
//! Series keys are ISO calendar dates (`YYYY-MM-DD`, no time component).
//! That format is a compatibility contract with persisted documents and
//! sorts lexicographically in chronological order, so a [`BTreeMap`] gives
//! every consumer the order it needs for free.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three tracked vital signs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalKind {
    OxygenSaturation,
    Glucose,
    BloodPressure,
}

impl VitalKind {
    /// The fixed ordering a patient's vitals collection uses.
    pub const ALL: [VitalKind; 3] = [
        VitalKind::OxygenSaturation,
        VitalKind::Glucose,
        VitalKind::BloodPressure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VitalKind::OxygenSaturation => "Oxygen Saturation",
            VitalKind::Glucose => "Glucose",
            VitalKind::BloodPressure => "Blood Pressure",
        }
    }

    /// Parses a raw input string into a reading of this kind.
    ///
    /// Oxygen saturation and glucose take a single finite number. Blood
    /// pressure takes a `systolic/diastolic` pair; both sides must be
    /// present and numeric — a lone number is refused rather than stored
    /// half-formed.
    pub fn parse_reading(&self, raw: &str) -> Result<Reading, ReadingError> {
        match self {
            VitalKind::BloodPressure => {
                let parts: Vec<&str> = raw.split('/').collect();
                let &[systolic, diastolic] = parts.as_slice() else {
                    return Err(ReadingError::MalformedPair(raw.to_string()));
                };
                Ok(Reading::Pressure(
                    parse_finite(systolic)?,
                    parse_finite(diastolic)?,
                ))
            }
            _ => Ok(Reading::Value(parse_finite(raw)?)),
        }
    }
}

impl std::fmt::Display for VitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn parse_finite(raw: &str) -> Result<f64, ReadingError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ReadingError::NotNumeric(trimmed.to_string())),
    }
}

/// The value(s) recorded for a vital on one date.
///
/// Serialized untagged: a bare number for single-valued vitals, a
/// `[systolic, diastolic]` array for blood pressure — the shape of the
/// persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Value(f64),
    /// (systolic, diastolic)
    Pressure(f64, f64),
}

impl Reading {
    fn matches(&self, kind: VitalKind) -> bool {
        matches!(
            (self, kind),
            (Reading::Value(_), VitalKind::OxygenSaturation)
                | (Reading::Value(_), VitalKind::Glucose)
                | (Reading::Pressure(..), VitalKind::BloodPressure)
        )
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("`{0}` is not a number")]
    NotNumeric(String),
    #[error("blood pressure must be entered as systolic/diastolic, got `{0}`")]
    MalformedPair(String),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum VitalsError {
    #[error("a {kind} series cannot hold this reading shape")]
    ShapeMismatch { kind: VitalKind },
    #[error("no vital at index {index}")]
    NoSuchVital { index: usize },
}

/// One vital's date-keyed series of readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSeries {
    pub kind: VitalKind,
    #[serde(default)]
    data: BTreeMap<String, Reading>,
}

impl VitalSeries {
    pub fn new(kind: VitalKind) -> Self {
        Self {
            kind,
            data: BTreeMap::new(),
        }
    }

    pub fn get(&self, date_key: &str) -> Option<&Reading> {
        self.data.get(date_key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Inserts or overwrites the reading for a calendar date.
    ///
    /// Taking a [`NaiveDate`] (not a raw string) means this can never
    /// produce a non-date key. A reading whose shape does not match the
    /// series kind is rejected; in particular a blood-pressure series never
    /// stores a single number. This is the only mutation — readings cannot
    /// be deleted.
    pub fn upsert(&mut self, date: NaiveDate, reading: Reading) -> Result<(), VitalsError> {
        if !reading.matches(self.kind) {
            return Err(VitalsError::ShapeMismatch { kind: self.kind });
        }
        self.data.insert(date.format("%Y-%m-%d").to_string(), reading);
        Ok(())
    }

    /// The most recent `n` dated readings, oldest first.
    ///
    /// Keys that are not valid ISO dates (legacy documents carry stray
    /// `"0"`/`"1"` entries) are excluded before the window is taken, so
    /// they can never occupy a display slot. Returns all readings when
    /// fewer than `n` exist. The iterator is restartable: call again for a
    /// fresh pass.
    pub fn window(&self, n: usize) -> impl Iterator<Item = (&str, &Reading)> {
        let dated = self.data.keys().filter(|k| is_date_key(k)).count();
        self.data
            .iter()
            .filter(|(key, _)| is_date_key(key))
            .skip(dated.saturating_sub(n))
            .map(|(key, reading)| (key.as_str(), reading))
    }
}

fn is_date_key(key: &str) -> bool {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").is_ok()
}

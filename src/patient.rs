//! The patient record: demographics plus the three owned vital series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::compute_bmi;
use crate::vitals::{Reading, VitalKind, VitalSeries, VitalsError};

/// A demographic field the caregiver can edit. BMI is not here: it is
/// derived from height and weight and never independently editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Gender,
    Age,
    Height,
    Weight,
    BloodType,
}

/// One patient's record as held in memory and persisted as a document.
///
/// The demographic fields besides `name` are raw form text: they may be
/// absent, blank, or non-numeric, and derived metrics must tolerate that.
/// `vitals` always holds exactly three series in [`VitalKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    /// Height in centimeters, as entered.
    #[serde(default)]
    pub height: Option<String>,
    /// Weight in kilograms, as entered.
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    vitals: Vec<VitalSeries>,
}

impl Patient {
    /// A new patient with empty series for all three vitals.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            gender: None,
            age: None,
            height: None,
            weight: None,
            blood_type: None,
            vitals: VitalKind::ALL.iter().map(|&k| VitalSeries::new(k)).collect(),
        }
    }

    pub fn vitals(&self) -> &[VitalSeries] {
        &self.vitals
    }

    pub fn vital(&self, index: usize) -> Option<&VitalSeries> {
        self.vitals.get(index)
    }

    /// Current BMI, recomputed from height and weight on every call.
    pub fn bmi(&self) -> Option<f64> {
        compute_bmi(self.height.as_deref(), self.weight.as_deref())
    }

    /// A new record with one reading inserted or overwritten.
    ///
    /// The existing record is left untouched; the edit workflow only swaps
    /// the new value in once persistence has acknowledged it.
    pub fn with_reading(
        &self,
        index: usize,
        date: NaiveDate,
        reading: Reading,
    ) -> Result<Patient, VitalsError> {
        let mut updated = self.clone();
        let series = updated
            .vitals
            .get_mut(index)
            .ok_or(VitalsError::NoSuchVital { index })?;
        series.upsert(date, reading)?;
        Ok(updated)
    }

    /// A new record with one demographic field replaced. Blank input clears
    /// the field.
    pub fn with_field(&self, field: Field, value: &str) -> Patient {
        let mut updated = self.clone();
        let trimmed = value.trim();
        let slot = match field {
            Field::Name => {
                updated.name = value.to_string();
                return updated;
            }
            Field::Gender => &mut updated.gender,
            Field::Age => &mut updated.age,
            Field::Height => &mut updated.height,
            Field::Weight => &mut updated.weight,
            Field::BloodType => &mut updated.blood_type,
        };
        *slot = (!trimmed.is_empty()).then(|| value.to_string());
        updated
    }
}

//! The patient board: the one place the current record, the edit-mode
//! flag, and the edit session meet.
//!
//! Everything arrives here explicitly — the active patient from whatever
//! selection source the host app uses, the edit-mode toggle from its
//! chrome — so nothing in the core reads ambient state. Without a patient
//! the board is neutral: no charts, no BMI, and every editing entry point
//! is inert.

use chrono::NaiveDate;
use tracing::info;

use crate::chart::{self, ChartData};
use crate::config::ChartConfig;
use crate::edit::{EditError, EditState, VitalsEditor};
use crate::patient::{Field, Patient};
use crate::store::PatientStore;

#[derive(Debug, Default)]
pub struct Board {
    patient: Option<Patient>,
    edit_mode: bool,
    editor: VitalsEditor,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn edit_state(&self) -> &EditState {
        self.editor.state()
    }

    /// Replaces the active patient wholesale (never merged) and discards
    /// any in-progress edit session.
    pub fn select_patient(&mut self, patient: Option<Patient>) {
        self.editor.cancel();
        self.patient = patient;
    }

    /// Externally owned toggle. Turning edit mode off abandons the session.
    pub fn set_edit_mode(&mut self, on: bool) {
        if !on {
            self.editor.cancel();
        }
        self.edit_mode = on && self.patient.is_some();
    }

    /// Current BMI, recomputed on every call; `None` without a patient or
    /// without both height and weight.
    pub fn bmi(&self) -> Option<f64> {
        self.patient.as_ref().and_then(Patient::bmi)
    }

    /// Chart projections for all three vitals, empty when no patient is
    /// selected.
    pub fn charts(&self, config: &ChartConfig) -> Vec<ChartData> {
        self.patient
            .as_ref()
            .map(|p| p.vitals().iter().map(|s| chart::project(s, config)).collect())
            .unwrap_or_default()
    }

    pub fn click_vital(&mut self, index: usize) {
        let Some(patient) = &self.patient else { return };
        self.editor
            .click_vital(self.edit_mode, patient.vitals().len(), index);
    }

    pub fn pick_date(&mut self, date: NaiveDate) {
        if self.patient.is_some() {
            self.editor.pick_date(date);
        }
    }

    pub fn input_value(&mut self, raw: impl Into<String>) {
        if self.patient.is_some() {
            self.editor.input_value(raw);
        }
    }

    /// Commits the pending reading. On success the board adopts the
    /// store-acknowledged record and the selection clears; edit mode stays
    /// on. On failure the board's record and the session are unchanged.
    pub async fn confirm(
        &mut self,
        today: NaiveDate,
        store: &dyn PatientStore,
    ) -> Result<(), EditError> {
        let patient = self.patient.as_ref().ok_or(EditError::NoPatient)?;
        let updated = self.editor.commit(patient, today, store).await?;
        self.patient = Some(updated);
        Ok(())
    }

    /// Applies a demographic edit to the in-memory record. Only live in
    /// edit mode; BMI is not a [`Field`] and can never be written.
    pub fn edit_field(&mut self, field: Field, value: &str) {
        if !self.edit_mode {
            return;
        }
        if let Some(patient) = &self.patient {
            self.patient = Some(patient.with_field(field, value));
        }
    }

    /// Persists the demographic edits and leaves edit mode. On failure the
    /// in-memory record and edit mode are kept so the caregiver can retry.
    pub async fn save_demographics(&mut self, store: &dyn PatientStore) -> Result<(), EditError> {
        let patient = self.patient.as_ref().ok_or(EditError::NoPatient)?;
        store.save(patient).await?;
        info!(patient = %patient.id, "demographics saved");
        self.set_edit_mode(false);
        Ok(())
    }
}

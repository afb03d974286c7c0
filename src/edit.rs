//! The edit session state machine.
//!
//! A session tracks which vital is being edited, the selected calendar
//! date, and the pending raw input. It only ever mutates the record at
//! commit time, by producing a whole new [`Patient`] and handing it to the
//! persistence collaborator; the caller adopts the new value only after
//! the store acknowledges it.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::patient::Patient;
use crate::store::{PatientStore, StoreError};
use crate::vitals::{ReadingError, VitalsError};

/// Where an edit session currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No selection. The charts are read-only.
    #[default]
    Viewing,
    /// A vital was clicked while edit mode was on; waiting for a date.
    VitalSelected { vital: usize },
    /// Vital and date chosen; `pending` holds the raw value text, which
    /// may still be empty or unparsable.
    DateSelected {
        vital: usize,
        date: NaiveDate,
        pending: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("no patient selected")]
    NoPatient,
    #[error("no vital and date selected")]
    NothingSelected,
    #[error("a commit is already in flight")]
    CommitInFlight,
    #[error("{0} is in the future")]
    DateInFuture(NaiveDate),
    #[error(transparent)]
    InvalidValue(#[from] ReadingError),
    #[error(transparent)]
    Vitals(#[from] VitalsError),
    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),
}

/// Drives one edit session over a patient's vitals.
///
/// All transitions are synchronous no-ops when their guard fails; the only
/// async step is [`commit`](Self::commit), and while a commit is in flight
/// every other entry point is inert (the UI's critical section).
#[derive(Debug, Default)]
pub struct VitalsEditor {
    state: EditState,
    in_flight: bool,
}

impl VitalsEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn selected_vital(&self) -> Option<usize> {
        match self.state {
            EditState::Viewing => None,
            EditState::VitalSelected { vital } | EditState::DateSelected { vital, .. } => {
                Some(vital)
            }
        }
    }

    /// A vital chart was clicked. Starts (or restarts) a selection, but
    /// only while edit mode is on and the index is in range.
    pub fn click_vital(&mut self, edit_mode: bool, vital_count: usize, index: usize) {
        if self.in_flight || !edit_mode || index >= vital_count {
            return;
        }
        self.state = EditState::VitalSelected { vital: index };
    }

    /// A calendar date was picked. Meaningless before a vital is selected.
    pub fn pick_date(&mut self, date: NaiveDate) {
        if self.in_flight {
            return;
        }
        match &self.state {
            EditState::Viewing => {}
            EditState::VitalSelected { vital } => {
                self.state = EditState::DateSelected {
                    vital: *vital,
                    date,
                    pending: String::new(),
                };
            }
            EditState::DateSelected { vital, pending, .. } => {
                // Re-picking the date keeps whatever was already typed.
                self.state = EditState::DateSelected {
                    vital: *vital,
                    date,
                    pending: pending.clone(),
                };
            }
        }
    }

    /// The raw value text changed.
    pub fn input_value(&mut self, raw: impl Into<String>) {
        if self.in_flight {
            return;
        }
        if let EditState::DateSelected { pending, .. } = &mut self.state {
            *pending = raw.into();
        }
    }

    /// Abandons the session unconditionally: selection, date, and pending
    /// value are gone. Called when edit mode toggles off or the selected
    /// patient changes. No side effects.
    pub fn cancel(&mut self) {
        self.state = EditState::Viewing;
        self.in_flight = false;
    }

    /// Validates the pending value and commits it.
    ///
    /// `today` is the user's local calendar day; the selected date becomes
    /// the series key as-is (it is already a plain calendar date, so no
    /// UTC shift can leak in) and must not lie in the future. On any
    /// validation failure the store is not called and the session stays
    /// where it was. On persistence failure the selection is also
    /// retained, for retry, and the caller's patient is untouched — the
    /// updated record is only returned once the store acknowledged it.
    #[instrument(skip_all, fields(patient = %patient.id))]
    pub async fn commit(
        &mut self,
        patient: &Patient,
        today: NaiveDate,
        store: &dyn PatientStore,
    ) -> Result<Patient, EditError> {
        if self.in_flight {
            return Err(EditError::CommitInFlight);
        }
        let EditState::DateSelected { vital, date, pending } = &self.state else {
            return Err(EditError::NothingSelected);
        };
        let (vital, date) = (*vital, *date);
        if date > today {
            return Err(EditError::DateInFuture(date));
        }

        let kind = patient
            .vital(vital)
            .ok_or(VitalsError::NoSuchVital { index: vital })?
            .kind;
        let reading = kind.parse_reading(pending)?;
        let updated = patient.with_reading(vital, date, reading)?;

        let saved = {
            self.in_flight = true;
            let _guard = ClearOnDrop(&mut self.in_flight);
            store.save(&updated).await
        };

        match saved {
            Ok(()) => {
                info!(%date, kind = kind.label(), "reading committed");
                self.state = EditState::Viewing;
                Ok(updated)
            }
            Err(err) => {
                warn!(%date, kind = kind.label(), error = %err, "commit not persisted");
                Err(err.into())
            }
        }
    }
}

/// Clears the in-flight flag when the commit future completes or is
/// dropped mid-await (a host-side timeout on a hung store), so the
/// retained selection stays editable and a retry is possible.
struct ClearOnDrop<'a>(&'a mut bool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

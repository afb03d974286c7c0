//! The persistence collaborator contract.
//!
//! The core never talks to a document store directly; it hands a fully
//! formed [`Patient`] to whatever implements [`PatientStore`]. The real
//! backend lives outside this crate. [`MemoryStore`] is the in-process
//! implementation used by tests and the demo binary.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::patient::Patient;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persistence rejected the write: {0}")]
    WriteFailed(String),
    #[error("could not read patient document: {0}")]
    ReadFailed(String),
    #[error("no patient with id {0}")]
    NotFound(String),
}

/// Read/write contract for the patient document store.
#[async_trait]
pub trait PatientStore: Send + Sync {
    /// Persists the whole patient document. Must be idempotent for
    /// identical input; may fail, in which case the caller keeps its
    /// in-memory state and may retry.
    async fn save(&self, patient: &Patient) -> Result<(), StoreError>;

    async fn load(&self, id: &str) -> Result<Patient, StoreError>;
}

/// In-memory document store keyed by patient id.
#[derive(Default)]
pub struct MemoryStore {
    patients: DashMap<String, Patient>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

#[async_trait]
impl PatientStore for MemoryStore {
    async fn save(&self, patient: &Patient) -> Result<(), StoreError> {
        debug!(id = %patient.id, "saving patient document");
        self.patients.insert(patient.id.clone(), patient.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Patient, StoreError> {
        self.patients
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

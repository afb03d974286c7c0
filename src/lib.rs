//! Bedside patient chart core library
//!
//! This crate exports the vitals time-series data model and the editing
//! workflow built on top of it: the patient record, derived metrics,
//! per-vital date-keyed series, chart projections, and the edit session
//! state machine. Persistence is a collaborator behind [`store::PatientStore`];
//! authentication, routing, and widget rendering live outside this crate.

pub mod board;
pub mod chart;
pub mod edit;
pub mod metrics;
pub mod patient;
pub mod store;
pub mod vitals;

pub use board::Board;
pub use chart::{ChartData, Track};
pub use edit::{EditError, EditState, VitalsEditor};
pub use patient::{Field, Patient};
pub use store::{MemoryStore, PatientStore, StoreError};
pub use vitals::{Reading, VitalKind, VitalSeries, VitalsError};

/// Display configuration for chart projections.
pub mod config {
    use serde::Deserialize;

    /// How many of the most recent dates a chart shows, and the y-axis
    /// tick step for each vital kind.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(default)]
    pub struct ChartConfig {
        pub window: usize,
        pub oxygen_tick_step: f64,
        pub glucose_tick_step: f64,
        pub pressure_tick_step: f64,
    }

    impl Default for ChartConfig {
        fn default() -> Self {
            Self {
                window: 5,
                oxygen_tick_step: 20.0,
                glucose_tick_step: 50.0,
                pressure_tick_step: 40.0,
            }
        }
    }
}

pub use config::ChartConfig;

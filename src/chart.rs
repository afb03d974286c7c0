//! Projection of a windowed vital series into renderable chart data.
//!
//! The rendering layer (outside this crate) only ever sees labels and
//! numeric tracks; it never touches the series maps directly.

use serde::Serialize;

use crate::config::ChartConfig;
use crate::vitals::{Reading, VitalKind, VitalSeries};

/// One line on a chart. A `None` point is an explicit gap — the renderer
/// must break the line there, never draw zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub label: String,
    pub points: Vec<Option<f64>>,
}

/// A renderable chart: shared date labels plus one track (oxygen
/// saturation, glucose) or two (blood pressure: systolic and diastolic).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    /// Y-axis tick granularity for this vital kind.
    pub tick_step: f64,
    pub tracks: Vec<Track>,
}

/// Projects the most recent window of a series, oldest date first.
///
/// Non-date keys never reach the labels; the window already excludes them.
/// A reading whose shape does not match the series kind (possible in
/// legacy documents) becomes a gap on every track for that date.
pub fn project(series: &VitalSeries, config: &ChartConfig) -> ChartData {
    let windowed: Vec<(&str, &Reading)> = series.window(config.window).collect();
    let labels = windowed.iter().map(|(key, _)| key.to_string()).collect();

    let tracks = match series.kind {
        VitalKind::BloodPressure => {
            let (systolic, diastolic): (Vec<_>, Vec<_>) = windowed
                .iter()
                .map(|(_, reading)| match reading {
                    Reading::Pressure(s, d) => (Some(*s), Some(*d)),
                    Reading::Value(_) => (None, None),
                })
                .unzip();
            vec![
                Track { label: "Systolic".to_string(), points: systolic },
                Track { label: "Diastolic".to_string(), points: diastolic },
            ]
        }
        kind => {
            let points = windowed
                .iter()
                .map(|(_, reading)| match reading {
                    Reading::Value(v) => Some(*v),
                    Reading::Pressure(..) => None,
                })
                .collect();
            vec![Track { label: kind.label().to_string(), points }]
        }
    };

    ChartData {
        title: series.kind.label().to_string(),
        labels,
        tick_step: tick_step(series.kind, config),
        tracks,
    }
}

fn tick_step(kind: VitalKind, config: &ChartConfig) -> f64 {
    match kind {
        VitalKind::OxygenSaturation => config.oxygen_tick_step,
        VitalKind::Glucose => config.glucose_tick_step,
        VitalKind::BloodPressure => config.pressure_tick_step,
    }
}

//! Bedside demo binary
//!
//! Renders a patient document's vitals charts in the terminal and can
//! record a new reading back into the document file. The file stands in
//! for the document store a host application would provide.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bedside::{Board, ChartConfig, Patient, PatientStore, StoreError};

#[derive(Parser)]
#[command(name = "bedside", about = "Inspect and edit a patient vitals document")]
struct Cli {
    /// Path to the patient JSON document
    patient: PathBuf,

    /// Record a reading for this vital
    /// (0 = oxygen saturation, 1 = glucose, 2 = blood pressure)
    #[arg(long, requires = "value")]
    vital: Option<usize>,

    /// Date of the reading; defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Raw value, e.g. `98` or `120/80`
    #[arg(long)]
    value: Option<String>,
}

/// Document store backed by a single JSON file.
struct FileStore {
    path: PathBuf,
}

#[async_trait]
impl PatientStore for FileStore {
    async fn save(&self, patient: &Patient) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(patient)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    async fn load(&self, _id: &str) -> Result<Patient, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::ReadFailed(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let raw = std::fs::read_to_string(&cli.patient)
        .with_context(|| format!("reading {}", cli.patient.display()))?;
    let patient: Patient = serde_json::from_str(&raw).context("not a patient document")?;

    let mut board = Board::new();
    board.select_patient(Some(patient));

    if let (Some(vital), Some(value)) = (cli.vital, cli.value.as_deref()) {
        let store = FileStore { path: cli.patient.clone() };
        let today = Local::now().date_naive();
        board.set_edit_mode(true);
        board.click_vital(vital);
        board.pick_date(cli.date.unwrap_or(today));
        board.input_value(value);
        board.confirm(today, &store).await?;
        board.set_edit_mode(false);
    }

    let record = board.patient().context("no patient selected")?;
    println!("{}", record.name);
    match board.bmi() {
        Some(bmi) => println!("BMI: {bmi:.2}"),
        None => println!("BMI: -"),
    }

    for chart in board.charts(&ChartConfig::default()) {
        println!("\n{} (ticks of {})", chart.title, chart.tick_step);
        if chart.labels.is_empty() {
            println!("  no readings");
            continue;
        }
        for (i, label) in chart.labels.iter().enumerate() {
            let cells: Vec<String> = chart
                .tracks
                .iter()
                .map(|track| match track.points[i] {
                    Some(v) => format!("{v}"),
                    None => "-".to_string(),
                })
                .collect();
            println!("  {label}  {}", cells.join(" / "));
        }
    }

    Ok(())
}

//! End-to-end editing workflow: board, editor, series, projection, and the
//! persistence collaborator together.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use bedside::patient::Field;
use bedside::{
    Board, ChartConfig, EditState, MemoryStore, Patient, PatientStore, StoreError,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

const TODAY: &str = "2024-02-15";

/// A store whose backend is down: every write fails.
struct DownStore;

#[async_trait]
impl PatientStore for DownStore {
    async fn save(&self, _patient: &Patient) -> Result<(), StoreError> {
        Err(StoreError::WriteFailed("backend unreachable".into()))
    }

    async fn load(&self, id: &str) -> Result<Patient, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }
}

/// A store whose backend hangs: `save` never resolves.
struct HungStore;

#[async_trait]
impl PatientStore for HungStore {
    async fn save(&self, _patient: &Patient) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn load(&self, id: &str) -> Result<Patient, StoreError> {
        Err(StoreError::NotFound(id.to_string()))
    }
}

#[tokio::test]
async fn caregiver_edits_a_record_end_to_end() {
    let store = MemoryStore::new();
    let mut board = Board::new();
    board.select_patient(Some(Patient::new("Kim Jiwoo")));

    // Demographics first: BMI follows height and weight, nothing else.
    board.set_edit_mode(true);
    board.edit_field(Field::Height, "170");
    board.edit_field(Field::Weight, "70");
    assert_eq!(board.bmi(), Some(24.22));
    board.edit_field(Field::Weight, "80");
    assert_eq!(board.bmi(), Some(27.68));
    board.save_demographics(&store).await.unwrap();
    assert!(!board.edit_mode());

    // Seven days of oxygen saturation, committed one by one.
    board.set_edit_mode(true);
    for day in 1..=7 {
        board.click_vital(0);
        board.pick_date(date(&format!("2024-01-0{day}")));
        board.input_value(format!("9{day}"));
        board.confirm(date(TODAY), &store).await.unwrap();
    }

    // Only the last five dates are displayed, oldest first.
    let charts = board.charts(&ChartConfig::default());
    assert_eq!(
        charts[0].labels,
        ["2024-01-03", "2024-01-04", "2024-01-05", "2024-01-06", "2024-01-07"]
    );
    assert_eq!(
        charts[0].tracks[0].points,
        [Some(93.0), Some(94.0), Some(95.0), Some(96.0), Some(97.0)]
    );

    // A blood-pressure pair lands on both tracks of the third chart.
    board.click_vital(2);
    board.pick_date(date("2024-02-10"));
    board.input_value("120/80");
    board.confirm(date(TODAY), &store).await.unwrap();

    let charts = board.charts(&ChartConfig::default());
    assert_eq!(charts[2].labels, ["2024-02-10"]);
    assert_eq!(charts[2].tracks[0].points, [Some(120.0)]);
    assert_eq!(charts[2].tracks[1].points, [Some(80.0)]);

    // Every commit went through the store; its copy matches ours.
    let id = board.patient().unwrap().id.clone();
    assert_eq!(&store.load(&id).await.unwrap(), board.patient().unwrap());
}

#[tokio::test]
async fn refused_input_never_reaches_the_store() {
    let store = MemoryStore::new();
    let mut board = Board::new();
    board.select_patient(Some(Patient::new("Kim Jiwoo")));
    board.set_edit_mode(true);

    for bad in ["120", "abc/80", "", "not a number"] {
        board.click_vital(2);
        board.pick_date(date("2024-02-10"));
        board.input_value(bad);
        assert!(board.confirm(date(TODAY), &store).await.is_err(), "{bad:?}");
    }

    assert!(store.is_empty());
    assert!(board.patient().unwrap().vital(2).unwrap().is_empty());
}

#[tokio::test]
async fn persistence_failure_keeps_session_and_record_for_retry() {
    let mut board = Board::new();
    board.select_patient(Some(Patient::new("Kim Jiwoo")));
    board.set_edit_mode(true);
    board.click_vital(1);
    board.pick_date(date("2024-02-10"));
    board.input_value("104");

    board.confirm(date(TODAY), &DownStore).await.unwrap_err();

    // Nothing was adopted, nothing half-written, selection intact.
    assert!(board.patient().unwrap().vital(1).unwrap().is_empty());
    assert_eq!(
        *board.edit_state(),
        EditState::DateSelected {
            vital: 1,
            date: date("2024-02-10"),
            pending: "104".into()
        }
    );

    // The retry against a healthy store commits the same pending value.
    let store = MemoryStore::new();
    board.confirm(date(TODAY), &store).await.unwrap();
    assert_eq!(*board.edit_state(), EditState::Viewing);
    assert!(!board.patient().unwrap().vital(1).unwrap().is_empty());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn timed_out_commit_releases_the_editor() {
    let mut board = Board::new();
    board.select_patient(Some(Patient::new("Kim Jiwoo")));
    board.set_edit_mode(true);
    board.click_vital(1);
    board.pick_date(date("2024-02-10"));
    board.input_value("104");

    // The host gives up on a hung store and drops the commit future.
    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        board.confirm(date(TODAY), &HungStore),
    )
    .await;
    assert!(timed_out.is_err());

    // The selection survives and the editor is not wedged: clicks still
    // register and a retry against a healthy store commits the value.
    assert_eq!(
        *board.edit_state(),
        EditState::DateSelected {
            vital: 1,
            date: date("2024-02-10"),
            pending: "104".into()
        }
    );
    board.click_vital(0);
    assert_eq!(*board.edit_state(), EditState::VitalSelected { vital: 0 });

    board.pick_date(date("2024-02-10"));
    board.input_value("98");
    let store = MemoryStore::new();
    board.confirm(date(TODAY), &store).await.unwrap();
    assert_eq!(*board.edit_state(), EditState::Viewing);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn abandoned_session_leaves_no_trace() {
    let store = MemoryStore::new();
    let mut board = Board::new();
    board.select_patient(Some(Patient::new("Kim Jiwoo")));
    board.set_edit_mode(true);
    board.click_vital(1);
    board.pick_date(date("2024-02-10"));
    board.input_value("99");

    board.set_edit_mode(false);

    board.set_edit_mode(true);
    board.click_vital(1);
    assert_eq!(*board.edit_state(), EditState::VitalSelected { vital: 1 });
    // Confirming now fails: the old date and value are gone.
    assert!(board.confirm(date(TODAY), &store).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn legacy_document_anomalies_stay_off_the_charts() {
    // A persisted document with the historical stray keys under blood
    // pressure and a bare number where a pair belongs.
    let json = r#"{
        "id": "legacy-1",
        "name": "Park Dojun",
        "height": "182",
        "weight": "77",
        "vitals": [
            { "kind": "oxygenSaturation", "data": { "2024-01-05": 97.0 } },
            { "kind": "glucose", "data": {} },
            { "kind": "bloodPressure", "data": {
                "0": [120.0, 80.0],
                "1": [118.0, 79.0],
                "2024-01-04": 130.0,
                "2024-01-05": [125.0, 82.0]
            } }
        ]
    }"#;
    let patient: Patient = serde_json::from_str(json).unwrap();

    let mut board = Board::new();
    board.select_patient(Some(patient));

    let charts = board.charts(&ChartConfig::default());
    assert_eq!(charts[2].labels, ["2024-01-04", "2024-01-05"]);
    assert_eq!(charts[2].tracks[0].points, [None, Some(125.0)]);
    assert_eq!(charts[2].tracks[1].points, [None, Some(82.0)]);
    assert_eq!(board.bmi(), Some(23.25));
}

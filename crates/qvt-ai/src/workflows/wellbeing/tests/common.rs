use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::wellbeing::domain::{
    AlertRecord, CheckinFeatures, InstrumentSnapshots, RecommendationRecord, ScoreRecord,
    SubjectId, TimeWindow,
};
use crate::workflows::wellbeing::repository::{
    AggregateError, FeatureAggregator, RepositoryError, WellbeingRepository,
};
use crate::workflows::wellbeing::service::WellbeingService;

pub(super) fn subject() -> SubjectId {
    SubjectId("user-42".to_string())
}

/// Aggregates with every signal present and nothing firing.
pub(super) fn calm_features() -> CheckinFeatures {
    CheckinFeatures {
        workload_max_7d: Some(0),
        strain_max_7d: Some(0),
        energy_min_7d: Some(4),
        mood_mean_7d: Some(0.0),
        climate_mean_30d: Some(0.0),
        disconnect_min_30d: Some(5),
    }
}

/// Aggregates matching a heavy week: workload and strain both peak, evening
/// disconnection collapsed.
pub(super) fn pressured_features() -> CheckinFeatures {
    CheckinFeatures {
        workload_max_7d: Some(4),
        strain_max_7d: Some(4),
        energy_min_7d: Some(2),
        mood_mean_7d: Some(2.0),
        climate_mean_30d: Some(2.5),
        disconnect_min_30d: Some(1),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAggregator {
    features: Arc<Mutex<HashMap<SubjectId, CheckinFeatures>>>,
    instruments: Arc<Mutex<HashMap<SubjectId, InstrumentSnapshots>>>,
}

impl MemoryAggregator {
    pub(super) fn seed_features(&self, subject: &SubjectId, features: CheckinFeatures) {
        self.features
            .lock()
            .expect("feature mutex poisoned")
            .insert(subject.clone(), features);
    }

    pub(super) fn seed_instruments(&self, subject: &SubjectId, snapshots: InstrumentSnapshots) {
        self.instruments
            .lock()
            .expect("instrument mutex poisoned")
            .insert(subject.clone(), snapshots);
    }
}

impl FeatureAggregator for MemoryAggregator {
    fn features(&self, subject: &SubjectId) -> Result<Option<CheckinFeatures>, AggregateError> {
        Ok(self
            .features
            .lock()
            .expect("feature mutex poisoned")
            .get(subject)
            .cloned())
    }

    fn instruments(&self, subject: &SubjectId) -> Result<InstrumentSnapshots, AggregateError> {
        Ok(self
            .instruments
            .lock()
            .expect("instrument mutex poisoned")
            .get(subject)
            .copied()
            .unwrap_or_default())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    scores: Arc<Mutex<Vec<ScoreRecord>>>,
    alerts: Arc<Mutex<Vec<AlertRecord>>>,
    recommendations: Arc<Mutex<Vec<RecommendationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn scores(&self) -> Vec<ScoreRecord> {
        self.scores.lock().expect("score mutex poisoned").clone()
    }

    pub(super) fn alerts(&self) -> Vec<AlertRecord> {
        self.alerts.lock().expect("alert mutex poisoned").clone()
    }

    pub(super) fn recommendations(&self) -> Vec<RecommendationRecord> {
        self.recommendations
            .lock()
            .expect("recommendation mutex poisoned")
            .clone()
    }
}

impl WellbeingRepository for MemoryRepository {
    fn last_score(
        &self,
        subject: &SubjectId,
        window: TimeWindow,
    ) -> Result<Option<u8>, RepositoryError> {
        Ok(self
            .scores
            .lock()
            .expect("score mutex poisoned")
            .iter()
            .rev()
            .find(|record| record.subject_id == *subject && record.time_window == window)
            .map(|record| record.score))
    }

    fn insert_score(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        self.scores
            .lock()
            .expect("score mutex poisoned")
            .push(record);
        Ok(())
    }

    fn insert_alert(&self, record: AlertRecord) -> Result<(), RepositoryError> {
        self.alerts
            .lock()
            .expect("alert mutex poisoned")
            .push(record);
        Ok(())
    }

    fn insert_recommendations(
        &self,
        records: Vec<RecommendationRecord>,
    ) -> Result<(), RepositoryError> {
        self.recommendations
            .lock()
            .expect("recommendation mutex poisoned")
            .extend(records);
        Ok(())
    }
}

/// Repository that rejects every write, for persistence-failure paths.
pub(super) struct UnavailableRepository;

impl WellbeingRepository for UnavailableRepository {
    fn last_score(
        &self,
        _subject: &SubjectId,
        _window: TimeWindow,
    ) -> Result<Option<u8>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_score(&self, _record: ScoreRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_alert(&self, _record: AlertRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_recommendations(
        &self,
        _records: Vec<RecommendationRecord>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    WellbeingService<MemoryAggregator, MemoryRepository>,
    Arc<MemoryAggregator>,
    Arc<MemoryRepository>,
) {
    let aggregator = Arc::new(MemoryAggregator::default());
    let repository = Arc::new(MemoryRepository::default());
    let service = WellbeingService::new(aggregator.clone(), repository.clone());
    (service, aggregator, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

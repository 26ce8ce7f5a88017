use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use qvt_ai::config::RoutingFilesConfig;
use qvt_ai::workflows::routing::{ProfileCatalog, RoutingConfigError, RoutingRules};
use qvt_ai::workflows::wellbeing::{
    AggregateError, AlertRecord, CheckinFeatures, EffortReward, FeatureAggregator,
    InstrumentSnapshots, JobStrain, RecommendationRecord, RepositoryError, ScoreRecord, SubjectId,
    TimeWindow, WellbeingIndex, WellbeingRepository,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory stand-in for the check-in warehouse. Production deployments swap
/// this for the relational aggregation queries; the demo and tests seed it
/// directly.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCheckinSource {
    features: Arc<Mutex<HashMap<SubjectId, CheckinFeatures>>>,
    instruments: Arc<Mutex<HashMap<SubjectId, InstrumentSnapshots>>>,
}

impl InMemoryCheckinSource {
    pub(crate) fn seed_features(&self, subject: &SubjectId, features: CheckinFeatures) {
        self.features
            .lock()
            .expect("feature mutex poisoned")
            .insert(subject.clone(), features);
    }

    pub(crate) fn seed_instruments(&self, subject: &SubjectId, snapshots: InstrumentSnapshots) {
        self.instruments
            .lock()
            .expect("instrument mutex poisoned")
            .insert(subject.clone(), snapshots);
    }
}

impl FeatureAggregator for InMemoryCheckinSource {
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

/// Append-only in-memory store for scores, alerts, and recommendations.
#[derive(Default, Clone)]
pub(crate) struct InMemoryWellbeingStore {
    scores: Arc<Mutex<Vec<ScoreRecord>>>,
    alerts: Arc<Mutex<Vec<AlertRecord>>>,
    recommendations: Arc<Mutex<Vec<RecommendationRecord>>>,
}

impl InMemoryWellbeingStore {
    pub(crate) fn alerts(&self) -> Vec<AlertRecord> {
        self.alerts.lock().expect("alert mutex poisoned").clone()
    }

    pub(crate) fn scores(&self) -> Vec<ScoreRecord> {
        self.scores.lock().expect("score mutex poisoned").clone()
    }
}

impl WellbeingRepository for InMemoryWellbeingStore {
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

/// Load the expert catalog, honoring the configured file when present.
pub(crate) fn load_catalog(config: &RoutingFilesConfig) -> Result<ProfileCatalog, RoutingConfigError> {
    match &config.profiles_file {
        Some(path) => ProfileCatalog::from_path(path),
        None => Ok(ProfileCatalog::builtin()),
    }
}

/// Load the routing rules, honoring the configured file when present.
pub(crate) fn load_rules(config: &RoutingFilesConfig) -> Result<RoutingRules, RoutingConfigError> {
    match &config.rules_file {
        Some(path) => RoutingRules::from_path(path),
        None => Ok(RoutingRules::builtin()),
    }
}

/// Sample subjects used by the demo command and the `--seed-demo` server flag.
pub(crate) fn seed_demo_subjects(source: &InMemoryCheckinSource) -> Vec<SubjectId> {
    let overloaded = SubjectId("demo-overloaded".to_string());
    source.seed_features(
        &overloaded,
        CheckinFeatures {
            workload_max_7d: Some(5),
            strain_max_7d: Some(4),
            energy_min_7d: Some(2),
            mood_mean_7d: Some(2.0),
            climate_mean_30d: Some(2.5),
            disconnect_min_30d: Some(1),
        },
    );
    source.seed_instruments(
        &overloaded,
        InstrumentSnapshots {
            wellbeing_index: Some(WellbeingIndex {
                items: [1, 2, 1, 2, 2],
            }),
            job_strain: Some(JobStrain {
                demand: 5,
                control: 2,
                support: 2,
            }),
            effort_reward: Some(EffortReward {
                effort: 5,
                reward: 2,
                overcommit: 4,
            }),
            engagement: None,
        },
    );

    let steady = SubjectId("demo-steady".to_string());
    source.seed_features(
        &steady,
        CheckinFeatures {
            workload_max_7d: Some(3),
            strain_max_7d: Some(2),
            energy_min_7d: Some(4),
            mood_mean_7d: Some(4.2),
            climate_mean_30d: Some(4.0),
            disconnect_min_30d: Some(4),
        },
    );

    vec![overloaded, steady]
}

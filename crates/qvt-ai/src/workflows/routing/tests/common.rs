use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::routing::catalog::{ExpertProfile, ProfileCatalog};
use crate::workflows::routing::config::{ChannelWeights, KeywordRules, RoutingRules};
use crate::workflows::routing::embedding::{EmbeddingError, EmbeddingProvider};
use crate::workflows::routing::engine::ProfileRouter;
use crate::workflows::routing::service::QueryRouter;
use crate::workflows::wellbeing::repository::{AggregateError, FeatureAggregator};
use crate::workflows::wellbeing::{CheckinFeatures, InstrumentSnapshots, SubjectId};

pub(super) fn catalog() -> ProfileCatalog {
    ProfileCatalog::builtin()
}

pub(super) fn rules() -> RoutingRules {
    RoutingRules::builtin()
}

pub(super) fn engine() -> ProfileRouter {
    ProfileRouter::new(catalog(), rules()).expect("builtin configuration is valid")
}

/// Two-profile configuration where everything is symmetric, for tie-break tests.
pub(super) fn twin_catalog() -> ProfileCatalog {
    ProfileCatalog {
        profiles: vec![
            ExpertProfile {
                id: "first-twin".to_string(),
                scope: vec!["équilibre".to_string()],
                tone: "neutre".to_string(),
            },
            ExpertProfile {
                id: "second-twin".to_string(),
                scope: vec!["équilibre".to_string()],
                tone: "neutre".to_string(),
            },
        ],
    }
}

pub(super) fn twin_rules() -> RoutingRules {
    let shared = KeywordRules {
        keywords_any: vec!["équilibre".to_string()],
        keywords_not: Vec::new(),
    };
    let mut profiles = BTreeMap::new();
    profiles.insert("first-twin".to_string(), shared.clone());
    profiles.insert("second-twin".to_string(), shared);

    let mut boost = BTreeMap::new();
    boost.insert("charge".to_string(), 1.0_f32);
    let mut signal_boosts = BTreeMap::new();
    signal_boosts.insert("first-twin".to_string(), boost.clone());
    signal_boosts.insert("second-twin".to_string(), boost);

    let mut user_signal_tags = BTreeMap::new();
    user_signal_tags.insert("charge".to_string(), vec!["surcharge".to_string()]);

    RoutingRules {
        profiles,
        weights: ChannelWeights::default(),
        user_signal_tags,
        signal_boosts,
    }
}

/// Deterministic in-process embedding backend. Texts map to configured vectors;
/// unknown texts fall back to a fixed direction so similarity stays defined.
pub(super) struct StaticEmbeddings {
    name: String,
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl StaticEmbeddings {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vectors: Mutex::new(HashMap::new()),
            fallback: vec![1.0, 0.0, 0.0],
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn set(&self, text: &str, vector: Vec<f32>) {
        self.vectors
            .lock()
            .expect("vector mutex poisoned")
            .insert(text.to_string(), vector);
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbeddings {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .vectors
            .lock()
            .expect("vector mutex poisoned")
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Provider that always fails, for degradation paths.
pub(super) struct FailingEmbeddings;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    fn name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Transport("connection refused".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAggregator {
    features: Arc<Mutex<HashMap<SubjectId, CheckinFeatures>>>,
}

impl MemoryAggregator {
    pub(super) fn seed(&self, subject: &SubjectId, features: CheckinFeatures) {
        self.features
            .lock()
            .expect("feature mutex poisoned")
            .insert(subject.clone(), features);
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

    fn instruments(&self, _subject: &SubjectId) -> Result<InstrumentSnapshots, AggregateError> {
        Ok(InstrumentSnapshots::default())
    }
}

/// Aggregator whose reads always fail.
pub(super) struct UnavailableAggregator;

impl FeatureAggregator for UnavailableAggregator {
    fn features(&self, _subject: &SubjectId) -> Result<Option<CheckinFeatures>, AggregateError> {
        Err(AggregateError::Unavailable("database offline".to_string()))
    }

    fn instruments(&self, _subject: &SubjectId) -> Result<InstrumentSnapshots, AggregateError> {
        Err(AggregateError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn overloaded_subject() -> (SubjectId, CheckinFeatures) {
    (
        SubjectId("user-7".to_string()),
        CheckinFeatures {
            workload_max_7d: Some(5),
            strain_max_7d: Some(2),
            energy_min_7d: Some(3),
            mood_mean_7d: Some(3.0),
            climate_mean_30d: Some(3.0),
            disconnect_min_30d: Some(4),
        },
    )
}

pub(super) fn query_router(
    aggregator: Arc<MemoryAggregator>,
    providers: Vec<Arc<dyn EmbeddingProvider>>,
) -> QueryRouter<MemoryAggregator> {
    QueryRouter::new(engine(), aggregator, providers)
}

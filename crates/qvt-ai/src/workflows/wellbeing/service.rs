use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{
    AlertId, AlertRecord, AlertStatus, Recommendation, RecommendationId, RecommendationRecord,
    RiskLevel, ScoreExplanation, ScoreId, ScoreRecord, ScoreReport, SubjectId, TimeWindow,
};
use super::repository::{AggregateError, FeatureAggregator, RepositoryError, WellbeingRepository};
use super::{recommend, risk, score};

static SCORE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static ALERT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RECOMMENDATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_score_id() -> ScoreId {
    let id = SCORE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ScoreId(format!("score-{id:06}"))
}

fn next_alert_id() -> AlertId {
    let id = ALERT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AlertId(format!("alert-{id:06}"))
}

fn next_recommendation_id() -> RecommendationId {
    let id = RECOMMENDATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecommendationId(format!("reco-{id:06}"))
}

/// Outcome of an alert scan.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertScan {
    /// Classifier yielded no tier; nothing was written.
    Clear,
    /// An alert row was persisted.
    Created {
        risk_level: RiskLevel,
        alert_id: AlertId,
    },
}

/// Service composing the aggregator, the rule engine, and the append-only store.
///
/// All computation happens before the single persistence write of each
/// operation, so a storage failure leaves no partial state behind.
pub struct WellbeingService<F, R> {
    aggregator: Arc<F>,
    repository: Arc<R>,
}

impl<F, R> WellbeingService<F, R>
where
    F: FeatureAggregator + 'static,
    R: WellbeingRepository + 'static,
{
    pub fn new(aggregator: Arc<F>, repository: Arc<R>) -> Self {
        Self {
            aggregator,
            repository,
        }
    }

    /// Compute, persist, and return the score for one window.
    ///
    /// The trend compares against the most recent stored score for the same
    /// subject and window, and is `None` on the first computation.
    pub fn compute_score(
        &self,
        subject: &SubjectId,
        window: TimeWindow,
    ) -> Result<ScoreReport, WellbeingServiceError> {
        let features = self
            .aggregator
            .features(subject)?
            .ok_or(WellbeingServiceError::NoRecentCheckins)?;
        let instruments = self.aggregator.instruments(subject)?;

        let breakdown = score::compute_score(&features, &instruments);
        let previous = self.repository.last_score(subject, window)?;
        let trend = previous.map(|prev| i16::from(breakdown.value) - i16::from(prev));
        let computed_at = Utc::now();

        self.repository.insert_score(ScoreRecord {
            id: next_score_id(),
            subject_id: subject.clone(),
            time_window: window,
            score: breakdown.value,
            trend,
            explanation: ScoreExplanation {
                rules: breakdown.rule_trace.clone(),
                features,
                instruments,
            },
            computed_at,
        })?;

        Ok(ScoreReport {
            score: breakdown.value,
            trend,
            rule_trace: breakdown.rule_trace,
            computed_at,
        })
    }

    /// Evaluate the classifier and persist an alert when a tier applies.
    pub fn scan_alerts(&self, subject: &SubjectId) -> Result<AlertScan, WellbeingServiceError> {
        let features = self
            .aggregator
            .features(subject)?
            .ok_or(WellbeingServiceError::NoRecentCheckins)?;
        let instruments = self.aggregator.instruments(subject)?;

        let breakdown = score::compute_score(&features, &instruments);
        let Some(risk_level) = risk::classify(breakdown.value, &features) else {
            return Ok(AlertScan::Clear);
        };

        let alert_id = next_alert_id();
        let notes = format!(
            "rules={}; score={}",
            breakdown.rule_trace.join(","),
            breakdown.value
        );
        self.repository.insert_alert(AlertRecord {
            id: alert_id.clone(),
            subject_id: subject.clone(),
            created_at: Utc::now(),
            risk_level,
            status: AlertStatus::Open,
            target_role: "salarié".to_string(),
            user_consent: true,
            anonymized_message: true,
            primary_axis: risk::primary_axis(&features),
            notes,
        })?;

        Ok(AlertScan::Created {
            risk_level,
            alert_id,
        })
    }

    /// Generate, persist, and return the ordered recommendation set.
    pub fn recommendations(
        &self,
        subject: &SubjectId,
    ) -> Result<Vec<Recommendation>, WellbeingServiceError> {
        let features = self
            .aggregator
            .features(subject)?
            .ok_or(WellbeingServiceError::NoRecentCheckins)?;

        let recommendations = recommend::generate(&features);
        let created_at = Utc::now();
        let records = recommendations
            .iter()
            .map(|recommendation| RecommendationRecord {
                id: next_recommendation_id(),
                subject_id: subject.clone(),
                created_at,
                recommendation: recommendation.clone(),
            })
            .collect();
        self.repository.insert_recommendations(records)?;

        Ok(recommendations)
    }
}

/// Error raised by the wellbeing service.
#[derive(Debug, thiserror::Error)]
pub enum WellbeingServiceError {
    #[error("No checkins in last 30 days")]
    NoRecentCheckins,
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

//! Check-in scoring pipeline: bounded score with an auditable rule trace, risk
//! classification, and rule-triggered recommendations, persisted append-only.

pub mod domain;
pub mod recommend;
pub mod repository;
pub mod risk;
pub mod router;
pub mod score;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AlertId, AlertRecord, AlertStatus, CheckinFeatures, EffortReward, InstrumentSnapshots,
    InvalidTimeWindow, JobStrain, Recommendation, RecommendationId, RecommendationKind,
    RecommendationPayload, RecommendationReason, RecommendationRecord, RiskAxis, RiskLevel,
    ScoreExplanation, ScoreId, ScoreRecord, ScoreReport, SubjectId, TimeWindow, WellbeingIndex,
    WorkEngagement,
};
pub use repository::{AggregateError, FeatureAggregator, RepositoryError, WellbeingRepository};
pub use router::wellbeing_router;
pub use score::{compute_score, ScoreBreakdown};
pub use service::{AlertScan, WellbeingService, WellbeingServiceError};

use super::domain::{
    AlertRecord, CheckinFeatures, InstrumentSnapshots, RecommendationRecord, ScoreRecord,
    SubjectId, TimeWindow,
};

/// Read side of the pipeline: windowed aggregates and the latest instrument
/// snapshots for a subject. Backed by the relational store in production and by
/// in-memory fixtures in tests.
pub trait FeatureAggregator: Send + Sync {
    /// Aggregates over the last 30 days of check-ins, or `None` when the subject
    /// has no check-in in that window.
    fn features(&self, subject: &SubjectId) -> Result<Option<CheckinFeatures>, AggregateError>;

    /// Most recent snapshot of each self-report instrument. Instruments the
    /// subject never filled in come back as `None` inside the bundle.
    fn instruments(&self, subject: &SubjectId) -> Result<InstrumentSnapshots, AggregateError>;
}

/// Failure reading the feature source.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    #[error("feature source unavailable: {0}")]
    Unavailable(String),
}

/// Write side of the pipeline. Every method is append-only: the engine never
/// updates or deletes a row it has written.
pub trait WellbeingRepository: Send + Sync {
    /// Score of the most recently stored record for this subject and window.
    fn last_score(
        &self,
        subject: &SubjectId,
        window: TimeWindow,
    ) -> Result<Option<u8>, RepositoryError>;

    fn insert_score(&self, record: ScoreRecord) -> Result<(), RepositoryError>;

    fn insert_alert(&self, record: AlertRecord) -> Result<(), RepositoryError>;

    fn insert_recommendations(
        &self,
        records: Vec<RecommendationRecord>,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

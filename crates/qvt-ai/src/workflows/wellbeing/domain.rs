use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the person behind a series of check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

/// Aggregation window for score computation and trend lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl TimeWindow {
    pub const fn label(self) -> &'static str {
        match self {
            TimeWindow::SevenDays => "7d",
            TimeWindow::ThirtyDays => "30d",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, InvalidTimeWindow> {
        match raw {
            "7d" => Ok(TimeWindow::SevenDays),
            "30d" => Ok(TimeWindow::ThirtyDays),
            _ => Err(InvalidTimeWindow),
        }
    }
}

/// Rejection of any window literal other than the two supported ones.
#[derive(Debug, thiserror::Error)]
#[error("time_window must be '7d' or '30d'")]
pub struct InvalidTimeWindow;

/// Windowed aggregates over recent check-ins.
///
/// Every field is optional: an absent aggregate means no check-in carried that
/// signal, which is different from a present-but-low value. Rules over a missing
/// field simply do not fire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckinFeatures {
    pub workload_max_7d: Option<u8>,
    pub strain_max_7d: Option<u8>,
    pub energy_min_7d: Option<u8>,
    pub mood_mean_7d: Option<f32>,
    pub climate_mean_30d: Option<f32>,
    pub disconnect_min_30d: Option<u8>,
}

/// Five-item wellbeing index, each item 0-5, summed 0-25.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellbeingIndex {
    pub items: [u8; 5],
}

impl WellbeingIndex {
    pub fn total(&self) -> u16 {
        self.items.iter().map(|&item| u16::from(item)).sum()
    }
}

/// Demand/control/support self-report triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStrain {
    pub demand: u8,
    pub control: u8,
    pub support: u8,
}

/// Effort/reward/overcommitment self-report triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffortReward {
    pub effort: u8,
    pub reward: u8,
    pub overcommit: u8,
}

/// Vigor/dedication/absorption self-report triad, used only as a protective signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEngagement {
    pub vigor: u8,
    pub dedication: u8,
    pub absorption: u8,
}

/// Most recent snapshot of each instrument, each independently optional.
///
/// A missing instrument disables exactly the rules that read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSnapshots {
    pub wellbeing_index: Option<WellbeingIndex>,
    pub job_strain: Option<JobStrain>,
    pub effort_reward: Option<EffortReward>,
    pub engagement: Option<WorkEngagement>,
}

/// Identifier for a persisted score row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreId(pub String);

/// Identifier for a persisted alert row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertId(pub String);

/// Identifier for a persisted recommendation row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecommendationId(pub String);

/// Result of one score computation as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u8,
    pub trend: Option<i16>,
    pub rule_trace: Vec<String>,
    pub computed_at: DateTime<Utc>,
}

/// Inputs that produced a score, persisted alongside it for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    pub rules: Vec<String>,
    pub features: CheckinFeatures,
    pub instruments: InstrumentSnapshots,
}

/// Append-only persisted score row. A new computation is a new record, never an
/// update of a previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub subject_id: SubjectId,
    pub time_window: TimeWindow,
    pub score: u8,
    pub trend: Option<i16>,
    pub explanation: ScoreExplanation,
    pub computed_at: DateTime<Utc>,
}

/// Escalation tier, from strongest to weakest signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Prioritaire,
    Attention,
    SignalFaible,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Prioritaire => "prioritaire",
            RiskLevel::Attention => "attention",
            RiskLevel::SignalFaible => "signal-faible",
        }
    }
}

/// Dominant axis an alert should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAxis {
    Workload,
    Strain,
    Energy,
    General,
}

impl RiskAxis {
    pub const fn label(self) -> &'static str {
        match self {
            RiskAxis::Workload => "workload",
            RiskAxis::Strain => "strain",
            RiskAxis::Energy => "energy",
            RiskAxis::General => "general",
        }
    }
}

/// Lifecycle of a created alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Closed,
}

/// Persisted alert row, created only when the classifier yields a tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: AlertId,
    pub subject_id: SubjectId,
    pub created_at: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub status: AlertStatus,
    pub target_role: String,
    pub user_consent: bool,
    pub anonymized_message: bool,
    pub primary_axis: RiskAxis,
    pub notes: String,
}

/// Families of recommendations the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Rituel,
    Contenu,
    Box,
}

impl RecommendationKind {
    pub const fn label(self) -> &'static str {
        match self {
            RecommendationKind::Rituel => "rituel",
            RecommendationKind::Contenu => "contenu",
            RecommendationKind::Box => "box",
        }
    }
}

/// Human-facing content of a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationPayload {
    Ritual {
        title: String,
        steps: Vec<String>,
    },
    Resource {
        title: String,
        url: String,
    },
    CareBox {
        sku: String,
        items: Vec<String>,
        cost_eur: f32,
        tags: Vec<String>,
    },
}

/// Machine-facing trigger justification echoing the feature value that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationReason {
    Feature { feature: String, value: f32 },
    Policy { policy: String },
    Tag { tag: String },
}

/// One rule-triggered recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub payload: RecommendationPayload,
    pub reason: RecommendationReason,
}

/// Persisted recommendation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub id: RecommendationId,
    pub subject_id: SubjectId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub recommendation: Recommendation,
}

use super::domain::{CheckinFeatures, InstrumentSnapshots};

/// Score and the ordered labels of every rule that fired.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub value: u8,
    pub rule_trace: Vec<String>,
}

const BASELINE: i32 = 8;
const MIN_SCORE: i32 = 1;
const MAX_SCORE: i32 = 15;

/// One threshold rule over the windowed check-in aggregates.
///
/// Predicates read the optional fields directly: an absent field never fires a
/// rule. Keeping absence explicit here is what lets the trace be audited without
/// knowing which defaults a storage layer might have applied.
struct CheckinRule {
    label: &'static str,
    delta: i32,
    fired: fn(&CheckinFeatures) -> bool,
}

const CHECKIN_RULES: &[CheckinRule] = &[
    CheckinRule {
        label: "workload_max_7d>=4:-2",
        delta: -2,
        fired: |f| matches!(f.workload_max_7d, Some(v) if v >= 4),
    },
    CheckinRule {
        label: "strain_max_7d>=4:-2",
        delta: -2,
        fired: |f| matches!(f.strain_max_7d, Some(v) if v >= 4),
    },
    CheckinRule {
        label: "disconnect_min_30d<=2:-1",
        delta: -1,
        fired: |f| matches!(f.disconnect_min_30d, Some(v) if v <= 2),
    },
    CheckinRule {
        label: "mood_mean_7d>=4:+2",
        delta: 2,
        fired: |f| matches!(f.mood_mean_7d, Some(v) if v >= 4.0),
    },
    CheckinRule {
        label: "climate_mean_30d>=4:+1",
        delta: 1,
        fired: |f| matches!(f.climate_mean_30d, Some(v) if v >= 4.0),
    },
];

/// Compute the 1-15 wellbeing score from a baseline of 8.
///
/// Check-in rules always evaluate; instrument rules evaluate only when their
/// snapshot is present, so a missing questionnaire neither penalizes nor
/// protects. The result is clamped to [1, 15].
pub fn compute_score(
    features: &CheckinFeatures,
    instruments: &InstrumentSnapshots,
) -> ScoreBreakdown {
    let mut value = BASELINE;
    let mut rule_trace = Vec::new();

    for rule in CHECKIN_RULES {
        if (rule.fired)(features) {
            value += rule.delta;
            rule_trace.push(rule.label.to_string());
        }
    }

    if let Some(index) = &instruments.wellbeing_index {
        let total = index.total();
        if total <= 8 {
            value -= 2;
            rule_trace.push("WHO5<=8:-2".to_string());
        } else if total >= 20 {
            value += 1;
            rule_trace.push("WHO5>=20:+1".to_string());
        }
    }

    if let Some(strain) = &instruments.job_strain {
        if strain.demand >= 4 && strain.control <= 2 {
            value -= 1;
            rule_trace.push("Karasek(high_demand & low_control):-1".to_string());
        }
    }

    if let Some(balance) = &instruments.effort_reward {
        // A zero reward is treated as an imbalance rather than missing data: the
        // snapshot itself is present.
        let imbalanced =
            balance.reward == 0 || f32::from(balance.effort) / f32::from(balance.reward) > 1.0;
        if imbalanced {
            value -= 1;
            rule_trace.push("ERI>1:-1".to_string());
        }
    }

    if let Some(engagement) = &instruments.engagement {
        if engagement.vigor >= 5 {
            value += 1;
            rule_trace.push("UWES(vigor>=5):+1".to_string());
        }
    }

    ScoreBreakdown {
        value: value.clamp(MIN_SCORE, MAX_SCORE) as u8,
        rule_trace,
    }
}

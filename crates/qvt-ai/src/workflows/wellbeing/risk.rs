use super::domain::{CheckinFeatures, RiskAxis, RiskLevel};

/// Map a computed score and its feature context to an escalation tier.
///
/// Evaluated strictly in priority order; `None` means no alert should be raised.
pub fn classify(score: u8, features: &CheckinFeatures) -> Option<RiskLevel> {
    if score <= 4 {
        return Some(RiskLevel::Prioritaire);
    }

    let pressure = features.workload_max_7d.is_some_and(|v| v >= 4)
        || features.strain_max_7d.is_some_and(|v| v >= 4)
        || features.disconnect_min_30d.is_some_and(|v| v <= 2);
    if score <= 5 && pressure {
        return Some(RiskLevel::Attention);
    }

    if score <= 6 {
        return Some(RiskLevel::SignalFaible);
    }

    None
}

/// Pick the dominant axis for an alert. First matching entry wins; the list is a
/// priority order, not a union.
pub fn primary_axis(features: &CheckinFeatures) -> RiskAxis {
    if features.workload_max_7d.is_some_and(|v| v >= 4) {
        return RiskAxis::Workload;
    }
    if features.strain_max_7d.is_some_and(|v| v >= 4) {
        return RiskAxis::Strain;
    }
    if features.energy_min_7d.is_some_and(|v| v <= 2) {
        return RiskAxis::Energy;
    }
    RiskAxis::General
}

use crate::workflows::wellbeing::CheckinFeatures;

/// Behavioral need derived from recent check-in aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedTag {
    Charge,
    Deconnexion,
    Ergonomie,
    Sommeil,
}

impl NeedTag {
    pub const fn label(self) -> &'static str {
        match self {
            NeedTag::Charge => "charge",
            NeedTag::Deconnexion => "deconnexion",
            NeedTag::Ergonomie => "ergonomie",
            NeedTag::Sommeil => "sommeil",
        }
    }
}

/// Derive the deduplicated, order-preserving need-tag set for a feature bundle.
pub fn need_tags(features: &CheckinFeatures) -> Vec<NeedTag> {
    let mut tags = Vec::new();

    if features.workload_max_7d.is_some_and(|v| v >= 4) {
        push_unique(&mut tags, NeedTag::Charge);
        push_unique(&mut tags, NeedTag::Deconnexion);
    }
    if features.strain_max_7d.is_some_and(|v| v >= 4) {
        push_unique(&mut tags, NeedTag::Ergonomie);
    }
    if features.disconnect_min_30d.is_some_and(|v| v <= 2) {
        push_unique(&mut tags, NeedTag::Deconnexion);
        push_unique(&mut tags, NeedTag::Sommeil);
    }

    tags
}

fn push_unique(tags: &mut Vec<NeedTag>, tag: NeedTag) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}

use super::domain::{
    CheckinFeatures, Recommendation, RecommendationKind, RecommendationPayload,
    RecommendationReason,
};

/// Produce the ordered recommendation set for the given aggregates.
///
/// Triggers evaluate in declaration order (workload, strain, low disconnect) and
/// may co-fire; each emits its fixed templates in a fixed order. Repeated calls
/// with the same input yield the same list.
pub fn generate(features: &CheckinFeatures) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if let Some(workload) = features.workload_max_7d.filter(|&v| v >= 4) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Rituel,
            payload: RecommendationPayload::Ritual {
                title: "Bloc focus 25'".to_string(),
                steps: vec![
                    "Couper notifs 25'".to_string(),
                    "Pause 5'".to_string(),
                    "Hydratation".to_string(),
                ],
            },
            reason: RecommendationReason::Feature {
                feature: "workload_max_7d".to_string(),
                value: f32::from(workload),
            },
        });
        recommendations.push(Recommendation {
            kind: RecommendationKind::Contenu,
            payload: RecommendationPayload::Resource {
                title: "Droit à la déconnexion".to_string(),
                url: "/ressources/deconnexion".to_string(),
            },
            reason: RecommendationReason::Policy {
                policy: "deconnexion".to_string(),
            },
        });
        recommendations.push(Recommendation {
            kind: RecommendationKind::Box,
            payload: RecommendationPayload::CareBox {
                sku: "BOX-SALARIE-MOB".to_string(),
                items: vec![
                    "gourde".to_string(),
                    "lingettes".to_string(),
                    "snack".to_string(),
                    "creme_mains".to_string(),
                ],
                cost_eur: 9.8,
                tags: vec![
                    "microbreak".to_string(),
                    "mobilité".to_string(),
                    "anti-stress".to_string(),
                ],
            },
            reason: RecommendationReason::Tag {
                tag: "mobilité|anti-stress".to_string(),
            },
        });
    }

    if let Some(strain) = features.strain_max_7d.filter(|&v| v >= 4) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Rituel,
            payload: RecommendationPayload::Ritual {
                title: "3 étirements terrain".to_string(),
                steps: vec![
                    "Cervicales".to_string(),
                    "Épaules".to_string(),
                    "Poignets".to_string(),
                ],
            },
            reason: RecommendationReason::Feature {
                feature: "strain_max_7d".to_string(),
                value: f32::from(strain),
            },
        });
    }

    if let Some(disconnect) = features.disconnect_min_30d.filter(|&v| v <= 2) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Rituel,
            payload: RecommendationPayload::Ritual {
                title: "Routine soir 10'".to_string(),
                steps: vec![
                    "Écran OFF 30'".to_string(),
                    "Carnet 3 lignes".to_string(),
                    "Hydratation".to_string(),
                ],
            },
            reason: RecommendationReason::Feature {
                feature: "disconnect_min_30d".to_string(),
                value: f32::from(disconnect),
            },
        });
    }

    recommendations
}

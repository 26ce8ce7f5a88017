use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::RoutingConfigError;

/// One expert persona that can answer a routed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertProfile {
    pub id: String,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub tone: String,
}

impl ExpertProfile {
    /// Text embedded once per profile for the semantic channel.
    pub fn description(&self) -> String {
        format!(
            "Profil {}. Ton: {}. Domaines: {}.",
            self.id,
            self.tone,
            self.scope.join(", ")
        )
    }
}

/// Static catalog loaded at startup. Declaration order is significant: it is the
/// tie-break order of the routing decision, so profiles live in a `Vec` and
/// never in a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCatalog {
    pub profiles: Vec<ExpertProfile>,
}

impl ProfileCatalog {
    pub fn from_yaml(text: &str) -> Result<Self, RoutingConfigError> {
        let catalog: ProfileCatalog = serde_yaml::from_str(text)?;
        if catalog.profiles.is_empty() {
            return Err(RoutingConfigError::EmptyCatalog);
        }
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, RoutingConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Catalog shipped with the service, used when no profile file is configured.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                ExpertProfile {
                    id: "expert-juridique".to_string(),
                    scope: vec![
                        "droit du travail".to_string(),
                        "déconnexion".to_string(),
                        "contrats".to_string(),
                        "obligations employeur".to_string(),
                    ],
                    tone: "précis et rassurant".to_string(),
                },
                ExpertProfile {
                    id: "expert-qvt".to_string(),
                    scope: vec![
                        "charge de travail".to_string(),
                        "organisation".to_string(),
                        "ergonomie".to_string(),
                        "prévention des risques".to_string(),
                    ],
                    tone: "pragmatique et bienveillant".to_string(),
                },
                ExpertProfile {
                    id: "prof-de-yoga".to_string(),
                    scope: vec![
                        "respiration".to_string(),
                        "sommeil".to_string(),
                        "étirements".to_string(),
                        "relâchement".to_string(),
                    ],
                    tone: "calme et encourageant".to_string(),
                },
                ExpertProfile {
                    id: "psy-coach".to_string(),
                    scope: vec![
                        "stress".to_string(),
                        "émotions".to_string(),
                        "équilibre vie pro/perso".to_string(),
                        "motivation".to_string(),
                    ],
                    tone: "empathique et structuré".to_string(),
                },
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&ExpertProfile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }
}

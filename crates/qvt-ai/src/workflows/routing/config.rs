use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::ProfileCatalog;

/// Declarative routing rules: keyword lists per profile, channel weights, the
/// need-tag vocabulary, and the tag-to-profile boost table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingRules {
    #[serde(default)]
    pub profiles: BTreeMap<String, KeywordRules>,
    #[serde(default)]
    pub weights: ChannelWeights,
    #[serde(default)]
    pub user_signal_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub signal_boosts: BTreeMap<String, BTreeMap<String, f32>>,
}

/// Include/exclude keyword lists matched against the normalized question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRules {
    #[serde(default)]
    pub keywords_any: Vec<String>,
    #[serde(default)]
    pub keywords_not: Vec<String>,
}

/// Relative weight of each scoring channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelWeights {
    #[serde(default = "default_rule_keywords")]
    pub rule_keywords: f32,
    #[serde(default = "default_user_signals")]
    pub user_signals: f32,
    #[serde(default = "default_zero_shot")]
    pub zero_shot: f32,
}

fn default_rule_keywords() -> f32 {
    1.0
}

fn default_user_signals() -> f32 {
    0.8
}

fn default_zero_shot() -> f32 {
    1.2
}

impl Default for ChannelWeights {
    fn default() -> Self {
        Self {
            rule_keywords: default_rule_keywords(),
            user_signals: default_user_signals(),
            zero_shot: default_zero_shot(),
        }
    }
}

impl RoutingRules {
    pub fn from_yaml(text: &str) -> Result<Self, RoutingConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, RoutingConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Rules shipped with the service, aligned with the builtin catalog.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "expert-juridique".to_string(),
            KeywordRules {
                keywords_any: words(&[
                    "droit",
                    "juridique",
                    "contrat",
                    "légal",
                    "déconnexion",
                    "heures supplémentaires",
                    "congés",
                ]),
                keywords_not: words(&["étirement", "yoga"]),
            },
        );
        profiles.insert(
            "expert-qvt".to_string(),
            KeywordRules {
                keywords_any: words(&[
                    "charge",
                    "organisation",
                    "planning",
                    "ergonomie",
                    "open space",
                    "réunion",
                ]),
                keywords_not: Vec::new(),
            },
        );
        profiles.insert(
            "prof-de-yoga".to_string(),
            KeywordRules {
                keywords_any: words(&["sommeil", "respiration", "étirement", "détente", "yoga"]),
                keywords_not: words(&["contrat"]),
            },
        );
        profiles.insert(
            "psy-coach".to_string(),
            KeywordRules {
                keywords_any: words(&["stress", "anxiété", "motivation", "émotion", "burnout"]),
                keywords_not: Vec::new(),
            },
        );

        let mut user_signal_tags = BTreeMap::new();
        user_signal_tags.insert(
            "charge".to_string(),
            words(&["surcharge", "deadline", "rythme"]),
        );
        user_signal_tags.insert(
            "deconnexion".to_string(),
            words(&["mail le soir", "joignable", "coupure"]),
        );
        user_signal_tags.insert(
            "ergonomie".to_string(),
            words(&["posture", "port de charge", "gestes répétés"]),
        );
        user_signal_tags.insert(
            "sommeil".to_string(),
            words(&["fatigue", "nuit", "récupération"]),
        );

        let mut signal_boosts = BTreeMap::new();
        signal_boosts.insert(
            "expert-juridique".to_string(),
            boosts(&[("deconnexion", 1.0)]),
        );
        signal_boosts.insert(
            "expert-qvt".to_string(),
            boosts(&[("charge", 1.0), ("ergonomie", 1.0), ("deconnexion", 1.0)]),
        );
        signal_boosts.insert("prof-de-yoga".to_string(), boosts(&[("sommeil", 1.0)]));
        signal_boosts.insert(
            "psy-coach".to_string(),
            boosts(&[("charge", 0.5), ("sommeil", 0.5)]),
        );

        Self {
            profiles,
            weights: ChannelWeights::default(),
            user_signal_tags,
            signal_boosts,
        }
    }

    /// Report inconsistencies between the rules and the catalog without fixing
    /// them: unknown profile ids and boost tags missing from the declared tag
    /// vocabulary. Callers log each entry at warn level.
    pub fn lint(&self, catalog: &ProfileCatalog) -> Vec<String> {
        let mut findings = Vec::new();

        for id in self.profiles.keys() {
            if catalog.get(id).is_none() {
                findings.push(format!("keyword rules reference unknown profile '{id}'"));
            }
        }

        for (id, table) in &self.signal_boosts {
            if catalog.get(id).is_none() {
                findings.push(format!("signal boosts reference unknown profile '{id}'"));
            }
            for tag in table.keys() {
                if !self.user_signal_tags.contains_key(tag) {
                    findings.push(format!(
                        "boost tag '{tag}' for profile '{id}' is not declared in user_signal_tags"
                    ));
                }
            }
        }

        findings
    }
}

fn words(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|entry| entry.to_string()).collect()
}

fn boosts(entries: &[(&str, f32)]) -> BTreeMap<String, f32> {
    entries
        .iter()
        .map(|(tag, boost)| (tag.to_string(), *boost))
        .collect()
}

/// Failure loading the catalog or rules documents.
#[derive(Debug, thiserror::Error)]
pub enum RoutingConfigError {
    #[error("profile catalog is empty")]
    EmptyCatalog,
    #[error("unable to read routing configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed routing configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

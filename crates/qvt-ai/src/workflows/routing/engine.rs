use serde::{Deserialize, Serialize};

use super::catalog::ProfileCatalog;
use super::config::{RoutingConfigError, RoutingRules};
use super::signals::NeedTag;

/// Semantic-channel input for one decision: similarities aligned with catalog
/// order, or the reason the channel is unavailable.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticInput {
    Similarities(Vec<f32>),
    Degraded(String),
}

/// Observable state of the semantic channel in a decision trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SemanticChannel {
    Active,
    Degraded { reason: String },
}

/// Weighted contribution of each channel to a profile total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelContributions {
    pub keywords: f32,
    pub signals: f32,
    pub semantic: f32,
}

/// Full scoring trace for one profile, retained win or lose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub profile_id: String,
    pub total: f32,
    pub keyword_hits: Vec<String>,
    pub signal_tags: Vec<String>,
    /// Raw cosine similarity, which may be negative; the contribution clamps at
    /// zero but the trace keeps the observed value.
    pub semantic_similarity: Option<f32>,
    pub contributions: ChannelContributions,
}

/// Outcome of one routing decision with the per-profile audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub chosen_profile_id: String,
    pub need_tags: Vec<String>,
    pub semantic: SemanticChannel,
    pub profiles: Vec<ProfileScore>,
}

/// Deterministic scorer combining the keyword, signal, and semantic channels.
///
/// Given fixed configuration and semantic inputs the decision is a pure function
/// of the question and need tags; profiles are scanned in catalog declaration
/// order and ties resolve to the first declared.
pub struct ProfileRouter {
    catalog: ProfileCatalog,
    rules: RoutingRules,
}

impl ProfileRouter {
    pub fn new(catalog: ProfileCatalog, rules: RoutingRules) -> Result<Self, RoutingConfigError> {
        if catalog.profiles.is_empty() {
            return Err(RoutingConfigError::EmptyCatalog);
        }

        // Keyword matching is case-insensitive against the normalized question,
        // so the configured lists are folded once here.
        let mut rules = rules;
        for keyword_rules in rules.profiles.values_mut() {
            for word in &mut keyword_rules.keywords_any {
                *word = word.to_lowercase();
            }
            for word in &mut keyword_rules.keywords_not {
                *word = word.to_lowercase();
            }
        }

        Ok(Self { catalog, rules })
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    pub fn decide(
        &self,
        question: &str,
        needs: &[NeedTag],
        semantic: SemanticInput,
    ) -> RoutingDecision {
        let query = normalize(question);
        let weights = self.rules.weights;

        let (similarities, semantic_status) = match semantic {
            SemanticInput::Similarities(similarities) => {
                (Some(similarities), SemanticChannel::Active)
            }
            SemanticInput::Degraded(reason) => (None, SemanticChannel::Degraded { reason }),
        };

        let mut profiles = Vec::with_capacity(self.catalog.profiles.len());
        for (position, profile) in self.catalog.profiles.iter().enumerate() {
            let keyword_hits = self.keyword_hits(&profile.id, &query);
            let keywords = weights.rule_keywords * keyword_hits.len() as f32;

            let (signal_tags, boost) = self.signal_boost(&profile.id, needs);
            let signals = weights.user_signals * boost;

            let semantic_similarity =
                similarities.as_ref().and_then(|sims| sims.get(position).copied());
            let semantic = semantic_similarity
                .map(|similarity| weights.zero_shot * similarity.max(0.0))
                .unwrap_or(0.0);

            profiles.push(ProfileScore {
                profile_id: profile.id.clone(),
                total: keywords + signals + semantic,
                keyword_hits,
                signal_tags,
                semantic_similarity,
                contributions: ChannelContributions {
                    keywords,
                    signals,
                    semantic,
                },
            });
        }

        // Strict comparison keeps the first declared profile on ties.
        let mut chosen = 0;
        for (index, candidate) in profiles.iter().enumerate().skip(1) {
            if candidate.total > profiles[chosen].total {
                chosen = index;
            }
        }

        RoutingDecision {
            chosen_profile_id: profiles[chosen].profile_id.clone(),
            need_tags: needs.iter().map(|tag| tag.label().to_string()).collect(),
            semantic: semantic_status,
            profiles,
        }
    }

    /// Matched include keywords for a profile, or nothing when an exclude
    /// keyword voids the channel.
    fn keyword_hits(&self, profile_id: &str, query: &str) -> Vec<String> {
        let Some(rules) = self.rules.profiles.get(profile_id) else {
            return Vec::new();
        };

        if rules
            .keywords_not
            .iter()
            .any(|word| query.contains(word.as_str()))
        {
            return Vec::new();
        }

        rules
            .keywords_any
            .iter()
            .filter(|word| query.contains(word.as_str()))
            .cloned()
            .collect()
    }

    fn signal_boost(&self, profile_id: &str, needs: &[NeedTag]) -> (Vec<String>, f32) {
        let Some(table) = self.rules.signal_boosts.get(profile_id) else {
            return (Vec::new(), 0.0);
        };

        let mut matched = Vec::new();
        let mut total = 0.0;
        for tag in needs {
            if let Some(boost) = table.get(tag.label()) {
                matched.push(tag.label().to_string());
                total += *boost;
            }
        }

        (matched, total)
    }
}

/// Casefold and collapse whitespace so keyword matching is stable across
/// formatting differences.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

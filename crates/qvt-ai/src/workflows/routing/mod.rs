//! Hybrid expert-profile router: keyword matching, behavioral-signal boosts, and
//! embedding similarity combined into one ranked, fully traced decision.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod engine;
pub mod router;
pub mod service;
pub mod signals;

#[cfg(test)]
mod tests;

pub use catalog::{ExpertProfile, ProfileCatalog};
pub use config::{ChannelWeights, KeywordRules, RoutingConfigError, RoutingRules};
pub use embedding::{
    cosine_similarity, CachedProfileEmbeddings, EmbeddingError, EmbeddingProvider,
    HttpEmbeddingClient, ProfileEmbeddingCache,
};
pub use engine::{
    normalize, ChannelContributions, ProfileRouter, ProfileScore, RoutingDecision,
    SemanticChannel, SemanticInput,
};
pub use router::routing_router;
pub use service::QueryRouter;
pub use signals::{need_tags, NeedTag};

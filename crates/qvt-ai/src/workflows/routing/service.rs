use std::sync::Arc;

use tracing::warn;

use super::embedding::{
    cosine_similarity, CachedProfileEmbeddings, EmbeddingError, EmbeddingProvider,
    ProfileEmbeddingCache,
};
use super::engine::{normalize, ProfileRouter, RoutingDecision, SemanticInput};
use super::signals::{self, NeedTag};
use crate::workflows::wellbeing::{FeatureAggregator, SubjectId};

/// Request-facing router: resolves the subject's need tags, drives the embedding
/// provider, and delegates the deterministic scoring to [`ProfileRouter`].
///
/// Collaborator failures never abort a request here. A failing aggregator
/// empties the signal channel; a failing provider degrades the semantic channel.
/// Both are logged so the degradation stays observable.
pub struct QueryRouter<F> {
    engine: ProfileRouter,
    aggregator: Arc<F>,
    providers: Vec<Arc<dyn EmbeddingProvider>>,
    cache: ProfileEmbeddingCache,
}

impl<F> QueryRouter<F>
where
    F: FeatureAggregator + 'static,
{
    /// The first provider in the list is the default when a request names none
    /// or names an unknown backend.
    pub fn new(
        engine: ProfileRouter,
        aggregator: Arc<F>,
        providers: Vec<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self {
            engine,
            aggregator,
            providers,
            cache: ProfileEmbeddingCache::new(),
        }
    }

    pub fn engine(&self) -> &ProfileRouter {
        &self.engine
    }

    /// Drop the cached profile embeddings, e.g. after a catalog reload.
    pub fn invalidate_embeddings(&self) {
        self.cache.invalidate();
    }

    pub async fn route(
        &self,
        question: &str,
        subject: Option<&SubjectId>,
        provider: Option<&str>,
    ) -> RoutingDecision {
        let needs = self.subject_needs(subject);

        let semantic = match self.resolve_provider(provider) {
            Some(provider) => match self.semantic_similarities(provider.as_ref(), question).await {
                Ok(similarities) => SemanticInput::Similarities(similarities),
                Err(err) => {
                    warn!(error = %err, "semantic channel degraded; routing on keywords and signals only");
                    SemanticInput::Degraded(err.to_string())
                }
            },
            None => SemanticInput::Degraded("no embedding provider configured".to_string()),
        };

        self.engine.decide(question, &needs, semantic)
    }

    fn resolve_provider(&self, name: Option<&str>) -> Option<Arc<dyn EmbeddingProvider>> {
        match name {
            Some(name) => self
                .providers
                .iter()
                .find(|provider| provider.name() == name)
                .or_else(|| self.providers.first())
                .cloned(),
            None => self.providers.first().cloned(),
        }
    }

    fn subject_needs(&self, subject: Option<&SubjectId>) -> Vec<NeedTag> {
        let Some(subject) = subject else {
            return Vec::new();
        };

        match self.aggregator.features(subject) {
            Ok(Some(features)) => signals::need_tags(&features),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "feature aggregate unavailable; signal channel skipped");
                Vec::new()
            }
        }
    }

    async fn semantic_similarities(
        &self,
        provider: &dyn EmbeddingProvider,
        question: &str,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let cached = match self.cache.get(provider.name()) {
            Some(cached) => cached,
            None => {
                let profiles = &self.engine.catalog().profiles;
                let mut vectors = Vec::with_capacity(profiles.len());
                for profile in profiles {
                    let vector = provider.embed(&profile.description()).await?;
                    vectors.push((profile.id.clone(), vector));
                }
                self.cache.store(CachedProfileEmbeddings {
                    provider: provider.name().to_string(),
                    vectors,
                })
            }
        };

        let query = provider.embed(&normalize(question)).await?;
        Ok(cached
            .vectors
            .iter()
            .map(|(_, vector)| cosine_similarity(&query, vector))
            .collect())
    }
}

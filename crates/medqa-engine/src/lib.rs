//! Caller-owned retrieval handle.
//!
//! The engine publishes one immutable [`TfIdfIndex`] at a time. Readers clone
//! the published `Arc` and search without further coordination; a rebuild
//! constructs the replacement completely before swapping the pointer, so no
//! reader ever sees a half-built index. Entity extraction is independent of
//! the index and works before any build.
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use medqa_core::config::{SearchSettings, Settings, TextSettings};
use medqa_core::error::{Error, Result};
use medqa_core::traits::EntityExtractor;
use medqa_core::types::{Answer, Entities, IndexStats, SearchMatch};
use medqa_core::Corpus;
use medqa_entities::KeywordExtractor;
use medqa_text::{Normalizer, TfIdfIndex};

/// What [`MedQaEngine::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Rebuilt(IndexStats),
    Unchanged(IndexStats),
}

impl Refresh {
    pub fn stats(&self) -> IndexStats {
        match self {
            Self::Rebuilt(s) | Self::Unchanged(s) => *s,
        }
    }
}

pub struct MedQaEngine {
    published: RwLock<Option<Arc<TfIdfIndex>>>,
    rebuild_lock: Mutex<()>,
    extractor: Box<dyn EntityExtractor>,
    text: TextSettings,
    search: SearchSettings,
}

impl MedQaEngine {
    pub fn new(settings: &Settings, extractor: Box<dyn EntityExtractor>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            published: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
            extractor,
            text: settings.text.clone(),
            search: settings.search.clone(),
        })
    }

    /// Default settings with the medical keyword lexicon.
    pub fn with_defaults() -> Self {
        Self {
            published: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
            extractor: Box::new(KeywordExtractor::default()),
            text: TextSettings::default(),
            search: SearchSettings::default(),
        }
    }

    /// Builds an index from `corpus` and publishes it.
    ///
    /// On failure the previous index is withdrawn, so searches report
    /// [`Error::IndexNotReady`] until a later build succeeds.
    pub fn rebuild(&self, corpus: Corpus) -> Result<IndexStats> {
        let _guard = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.build_and_publish(corpus)
    }

    /// Rebuilds only when the corpus differs from the published one.
    pub fn refresh(&self, corpus: Corpus) -> Result<Refresh> {
        let _guard = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = self.current() {
            if current.fingerprint() == corpus.fingerprint() {
                tracing::debug!(fingerprint = current.fingerprint(), "corpus unchanged, keeping index");
                return Ok(Refresh::Unchanged(current.stats()));
            }
        }
        self.build_and_publish(corpus).map(Refresh::Rebuilt)
    }

    fn build_and_publish(&self, corpus: Corpus) -> Result<IndexStats> {
        match TfIdfIndex::build(corpus, Normalizer::new(&self.text)) {
            Ok(index) => {
                let stats = index.stats();
                *self.published.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(index));
                tracing::info!(documents = stats.documents, vocabulary = stats.vocabulary_size, "published index");
                Ok(stats)
            }
            Err(e) => {
                self.clear();
                tracing::warn!(error = %e, "index build failed, index withdrawn");
                Err(e)
            }
        }
    }

    fn current(&self) -> Option<Arc<TfIdfIndex>> {
        self.published.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The published index. Holding the `Arc` pins that snapshot across rebuilds.
    pub fn snapshot(&self) -> Result<Arc<TfIdfIndex>> {
        self.current().ok_or(Error::IndexNotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }

    /// Withdraws the published index.
    pub fn clear(&self) {
        *self.published.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn search(&self, query: &str) -> Result<SearchMatch> {
        self.snapshot()?.search(query)
    }

    pub fn extract(&self, text: &str) -> Entities {
        self.extractor.extract(text)
    }

    /// Best match gated by `search.min_score`, plus entity annotations.
    pub fn answer(&self, query: &str) -> Result<Answer> {
        let outcome = self.snapshot()?.search_with_min_score(query, self.search.min_score)?;
        Ok(Answer { query: query.to_string(), outcome, entities: self.extract(query) })
    }

    pub fn stats(&self) -> Result<IndexStats> {
        Ok(self.snapshot()?.stats())
    }

    pub fn min_score(&self) -> f64 {
        self.search.min_score
    }
}

impl Default for MedQaEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

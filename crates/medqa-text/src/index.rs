use medqa_core::error::{Error, Result};
use medqa_core::types::{DocId, IndexStats, QaPair};
use medqa_core::Corpus;

use crate::sparse::SparseVector;
use crate::tokenizer::Normalizer;
use crate::vocab::Vocabulary;

/// Immutable TF-IDF index over corpus questions.
///
/// Built in one step from a corpus snapshot. Vector `i` belongs to corpus
/// entry `i`. Nothing is mutated after construction, so a shared reference can
/// be searched from any number of threads.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    normalizer: Normalizer,
    vocabulary: Vocabulary,
    vectors: Vec<SparseVector>,
    corpus: Corpus,
    fingerprint: u64,
}

impl TfIdfIndex {
    pub fn build(corpus: Corpus, normalizer: Normalizer) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let tokenized: Vec<Vec<String>> = corpus.questions().map(|q| normalizer.normalize(q)).collect();
        let vocabulary = Vocabulary::from_tokenized(&tokenized)?;
        let vectors: Vec<SparseVector> = tokenized.iter().map(|tokens| vocabulary.weigh(tokens)).collect();

        let empty = vectors.iter().filter(|v| v.is_zero()).count();
        if empty > 0 {
            tracing::debug!(empty, "questions without indexable terms");
        }
        let fingerprint = corpus.fingerprint();
        tracing::info!(documents = vectors.len(), vocabulary = vocabulary.len(), "built tf-idf index");
        Ok(Self { normalizer, vocabulary, vectors, corpus, fingerprint })
    }

    pub fn vector_for(&self, id: DocId) -> Option<&SparseVector> {
        self.vectors.get(id)
    }

    pub fn document(&self, id: DocId) -> Option<&QaPair> {
        self.corpus.get(id)
    }

    pub fn size(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Fingerprint of the corpus this index was built from.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.size(),
            vocabulary_size: self.vocabulary.len(),
            fingerprint: self.fingerprint,
        }
    }
}

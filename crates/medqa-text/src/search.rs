use medqa_core::error::{Error, Result};
use medqa_core::types::{MatchOutcome, SearchMatch};

use crate::index::TfIdfIndex;
use crate::sparse::SparseVector;

/// Dot products of unit vectors can land a few ulps off 1.0.
const UNIT_EPSILON: f64 = 1e-12;

fn settle(score: f64) -> f64 {
    if (1.0 - score).abs() < UNIT_EPSILON {
        1.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

impl TfIdfIndex {
    /// Projects a query into the index's vector space.
    pub fn query_vector(&self, query: &str) -> SparseVector {
        let tokens = self.normalizer().normalize(query);
        self.vocabulary().weigh(&tokens)
    }

    /// Cosine similarity of the query against every document, in corpus order.
    pub fn scores(&self, query: &str) -> Vec<f64> {
        let q = self.query_vector(query);
        self.vectors().iter().map(|d| settle(q.dot(d))).collect()
    }

    /// Returns the single best-scoring document.
    ///
    /// Ties resolve to the lowest document id. A match is returned even when
    /// the score is zero; use [`TfIdfIndex::search_with_min_score`] to gate.
    pub fn search(&self, query: &str) -> Result<SearchMatch> {
        if self.is_empty() {
            return Err(Error::IndexNotReady);
        }
        let q = self.query_vector(query);
        let mut best_id = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (id, doc) in self.vectors().iter().enumerate() {
            let score = q.dot(doc);
            if score > best_score {
                best_id = id;
                best_score = score;
            }
        }
        let pair = self.document(best_id).ok_or(Error::IndexNotReady)?;
        tracing::debug!(doc_id = best_id, score = best_score, query_terms = q.nnz(), "best match");
        Ok(SearchMatch {
            doc_id: best_id,
            question: pair.question.clone(),
            answer: pair.answer.clone(),
            score: settle(best_score),
        })
    }

    pub fn search_with_min_score(&self, query: &str, min_score: f64) -> Result<MatchOutcome> {
        let best = self.search(query)?;
        Ok(MatchOutcome::gate(best, min_score))
    }
}

#[cfg(test)]
mod tests {
    use medqa_core::types::QaPair;
    use medqa_core::Corpus;

    use crate::tokenizer::Normalizer;

    use super::*;

    fn index() -> TfIdfIndex {
        let corpus = Corpus::from_pairs(vec![
            QaPair::new("What is Asthma?", "Asthma answer"),
            QaPair::new("What causes asthma attacks?", "Attack answer"),
            QaPair::new("How is diabetes treated?", "Diabetes answer"),
        ]);
        TfIdfIndex::build(corpus, Normalizer::default()).unwrap()
    }

    #[test]
    fn finds_closest_question() {
        let m = index().search("how do doctors treat diabetes").unwrap();
        assert_eq!(m.doc_id, 2);
        assert_eq!(m.answer, "Diabetes answer");
        assert!(m.score > 0.0 && m.score < 1.0);
    }

    #[test]
    fn scores_match_search() {
        let idx = index();
        let scores = idx.scores("asthma attacks");
        let m = idx.search("asthma attacks").unwrap();
        assert_eq!(m.doc_id, 1);
        assert!((scores[1] - m.score).abs() < 1e-12);
        assert!(scores[1] > scores[0]);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn identical_question_scores_exactly_one() {
        let corpus = Corpus::from_pairs(vec![
            QaPair::new("Who is at risk for Parkinson's Disease?", "Parkinson answer"),
            QaPair::new("What are the treatments for Cystic Fibrosis?", "CF answer"),
            QaPair::new("What causes Parkinson's Disease?", "Cause answer"),
            QaPair::new("How many people are affected by cystic fibrosis?", "Count answer"),
        ]);
        let idx = TfIdfIndex::build(corpus, Normalizer::default()).unwrap();
        for id in 0..idx.size() {
            let question = idx.document(id).unwrap().question.clone();
            let m = idx.search(&question).unwrap();
            assert_eq!(m.doc_id, id);
            assert_eq!(m.score, 1.0, "self-match for {question:?}");
            assert_eq!(idx.scores(&question)[id], 1.0);
        }
    }

    #[test]
    fn settle_snaps_near_unit_scores() {
        assert_eq!(settle(0.999_999_999_999_999_8), 1.0);
        assert_eq!(settle(1.000_000_000_000_000_2), 1.0);
        assert_eq!(settle(0.5), 0.5);
        assert_eq!(settle(-1e-17), 0.0);
    }

    #[test]
    fn unknown_terms_fall_back_to_first_document() {
        let m = index().search("zebra xylophone").unwrap();
        assert_eq!(m.doc_id, 0);
        assert_eq!(m.score, 0.0);
    }

    #[test]
    fn threshold_gates_weak_matches() {
        let idx = index();
        let weak = idx.search_with_min_score("zebra", 0.1).unwrap();
        assert!(!weak.is_confident());
        assert_eq!(weak.best().doc_id, 0);
        let strong = idx.search_with_min_score("What is asthma?", 0.9).unwrap();
        assert!(strong.is_confident());
    }
}

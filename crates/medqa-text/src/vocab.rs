use std::collections::{BTreeMap, HashMap, HashSet};

use medqa_core::error::{Error, Result};

use crate::sparse::SparseVector;
use crate::tokenizer::Normalizer;

/// Frozen term vocabulary with smoothed IDF weights.
///
/// Term ids follow lexicographic order of the terms, so two builds over the
/// same corpus assign identical ids. Weights are
/// `ln((1 + n) / (1 + df)) + 1`, always positive and finite.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f64>,
    documents: usize,
}

impl Vocabulary {
    /// Normalizes each question and builds the vocabulary from the tokens.
    pub fn build<'a, I>(questions: I, normalizer: &Normalizer) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tokenized: Vec<Vec<String>> = questions.into_iter().map(|q| normalizer.normalize(q)).collect();
        Self::from_tokenized(&tokenized)
    }

    /// Builds from already-normalized documents.
    pub fn from_tokenized(docs: &[Vec<String>]) -> Result<Self> {
        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut df: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in docs {
            let unique: HashSet<&str> = doc.iter().map(String::as_str).collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let n = docs.len() as f64;
        let mut ids = HashMap::with_capacity(df.len());
        let mut terms = Vec::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (id, (term, count)) in df.into_iter().enumerate() {
            ids.insert(term.to_string(), id as u32);
            terms.push(term.to_string());
            idf.push(smoothed_idf(n, count as f64));
        }
        Ok(Self { ids, terms, idf, documents: docs.len() })
    }

    pub fn id(&self, term: &str) -> Option<u32> {
        self.ids.get(term).copied()
    }

    pub fn term(&self, id: u32) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn idf(&self, id: u32) -> Option<f64> {
        self.idf.get(id as usize).copied()
    }

    pub fn idf_for(&self, term: &str) -> Option<f64> {
        self.id(term).and_then(|id| self.idf(id))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of documents the weights were computed over.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Projects tokens into the vector space: term count times IDF, unit length.
    ///
    /// Out-of-vocabulary tokens are ignored; the vocabulary never grows.
    pub fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<u32, u32> = HashMap::new();
        for token in tokens {
            if let Some(id) = self.id(token) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let weights = counts
            .into_iter()
            .map(|(id, tf)| (id, f64::from(tf) * self.idf[id as usize]))
            .collect();
        SparseVector::from_weights(weights)
    }
}

fn smoothed_idf(documents: f64, df: f64) -> f64 {
    ((1.0 + documents) / (1.0 + df)).ln() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert_eq!(Vocabulary::from_tokenized(&[]).unwrap_err(), Error::EmptyCorpus);
    }

    #[test]
    fn ids_follow_term_order() {
        let v = Vocabulary::from_tokenized(&[toks("what is flu"), toks("flu vaccine")]).unwrap();
        assert_eq!(v.len(), 4);
        assert_eq!(v.id("flu"), Some(0));
        assert_eq!(v.id("is"), Some(1));
        assert_eq!(v.id("vaccine"), Some(2));
        assert_eq!(v.id("what"), Some(3));
        assert_eq!(v.term(2), Some("vaccine"));
        assert_eq!(v.id("cough"), None);
    }

    #[test]
    fn idf_is_smoothed() {
        let v = Vocabulary::from_tokenized(&[toks("flu flu fever"), toks("flu")]).unwrap();
        // df(flu) = 2 of 2 documents, repeated occurrences count once
        assert!((v.idf_for("flu").unwrap() - 1.0).abs() < 1e-12);
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((v.idf_for("fever").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn weigh_ignores_unknown_terms() {
        let v = Vocabulary::from_tokenized(&[toks("flu fever")]).unwrap();
        let known = v.weigh(&toks("flu"));
        let mixed = v.weigh(&toks("flu zebra unicorn"));
        assert_eq!(known, mixed);
        assert!(v.weigh(&toks("zebra")).is_zero());
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn build_normalizes_questions() {
        let v = Vocabulary::build(["What is Flu?", "FLU shots."], &Normalizer::default()).unwrap();
        assert_eq!(v.documents(), 2);
        assert!(v.id("flu").is_some());
        assert!(v.id("Flu").is_none());
    }
}

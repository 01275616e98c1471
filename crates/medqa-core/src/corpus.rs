use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use crate::types::{DocId, QaPair};

/// Deduplicated, ordered knowledge base.
///
/// Questions are compared after trimming. When a question repeats, the entry
/// stays at the position of its first occurrence and takes the answer of the
/// last occurrence. Later records in a refreshed source therefore replace
/// stale answers without reordering the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    pairs: Vec<QaPair>,
}

impl Corpus {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = QaPair>,
    {
        let mut out: Vec<QaPair> = Vec::new();
        let mut position: HashMap<String, usize> = HashMap::new();
        let mut duplicates = 0usize;
        for pair in pairs {
            let question = pair.question.trim().to_string();
            if let Some(&at) = position.get(&question) {
                out[at].answer = pair.answer;
                duplicates += 1;
            } else {
                position.insert(question.clone(), out.len());
                out.push(QaPair { question, answer: pair.answer });
            }
        }
        if duplicates > 0 {
            tracing::debug!(duplicates, kept = out.len(), "collapsed duplicate questions");
        }
        Self { pairs: out }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, id: DocId) -> Option<&QaPair> {
        self.pairs.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QaPair> {
        self.pairs.iter()
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|p| p.question.as_str())
    }

    /// Content hash of the deduplicated pairs, stable across processes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        self.pairs.len().hash(&mut hasher);
        for p in &self.pairs {
            p.question.hash(&mut hasher);
            p.answer.hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_answer_wins_at_first_position() {
        let corpus = Corpus::from_pairs(vec![
            QaPair::new("Q1", "A1"),
            QaPair::new("Q2", "B"),
            QaPair::new("  Q1 ", "A2"),
        ]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0), Some(&QaPair::new("Q1", "A2")));
        assert_eq!(corpus.get(1), Some(&QaPair::new("Q2", "B")));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Corpus::from_pairs(vec![QaPair::new("Q", "A")]);
        let b = Corpus::from_pairs(vec![QaPair::new("Q", "A")]);
        let c = Corpus::from_pairs(vec![QaPair::new("Q", "B")]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}

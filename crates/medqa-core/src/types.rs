//! Domain types shared by the retrieval and entity engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Position of a document in the deduplicated corpus.
pub type DocId = usize;

/// One knowledge-base entry: a question and the answer returned for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into() }
    }
}

/// Best-scoring document for a query.
///
/// `score` is the cosine similarity between the query and the matched
/// question, in `[0, 1]`. A score of zero means no vocabulary term was shared;
/// an identical question scores exactly `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub doc_id: DocId,
    pub question: String,
    pub answer: String,
    pub score: f64,
}

/// Search result after applying a minimum-score gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchOutcome {
    Confident(SearchMatch),
    NoConfidentMatch { best: SearchMatch, min_score: f64 },
}

impl MatchOutcome {
    pub fn gate(best: SearchMatch, min_score: f64) -> Self {
        if best.score >= min_score {
            Self::Confident(best)
        } else {
            Self::NoConfidentMatch { best, min_score }
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(self, Self::Confident(_))
    }

    /// The best match regardless of whether it passed the gate.
    pub fn best(&self) -> &SearchMatch {
        match self {
            Self::Confident(m) => m,
            Self::NoConfidentMatch { best, .. } => best,
        }
    }
}

/// Entity categories, ordered as they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    Symptoms,
    Diseases,
    Treatments,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 3] = [Self::Symptoms, Self::Diseases, Self::Treatments];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Symptoms => "Symptoms",
            Self::Diseases => "Diseases",
            Self::Treatments => "Treatments",
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword annotations grouped by category.
///
/// Always carries every category in [`EntityCategory::ALL`]; a category with no
/// hits maps to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entities(BTreeMap<EntityCategory, Vec<String>>);

impl Entities {
    pub fn new() -> Self {
        Self(EntityCategory::ALL.iter().map(|c| (*c, Vec::new())).collect())
    }

    pub fn push(&mut self, category: EntityCategory, keyword: impl Into<String>) {
        self.0.entry(category).or_default().push(keyword.into());
    }

    pub fn get(&self, category: EntityCategory) -> &[String] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityCategory, &[String])> {
        self.0.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    /// True when no category has a hit.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined response for one query: the gated match plus entity annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub query: String,
    pub outcome: MatchOutcome,
    pub entities: Entities,
}

/// Size summary of a built index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub documents: usize,
    pub vocabulary_size: usize,
    pub fingerprint: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(score: f64) -> SearchMatch {
        SearchMatch { doc_id: 0, question: "q".into(), answer: "a".into(), score }
    }

    #[test]
    fn entities_start_with_every_category() {
        let e = Entities::new();
        let cats: Vec<_> = e.iter().map(|(c, _)| c).collect();
        assert_eq!(cats, EntityCategory::ALL.to_vec());
        assert!(e.is_empty());
    }

    #[test]
    fn gate_keeps_scores_at_threshold() {
        assert!(MatchOutcome::gate(hit(0.3), 0.3).is_confident());
        let below = MatchOutcome::gate(hit(0.29), 0.3);
        assert!(!below.is_confident());
        assert_eq!(below.best().score, 0.29);
    }

    #[test]
    fn zero_threshold_always_answers() {
        assert!(MatchOutcome::gate(hit(0.0), 0.0).is_confident());
    }
}

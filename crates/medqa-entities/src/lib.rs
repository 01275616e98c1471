//! Keyword entity extraction.
//!
//! Lowercases the input and checks each lexicon keyword for substring
//! containment. No tokenization happens here, so `flu` also fires inside
//! `influenza` and multi-word keywords such as `genetic counseling` match
//! across a single space.
use medqa_core::traits::EntityExtractor;
use medqa_core::types::{Entities, EntityCategory};

const SYMPTOMS: &[&str] = &["fever", "cough", "pain", "fatigue", "nausea", "headache"];
const DISEASES: &[&str] = &["diabetes", "cancer", "asthma", "covid", "flu", "pcos", "noonan", "obesity"];
const TREATMENTS: &[&str] = &["surgery", "medication", "therapy", "vaccine", "genetic counseling"];

/// Ordered keyword lists per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    categories: Vec<(EntityCategory, Vec<String>)>,
}

impl Lexicon {
    pub fn empty() -> Self {
        Self { categories: Vec::new() }
    }

    /// The curated medical keyword set.
    pub fn medical() -> Self {
        Self::empty()
            .with(EntityCategory::Symptoms, SYMPTOMS.iter().copied())
            .with(EntityCategory::Diseases, DISEASES.iter().copied())
            .with(EntityCategory::Treatments, TREATMENTS.iter().copied())
    }

    /// Appends keywords to a category, lowercased, skipping repeats.
    pub fn with<I, S>(mut self, category: EntityCategory, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let idx = match self.categories.iter().position(|(c, _)| *c == category) {
            Some(i) => i,
            None => {
                self.categories.push((category, Vec::new()));
                self.categories.len() - 1
            }
        };
        let words = &mut self.categories[idx].1;
        for k in keywords {
            let k = k.as_ref().trim().to_lowercase();
            if !k.is_empty() && !words.contains(&k) {
                words.push(k);
            }
        }
        self
    }

    pub fn keywords(&self, category: EntityCategory) -> &[String] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, w)| w.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, w)| w.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::medical()
    }
}

/// Stateless substring matcher over a fixed [`Lexicon`].
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    lexicon: Lexicon,
}

impl KeywordExtractor {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl EntityExtractor for KeywordExtractor {
    fn extract(&self, text: &str) -> Entities {
        let text = text.to_lowercase();
        let mut out = Entities::new();
        for category in EntityCategory::ALL {
            for keyword in self.lexicon.keywords(category) {
                if text.contains(keyword.as_str()) {
                    out.push(category, keyword.clone());
                }
            }
        }
        out
    }
}

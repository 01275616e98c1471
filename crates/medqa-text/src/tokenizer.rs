use std::fmt;

use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream};

use medqa_core::config::TextSettings;

/// Text-to-token pipeline shared by indexing and querying.
///
/// Splits on every non-alphanumeric character (punctuation acts as a
/// separator, so `covid-19` yields `covid` and `19`), lowercases, removes stop
/// words and drops tokens shorter than `min_token_chars`. A built index owns
/// its normalizer so queries always go through the exact pipeline the corpus
/// did.
#[derive(Clone)]
pub struct Normalizer {
    analyzer: TextAnalyzer,
    min_token_chars: usize,
    stop_words: Vec<String>,
}

impl Normalizer {
    pub fn new(settings: &TextSettings) -> Self {
        let stop_words: Vec<String> = settings.stop_words.iter().map(|w| w.to_lowercase()).collect();
        let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(stop_words.clone()))
            .build();
        Self { analyzer, min_token_chars: settings.min_token_chars.max(1), stop_words }
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        let mut analyzer = self.analyzer.clone();
        let mut stream = analyzer.token_stream(text);
        let mut tokens = Vec::new();
        while stream.advance() {
            let token = &stream.token().text;
            if token.chars().count() >= self.min_token_chars {
                tokens.push(token.clone());
            }
        }
        tokens
    }

    pub fn min_token_chars(&self) -> usize {
        self.min_token_chars
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&TextSettings::default())
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("min_token_chars", &self.min_token_chars)
            .field("stop_words", &self.stop_words)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_separates_words() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("What is (are) Noonan-Syndrome?"), vec!["what", "is", "are", "noonan", "syndrome"]);
        assert_eq!(n.normalize("fever,cough"), vec!["fever", "cough"]);
    }

    #[test]
    fn single_character_tokens_are_dropped() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("Is a type 2 diabetes A1C test needed?"), vec!["is", "type", "diabetes", "a1c", "test", "needed"]);
    }

    #[test]
    fn stop_words_and_min_length_are_configurable() {
        let n = Normalizer::new(&TextSettings { min_token_chars: 1, stop_words: vec!["What".into(), "is".into()] });
        assert_eq!(n.normalize("What is a flu?"), vec!["a", "flu"]);
    }

    #[test]
    fn empty_and_symbol_only_input_yield_no_tokens() {
        let n = Normalizer::default();
        assert!(n.normalize("").is_empty());
        assert!(n.normalize("?!... ---").is_empty());
    }

    #[test]
    fn clones_produce_identical_tokens() {
        let n = Normalizer::default();
        let m = n.clone();
        let text = "Who is at risk for Parkinson's Disease? ?";
        assert_eq!(n.normalize(text), m.normalize(text));
    }
}

//! medqa-text
//!
//! TF-IDF question index: a shared normalizer, a vocabulary with smoothed IDF
//! weights, unit-length sparse document vectors and best-match cosine search.
pub mod index;
pub mod search;
pub mod sparse;
pub mod tokenizer;
pub mod vocab;

pub use index::TfIdfIndex;
pub use sparse::SparseVector;
pub use tokenizer::Normalizer;
pub use vocab::Vocabulary;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("corpus is empty: nothing to index")]
    EmptyCorpus,

    #[error("index not ready: build the index before searching")]
    IndexNotReady,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

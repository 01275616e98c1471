//! Shared domain types for the medqa retrieval workspace.
//!
//! Text and entity engines depend on this crate only; the engine crate wires
//! them together behind a caller-owned handle.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod traits;
pub mod types;

pub use corpus::Corpus;
pub use error::{Error, Result};

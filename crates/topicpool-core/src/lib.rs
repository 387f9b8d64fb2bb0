//! topicpool-core
//!
//! Data model, error taxonomy and collaborator traits shared by the pooling
//! engine, plus the free-text normalizer and a reference query compiler.

#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod compile;
pub mod config;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;

pub use error::{Error, Result};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure of the lowest-indexed failed query in one aggregation call.
    /// `index` is that query's position in the input batch.
    #[error("Aggregation failed at query {index}: {source}")]
    Aggregation {
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn aggregation(index: usize, source: Error) -> Self {
        Self::Aggregation { index, source: Box::new(source) }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

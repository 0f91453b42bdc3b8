use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use syncfifo_core::error::Error;
    /// let err = Error::Config("depth must be at least 1".into());
    /// let err = err.with_context("while loading queue config");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Config(msg) => {
                if msg.contains("depth") {
                    vec![
                        "Depth is the number of slots and must be a positive integer".into(),
                        "Check SYNCFIFO_DEPTH or the `depth` key of the script config".into(),
                    ]
                } else if msg.contains("width") {
                    vec![
                        "Data width is given in bits and must be between 1 and 64".into(),
                        "Check SYNCFIFO_DATA_WIDTH or the `data_width` key of the script config".into(),
                    ]
                } else {
                    vec![]
                }
            }
            Error::Context { source, .. } => match source.downcast_ref::<Error>() {
                Some(inner) => inner.suggestions(),
                None => vec![],
            },
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

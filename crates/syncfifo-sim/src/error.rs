use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("queue error: {0}")]
    Core(#[from] syncfifo_core::error::Error),

    #[error("script error: {0}")]
    Script(String),

    #[error("tick {tick}: conflicting writes ({first:#x} vs {second:#x})")]
    Conflict { tick: u64, first: u64, second: u64 },

    #[error("tick {tick}: expected {field} = {expected}, got {actual}")]
    Expectation {
        tick: u64,
        field: &'static str,
        expected: String,
        actual: String,
    },
}

impl Error {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            Error::Script(msg) => Error::Script(format!("{}: {}", ctx, msg)),
            Error::Core(e) => Error::Core(e.with_context(ctx)),
            other => other,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Core(e) => e.suggestions(),
            Error::Yaml(_) => vec![
                "Check the script is a mapping with a `ticks` list".into(),
                "Each tick accepts reset, write, read, actors, repeat and expect".into(),
            ],
            Error::Conflict { .. } => vec![
                "Only one distinct value can be written per tick".into(),
                "Move one of the writers to a later tick".into(),
            ],
            Error::Expectation { .. } => vec![
                "Run with --collect to see every failing tick".into(),
                "Use `explain` to list the expanded tick sequence".into(),
            ],
            _ => vec![],
        }
    }
}

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No raw book data files found in {0}")]
    NoRawFiles(PathBuf),
    #[error("No author lookup file found in {0}")]
    MissingAuthorFile(PathBuf),
    #[error("Multiple author lookup files found: {0:?}")]
    AmbiguousAuthorFiles(Vec<String>),
    #[error("Schema Error: {0}")]
    Schema(String),
    #[error("Type Coercion Error: column '{column}', row {row}: cannot parse {value:?}")]
    TypeCoercion {
        column: &'static str,
        row: usize,
        value: String,
    },
    #[error("Invalid output path (must contain exactly one \".csv\"): {0}")]
    InvalidOutputPath(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

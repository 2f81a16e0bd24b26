use thiserror::Error;

pub type MooResult<T> = Result<T, MooError>;

#[derive(Error, Debug)]
pub enum MooError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel import error: {0}")]
    Excel(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Column not found: {0}")]
    MissingColumn(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

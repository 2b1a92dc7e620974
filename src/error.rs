use thiserror::Error;

/// Main error type for javabind operations
#[derive(Error, Debug)]
pub enum JavabindError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid inclusion pattern `{pattern}`: {source}")]
    Filter {
        pattern: String,
        source: regex::Error,
    },

    #[error("Seed class not found on classpath: {0}")]
    SeedNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Reflection error for {class}: {message}")]
    Reflection { class: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),
}

pub type Result<T> = std::result::Result<T, JavabindError>;

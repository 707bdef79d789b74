#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid roster {source_name}: {message}")]
    Roster { source_name: String, message: String },
}

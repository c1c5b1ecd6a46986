#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("input (read): '{path}': {source}")]
    Read { path: String, source: std::io::Error },

    #[error("input (parse): {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(#[from] rowset_engine::ConfigError),

    #[error("{0}")]
    Cursor(#[from] rowset_engine::CursorError),
}

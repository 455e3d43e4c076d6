use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] minreq::Error),

    #[error("Vote error: {0}")]
    Vote(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Selector error: {0}")]
    Selector(String),

    #[error("Usage error: {0}")]
    Usage(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "page not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("page not found"));
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_err = url::Url::parse("/relative/only").unwrap_err();
        let app_err: AppError = parse_err.into();
        assert!(matches!(app_err, AppError::Url(_)));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Vote("server returned 403".to_string());
        assert_eq!(err.to_string(), "Vote error: server returned 403");

        let err = AppError::Settings("invalid timeout".to_string());
        assert_eq!(err.to_string(), "Settings error: invalid timeout");

        let err = AppError::Selector("unsupported selector 'div > p'".to_string());
        assert_eq!(err.to_string(), "Selector error: unsupported selector 'div > p'");
    }
}

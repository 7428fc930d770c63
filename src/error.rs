//! Error handling for upkeep
//!
//! Defines custom error types and establishes a unified Result type
//! using anyhow for context chaining and error propagation.

use thiserror::Error;

/// Core error types for tracker operations
#[derive(Error, Debug)]
pub enum UpkeepError {
    #[error("database error: {0}")]
    DbError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("backup error: {0}")]
    BackupError(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tracker operations
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_formatting_is_readable() {
        let err = UpkeepError::ValidationError("amount must not be negative".to_string());
        assert_eq!(
            err.to_string(),
            "validation error: amount must not be negative"
        );
    }

    #[test]
    fn test_anyhow_context_chains_errors() {
        use anyhow::Context;
        let result: Result<()> =
            Err(anyhow::anyhow!("original error")).context("failed to record expense");
        match result {
            Err(e) => {
                let msg = e.to_string();
                assert!(msg.contains("failed to record expense"));
                let debug_msg = format!("{:?}", e);
                assert!(debug_msg.contains("original error") || msg.contains("original error"));
            }
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn test_error_variants() {
        let db_err = UpkeepError::DbError("test".to_string());
        assert!(db_err.to_string().starts_with("database error"));

        let parse_err = UpkeepError::ParseError("test".to_string());
        assert!(parse_err.to_string().starts_with("parse error"));

        let backup_err = UpkeepError::BackupError("test".to_string());
        assert!(backup_err.to_string().starts_with("backup error"));
    }
}

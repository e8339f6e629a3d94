/*!
 * Error types for the hanzi-gloss application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// Status code reported by the provider
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider did not answer within the configured time
    #[error("Translation request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors that end an orchestration run
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// Another run is still in flight
    #[error("A translation run is already in progress")]
    AlreadyRunning,

    /// The run was cancelled before it finished
    #[error("Translation run was cancelled")]
    Cancelled,

    /// A translator call failed and aborted the run
    #[error("Translation failed: {0}")]
    Translation(#[from] TranslationError),
}

/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported providers:
 * - MyMemory: public translation memory API
 * - Mock: offline provider with scripted behaviors
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Send one request and wait for its response
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Check that the provider answers a minimal request
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Translated text carried by `response`
    fn extract_text(response: &Self::Response) -> String;
}

pub mod mock;
pub mod mymemory;

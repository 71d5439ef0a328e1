//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAICompatibleProvider` - Any `/chat/completions` endpoint (SiliconFlow by default)

mod mock_provider;
mod openai_compatible;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_compatible::{OpenAICompatibleConfig, OpenAICompatibleProvider};

//! Generated coding hints.
//!
//! This module provides:
//! * [`TextGenerator`]: async trait for the external text-generation service.
//! * [`ApiClient`]: OpenAI-compatible REST implementation.
//! * [`HintRequest`] / [`PromptBuilder`]: request clamping and prompt text.
//! * [`HintService`]: issues requests, renders results, drops superseded ones.
//! * [`HintError`]: why a request produced no hint.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use code_timer::config::AppConfig;
//! use code_timer::hint::{ApiClient, HintRequest, HintService};
//! use code_timer::protocol::EventSink;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let (sink, mut events) = EventSink::channel();
//!     let client = Arc::new(ApiClient::from_config(&config.hint));
//!     let (mut service, mut completions) = HintService::new(&config.hint, client, sink);
//!
//!     service.request_hint(HintRequest::new("Rust", "reverse a linked list", 300));
//!     if let Some(done) = completions.recv().await {
//!         service.resolve(done);
//!     }
//!     println!("{:?}", events.recv().await);
//! }
//! ```

pub mod client;
pub mod prompt;
pub mod service;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{extract_text, ApiClient, HintError, TextGenerator};
pub use prompt::{HintRequest, PromptBuilder, MAX_LEVEL, MIN_LEVEL};
pub use service::{CompletionReceiver, HintCompletion, HintResult, HintService};

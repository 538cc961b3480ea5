//! Hint request pipeline with supersession.
//!
//! Each [`HintService::request_hint`] call gets a fresh token and spawns one
//! task that calls the [`TextGenerator`], renders the text to markup, and
//! sends a [`HintCompletion`] back over a channel.  The service remembers
//! only the token of the latest request; [`HintService::resolve`] turns the
//! matching completion into a `hintReady`/`hintFailed` event and drops every
//! other one.  Superseded requests are not aborted, just ignored when they
//! land.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::HintConfig;
use crate::markup;
use crate::protocol::{Event, EventSink};

use super::client::{HintError, TextGenerator};
use super::prompt::{HintRequest, PromptBuilder};

/// Rendered markup on success.
pub type HintResult = Result<String, HintError>;

/// Outcome of one request task, tagged with the token it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct HintCompletion {
    pub token: u64,
    pub result: HintResult,
}

pub type CompletionReceiver = mpsc::UnboundedReceiver<HintCompletion>;

pub struct HintService {
    generator: Arc<dyn TextGenerator>,
    prompts: PromptBuilder,
    enabled: bool,
    next_token: u64,
    pending: Option<u64>,
    completion_tx: mpsc::UnboundedSender<HintCompletion>,
    events: EventSink,
}

impl HintService {
    pub fn new(
        config: &HintConfig,
        generator: Arc<dyn TextGenerator>,
        events: EventSink,
    ) -> (Self, CompletionReceiver) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let service = Self {
            generator,
            prompts: PromptBuilder::new(&config.locale),
            enabled: config.enabled,
            next_token: 0,
            pending: None,
            completion_tx,
            events,
        };
        (service, completion_rx)
    }

    /// Token of the request whose outcome will be delivered, if any is
    /// still in flight.
    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    /// Issue a request, superseding any request still in flight, and return
    /// its token.  Returns immediately; the outcome arrives on the
    /// completion channel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request_hint(&mut self, request: HintRequest) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.pending.replace(token) {
            log::debug!("hint: request {previous} superseded by {token}");
        }

        let tx = self.completion_tx.clone();

        if !self.enabled {
            let _ = tx.send(HintCompletion {
                token,
                result: Err(HintError::Disabled),
            });
            return token;
        }

        let prompt = self.prompts.build(&request);
        let generator = Arc::clone(&self.generator);
        log::info!(
            "hint: request {token} ({}, {} chars)",
            request.language,
            request.level
        );

        tokio::spawn(async move {
            let result = generator
                .generate(&prompt)
                .await
                .map(|text| markup::render(&text));
            if tx.send(HintCompletion { token, result }).is_err() {
                log::debug!("hint: request {token} finished after shutdown");
            }
        });

        token
    }

    /// Deliver `completion` to the view if it belongs to the latest request.
    /// Returns whether an event was emitted.
    pub fn resolve(&mut self, completion: HintCompletion) -> bool {
        if self.pending != Some(completion.token) {
            log::debug!("hint: discarding stale result for request {}", completion.token);
            return false;
        }
        self.pending = None;

        match completion.result {
            Ok(html) => {
                log::info!("hint: request {} ready", completion.token);
                self.events.emit(Event::HintReady { html });
            }
            Err(e) => {
                log::warn!("hint: request {} failed: {e}", completion.token);
                self.events.emit(Event::HintFailed {
                    message: e.to_string(),
                });
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

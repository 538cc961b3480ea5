//! Message protocol between the panel view and the host.
//!
//! [`Command`] is everything the view can ask for; [`Event`] is everything
//! the host can tell it.  Both are closed enums serialised as JSON objects
//! tagged by a `command` field, using the message names the panel's view
//! script already speaks:
//!
//! ```text
//! view → host   {"command":"startTimer","duration1":"5","duration2":"0"}
//! host → view   {"command":"updateTimer","time":"4:59"}
//! ```
//!
//! Numeric fields are read leniently because the view posts raw `<input>`
//! values: numbers, numeric strings and empty strings are all accepted.
//! Range checks are not done here; the timer and hint services clamp.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Command (view → host)
// ---------------------------------------------------------------------------

/// Inbound commands from the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Start a countdown of `minutes:seconds`.  Ignored while one is running.
    #[serde(rename = "startTimer")]
    StartTimer {
        #[serde(alias = "duration1", deserialize_with = "lenient::int", default)]
        minutes: i64,
        #[serde(alias = "duration2", deserialize_with = "lenient::int", default)]
        seconds: i64,
    },

    /// Pause a running countdown or resume a paused one.
    #[serde(rename = "toggleTimer")]
    ToggleTimer {},

    /// Overwrite the remaining time and echo it back (live preview while the
    /// user edits the duration fields).
    #[serde(rename = "updateRemainingTime")]
    UpdateRemainingTime {
        #[serde(alias = "duration1", deserialize_with = "lenient::int", default)]
        minutes: i64,
        #[serde(alias = "duration2", deserialize_with = "lenient::int", default)]
        seconds: i64,
    },

    /// Ask the text-generation service for a hint of roughly `level`
    /// characters.
    #[serde(rename = "requestHint")]
    RequestHint {
        language: String,
        specification: String,
        #[serde(deserialize_with = "lenient::int", default)]
        level: i64,
    },
}

impl Command {
    /// Wire tag of this command, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartTimer { .. } => "startTimer",
            Command::ToggleTimer {} => "toggleTimer",
            Command::UpdateRemainingTime { .. } => "updateRemainingTime",
            Command::RequestHint { .. } => "requestHint",
        }
    }
}

// ---------------------------------------------------------------------------
// Event (host → view)
// ---------------------------------------------------------------------------

/// Outbound events delivered to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Event {
    /// New remaining time, formatted `M:SS`.
    #[serde(rename = "updateTimer")]
    TimeUpdated {
        #[serde(rename = "time")]
        display: String,
    },

    /// The countdown reached zero.
    #[serde(rename = "timeUp")]
    TimeExpired {},

    #[serde(rename = "timerPaused")]
    Paused {},

    #[serde(rename = "timerResumed")]
    Resumed {},

    /// Rendered markup for the latest hint request.
    #[serde(rename = "hintReady")]
    HintReady { html: String },

    /// The latest hint request failed; `message` is user-facing.
    #[serde(rename = "hintFailed")]
    HintFailed { message: String },
}

// ---------------------------------------------------------------------------
// EventSink
// ---------------------------------------------------------------------------

/// Outbound half of the view channel.
///
/// Cheap to clone.  Every component that emits events holds one; since they
/// all feed the same FIFO channel, the view sees events in emission order.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSink {
    /// Create a sink and the receiver the view side drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue `event` for the view.  A closed view is logged, not an error:
    /// the panel may be torn down while work is still in flight.
    pub fn emit(&self, event: Event) {
        log::debug!("bus: emit {:?}", event);
        if self.tx.send(event).is_err() {
            log::warn!("bus: view channel closed, dropping event");
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient integer fields
// ---------------------------------------------------------------------------

mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    /// Accept an integer, a float (truncated), or a string holding either.
    /// Empty and unparseable strings read as `0`, the same value the view
    /// substitutes for a blank field.
    pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => n,
            Raw::Float(f) => truncate(f),
            Raw::Text(s) => parse(&s),
            Raw::Null(()) => 0,
        })
    }

    fn parse(s: &str) -> i64 {
        let s = s.trim();
        s.parse::<i64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().map(truncate))
            .unwrap_or(0)
    }

    fn truncate(f: f64) -> i64 {
        if f.is_finite() {
            f.trunc() as i64
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

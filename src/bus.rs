//! Channel bus: binds the view's commands to the timer and hint services.
//!
//! ```text
//! Command (mpsc) ──▶ ChannelBus::run()  ← one tokio task, owns all state
//!                       │
//!                       ├─ startTimer / toggleTimer / updateRemainingTime ─▶ TimerEngine
//!                       ├─ requestHint ─────────────────────────────────────▶ HintService
//!                       ├─ tick (generation) ◀── tick source task
//!                       └─ HintCompletion    ◀── hint request tasks
//!
//! TimerEngine / HintService ──emit──▶ EventSink ──▶ view (FIFO)
//! ```
//!
//! Ticks and hint completions are plain values sent back to this loop, so
//! the timer state and the pending-hint token are only ever touched here and
//! need no locking.  A slow hint request never holds up a tick.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::hint::{CompletionReceiver, HintRequest, HintService, TextGenerator};
use crate::protocol::{Command, EventSink};
use crate::timer::{TickReceiver, TimerEngine, TimerState};

pub struct ChannelBus {
    timer: TimerEngine,
    hints: HintService,
    ticks: TickReceiver,
    completions: CompletionReceiver,
}

impl ChannelBus {
    pub fn new(config: &AppConfig, generator: Arc<dyn TextGenerator>, events: EventSink) -> Self {
        let (timer, ticks) = TimerEngine::new(&config.timer, events.clone());
        let (hints, completions) = HintService::new(&config.hint, generator, events);
        Self {
            timer,
            hints,
            ticks,
            completions,
        }
    }

    pub fn timer(&self) -> &TimerState {
        self.timer.state()
    }

    pub fn hints(&self) -> &HintService {
        &self.hints
    }

    /// Route one inbound command.  Must be called from within a tokio
    /// runtime, since starting a timer or a hint request spawns a task.
    pub fn dispatch(&mut self, command: Command) {
        log::debug!("bus: dispatch {}", command.name());
        match command {
            Command::StartTimer { minutes, seconds } => self.timer.start(minutes, seconds),
            Command::ToggleTimer {} => self.timer.toggle(),
            Command::UpdateRemainingTime { minutes, seconds } => {
                self.timer.update_remaining_time(minutes, seconds)
            }
            Command::RequestHint {
                language,
                specification,
                level,
            } => {
                self.hints
                    .request_hint(HintRequest::new(language, specification, level));
            }
        }
    }

    /// Run the session until `commands` is closed, then cancel the timer.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => self.dispatch(command),
                    None => break,
                },
                Some(generation) = self.ticks.recv() => self.timer.tick(generation),
                Some(completion) = self.completions.recv() => {
                    self.hints.resolve(completion);
                }
            }
        }

        self.timer.cancel();
        log::info!("bus: command channel closed, session shutting down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

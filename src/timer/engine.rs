//! Countdown engine: owns [`TimerState`] and its tick source.
//!
//! The tick source is a tokio task that does nothing but send its generation
//! number into a channel once per tick period.  The bus feeds those values
//! back into [`TimerEngine::tick`], so every state mutation happens on the
//! bus task and the ticker itself never touches state.
//!
//! Cancelling a tick source aborts the task *and* relies on the generation
//! check: a value that was already queued before the abort still arrives,
//! but carries a stale generation and is dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::TimerConfig;
use crate::protocol::{Event, EventSink};

use super::state::{total_seconds, TimerPhase, TimerState};

/// Receiving end of the tick channel; yields the generation of each tick.
pub type TickReceiver = mpsc::UnboundedReceiver<u64>;

pub struct TimerEngine {
    state: TimerState,
    tick_interval: Duration,
    tick_tx: mpsc::UnboundedSender<u64>,
    ticker: Option<JoinHandle<()>>,
    events: EventSink,
}

impl TimerEngine {
    /// Create an idle engine and the receiver its ticks arrive on.
    pub fn new(config: &TimerConfig, events: EventSink) -> (Self, TickReceiver) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let engine = Self {
            state: TimerState::new(),
            tick_interval: config.tick_interval(),
            tick_tx,
            ticker: None,
            events,
        };
        (engine, tick_rx)
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Start a countdown of `minutes:seconds` (each clamped to `[0, 60]`).
    ///
    /// Silently ignored while a countdown is `Running`.  From any other
    /// phase, including `Paused`, the state is reset and a fresh tick source
    /// is spawned.  A zero-length countdown expires on the spot.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, minutes: i64, seconds: i64) {
        if self.state.phase == TimerPhase::Running {
            log::debug!("timer: start ignored, already running");
            return;
        }

        self.stop_ticker();
        self.state.generation += 1;
        self.state.remaining_seconds = total_seconds(minutes, seconds);

        if self.state.remaining_seconds == 0 {
            log::info!("timer: zero-length countdown, expiring immediately");
            self.events.emit(Event::TimeUpdated {
                display: self.state.display(),
            });
            self.expire();
            return;
        }

        self.state.phase = TimerPhase::Running;
        self.ticker = Some(spawn_ticker(
            self.state.generation,
            self.tick_interval,
            self.tick_tx.clone(),
        ));
        log::info!(
            "timer: started {} (generation {})",
            self.state.display(),
            self.state.generation
        );
    }

    /// Apply one tick from the tick source tagged `generation`.
    pub fn tick(&mut self, generation: u64) {
        if generation != self.state.generation {
            log::debug!(
                "timer: dropping stale tick (generation {generation}, current {})",
                self.state.generation
            );
            return;
        }
        if self.state.phase != TimerPhase::Running {
            return;
        }

        // Already at zero only after a mid-run update; "0:00" was echoed then.
        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            self.events.emit(Event::TimeUpdated {
                display: self.state.display(),
            });
        }

        if self.state.remaining_seconds == 0 {
            self.stop_ticker();
            self.expire();
        }
    }

    /// Pause a running countdown or resume a paused one.  No effect from
    /// `Idle` or `Expired`.
    pub fn toggle(&mut self) {
        match self.state.phase {
            TimerPhase::Running => {
                self.state.phase = TimerPhase::Paused;
                log::info!("timer: paused at {}", self.state.display());
                self.events.emit(Event::Paused {});
            }
            TimerPhase::Paused => {
                self.state.phase = TimerPhase::Running;
                log::info!("timer: resumed at {}", self.state.display());
                self.events.emit(Event::Resumed {});
            }
            TimerPhase::Idle | TimerPhase::Expired => {
                log::debug!("timer: toggle ignored in {}", self.state.phase.label());
            }
        }
    }

    /// Overwrite the remaining time and echo it to the view, whatever the
    /// phase.  The phase itself is left alone, so a running countdown simply
    /// continues from the new value.
    pub fn update_remaining_time(&mut self, minutes: i64, seconds: i64) {
        self.state.remaining_seconds = total_seconds(minutes, seconds);
        self.events.emit(Event::TimeUpdated {
            display: self.state.display(),
        });
    }

    /// Tear down: invalidate the current generation and stop the tick
    /// source.  Remaining time and phase are kept for inspection.
    pub fn cancel(&mut self) {
        self.state.generation += 1;
        self.stop_ticker();
        log::debug!("timer: cancelled");
    }

    fn expire(&mut self) {
        self.state.phase = TimerPhase::Expired;
        log::info!("timer: expired");
        self.events.emit(Event::TimeExpired {});
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Send `generation` every `period`, starting one period from now, until the
/// receiver is gone or the task is aborted.
fn spawn_ticker(
    generation: u64,
    period: Duration,
    tx: mpsc::UnboundedSender<u64>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if tx.send(generation).is_err() {
                break;
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Ticks an hour apart never fire during a test, so ticks are applied
    /// by hand.
    fn manual_engine() -> (TimerEngine, TickReceiver, UnboundedReceiver<Event>) {
        let (sink, events) = EventSink::channel();
        let config = TimerConfig {
            tick_interval_ms: 3_600_000,
        };
        let (engine, ticks) = TimerEngine::new(&config, sink);
        (engine, ticks, events)
    }

    fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    fn updated(display: &str) -> Event {
        Event::TimeUpdated {
            display: display.into(),
        }
    }

    // ---- start / tick ---

    #[tokio::test]
    async fn start_then_one_tick() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(1, 5);
        assert_eq!(engine.state().phase, TimerPhase::Running);
        assert_eq!(engine.state().remaining_seconds, 65);

        let generation = engine.state().generation;
        engine.tick(generation);

        assert_eq!(engine.state().remaining_seconds, 64);
        assert_eq!(drain(&mut events), vec![updated("1:04")]);
    }

    #[tokio::test]
    async fn last_second_expires_exactly_once() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(0, 1);
        let generation = engine.state().generation;
        engine.tick(generation);
        engine.tick(generation);
        engine.tick(generation);

        assert_eq!(engine.state().phase, TimerPhase::Expired);
        assert_eq!(engine.state().remaining_seconds, 0);
        assert_eq!(
            drain(&mut events),
            vec![updated("0:00"), Event::TimeExpired {}]
        );
    }

    #[tokio::test]
    async fn start_while_running_is_a_no_op() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(2, 0);
        let generation = engine.state().generation;
        engine.tick(generation);

        engine.start(10, 0);

        assert_eq!(engine.state().remaining_seconds, 119);
        assert_eq!(engine.state().generation, generation);
        assert_eq!(drain(&mut events), vec![updated("1:59")]);
    }

    #[tokio::test]
    async fn restart_after_expiry_invalidates_old_ticks() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(0, 1);
        let old = engine.state().generation;
        engine.tick(old);
        drain(&mut events);

        engine.start(0, 5);
        let new = engine.state().generation;
        assert_ne!(old, new);

        engine.tick(old);
        assert_eq!(engine.state().remaining_seconds, 5);

        engine.tick(new);
        assert_eq!(drain(&mut events), vec![updated("0:04")]);
    }

    #[tokio::test]
    async fn start_from_paused_resets() {
        let (mut engine, _ticks, _events) = manual_engine();

        engine.start(5, 0);
        engine.toggle();
        engine.start(0, 30);

        assert_eq!(engine.state().phase, TimerPhase::Running);
        assert_eq!(engine.state().remaining_seconds, 30);
    }

    #[tokio::test]
    async fn out_of_range_start_is_clamped() {
        let (mut engine, _ticks, _events) = manual_engine();

        engine.start(500, -20);
        assert_eq!(engine.state().remaining_seconds, 3600);
    }

    #[tokio::test]
    async fn zero_length_start_expires_immediately() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(0, 0);

        assert_eq!(engine.state().phase, TimerPhase::Expired);
        assert_eq!(
            drain(&mut events),
            vec![updated("0:00"), Event::TimeExpired {}]
        );
    }

    // ---- toggle ---

    #[tokio::test]
    async fn toggle_twice_round_trips() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(1, 0);
        let before = engine.state().clone();

        engine.toggle();
        assert_eq!(engine.state().phase, TimerPhase::Paused);
        engine.toggle();

        assert_eq!(engine.state(), &before);
        assert_eq!(
            drain(&mut events),
            vec![Event::Paused {}, Event::Resumed {}]
        );
    }

    #[tokio::test]
    async fn paused_timer_ignores_ticks() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(1, 0);
        engine.toggle();
        drain(&mut events);

        let generation = engine.state().generation;
        engine.tick(generation);

        assert_eq!(engine.state().remaining_seconds, 60);
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn toggle_is_ignored_when_idle_or_expired() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.toggle();
        assert_eq!(engine.state().phase, TimerPhase::Idle);

        engine.state.phase = TimerPhase::Expired;
        engine.toggle();
        assert_eq!(engine.state().phase, TimerPhase::Expired);

        assert!(drain(&mut events).is_empty());
    }

    // ---- update_remaining_time ---

    #[test]
    fn update_while_idle_previews() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.update_remaining_time(3, 7);

        assert_eq!(engine.state().phase, TimerPhase::Idle);
        assert_eq!(engine.state().remaining_seconds, 187);
        assert_eq!(drain(&mut events), vec![updated("3:07")]);
    }

    #[tokio::test]
    async fn update_while_running_keeps_counting() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(5, 0);
        engine.update_remaining_time(0, 2);
        let generation = engine.state().generation;
        engine.tick(generation);
        engine.tick(generation);

        assert_eq!(
            drain(&mut events),
            vec![
                updated("0:02"),
                updated("0:01"),
                updated("0:00"),
                Event::TimeExpired {}
            ]
        );
    }

    #[tokio::test]
    async fn update_to_zero_while_running_expires_without_repeating_display() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(5, 0);
        engine.update_remaining_time(0, 0);
        let generation = engine.state().generation;
        engine.tick(generation);
        engine.tick(generation);

        assert_eq!(
            drain(&mut events),
            vec![updated("0:00"), Event::TimeExpired {}]
        );
        assert_eq!(engine.state().phase, TimerPhase::Expired);
    }

    // ---- cancel ---

    #[tokio::test]
    async fn cancel_invalidates_pending_ticks() {
        let (mut engine, _ticks, mut events) = manual_engine();

        engine.start(1, 0);
        let generation = engine.state().generation;
        engine.cancel();
        engine.tick(generation);

        assert_eq!(engine.state().remaining_seconds, 60);
        assert!(drain(&mut events).is_empty());
    }

    // ---- real tick source on a paused clock ---

    #[tokio::test(start_paused = true)]
    async fn tick_source_counts_down_to_expiry() {
        let (sink, mut events) = EventSink::channel();
        let (mut engine, mut ticks) = TimerEngine::new(&TimerConfig::default(), sink);

        engine.start(0, 2);
        while engine.state().phase == TimerPhase::Running {
            let generation = ticks.recv().await.expect("tick source alive");
            engine.tick(generation);
        }

        assert_eq!(
            drain(&mut events),
            vec![updated("0:01"), updated("0:00"), Event::TimeExpired {}]
        );

        let after = time::timeout(Duration::from_secs(10), ticks.recv()).await;
        assert!(after.is_err(), "tick source must stop after expiry");
    }
}

//! `NavOutputObserver<W>` — bridges `WorldObserver` to an `OutputWriter`.

use log::warn;

use gn_agent::{AgentEvent, NavigationAgent};
use gn_core::{SimConfig, Tick};
use gn_world::{TickSummary, WorldObserver};

use crate::row::{AgentEventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`WorldObserver`] that writes agent events and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Events are buffered for the current tick and written in one batch at
/// tick end, ahead of that tick's summary row.  Errors from the writer are
/// stored internally because observer methods have no return value; check
/// [`take_error`][Self::take_error] after the run.
pub struct NavOutputObserver<W: OutputWriter> {
    writer:     W,
    dt_secs:    f32,
    pending:    Vec<AgentEventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> NavOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config.dt_secs` for the
    /// elapsed-time column.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            dt_secs:    config.dt_secs,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  `World::run` does this through `on_run_end`;
    /// call it after driving the world with `step` or `run_ticks`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn elapsed_ms(&self, tick: Tick) -> u64 {
        (tick.0 as f64 * self.dt_secs as f64 * 1_000.0).round() as u64
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> WorldObserver for NavOutputObserver<W> {
    fn on_agent_event(&mut self, tick: Tick, agent: &NavigationAgent, event: AgentEvent) {
        let position = agent.position();
        self.pending.push(AgentEventRow {
            tick:     tick.0,
            agent_id: agent.id().0,
            map_id:   agent.map().0,
            event,
            state:    agent.state(),
            x:        position.x,
            y:        position.y,
        });
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_events(&rows);
            self.store_err(result);
        }

        let row = TickSummaryRow {
            tick:         tick.0,
            elapsed_ms:   self.elapsed_ms(tick),
            agents:       summary.agents as u64,
            idle:         summary.idle as u64,
            seeking:      summary.seeking as u64,
            blocked:      summary.blocked as u64,
            arrived:      summary.arrived as u64,
            events:       summary.events as u64,
            reservations: summary.reservations,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

//! The `OutputWriter` trait implemented by backend writers.

use crate::{AgentEventRow, OutputResult, TickSummaryRow};

/// Sink for the rows produced by [`NavOutputObserver`][crate::NavOutputObserver].
///
/// Errors never interrupt the run: the observer stores the first one for
/// [`take_error`][crate::NavOutputObserver::take_error].
pub trait OutputWriter {
    /// Write the lifecycle events of one tick, in firing order.
    fn write_events(&mut self, rows: &[AgentEventRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

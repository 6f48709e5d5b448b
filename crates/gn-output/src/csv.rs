//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_events.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::debug;

use crate::writer::OutputWriter;
use crate::{AgentEventRow, OutputResult, TickSummaryRow};

pub const EVENT_HEADERS: [&str; 7] = ["tick", "agent_id", "map_id", "event", "state", "x", "y"];

pub const SUMMARY_HEADERS: [&str; 9] = [
    "tick",
    "elapsed_ms",
    "agents",
    "idle",
    "seeking",
    "blocked",
    "arrived",
    "events",
    "reservations",
];

/// Writes run output to two CSV files.
pub struct CsvWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("agent_events.csv"))?;
        events.write_record(EVENT_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        debug!("csv output opened in {}", dir.display());
        Ok(Self { events, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_events(&mut self, rows: &[AgentEventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.map_id.to_string(),
                row.event.as_str().to_owned(),
                row.state.as_str().to_owned(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_ms.to_string(),
            row.agents.to_string(),
            row.idle.to_string(),
            row.seeking.to_string(),
            row.blocked.to_string(),
            row.arrived.to_string(),
            row.events.to_string(),
            row.reservations.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

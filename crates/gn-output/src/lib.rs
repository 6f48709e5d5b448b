//! `gn-output` — run output writers for the gridnav engine.
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`row`]      | `AgentEventRow`, `TickSummaryRow` plain data rows      |
//! | [`writer`]   | `OutputWriter` trait                                   |
//! | [`csv`]      | `CsvWriter`: `agent_events.csv`, `tick_summaries.csv`  |
//! | [`observer`] | `NavOutputObserver`, a `WorldObserver` over any writer |
//!
//! # Usage
//!
//! ```rust,ignore
//! use gn_output::{CsvWriter, NavOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = NavOutputObserver::new(writer, &world.config);
//! world.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::NavOutputObserver;
pub use row::{AgentEventRow, TickSummaryRow};
pub use writer::OutputWriter;

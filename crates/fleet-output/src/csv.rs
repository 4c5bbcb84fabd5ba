//! CSV event-log backend.
//!
//! Creates one file in the configured output directory:
//! - `traffic_events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use fleet_core::TrafficEvent;

use crate::writer::EventWriter;
use crate::OutputResult;

/// Appends traffic events to a single CSV file.
pub struct CsvEventWriter {
    events:   Writer<File>,
    finished: bool,
}

impl CsvEventWriter {
    /// Open (or create) `traffic_events.csv` in `dir` and write the header
    /// row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("traffic_events.csv"))?;
        events.write_record(["time_secs", "event", "robot_id", "from_vertex", "to_vertex"])?;

        Ok(Self { events, finished: false })
    }
}

impl EventWriter for CsvEventWriter {
    fn write_events(&mut self, events: &[TrafficEvent]) -> OutputResult<()> {
        for event in events {
            self.events.write_record(&[
                event.at.0.to_string(),
                event.kind.as_str().to_string(),
                event.robot.0.to_string(),
                event.lane.from.0.to_string(),
                event.lane.to.0.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        Ok(())
    }
}

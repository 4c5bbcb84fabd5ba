//! SQLite event-log backend (feature `sqlite`).
//!
//! Creates a single `events.db` file in the configured output directory with
//! one `traffic_events` table.

use std::path::Path;

use fleet_core::TrafficEvent;
use rusqlite::Connection;

use crate::writer::EventWriter;
use crate::OutputResult;

/// Writes traffic events to an SQLite database.
pub struct SqliteEventWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteEventWriter {
    /// Open (or create) `events.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("events.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS traffic_events (
                 time_secs   REAL    NOT NULL,
                 event       TEXT    NOT NULL,
                 robot_id    INTEGER NOT NULL,
                 from_vertex INTEGER NOT NULL,
                 to_vertex   INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl EventWriter for SqliteEventWriter {
    fn write_events(&mut self, events: &[TrafficEvent]) -> OutputResult<()> {
        if events.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO traffic_events \
                 (time_secs, event, robot_id, from_vertex, to_vertex) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for event in events {
                stmt.execute(rusqlite::params![
                    event.at.0,
                    event.kind.as_str(),
                    event.robot.0,
                    event.lane.from.0,
                    event.lane.to.0,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

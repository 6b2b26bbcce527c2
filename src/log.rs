use crate::error::Error;
use crate::event::Event;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Compute xxh64 hash of raw bytes, hex-encoded.
pub fn line_hash(line: &[u8]) -> String {
    let hash = xxhash_rust::xxh64::xxh64(line, 0);
    format!("{:016x}", hash)
}

/// One match's event log in fold order.
///
/// Events are ordered by `timestamp`. Events sharing a timestamp keep the
/// order in which they were supplied, so the fold is reproducible no matter
/// how coarse the scoreboard clock is.
///
/// # Examples
///
/// ```
/// use scorefold::{Event, EventLog, Team};
///
/// let log = EventLog::from_events(vec![
///     Event::set_finalized("s1").with_timestamp(30),
///     Event::score("a", Team::Home).with_timestamp(10),
///     Event::score("b", Team::Away).with_timestamp(10),
/// ]);
/// let ids: Vec<_> = log.events().iter().map(|e| e.id.as_str()).collect();
/// assert_eq!(ids, ["a", "b", "s1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Order `events` into fold order.
    pub fn from_events(mut events: Vec<Event>) -> Self {
        // Stable: ties keep insertion order.
        events.sort_by_key(|e| e.timestamp);
        EventLog { events }
    }

    /// Decode a JSON-lines log (one event per line) and order it.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] with the 1-based line number for a line that
    /// is not a valid event, or [`Error::Io`] if reading fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let iter = LineIterator {
            lines: reader.lines(),
            line_no: 0,
        };
        let events = iter.collect::<Result<Vec<_>, _>>()?;
        Ok(EventLog::from_events(events))
    }

    /// Open and decode a JSON-lines log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        EventLog::from_reader(BufReader::new(file))
    }

    /// Events in fold order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hex xxh64 digest of the ordered log.
    ///
    /// Two snapshots holding the same events in the same order have the same
    /// fingerprint. A log that grew since the last report has a new one.
    pub fn fingerprint(&self) -> String {
        let mut buf = Vec::new();
        for event in &self.events {
            let written = serde_json::to_writer(&mut buf, event);
            debug_assert!(written.is_ok(), "event {} failed to serialize", event.id);
            buf.push(b'\n');
        }
        line_hash(&buf)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl From<Vec<Event>> for EventLog {
    fn from(events: Vec<Event>) -> Self {
        EventLog::from_events(events)
    }
}

struct LineIterator<I> {
    lines: I,
    line_no: usize,
}

impl<I: Iterator<Item = io::Result<String>>> Iterator for LineIterator<I> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(serde_json::from_str(&line).map_err(|source| Error::Decode {
                line: self.line_no,
                source,
            }));
        }
    }
}

//! Rebuild volleyball match results from an append-only log of scoring
//! events and check them against the scoring rules before they are reported.
//!
//! ```
//! use scorefold::{fold, validate, Event, EventLog, Team};
//!
//! let mut events = Vec::new();
//! let mut ts = 0;
//! for (set, (home, away)) in [(21, 17), (21, 19)].into_iter().enumerate() {
//!     for i in 0..home {
//!         ts += 1;
//!         events.push(Event::score(format!("h{set}-{i}"), Team::Home).with_timestamp(ts));
//!     }
//!     for i in 0..away {
//!         ts += 1;
//!         events.push(Event::score(format!("a{set}-{i}"), Team::Away).with_timestamp(ts));
//!     }
//!     ts += 1;
//!     events.push(Event::set_finalized(format!("s{set}")).with_timestamp(ts));
//! }
//!
//! let log = EventLog::from_events(events);
//! let result = fold(log.events());
//! assert!(validate(&result));
//! ```

mod error;
mod event;
mod fold;
mod log;
mod report;
mod result;
pub mod rules;
mod validate;

pub use error::{Error, ReportError};
pub use event::{Event, EventKind, Team};
pub use fold::{fold, reconstruct, FoldDiagnostics, Reconstruction};
pub use crate::log::{line_hash, EventLog};
pub use report::{
    EventSource, IdentityResolver, MatchRef, ReportGuard, ReportOutcome, ReportSink, ReportState,
    Reporter,
};
pub use result::{MatchResult, SetScore, Tally};
pub use rules::Ruleset;
pub use validate::{check, validate, validate_with, Violation};

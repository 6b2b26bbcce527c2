//! Reporting pipeline: fold, validate, and hand valid results upstream.

use crate::error::{Error, ReportError};
use crate::event::Event;
use crate::fold::{reconstruct, FoldDiagnostics};
use crate::log::EventLog;
use crate::result::MatchResult;
use crate::rules::Ruleset;
use crate::validate::{check, Violation};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Where a single report attempt stands.
///
/// `Pending -> Reconstructed -> Valid -> Reported` or
/// `Pending -> Reconstructed -> Invalid -> Rejected`. `Reported` and
/// `Rejected` are terminal; a new attempt starts a new machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportState {
    Pending,
    Reconstructed,
    Valid,
    Invalid,
    Reported,
    Rejected,
}

impl ReportState {
    /// Move to `next`, refusing transitions the pipeline never makes.
    ///
    /// ```
    /// use scorefold::ReportState;
    ///
    /// let state = ReportState::Pending.advance(ReportState::Reconstructed).unwrap();
    /// assert!(state.advance(ReportState::Reported).is_err());
    /// ```
    pub fn advance(self, next: ReportState) -> Result<ReportState, Error> {
        use ReportState::*;
        match (self, next) {
            (Pending, Reconstructed)
            | (Reconstructed, Valid)
            | (Reconstructed, Invalid)
            | (Valid, Reported)
            | (Invalid, Rejected) => Ok(next),
            (from, to) => Err(Error::Transition { from, to }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ReportState::Reported | ReportState::Rejected)
    }
}

/// Identifies a match both locally and upstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRef {
    /// Local match document id.
    pub match_id: String,
    /// Match id in the tournament API.
    pub match_external_id: String,
    /// Tournament id in the tournament API.
    pub tournament_external_id: String,
}

impl MatchRef {
    pub fn new(
        match_id: impl Into<String>,
        match_external_id: impl Into<String>,
        tournament_external_id: impl Into<String>,
    ) -> Self {
        MatchRef {
            match_id: match_id.into(),
            match_external_id: match_external_id.into(),
            tournament_external_id: tournament_external_id.into(),
        }
    }
}

/// Upstream tournament API that accepts validated results.
pub trait ReportSink {
    /// Submit `result`. Return [`ReportError::AlreadyReported`] if upstream
    /// already has a result for the match.
    fn report(&self, target: &MatchRef, result: &MatchResult) -> Result<(), ReportError>;
}

/// Supplies the complete event log of a match, in any order.
pub trait EventSource {
    fn events(&self, match_id: &str) -> Result<Vec<Event>, Error>;
}

/// Turns a caller credential into a stable user id.
pub trait IdentityResolver {
    fn resolve(&self, credential: &str) -> Result<String, Error>;
}

/// What one report attempt produced. The caller persists the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    /// `Reported` or `Rejected`.
    pub state: ReportState,
    pub result: MatchResult,
    /// Value for the tournament match's `MatchResultValid` flag.
    pub valid: bool,
    /// Value for the match's `Invalid` flag.
    pub invalid: bool,
    pub author_mismatches: usize,
    pub violation: Option<Violation>,
    pub diagnostics: FoldDiagnostics,
    /// Upstream already had this result, or this process already reported
    /// the same log snapshot.
    pub already_reported: bool,
    pub fingerprint: String,
}

/// Remembers which log snapshot was last reported for each match.
///
/// Each match has its own slot. The slot's lock is held across the sink
/// call, so concurrent attempts on the same match report at most once per
/// snapshot while different matches report in parallel. The outer map lock
/// is only held to look up or insert a slot.
///
/// Holds one entry per match seen; call [`forget`](Self::forget) once a
/// match is closed to release it.
#[derive(Debug, Default)]
pub struct ReportGuard {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<String>>>>>,
}

impl ReportGuard {
    pub fn new() -> Self {
        ReportGuard::default()
    }

    /// Returns true if `fingerprint` was already reported for `match_id`.
    pub fn is_reported(&self, match_id: &str, fingerprint: &str) -> bool {
        let slot = {
            let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            match slots.get(match_id) {
                Some(slot) => Arc::clone(slot),
                None => return false,
            }
        };
        let last = slot.lock().unwrap_or_else(|e| e.into_inner());
        last.as_deref() == Some(fingerprint)
    }

    /// Drop what is remembered about `match_id`. Returns true if there was
    /// an entry.
    pub fn forget(&self, match_id: &str) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(match_id).is_some()
    }

    /// Number of matches currently remembered.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, match_id: &str) -> Arc<Mutex<Option<String>>> {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(slots.entry(match_id.to_string()).or_default())
    }

    fn run<F>(&self, match_id: &str, fingerprint: &str, submit: F) -> Result<bool, ReportError>
    where
        F: FnOnce() -> Result<(), ReportError>,
    {
        let slot = self.slot(match_id);
        let mut last = slot.lock().unwrap_or_else(|e| e.into_inner());
        if last.as_deref() == Some(fingerprint) {
            return Ok(true);
        }
        let already = match submit() {
            Ok(()) => false,
            Err(ReportError::AlreadyReported) => true,
            Err(e) => return Err(e),
        };
        *last = Some(fingerprint.to_string());
        Ok(already)
    }
}

/// Drives report attempts against a sink.
///
/// # Examples
///
/// ```
/// use scorefold::{Event, EventLog, MatchRef, MatchResult, ReportError, ReportSink, ReportState, Reporter, Team};
///
/// struct Accept;
/// impl ReportSink for Accept {
///     fn report(&self, _: &MatchRef, _: &MatchResult) -> Result<(), ReportError> {
///         Ok(())
///     }
/// }
///
/// let mut events = Vec::new();
/// let mut ts = 0;
/// for set in 0..2 {
///     for i in 0..21 {
///         ts += 1;
///         events.push(Event::score(format!("{set}-{i}"), Team::Home).with_timestamp(ts));
///     }
///     ts += 1;
///     events.push(Event::set_finalized(format!("fin-{set}")).with_timestamp(ts));
/// }
///
/// let reporter = Reporter::new(Accept);
/// let outcome = reporter
///     .report(&MatchRef::new("m1", "901", "77"), &EventLog::from_events(events), "")
///     .unwrap();
/// assert_eq!(outcome.state, ReportState::Reported);
/// assert!(outcome.valid);
/// ```
#[derive(Debug)]
pub struct Reporter<S> {
    sink: S,
    rules: Ruleset,
    guard: ReportGuard,
}

impl<S: ReportSink> Reporter<S> {
    /// A reporter using the beach ruleset.
    pub fn new(sink: S) -> Self {
        Reporter {
            sink,
            rules: Ruleset::beach(),
            guard: ReportGuard::new(),
        }
    }

    pub fn with_rules(mut self, rules: Ruleset) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The duplicate-report guard, e.g. to [`forget`](ReportGuard::forget)
    /// a closed match.
    pub fn guard(&self) -> &ReportGuard {
        &self.guard
    }

    /// Fold `log`, validate the result and, if valid, report it.
    ///
    /// `caller` is the resolved id of the user asking for the report; it only
    /// feeds the author-mismatch count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Report`] when the sink fails with a transport error.
    /// Upstream "already registered" is not an error: the outcome has
    /// `already_reported` set.
    pub fn report(
        &self,
        target: &MatchRef,
        log: &EventLog,
        caller: &str,
    ) -> Result<ReportOutcome, Error> {
        let mut state = ReportState::Pending;

        let rec = reconstruct(log.events(), caller);
        state = state.advance(ReportState::Reconstructed)?;
        let fingerprint = log.fingerprint();

        let violation = check(&rec.result, &self.rules).err();
        let valid = violation.is_none();

        let mut already_reported = false;
        if let Some(v) = &violation {
            warn!("match {}: result {} rejected: {v}", target.match_id, rec.result);
            state = state
                .advance(ReportState::Invalid)?
                .advance(ReportState::Rejected)?;
        } else {
            state = state.advance(ReportState::Valid)?;
            already_reported = self.guard.run(&target.match_id, &fingerprint, || {
                self.sink.report(target, &rec.result)
            })?;
            if already_reported {
                info!("match {}: result already registered", target.match_id);
            } else {
                info!("match {}: reported {}", target.match_id, rec.result);
            }
            state = state.advance(ReportState::Reported)?;
        }

        debug!(
            "match {}: {} author mismatches, fingerprint {fingerprint}",
            target.match_id, rec.author_mismatches
        );

        Ok(ReportOutcome {
            state,
            result: rec.result,
            valid,
            invalid: !valid,
            author_mismatches: rec.author_mismatches,
            violation,
            diagnostics: rec.diagnostics,
            already_reported,
            fingerprint,
        })
    }

    /// Fetch the log from `source`, resolve `credential`, then [`report`](Self::report).
    pub fn report_from_source<E, I>(
        &self,
        source: &E,
        identity: &I,
        target: &MatchRef,
        credential: &str,
    ) -> Result<ReportOutcome, Error>
    where
        E: EventSource + ?Sized,
        I: IdentityResolver + ?Sized,
    {
        let caller = identity.resolve(credential)?;
        let log = EventLog::from_events(source.events(&target.match_id)?);
        self.report(target, &log, &caller)
    }
}

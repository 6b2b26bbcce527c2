//! Event Folder: rebuilds a match result from its event log.

use crate::event::{Event, EventKind, Team};
use crate::result::{MatchResult, SetScore, Tally};
use log::{debug, warn};
use std::collections::HashSet;

/// Fold an ordered event log into a [`MatchResult`].
///
/// Undone events and undo events contribute nothing. A set only counts once
/// a `SET_FINALIZED` or `MATCH_FINALIZED` event closes it; points after the
/// last finalize are dropped. The set's winner is home if home leads,
/// otherwise away, so a 0-0 finalize credits away and is left for the
/// validator to reject.
///
/// Never fails. Malformed events (dangling undo references, points without a
/// team) are skipped.
///
/// # Examples
///
/// ```
/// use scorefold::{fold, Event, SetScore, Tally, Team};
///
/// let events = vec![
///     Event::score("1", Team::Home).with_timestamp(1),
///     Event::score("2", Team::Home).with_timestamp(2),
///     Event::undo("3", "2").with_timestamp(3),
///     Event::score("4", Team::Away).with_timestamp(4),
///     Event::set_finalized("5").with_timestamp(5),
/// ];
/// let result = fold(&events);
/// assert_eq!(result.sets, vec![SetScore::new(1, 1)]);
/// assert_eq!(result.result, Tally::new(0, 1));
/// ```
pub fn fold(events: &[Event]) -> MatchResult {
    Folder::run(events).result
}

/// Counters describing what the fold skipped.
///
/// Informational only; none of these change the folded result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldDiagnostics {
    /// Undo references that match no event in the log.
    pub dangling_undos: Vec<String>,
    /// Events skipped because a later undo retracted them.
    pub retracted: usize,
    /// `SCORE` events with no team.
    pub teamless_points: usize,
    /// Points left in the in-progress set after the last finalize.
    pub unfinalized_points: u32,
}

impl FoldDiagnostics {
    /// Returns true when the fold skipped nothing unexpected.
    ///
    /// Retractions are normal scorekeeping and do not count.
    pub fn is_clean(&self) -> bool {
        self.dangling_undos.is_empty() && self.teamless_points == 0 && self.unfinalized_points == 0
    }
}

/// A folded result together with the fold's side outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconstruction {
    pub result: MatchResult,
    /// Events whose author differs from the reporting caller.
    pub author_mismatches: usize,
    pub diagnostics: FoldDiagnostics,
}

/// Fold `events` and count events not recorded by `caller`.
///
/// The mismatch count covers every event in the log, undone or not. It is
/// advisory telemetry for the caller to persist.
pub fn reconstruct(events: &[Event], caller: &str) -> Reconstruction {
    let mut folded = Folder::run(events);
    folded.author_mismatches = events.iter().filter(|e| e.author != caller).count();
    if folded.author_mismatches > 0 {
        debug!(
            "{} of {} events recorded by someone other than {caller}",
            folded.author_mismatches,
            events.len()
        );
    }
    folded
}

struct Folder {
    current: SetScore,
    sets: Vec<SetScore>,
    tally: Tally,
}

impl Folder {
    fn run(events: &[Event]) -> Reconstruction {
        let mut diagnostics = FoldDiagnostics::default();

        let retracted: HashSet<&str> = events
            .iter()
            .filter(|e| e.kind == EventKind::Undo)
            .filter_map(|e| e.reference.as_deref())
            .collect();

        let known: HashSet<&str> = events.iter().map(|e| e.id.as_str()).collect();
        for reference in &retracted {
            if !known.contains(reference) {
                warn!("undo references unknown event {reference}");
                diagnostics.dangling_undos.push(reference.to_string());
            }
        }
        diagnostics.dangling_undos.sort();

        let mut folder = Folder {
            current: SetScore::default(),
            sets: Vec::new(),
            tally: Tally::default(),
        };

        for event in events {
            if retracted.contains(event.id.as_str()) {
                diagnostics.retracted += 1;
                continue;
            }
            match event.kind {
                EventKind::Score => match event.team {
                    Some(team) => folder.current.add_point(team),
                    None => {
                        debug!("score event {} has no team", event.id);
                        diagnostics.teamless_points += 1;
                    }
                },
                EventKind::SetFinalized => {
                    folder.close_set();
                    folder.current = SetScore::default();
                }
                EventKind::MatchFinalized => folder.close_set(),
                EventKind::Undo | EventKind::Other(_) => {}
            }
        }

        // MATCH_FINALIZED leaves its set in the accumulator; only points
        // scored after the last finalize are unfinalized.
        diagnostics.unfinalized_points = match events
            .iter()
            .rev()
            .find(|e| !retracted.contains(e.id.as_str()) && e.kind.is_finalize())
        {
            Some(last) if last.kind == EventKind::MatchFinalized => {
                points_after(events, last, &retracted)
            }
            _ => folder.current.total(),
        };
        if diagnostics.unfinalized_points > 0 {
            warn!(
                "{} points after the last finalize were dropped",
                diagnostics.unfinalized_points
            );
        }

        debug!(
            "folded {} events into {} sets, tally {}-{}",
            events.len(),
            folder.sets.len(),
            folder.tally.home,
            folder.tally.away
        );

        Reconstruction {
            result: MatchResult::new(folder.sets, folder.tally),
            author_mismatches: 0,
            diagnostics,
        }
    }

    fn close_set(&mut self) {
        let winner = if self.current.home > self.current.away {
            Team::Home
        } else {
            Team::Away
        };
        self.tally.credit(winner);
        self.sets.push(self.current);
    }
}

fn points_after(events: &[Event], last: &Event, retracted: &HashSet<&str>) -> u32 {
    let Some(pos) = events.iter().position(|e| std::ptr::eq(e, last)) else {
        return 0;
    };
    events[pos + 1..]
        .iter()
        .filter(|e| !retracted.contains(e.id.as_str()))
        .filter(|e| e.kind == EventKind::Score && e.team.is_some())
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(event: Event, ts: i64) -> Event {
        event.with_timestamp(ts)
    }

    #[test]
    fn zero_zero_finalize_credits_away() {
        let result = fold(&[at(Event::set_finalized("s"), 1)]);
        assert_eq!(result.sets, vec![SetScore::new(0, 0)]);
        assert_eq!(result.result, Tally::new(0, 1));
    }

    #[test]
    fn match_finalized_keeps_accumulator() {
        let events = vec![
            at(Event::score("1", Team::Home), 1),
            at(Event::match_finalized("m1"), 2),
            at(Event::match_finalized("m2"), 3),
        ];
        let result = fold(&events);
        assert_eq!(result.sets, vec![SetScore::new(1, 0), SetScore::new(1, 0)]);
        assert_eq!(result.result, Tally::new(2, 0));
    }

    #[test]
    fn points_after_match_finalized_are_unfinalized() {
        let events = vec![
            at(Event::score("1", Team::Home), 1),
            at(Event::match_finalized("m"), 2),
            at(Event::score("2", Team::Away), 3),
        ];
        let rec = reconstruct(&events, "");
        assert_eq!(rec.diagnostics.unfinalized_points, 1);
        assert_eq!(rec.result.sets, vec![SetScore::new(1, 0)]);
    }

    #[test]
    fn teamless_point_is_skipped() {
        let mut teamless = Event::new("1", EventKind::Score);
        teamless.timestamp = 1;
        let events = vec![teamless, at(Event::set_finalized("s"), 2)];
        let rec = reconstruct(&events, "");
        assert_eq!(rec.diagnostics.teamless_points, 1);
        assert_eq!(rec.result.sets, vec![SetScore::new(0, 0)]);
    }
}

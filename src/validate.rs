//! Result Validator: decides whether a reconstructed result is a legal,
//! complete match.

use crate::result::{MatchResult, Tally};
use crate::rules::Ruleset;
use thiserror::Error;

/// The first rule a match result broke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Too few sets to decide the match, or more than can be played.
    #[error("{found} sets finalized, expected {min} to {max}")]
    SetCount { found: usize, min: usize, max: usize },

    /// A set ended below its target score or without the required lead.
    #[error("set {} ended {home}-{away}, which is not a finished score", .index + 1)]
    SetScore { index: usize, home: u32, away: u32 },

    /// A set was played after the match was already decided.
    #[error("set {} was played after the match was decided", .index + 1)]
    DeadRubber { index: usize },

    /// Neither side won enough sets.
    #[error("no side won the match ({home}-{away} in sets)")]
    Undecided { home: u32, away: u32 },

    /// The declared tally disagrees with the set scores.
    #[error("declared tally {declared_home}-{declared_away} but sets say {home}-{away}")]
    TallyMismatch {
        declared_home: u32,
        declared_away: u32,
        home: u32,
        away: u32,
    },
}

/// Check `result` against the beach ruleset.
///
/// ```
/// use scorefold::{validate, MatchResult, SetScore, Tally};
///
/// let ok = MatchResult::new(
///     vec![SetScore::new(21, 19), SetScore::new(29, 31), SetScore::new(31, 29)],
///     Tally::new(2, 1),
/// );
/// assert!(validate(&ok));
///
/// let short = MatchResult::new(
///     vec![SetScore::new(21, 20), SetScore::new(21, 15)],
///     Tally::new(2, 0),
/// );
/// assert!(!validate(&short));
/// ```
pub fn validate(result: &MatchResult) -> bool {
    check(result, &Ruleset::beach()).is_ok()
}

/// Check `result` against an arbitrary ruleset.
pub fn validate_with(result: &MatchResult, rules: &Ruleset) -> bool {
    check(result, rules).is_ok()
}

/// Check `result` and name the first broken rule.
///
/// Rules are applied in order: set count, each set's score, no sets after
/// the match was decided, a winner exists, the declared tally matches.
pub fn check(result: &MatchResult, rules: &Ruleset) -> Result<(), Violation> {
    let found = result.sets.len();
    let min = rules.sets_to_win as usize;
    let max = rules.max_sets();
    if found < min || found > max {
        return Err(Violation::SetCount { found, min, max });
    }

    for (index, set) in result.sets.iter().enumerate() {
        if set.high() < rules.target(index) || set.margin() < rules.min_margin {
            return Err(Violation::SetScore {
                index,
                home: set.home,
                away: set.away,
            });
        }
    }

    // The set after the one that decided the match should never exist.
    if let Some(index) =
        (1..found).find(|&played| Tally::count(&result.sets[..played]).reached(rules.sets_to_win))
    {
        return Err(Violation::DeadRubber { index });
    }

    let wins = result.counted_tally();
    if wins.home != rules.sets_to_win && wins.away != rules.sets_to_win {
        return Err(Violation::Undecided {
            home: wins.home,
            away: wins.away,
        });
    }

    if wins != result.result {
        return Err(Violation::TallyMismatch {
            declared_home: result.result.home,
            declared_away: result.result.away,
            home: wins.home,
            away: wins.away,
        });
    }

    Ok(())
}

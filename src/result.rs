use crate::event::Team;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points scored by each side in one set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetScore {
    pub home: u32,
    pub away: u32,
}

impl SetScore {
    pub fn new(home: u32, away: u32) -> Self {
        SetScore { home, away }
    }

    /// The side that leads, or `None` on a tie.
    pub fn leader(&self) -> Option<Team> {
        if self.home > self.away {
            Some(Team::Home)
        } else if self.away > self.home {
            Some(Team::Away)
        } else {
            None
        }
    }

    /// Winning side's points.
    pub fn high(&self) -> u32 {
        self.home.max(self.away)
    }

    pub fn margin(&self) -> u32 {
        self.home.abs_diff(self.away)
    }

    pub fn total(&self) -> u32 {
        self.home + self.away
    }

    pub(crate) fn add_point(&mut self, team: Team) {
        match team {
            Team::Home => self.home += 1,
            Team::Away => self.away += 1,
        }
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Sets won by each side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub home: u32,
    pub away: u32,
}

impl Tally {
    pub fn new(home: u32, away: u32) -> Self {
        Tally { home, away }
    }

    /// Set wins counted from `sets`. Tied sets count for nobody.
    pub fn count(sets: &[SetScore]) -> Tally {
        let mut tally = Tally::default();
        for set in sets {
            if let Some(team) = set.leader() {
                tally.credit(team);
            }
        }
        tally
    }

    /// Returns true once either side has `sets` wins.
    pub fn reached(&self, sets: u32) -> bool {
        self.home >= sets || self.away >= sets
    }

    pub(crate) fn credit(&mut self, team: Team) {
        match team {
            Team::Home => self.home += 1,
            Team::Away => self.away += 1,
        }
    }
}

/// A reconstructed match: finalized sets in play order plus the declared
/// sets-won tally.
///
/// Serializes to the body the upstream tournament API expects:
///
/// ```
/// use scorefold::{MatchResult, SetScore, Tally};
///
/// let result = MatchResult::new(
///     vec![SetScore::new(21, 19), SetScore::new(23, 21)],
///     Tally::new(2, 0),
/// );
/// let json = serde_json::to_string(&result).unwrap();
/// assert_eq!(
///     json,
///     r#"{"sets":[{"home":21,"away":19},{"home":23,"away":21}],"result":{"home":2,"away":0}}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchResult {
    pub sets: Vec<SetScore>,
    /// Declared tally. The validator checks it against `sets`.
    pub result: Tally,
}

impl MatchResult {
    pub fn new(sets: Vec<SetScore>, result: Tally) -> Self {
        MatchResult { sets, result }
    }

    /// Tally of set wins recomputed from the set scores. Tied sets count
    /// for nobody.
    pub fn counted_tally(&self) -> Tally {
        Tally::count(&self.sets)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (", self.result.home, self.result.away)?;
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{set}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_and_margin() {
        let set = SetScore::new(19, 21);
        assert_eq!(set.leader(), Some(Team::Away));
        assert_eq!(set.high(), 21);
        assert_eq!(set.margin(), 2);
        assert_eq!(SetScore::new(0, 0).leader(), None);
    }

    #[test]
    fn counted_tally_skips_ties() {
        let result = MatchResult::new(
            vec![SetScore::new(21, 19), SetScore::new(0, 0), SetScore::new(18, 21)],
            Tally::new(0, 0),
        );
        assert_eq!(result.counted_tally(), Tally::new(1, 1));
        assert!(Tally::count(&result.sets[..1]).reached(1));
        assert!(!result.counted_tally().reached(2));
    }

    #[test]
    fn display_lists_sets() {
        let result = MatchResult::new(
            vec![SetScore::new(21, 19), SetScore::new(29, 31), SetScore::new(31, 29)],
            Tally::new(2, 1),
        );
        assert_eq!(result.to_string(), "2-1 (21-19, 29-31, 31-29)");
    }
}

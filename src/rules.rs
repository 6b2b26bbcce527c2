//! Scoring rules used by the validator.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Parameters of a volleyball scoring ruleset.
///
/// The default is the beach ruleset: best of three, sets to 21, a deciding
/// set to 15, won by two.
///
/// Loads from JSON with camelCase keys; missing keys take the beach values.
///
/// ```
/// use scorefold::Ruleset;
///
/// let rules = Ruleset::from_json(r#"{"setsToWin": 3, "setPoints": 25}"#).unwrap();
/// assert_eq!(rules, Ruleset::indoor());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ruleset {
    /// Sets a side needs to win the match.
    pub sets_to_win: u32,
    /// Minimum winning score of a regular set.
    pub set_points: u32,
    /// Minimum winning score of the deciding set.
    pub deciding_set_points: u32,
    /// Lead the winner needs at the end of any set.
    pub min_margin: u32,
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset::beach()
    }
}

impl Ruleset {
    /// Largest `sets_to_win` a config may ask for.
    pub const MAX_SETS_TO_WIN: u32 = 16;

    pub const fn beach() -> Self {
        Ruleset {
            sets_to_win: 2,
            set_points: 21,
            deciding_set_points: 15,
            min_margin: 2,
        }
    }

    pub const fn indoor() -> Self {
        Ruleset {
            sets_to_win: 3,
            set_points: 25,
            deciding_set_points: 15,
            min_margin: 2,
        }
    }

    /// Decode and check a ruleset.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the JSON is malformed or the values make no sense.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let rules: Ruleset =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        rules.validate_config()?;
        Ok(rules)
    }

    /// Reject rulesets no match could satisfy.
    pub fn validate_config(&self) -> Result<(), Error> {
        if self.sets_to_win == 0 {
            return Err(Error::Config("setsToWin must be at least 1".into()));
        }
        if self.sets_to_win > Self::MAX_SETS_TO_WIN {
            return Err(Error::Config(format!(
                "setsToWin must be at most {}",
                Self::MAX_SETS_TO_WIN
            )));
        }
        if self.set_points == 0 || self.deciding_set_points == 0 {
            return Err(Error::Config("set points must be at least 1".into()));
        }
        if self.min_margin == 0 {
            return Err(Error::Config("minMargin must be at least 1".into()));
        }
        Ok(())
    }

    pub fn with_sets_to_win(mut self, sets: u32) -> Self {
        self.sets_to_win = sets;
        self
    }

    pub fn with_set_points(mut self, points: u32) -> Self {
        self.set_points = points;
        self
    }

    pub fn with_deciding_set_points(mut self, points: u32) -> Self {
        self.deciding_set_points = points;
        self
    }

    pub fn with_min_margin(mut self, margin: u32) -> Self {
        self.min_margin = margin;
        self
    }

    /// Most sets a complete match can have.
    pub fn max_sets(&self) -> usize {
        self.sets_to_win.saturating_mul(2).saturating_sub(1) as usize
    }

    /// Returns true if the set at `index` (0-based) is the deciding set.
    pub fn is_deciding(&self, index: usize) -> bool {
        index + 1 == self.max_sets()
    }

    /// Points the winner of set `index` must reach.
    pub fn target(&self, index: usize) -> u32 {
        if self.is_deciding(index) {
            self.deciding_set_points
        } else {
            self.set_points
        }
    }
}

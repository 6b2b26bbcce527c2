use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Which side of the net a scoring event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Home,
    Away,
}

impl Team {
    /// Parse the wire name (`"HOME"` / `"AWAY"`). Anything else is `None`.
    pub fn from_wire(s: &str) -> Option<Team> {
        match s {
            "HOME" => Some(Team::Home),
            "AWAY" => Some(Team::Away),
            _ => None,
        }
    }
}

/// The kind of a recorded event.
///
/// The scoreboard app writes more event types than the result engine cares
/// about (timeouts, substitutions, player stats). Those are preserved as
/// [`EventKind::Other`] and never contribute score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Score,
    SetFinalized,
    MatchFinalized,
    Undo,
    Other(String),
}

impl EventKind {
    /// The wire name, e.g. `"SET_FINALIZED"`.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Score => "SCORE",
            EventKind::SetFinalized => "SET_FINALIZED",
            EventKind::MatchFinalized => "MATCH_FINALIZED",
            EventKind::Undo => "UNDO",
            EventKind::Other(s) => s,
        }
    }

    /// Returns true for events that close the in-progress set.
    pub fn is_finalize(&self) -> bool {
        matches!(self, EventKind::SetFinalized | EventKind::MatchFinalized)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SCORE" => EventKind::Score,
            "SET_FINALIZED" => EventKind::SetFinalized,
            "MATCH_FINALIZED" => EventKind::MatchFinalized,
            "UNDO" => EventKind::Undo,
            _ => EventKind::Other(s),
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        EventKind::from(s.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable record in a match's event log.
///
/// Scorekeepers never edit or delete events. A correction is a new
/// [`EventKind::Undo`] event whose `reference` names the retracted event.
///
/// Events are serialized with the keys the scoreboard app uses
/// (`eventType`, `timestamp`, `playerId`, ...). Empty `team` and `reference`
/// strings read back as `None`. Serialization cannot fail: every field is a
/// string, an integer or an enum written as a string, which is what
/// [`EventLog::fingerprint`](crate::EventLog::fingerprint) relies on.
///
/// # Examples
///
/// ```
/// use scorefold::{Event, EventKind, Team};
///
/// let point = Event::score("e1", Team::Home)
///     .with_timestamp(1_700_000_000_000)
///     .with_author("uid-42");
/// assert_eq!(point.kind, EventKind::Score);
/// assert_eq!(point.team, Some(Team::Home));
///
/// let fix = Event::undo("e2", "e1").with_timestamp(1_700_000_000_500);
/// assert_eq!(fix.reference.as_deref(), Some("e1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Event {
    /// Unique within the match's log. Undo events point at it.
    pub id: String,

    /// Serialized as `"eventType"`.
    #[serde(rename = "eventType")]
    pub kind: EventKind,

    /// Only meaningful for [`EventKind::Score`].
    #[serde(
        default,
        deserialize_with = "team_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub team: Option<Team>,

    /// For [`EventKind::Undo`], the id of the retracted event.
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<String>,

    /// User id of the scorekeeper who recorded the event.
    #[serde(default)]
    pub author: String,

    /// Milliseconds since the Unix epoch. Primary ordering key.
    pub timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<i64>,
}

impl Event {
    /// Create an event of the given kind, stamped with the current time.
    ///
    /// A clock set before the Unix epoch yields timestamp 0.
    pub fn new(id: impl Into<String>, kind: impl Into<EventKind>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Event {
            id: id.into(),
            kind: kind.into(),
            team: None,
            reference: None,
            author: String::new(),
            timestamp,
            player_id: None,
        }
    }

    /// A point for `team`.
    pub fn score(id: impl Into<String>, team: Team) -> Self {
        let mut event = Event::new(id, EventKind::Score);
        event.team = Some(team);
        event
    }

    pub fn set_finalized(id: impl Into<String>) -> Self {
        Event::new(id, EventKind::SetFinalized)
    }

    pub fn match_finalized(id: impl Into<String>) -> Self {
        Event::new(id, EventKind::MatchFinalized)
    }

    /// Retract the event with id `reference`.
    pub fn undo(id: impl Into<String>, reference: impl Into<String>) -> Self {
        let mut event = Event::new(id, EventKind::Undo);
        event.reference = Some(reference.into());
        event
    }

    /// Override the timestamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use scorefold::Event;
    ///
    /// let event = Event::set_finalized("s1").with_timestamp(42);
    /// assert_eq!(event.timestamp, 42);
    /// ```
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.team = Some(team);
        self
    }

    pub fn with_player(mut self, player_id: i64) -> Self {
        self.player_id = Some(player_id);
        self
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn team_or_none<'de, D>(deserializer: D) -> Result<Option<Team>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(Team::from_wire))
}

#![allow(dead_code)]

use scorefold::{Event, MatchResult, SetScore, Tally, Team};

pub const SCORER: &str = "scorer-1";

/// Builds an event log the way a scoreboard records it: one event per
/// action, ids `e0, e1, ...`, timestamps 10ms apart.
#[derive(Default)]
pub struct Script {
    events: Vec<Event>,
    next: i64,
}

impl Script {
    pub fn new() -> Self {
        Script::default()
    }

    fn push(&mut self, event: Event) -> String {
        let event = event.with_timestamp(self.next * 10).with_author(SCORER);
        let id = event.id.clone();
        self.events.push(event);
        self.next += 1;
        id
    }

    fn next_id(&self) -> String {
        format!("e{}", self.next)
    }

    pub fn point(&mut self, team: Team) -> String {
        let id = self.next_id();
        self.push(Event::score(id, team))
    }

    pub fn points(mut self, team: Team, n: u32) -> Self {
        for _ in 0..n {
            self.point(team);
        }
        self
    }

    /// Play a set out: all home points, then all away points, then finalize.
    pub fn set(self, home: u32, away: u32) -> Self {
        self.points(Team::Home, home).points(Team::Away, away).set_finalized()
    }

    pub fn set_finalized(mut self) -> Self {
        let id = self.next_id();
        self.push(Event::set_finalized(id));
        self
    }

    pub fn match_finalized(mut self) -> Self {
        let id = self.next_id();
        self.push(Event::match_finalized(id));
        self
    }

    pub fn undo(mut self, reference: &str) -> Self {
        let id = self.next_id();
        self.push(Event::undo(id, reference));
        self
    }

    /// Retract the most recent event.
    pub fn undo_last(self) -> Self {
        let reference = self.events.last().map(|e| e.id.clone()).unwrap_or_default();
        self.undo(&reference)
    }

    pub fn by(mut self, author: &str) -> Self {
        if let Some(last) = self.events.pop() {
            self.events.push(last.with_author(author));
        }
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn build(self) -> Vec<Event> {
        self.events
    }
}

pub fn result(sets: &[(u32, u32)], home: u32, away: u32) -> MatchResult {
    MatchResult::new(
        sets.iter().map(|&(h, a)| SetScore::new(h, a)).collect(),
        Tally::new(home, away),
    )
}

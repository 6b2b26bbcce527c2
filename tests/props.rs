mod common;

use common::result;
use proptest::prelude::*;
use scorefold::{fold, validate, Event, EventKind, SetScore, Tally, Team};

#[derive(Debug, Clone)]
enum Action {
    Point(Team),
    SetFinalized,
    MatchFinalized,
    Other,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        8 => Just(Action::Point(Team::Home)),
        8 => Just(Action::Point(Team::Away)),
        1 => Just(Action::SetFinalized),
        1 => Just(Action::MatchFinalized),
        1 => Just(Action::Other),
    ]
}

fn to_events(actions: &[Action]) -> Vec<Event> {
    actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let id = format!("e{i}");
            let event = match action {
                Action::Point(team) => Event::score(id, *team),
                Action::SetFinalized => Event::set_finalized(id),
                Action::MatchFinalized => Event::match_finalized(id),
                Action::Other => Event::new(id, "TIMEOUT"),
            };
            event.with_timestamp(i as i64)
        })
        .collect()
}

/// Straightforward running tally, resetting at every finalize.
fn running_tally(events: &[Event]) -> (Vec<SetScore>, Tally) {
    let mut sets = Vec::new();
    let mut tally = Tally::default();
    let mut current = SetScore::default();
    for event in events {
        match event.kind {
            EventKind::Score => match event.team {
                Some(Team::Home) => current.home += 1,
                Some(Team::Away) => current.away += 1,
                None => {}
            },
            EventKind::SetFinalized | EventKind::MatchFinalized => {
                if current.home > current.away {
                    tally.home += 1;
                } else {
                    tally.away += 1;
                }
                sets.push(current);
                if event.kind == EventKind::SetFinalized {
                    current = SetScore::default();
                }
            }
            _ => {}
        }
    }
    (sets, tally)
}

fn undo(id: &str, reference: &str, ts: i64) -> Event {
    Event::undo(id, reference).with_timestamp(ts)
}

// Without undos, folding equals a plain running tally.
proptest! {
    #[test]
    fn prop_fold_matches_running_tally(actions in proptest::collection::vec(arb_action(), 0..120)) {
        let events = to_events(&actions);
        let result = fold(&events);
        let (sets, tally) = running_tally(&events);
        prop_assert_eq!(result.sets, sets);
        prop_assert_eq!(result.result, tally);
    }
}

// Undoing an event is the same as never having recorded it.
proptest! {
    #[test]
    fn prop_undo_equals_removal(
        actions in proptest::collection::vec(arb_action(), 1..120),
        pick in any::<prop::sample::Index>(),
    ) {
        let events = to_events(&actions);
        let target = pick.index(events.len());
        let target_id = events[target].id.clone();

        let mut with_undo = events.clone();
        with_undo.push(undo("u", &target_id, events.len() as i64));

        let mut removed = events.clone();
        removed.remove(target);

        prop_assert_eq!(fold(&with_undo), fold(&removed));
    }
}

// Points after the last finalize never change the set count or the tally.
proptest! {
    #[test]
    fn prop_trailing_points_dropped(
        actions in proptest::collection::vec(arb_action(), 0..80),
        trailing in proptest::collection::vec(prop_oneof![Just(Team::Home), Just(Team::Away)], 1..30),
    ) {
        let mut all = actions.clone();
        all.push(Action::SetFinalized);
        let base = to_events(&all);
        let mut extended = base.clone();
        for (i, team) in trailing.iter().enumerate() {
            let ts = (base.len() + i) as i64;
            extended.push(Event::score(format!("t{i}"), *team).with_timestamp(ts));
        }
        prop_assert_eq!(fold(&base), fold(&extended));
    }
}

// Folding and validating twice gives identical answers.
proptest! {
    #[test]
    fn prop_deterministic(actions in proptest::collection::vec(arb_action(), 0..120)) {
        let events = to_events(&actions);
        let a = fold(&events);
        let b = fold(&events);
        prop_assert_eq!(validate(&a), validate(&b));
        prop_assert_eq!(a, b);
    }
}

fn arb_regular_win() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        (0u32..=19).prop_map(|loser| (21, loser)),
        (20u32..40).prop_map(|loser| (loser + 2, loser)),
    ]
}

fn arb_deciding_win() -> impl Strategy<Value = (u32, u32)> {
    prop_oneof![
        (0u32..=13).prop_map(|loser| (15, loser)),
        (14u32..30).prop_map(|loser| (loser + 2, loser)),
    ]
}

fn flip((w, l): (u32, u32)) -> (u32, u32) {
    (l, w)
}

// Every legal beach match is accepted, from either side's perspective.
proptest! {
    #[test]
    fn prop_legal_matches_accepted(
        first in arb_regular_win(),
        second in arb_regular_win(),
        third in arb_deciding_win(),
        split in any::<bool>(),
    ) {
        let r = if split {
            result(&[first, flip(second), third], 2, 1)
        } else {
            result(&[first, second], 2, 0)
        };
        prop_assert!(validate(&r));

        let mirrored: Vec<(u32, u32)> = r.sets.iter().map(|s| (s.away, s.home)).collect();
        let m = result(&mirrored, r.result.away, r.result.home);
        prop_assert!(validate(&m));
    }
}

// A wrong declared tally is always rejected.
proptest! {
    #[test]
    fn prop_wrong_tally_rejected(
        first in arb_regular_win(),
        second in arb_regular_win(),
        home in 0u32..4,
        away in 0u32..4,
    ) {
        prop_assume!((home, away) != (2, 0));
        prop_assert!(!validate(&result(&[first, second], home, away)));
    }
}

//! Fold a recorded match, validate it and report it to a sink that prints
//! the upstream request body.

use scorefold::{
    Event, EventLog, MatchRef, MatchResult, ReportError, ReportSink, Reporter, Team, check, fold,
    reconstruct, Ruleset,
};

struct PrintSink;

impl ReportSink for PrintSink {
    fn report(&self, target: &MatchRef, result: &MatchResult) -> Result<(), ReportError> {
        let body = serde_json::to_string(result).map_err(|e| ReportError::Transport(e.to_string()))?;
        println!(
            "PUT /tournaments/{}/matches/{} {body}",
            target.tournament_external_id, target.match_external_id
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut events = Vec::new();
    let mut ts = 0;
    let mut next = |events: &mut Vec<Event>, event: Event| {
        ts += 1000;
        events.push(event.with_timestamp(ts).with_author("scorer-1"));
    };

    for (set, (home, away)) in [(21, 18), (17, 21), (15, 12)].into_iter().enumerate() {
        for i in 0..home {
            next(&mut events, Event::score(format!("s{set}h{i}"), Team::Home));
        }
        for i in 0..away {
            next(&mut events, Event::score(format!("s{set}a{i}"), Team::Away));
        }
        if set == 2 {
            // A mistaken point, corrected right away.
            next(&mut events, Event::score("oops", Team::Away));
            next(&mut events, Event::undo("fix", "oops"));
            next(&mut events, Event::match_finalized(format!("s{set}f")));
        } else {
            next(&mut events, Event::set_finalized(format!("s{set}f")));
        }
    }

    let log = EventLog::from_events(events);
    println!("{} events, fingerprint {}", log.len(), log.fingerprint());

    let result = fold(log.events());
    println!("reconstructed: {result}");
    match check(&result, &Ruleset::beach()) {
        Ok(()) => println!("valid"),
        Err(v) => println!("invalid: {v}"),
    }

    let rec = reconstruct(log.events(), "scorer-2");
    println!("author mismatches for scorer-2: {}", rec.author_mismatches);

    let reporter = Reporter::new(PrintSink);
    let target = MatchRef::new("match-17", "88123", "4410");
    let outcome = reporter.report(&target, &log, "scorer-1")?;
    println!("state: {:?}, already reported: {}", outcome.state, outcome.already_reported);

    let again = reporter.report(&target, &log, "scorer-1")?;
    println!("second attempt, already reported: {}", again.already_reported);
    Ok(())
}

// Integration tests for the missed-day command

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{jan, Harness};
use crossbot_core::model::{ActivityKind, CompletionRecord};
use crossbot_core::ops::CompletionLog;

fn complete(harness: &Harness, user: &str, kind: ActivityKind, days: &[u32]) {
    for day in days {
        harness
            .store
            .record_completion(&CompletionRecord::new(user, kind, jan(*day)))
            .unwrap();
    }
}

#[test]
fn test_completed_run_is_skipped() {
    // GIVEN completions on Jan 2 and Jan 3, and today is Jan 3
    let harness = Harness::new(jan(3));
    complete(&harness, "U1", ActivityKind::Mini, &[2, 3]);

    // WHEN the caller asks for their last miss
    let reply = harness.send("U1", "missed").only_reply();

    // THEN Jan 1 is linked
    assert_eq!(
        reply,
        "https://www.nytimes.com/crosswords/game/mini/2018/01/01"
    );
}

#[test]
fn test_n_links_one_per_line_newest_first() {
    let harness = Harness::new(jan(10));
    complete(&harness, "U1", ActivityKind::Mini, &[10, 8, 7]);

    let reply = harness.send("U1", "missed 3").only_reply();

    assert_eq!(
        reply,
        "https://www.nytimes.com/crosswords/game/mini/2018/01/09\n\
         https://www.nytimes.com/crosswords/game/mini/2018/01/06\n\
         https://www.nytimes.com/crosswords/game/mini/2018/01/05"
    );
}

#[test]
fn test_only_callers_completions_count() {
    let harness = Harness::new(jan(3));
    complete(&harness, "U2", ActivityKind::Mini, &[3]);

    let reply = harness.send("U1", "missed").only_reply();

    assert_eq!(
        reply,
        "https://www.nytimes.com/crosswords/game/mini/2018/01/03"
    );
}

#[test]
fn test_regular_kind_uses_its_own_completions() {
    let harness = Harness::new(jan(3));
    complete(&harness, "U1", ActivityKind::Mini, &[2]);
    complete(&harness, "U1", ActivityKind::Regular, &[3]);

    let reply = harness.send("U1", "missed --kind regular").only_reply();

    assert_eq!(
        reply,
        "https://www.nytimes.com/crosswords/game/daily/2018/01/02"
    );
}

#[test]
fn test_zero_and_unknown_kind_are_parse_errors() {
    let harness = Harness::new(jan(3));

    harness.send("U1", "missed 0").only_direct();
    harness.send("U1", "missed --kind samurai").only_direct();
}

//! # Trace Tests
//!
//! Verifies trace parsing (formats, comments, error positions) and replay
//! outcomes against a two-cache system.

use cohesim_core::cache::CoherenceState;
use cohesim_core::common::CacheId;
use cohesim_core::sim::{TraceOp, parse_trace, replay};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{C1, C2, two_caches};

// ══════════════════════════════════════════════════════════
// 1. Parsing
// ══════════════════════════════════════════════════════════

#[test]
fn parses_reads_and_writes() {
    let ops = parse_trace("R 1 0x0 4\nw 2 0X10 2 65535\n").unwrap();
    assert_eq!(
        ops,
        vec![
            TraceOp::Read {
                id: CacheId(1),
                address: 0,
                width: 4,
            },
            TraceOp::Write {
                id: CacheId(2),
                address: 0x10,
                width: 2,
                value: 0xFFFF,
            },
        ]
    );
}

#[rstest]
#[case::unknown_op("x 1 0 4", "unknown operation")]
#[case::short_read("r 1 0", "expected 'r")]
#[case::short_write("w 1 0 4", "expected 'w")]
#[case::bad_number("r 1 zero 4", "invalid address")]
#[case::id_too_large("r 300 0 4", "invalid cache id")]
#[case::bad_hex("w 1 0 4 0xZZ", "invalid value")]
fn malformed_lines_are_reported(#[case] line: &str, #[case] reason: &str) {
    let text = format!("# header\nr 1 0 4\n{line}\n");
    let err = parse_trace(&text).unwrap_err();
    assert_eq!(err.line, 3);
    assert!(err.reason.contains(reason), "reason was {:?}", err.reason);
    assert!(err.to_string().starts_with("trace line 3:"));
}

#[test]
fn empty_trace_is_fine() {
    assert!(parse_trace("\n   \n# nothing\n").unwrap().is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. Replay
// ══════════════════════════════════════════════════════════

#[test]
fn replay_records_values_hits_and_states() {
    let mut sys = two_caches();
    let ops = parse_trace(
        "r 1 0 4\n\
         r 2 0 4\n\
         w 1 0 1 0xAB\n\
         r 2 0 4\n\
         r 2 0 4\n",
    )
    .unwrap();
    let outcomes = replay(&mut sys, &ops);

    let summary: Vec<_> = outcomes
        .iter()
        .map(|o| (o.hit, o.value, o.state))
        .collect();
    assert_eq!(
        summary,
        vec![
            (false, Some(0), Some(CoherenceState::Exclusive)),
            (false, Some(0), Some(CoherenceState::Shared)),
            (true, None, Some(CoherenceState::Modified)),
            (false, Some(0xAB00_0000), Some(CoherenceState::Shared)),
            (true, Some(0xAB00_0000), Some(CoherenceState::Shared)),
        ]
    );
    assert!(outcomes.iter().all(|o| o.is_ok()));
    assert_eq!(sys.state(C1, 0).unwrap(), CoherenceState::Shared);
    assert_eq!(sys.state(C2, 0).unwrap(), CoherenceState::Shared);
}

#[test]
fn replay_continues_past_rejected_requests() {
    let mut sys = two_caches();
    let ops = parse_trace("r 1 2 4\nr 9 0 4\nr 1 0 3\nw 1 0 4 7\n").unwrap();
    let outcomes = replay(&mut sys, &ops);

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].error.as_deref().unwrap().contains("misaligned"));
    assert!(outcomes[1].error.as_deref().unwrap().contains("unknown cache"));
    assert!(outcomes[2].error.as_deref().unwrap().contains("unsupported access width"));
    assert!(outcomes[3].is_ok());
    assert_eq!(sys.read_word(0, C1).unwrap(), 7);
}

#[test]
fn outcome_display_and_json() {
    let mut sys = two_caches();
    let ops = parse_trace("r 1 0x8 2\n").unwrap();
    let outcome = &replay(&mut sys, &ops)[0];

    let line = outcome.to_string();
    assert!(line.starts_with("r cache1 0x00000008 2"));
    assert!(line.ends_with("miss E -> 0x0"));

    let json = serde_json::to_value(outcome).unwrap();
    assert_eq!(json["op"]["op"], "read");
    assert_eq!(json["op"]["address"], 8);
    assert_eq!(json["state"], "Exclusive");
    assert_eq!(json["hit"], false);
}

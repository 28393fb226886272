mod common;

use common::{ms, RuleFormatter};
use jiff::{tz::TimeZone, Timestamp};
use tzwatch_core::{
    calendar::month_samples, find_transition, next_transition, scan_for_change, transitions,
    EpochMillis, Transition, ZoneFormatter,
};

/// Offset-changing transitions of `zone` in `[from, until]` according to
/// jiff's own transition table, in the scanner's "last old millisecond" form.
fn reference_transitions(zone: &str, from: EpochMillis, until: EpochMillis) -> Vec<EpochMillis> {
    let tz = TimeZone::get(zone).expect("Failed to load zone");
    let start = Timestamp::from_millisecond(from - 1).unwrap();
    tz.following(start)
        .map(|t| t.timestamp().as_millisecond())
        .take_while(|&at| at - 1 <= until)
        .filter(|&at| {
            let before = tz.to_offset(Timestamp::from_millisecond(at - 1).unwrap());
            let after = tz.to_offset(Timestamp::from_millisecond(at).unwrap());
            before != after
        })
        .map(|at| at - 1)
        .filter(|&instant| instant >= from)
        .collect()
}

#[test]
fn test_spring_forward_scenario() {
    // UTC+1 to UTC+2 at 2024-03-31T01:00:00Z
    let paris = ZoneFormatter::new("Europe/Paris").unwrap();
    let found = find_transition(
        &paris,
        ms("2024-03-01T00:00:00Z"),
        ms("2024-04-01T00:00:00Z"),
    )
    .unwrap();
    assert_eq!(found, ms("2024-03-31T00:59:59.999Z"));

    let synthetic = RuleFormatter::new("Test/Paris", 60, &[("2024-03-31T01:00:00Z", 120)]);
    let found = find_transition(
        &synthetic,
        ms("2024-03-01T00:00:00Z"),
        ms("2024-04-01T00:00:00Z"),
    )
    .unwrap();
    assert_eq!(found, ms("2024-03-31T00:59:59.999Z"));
}

#[test]
fn test_result_is_last_millisecond_of_old_offset_for_any_bracket() {
    let at = ms("2023-11-05T06:00:00Z");
    let zone = RuleFormatter::new("Test/Fallback", -240, &[("2023-11-05T06:00:00Z", -300)]);

    for delta_seconds in [1, 2, 59, 3_599, 86_400, 15 * 86_400, 27 * 86_400 + 17] {
        let delta = delta_seconds * 1000;
        let v = find_transition(&zone, at - delta, at + delta).unwrap();
        assert!(
            v < at && at <= v + 1,
            "delta {delta_seconds}s gave {v}, expected {}",
            at - 1
        );
    }
}

#[test]
fn test_scanner_is_idempotent() {
    let sydney = ZoneFormatter::new("Australia/Sydney").unwrap();
    let start = ms("2024-04-01T00:00:00Z");
    let end = ms("2024-05-01T00:00:00Z");
    let first = find_transition(&sydney, start, end).unwrap();
    let second = find_transition(&sydney, start, end).unwrap();
    assert_eq!(first, second);
    // AEDT (+11) ends 2024-04-07 03:00 local, i.e. 2024-04-06T16:00:00Z
    assert_eq!(first, ms("2024-04-06T15:59:59.999Z"));
}

#[test]
fn test_transition_across_local_midnight() {
    // Local clocks jump from 22:30 straight to 01:30 the next day.
    let zone = RuleFormatter::new("Test/Midnight", 0, &[("2024-06-10T22:30:00Z", 180)]);
    let found = find_transition(
        &zone,
        ms("2024-06-01T00:00:00Z"),
        ms("2024-07-01T00:00:00Z"),
    )
    .unwrap();
    assert_eq!(found, ms("2024-06-10T22:29:59.999Z"));

    // Brazil used to start DST at local midnight.
    let sao_paulo = ZoneFormatter::new("America/Sao_Paulo").unwrap();
    let found = find_transition(
        &sao_paulo,
        ms("2018-11-01T00:00:00Z"),
        ms("2018-12-01T00:00:00Z"),
    )
    .unwrap();
    assert_eq!(found, ms("2018-11-04T02:59:59.999Z"));
}

#[test]
fn test_half_hour_shift() {
    // Lord Howe Island moves its clocks by 30 minutes.
    let lord_howe = ZoneFormatter::new("Australia/Lord_Howe").unwrap();
    let found = transitions(
        &lord_howe,
        ms("2024-01-01T00:00:00Z"),
        Some(ms("2024-12-31T00:00:00Z")),
    )
    .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].offset_before, 660);
    assert_eq!(found[0].offset_after, 630);
    assert_eq!(found[1].shift_minutes(), 30);
}

#[test]
fn test_multiple_transitions_in_chronological_order() {
    let zone = RuleFormatter::new(
        "Test/TwoChanges",
        0,
        &[("2024-02-10T03:00:00Z", 60), ("2024-05-20T17:45:00Z", 0)],
    );
    let found = transitions(
        &zone,
        ms("2024-02-01T00:00:00Z"),
        Some(ms("2024-06-01T00:00:00Z")),
    )
    .unwrap();
    assert_eq!(
        found,
        vec![
            Transition {
                instant: ms("2024-02-10T02:59:59.999Z"),
                offset_before: 0,
                offset_after: 60,
            },
            Transition {
                instant: ms("2024-05-20T17:44:59.999Z"),
                offset_before: 60,
                offset_after: 0,
            },
        ]
    );
}

#[test]
fn test_transitions_respect_range_bounds() {
    let zone = RuleFormatter::new(
        "Test/Bounds",
        0,
        &[("2024-03-15T00:00:00Z", 60), ("2024-09-15T00:00:00Z", 0)],
    );
    // The March change is just before `from`, the September one is after `until`.
    let found = transitions(
        &zone,
        ms("2024-03-15T00:00:00Z"),
        Some(ms("2024-09-14T23:59:59.998Z")),
    )
    .unwrap();
    assert!(found.is_empty());

    // Both ends are inclusive.
    let found = transitions(
        &zone,
        ms("2024-03-14T23:59:59.999Z"),
        Some(ms("2024-09-14T23:59:59.999Z")),
    )
    .unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn test_constant_zone_has_no_change_over_default_horizon() {
    let tokyo = ZoneFormatter::new("Asia/Tokyo").unwrap();
    let samples = month_samples(ms("2024-01-15T00:00:00Z"), 28).unwrap();
    assert_eq!(scan_for_change(&tokyo, &samples).unwrap(), None);
    assert_eq!(
        next_transition(&tokyo, ms("2024-01-15T00:00:00Z"), 28).unwrap(),
        None
    );
}

#[test]
fn test_matches_time_zone_database() {
    let from = ms("2023-01-01T00:00:00Z");
    let until = ms("2025-12-31T00:00:00Z");
    for zone in [
        "Europe/Paris",
        "America/New_York",
        "America/Santiago",
        "Australia/Sydney",
        "Australia/Lord_Howe",
        "Pacific/Chatham",
        "Asia/Tehran",
        "Africa/Lagos",
    ] {
        let formatter = ZoneFormatter::new(zone).unwrap();
        let found: Vec<EpochMillis> = transitions(&formatter, from, Some(until))
            .unwrap()
            .iter()
            .map(|t| t.instant)
            .collect();
        assert_eq!(
            found,
            reference_transitions(zone, from, until),
            "transitions disagree for {zone}"
        );
    }
}

#[test]
fn test_horizon_scan_and_origin_scan_agree() {
    let origin = ms("2024-06-15T12:00:00Z");
    for zone in [
        "Europe/Paris",
        "America/New_York",
        "America/Santiago",
        "Australia/Sydney",
        "Pacific/Chatham",
    ] {
        let formatter = ZoneFormatter::new(zone).unwrap();
        let listed = transitions(&formatter, origin, Some(origin + 400 * 86_400_000)).unwrap();
        let next = next_transition(&formatter, origin, 28).unwrap();
        assert!(!listed.is_empty(), "{zone} should change offset within 400 days");
        assert_eq!(next, Some(listed[0]), "scans disagree for {zone}");
    }
}

//! End-to-end controller behaviour against mock hardware.

use petfeeder::app::events::{AppEvent, DropReason, Verdict};
use petfeeder::fsm::StateId;
use petfeeder::link::RejectReason;
use petfeeder::session::Animal;

use super::mock_hw::Rig;

// ── Full handshake and success flash ──────────────────────────

#[test]
fn ready_motion_confirm_flash_then_idle() {
    let mut rig = Rig::ready();

    rig.motion();
    rig.tick_at(1_000);
    assert_eq!(rig.hw.take_sent(), ["MOTION_DETECTED"]);
    assert!(rig.app.session().request_outstanding());
    assert_eq!(rig.app.indicator_state(), StateId::Active);
    assert!(rig.hw.led());

    rig.line("DOG_CONFIRMED");
    rig.tick_at(4_000);
    assert!(!rig.app.session().request_outstanding());
    assert_eq!(rig.app.indicator_state(), StateId::Flashing);
    assert!(rig.sink.contains(&AppEvent::RequestResolved {
        verdict: Verdict::TargetConfirmed(Animal::Dog),
        outstanding: true,
    }));

    rig.tick_at(4_250);
    assert!(!rig.hw.led(), "second blink phase is off");
    rig.tick_at(4_500);
    assert!(rig.hw.led());

    rig.tick_at(6_999);
    assert_eq!(rig.app.indicator_state(), StateId::Flashing);

    rig.tick_at(7_000);
    assert_eq!(rig.app.indicator_state(), StateId::Idle);
    assert!(!rig.hw.led());
    assert!(rig.hw.take_sent().is_empty(), "nothing sent in reply to a verdict");
}

#[test]
fn flash_ends_in_active_while_motion_is_recent() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.line("DOG_CONFIRMED");
    rig.tick_at(1_500);

    rig.tick_at(4_500);
    assert_eq!(rig.app.indicator_state(), StateId::Active);
    assert!(rig.hw.led());

    rig.tick_at(6_000);
    assert_eq!(rig.app.indicator_state(), StateId::Idle);
    assert!(!rig.hw.led());
}

#[test]
fn exactly_one_flash_episode_per_confirmation() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(10_000);
    rig.line("DOG_CONFIRMED");
    rig.tick_at(10_100);
    for t in (10_200..=20_000).step_by(50) {
        rig.tick_at(t);
    }
    let entered = rig.sink.count(|e| {
        matches!(e, AppEvent::IndicatorChanged { to: StateId::Flashing, .. })
    });
    assert_eq!(entered, 1);
}

// ── Single request in flight ──────────────────────────────────

#[test]
fn extra_motion_while_awaiting_sends_nothing() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    for t in [1_100, 1_200, 5_000, 9_000] {
        rig.motion();
        rig.tick_at(t);
    }
    assert_eq!(rig.hw.count_sent("MOTION_DETECTED"), 1);
    assert_eq!(
        rig.sink.count(|e| *e == AppEvent::MotionDropped(DropReason::RequestInFlight)),
        4
    );
}

#[test]
fn edges_between_ticks_coalesce_into_one_request() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.motion();
    rig.motion();
    rig.tick_at(500);
    assert_eq!(rig.hw.count_sent("MOTION_DETECTED"), 1);
    assert_eq!(rig.app.status().motion_events, 1);
    assert_eq!(rig.app.status().pir_edges, 3);
}

#[test]
fn verdict_behind_backlog_is_seen_before_new_motion() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    assert_eq!(rig.hw.take_sent(), ["MOTION_DETECTED"]);

    for _ in 0..10 {
        rig.line("COMPANION_DEBUG_OUTPUT_PADDING");
    }
    rig.line("DOG_CONFIRMED");
    rig.motion();
    rig.tick_at(2_000);

    assert!(rig.sink.contains(&AppEvent::RequestResolved {
        verdict: Verdict::TargetConfirmed(Animal::Dog),
        outstanding: true,
    }));
    assert_eq!(rig.hw.take_sent(), ["MOTION_DETECTED"]);
    assert!(rig.app.session().request_outstanding());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::MotionDropped(_))),
        0
    );
}

// ── Timeout ───────────────────────────────────────────────────

#[test]
fn unanswered_request_clears_once_at_timeout() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.hw.take_sent();

    rig.tick_at(21_000);
    assert!(rig.app.session().request_outstanding(), "boundary is exclusive");

    rig.tick_at(21_001);
    assert!(!rig.app.session().request_outstanding());
    rig.tick_at(21_500);
    rig.tick_at(25_000);

    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::RequestTimedOut { .. })),
        1
    );
    let sent = rig.hw.take_sent();
    assert!(
        sent.iter().all(|l| l == "ARDUINO_HEARTBEAT"),
        "timeout sends nothing, got {sent:?}"
    );

    rig.motion();
    rig.tick_at(26_000);
    assert_eq!(rig.hw.take_sent(), ["MOTION_DETECTED"], "new request allowed after timeout");
}

#[test]
fn late_confirmation_after_timeout_still_flashes() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.tick_at(22_000);
    assert!(!rig.app.session().request_outstanding());

    rig.line("DOG_CONFIRMED");
    rig.tick_at(23_000);
    assert_eq!(rig.app.indicator_state(), StateId::Flashing);
    assert!(rig.sink.contains(&AppEvent::RequestResolved {
        verdict: Verdict::TargetConfirmed(Animal::Dog),
        outstanding: false,
    }));
}

// ── Non-target verdicts ───────────────────────────────────────

#[test]
fn other_animal_clears_request_without_flash() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.line("CAT_CONFIRMED");
    rig.tick_at(2_000);

    assert!(!rig.app.session().request_outstanding());
    assert_eq!(rig.app.indicator_state(), StateId::Active);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::IndicatorChanged { to: StateId::Flashing, .. })),
        0
    );
}

#[test]
fn unknown_species_confirmation_is_non_target() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.line("FOX_CONFIRMED");
    rig.tick_at(1_100);
    assert!(!rig.app.session().request_outstanding());
    assert!(rig.sink.contains(&AppEvent::RequestResolved {
        verdict: Verdict::OtherConfirmed(None),
        outstanding: true,
    }));
    assert_ne!(rig.app.indicator_state(), StateId::Flashing);
}

#[test]
fn rejections_and_companion_errors_clear_request() {
    for (line, reason) in [
        ("WRONG_ANIMAL_DETECTED", RejectReason::WrongAnimal),
        ("NO_ANIMAL_DETECTED_BY_AI", RejectReason::NoAnimal),
        ("AI_NOT_READY", RejectReason::AiNotReady),
        ("NO_TARGET_CONFIGURED", RejectReason::NoTargetConfigured),
        ("PI_ERR_UNK_TARGET:BIRD", RejectReason::CompanionError),
        ("PI_ERROR_PROCESSING", RejectReason::CompanionError),
    ] {
        let mut rig = Rig::ready();
        rig.motion();
        rig.tick_at(1_000);
        rig.line(line);
        rig.tick_at(1_500);
        assert!(!rig.app.session().request_outstanding(), "{line} must clear the request");
        assert!(rig.sink.contains(&AppEvent::RequestResolved {
            verdict: Verdict::Rejected(reason),
            outstanding: true,
        }));
        assert_ne!(rig.app.indicator_state(), StateId::Flashing);
    }
}

// ── Companion lifecycle ───────────────────────────────────────

#[test]
fn motion_before_ready_is_never_reported() {
    let mut rig = Rig::boot();
    rig.motion();
    rig.tick_at(1_000);
    assert!(rig.sink.contains(&AppEvent::MotionDropped(DropReason::CompanionNotReady)));

    rig.line("PI_READY");
    rig.tick_at(2_000);
    rig.tick_at(3_000);
    assert_eq!(rig.hw.take_sent(), ["TARGET_ANIMAL:DOG"]);
    assert!(!rig.app.session().request_outstanding());

    // Motion still lights the LED even though it was never reported.
    assert!(rig.hw.led());
}

#[test]
fn shutdown_clears_ready_and_outstanding_request() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.line("PI_SHUTTING_DOWN");
    rig.tick_at(1_200);

    assert!(!rig.app.session().companion_ready());
    assert!(!rig.app.session().request_outstanding());
    assert!(rig.sink.contains(&AppEvent::CompanionShutdown { request_abandoned: true }));

    rig.motion();
    rig.tick_at(8_000);
    assert_eq!(rig.hw.count_sent("MOTION_DETECTED"), 1);
}

#[test]
fn ready_again_resends_target_without_dropping_request() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(1_000);
    rig.hw.take_sent();

    rig.line("PI_READY");
    rig.tick_at(2_000);
    assert_eq!(rig.hw.take_sent(), ["TARGET_ANIMAL:DOG"]);
    assert!(rig.app.session().request_outstanding());
}

#[test]
fn liveness_stale_reported_once_and_keeps_ready() {
    let mut rig = Rig::ready();
    rig.tick_at(29_999);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::LivenessStale { .. })), 0);

    rig.tick_at(30_000);
    rig.tick_at(35_000);
    assert!(rig.sink.contains(&AppEvent::LivenessStale { silent_ms: 30_000 }));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::LivenessStale { .. })), 1);
    assert!(rig.app.session().companion_ready());

    rig.line("PI_PONG");
    rig.tick_at(36_000);
    rig.tick_at(66_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::LivenessStale { .. })), 2);
}

#[test]
fn ack_target_mismatch_is_reported_without_state_change() {
    let mut rig = Rig::ready();
    rig.line("PI_ACK_TARGET:DOG");
    rig.line("PI_ACK_TARGET:CAT");
    rig.tick_at(100);

    assert!(rig.sink.contains(&AppEvent::TargetAcknowledged {
        animal: Some(Animal::Dog),
        matches: true,
    }));
    assert!(rig.sink.contains(&AppEvent::TargetAcknowledged {
        animal: Some(Animal::Cat),
        matches: false,
    }));
    assert_eq!(rig.app.session().target(), Animal::Dog);
}

// ── Heartbeat ─────────────────────────────────────────────────

#[test]
fn heartbeat_cadence_independent_of_readiness() {
    let mut rig = Rig::boot();
    for t in (500..=30_000).step_by(500) {
        if t == 12_000 {
            rig.line("PI_READY");
        }
        if t == 22_000 {
            rig.line("PI_SHUTTING_DOWN");
        }
        rig.tick_at(t);
    }
    assert_eq!(rig.hw.count_sent("ARDUINO_HEARTBEAT"), 3);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::Heartbeat(_))),
        3
    );
}

#[test]
fn heartbeat_carries_status_snapshot() {
    let mut rig = Rig::ready();
    rig.motion();
    rig.tick_at(9_000);
    rig.tick_at(10_000);
    let status = rig
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::Heartbeat(s) => Some(*s),
            _ => None,
        })
        .expect("heartbeat emitted");
    assert_eq!(status.uptime_ms, 10_000);
    assert!(status.companion_ready);
    assert!(status.request_outstanding);
    assert!(status.motion_active);
    assert_eq!(status.target, Animal::Dog);
    assert_eq!(status.indicator, StateId::Active);
}

// ── Target configuration ──────────────────────────────────────

#[test]
fn set_target_forwards_when_ready_and_dedupes() {
    let mut rig = Rig::ready();
    rig.line("SET_TARGET:cat");
    rig.line("SET_TARGET:CAT ");
    rig.tick_at(100);
    rig.tick_at(200);

    assert_eq!(rig.app.session().target(), Animal::Cat);
    assert_eq!(rig.hw.take_sent(), ["TARGET_ANIMAL:CAT"]);
    assert!(rig.sink.contains(&AppEvent::TargetUnchanged(Animal::Cat)));
}

#[test]
fn set_target_while_not_ready_applies_locally_only() {
    let mut rig = Rig::boot();
    rig.line("SET_TARGET:cat");
    rig.tick_at(100);
    assert_eq!(rig.app.session().target(), Animal::Cat);
    assert!(rig.hw.take_sent().is_empty());

    rig.line("PI_READY");
    rig.tick_at(200);
    assert_eq!(rig.hw.take_sent(), ["TARGET_ANIMAL:CAT"]);
}

#[test]
fn invalid_target_rejected_and_nothing_sent() {
    let mut rig = Rig::ready();
    rig.line("SET_TARGET:bird");
    rig.tick_at(100);

    assert_eq!(rig.app.session().target(), Animal::Dog);
    assert!(rig.hw.take_sent().is_empty());
    assert!(rig.sink.contains(&AppEvent::TargetRejected));
}

#[test]
fn new_target_governs_next_confirmation() {
    let mut rig = Rig::ready();
    rig.line("SET_TARGET:cat");
    rig.tick_at(100);
    rig.motion();
    rig.tick_at(1_000);
    rig.line("CAT_CONFIRMED");
    rig.tick_at(2_000);
    assert_eq!(rig.app.indicator_state(), StateId::Flashing);
}

// ── Operator commands and link noise ──────────────────────────

#[test]
fn test_flash_runs_without_companion() {
    let mut rig = Rig::boot();
    rig.line("TEST_FLASH");
    rig.tick_at(100);
    rig.tick_at(110);
    assert_eq!(rig.app.indicator_state(), StateId::Flashing);
    rig.tick_at(3_110);
    assert_eq!(rig.app.indicator_state(), StateId::Idle);
}

#[test]
fn command_queue_overflow_drops_extras() {
    let mut rig = Rig::boot();
    for _ in 0..6 {
        rig.line("TEST_FLASH");
    }
    rig.tick_at(100);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::CommandDropped), 2);
    assert_eq!(rig.app.pending_commands(), 3, "one applied this tick");
}

#[test]
fn unknown_and_oversized_lines_are_ignored() {
    let mut rig = Rig::ready();
    rig.line("HELLO_THERE");
    rig.line(&"Z".repeat(200));
    rig.line("PI_PONG");
    rig.tick_at(100);

    assert!(rig.sink.contains(&AppEvent::LineIgnored));
    assert_eq!(rig.app.status().lines_dropped, 1);
    assert!(rig.hw.take_sent().is_empty());
}

#[test]
fn read_failure_does_not_stop_motion_handling() {
    let mut rig = Rig::ready();
    rig.hw.fail_reads = true;
    rig.motion();
    rig.tick_at(1_000);
    assert!(rig.sink.events.iter().any(|e| matches!(e, AppEvent::LinkFault(_))));
    assert_eq!(rig.hw.take_sent(), ["MOTION_DETECTED"]);
    assert!(rig.hw.led());
}

#[test]
fn write_failure_still_opens_request() {
    let mut rig = Rig::ready();
    rig.hw.fail_writes = true;
    rig.motion();
    rig.tick_at(1_000);
    assert!(rig.app.session().request_outstanding());
    assert!(rig.sink.events.iter().any(|e| matches!(e, AppEvent::LinkFault(_))));
}

#[test]
fn led_written_only_on_level_change() {
    let mut rig = Rig::ready();
    let writes_after_boot = rig.hw.led_writes.len();
    for t in (100..2_000).step_by(100) {
        rig.tick_at(t);
    }
    assert_eq!(rig.hw.led_writes.len(), writes_after_boot);

    rig.motion();
    rig.tick_at(2_000);
    rig.tick_at(2_100);
    rig.tick_at(2_200);
    assert_eq!(rig.hw.led_writes.len(), writes_after_boot + 1);
}

#[test]
fn lines_split_across_reads_are_reassembled() {
    let mut rig = Rig::boot();
    rig.hw.rx.extend(b"PI_RE");
    rig.tick_at(100);
    assert!(!rig.app.session().companion_ready());
    rig.hw.rx.extend(b"ADY\r\n");
    rig.tick_at(200);
    assert!(rig.app.session().companion_ready());
}

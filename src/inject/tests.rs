//! Unit tests for the injection scheduler.
//!
//! A fake transport records submitted reports; the clock is driven by hand.

use super::scheduler::{CHORD_INDEX, FAST_RESUME};
use super::*;
use crate::hid::keyboard::modifier;
use crate::hid::keycodes::*;
use crate::hid::KeyboardReport;

#[derive(Default)]
struct FakeTransport {
    busy: bool,
    suspended: bool,
    wakeups: usize,
    sent: Vec<KeyboardReport>,
}

impl ReportTransport for FakeTransport {
    fn is_ready(&self) -> bool {
        !self.busy
    }

    fn submit(&mut self, report: &KeyboardReport) {
        if !self.busy {
            self.sent.push(*report);
        }
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn request_wakeup(&mut self) {
        self.wakeups += 1;
    }
}

/// Poll every millisecond up to and including `until_ms`, collecting emissions.
fn run_until(
    scheduler: &mut InjectionScheduler<'_>,
    transport: &mut FakeTransport,
    from_ms: u64,
    until_ms: u64,
) -> Vec<(u64, Emission)> {
    let mut out = Vec::new();
    for now in from_ms..=until_ms {
        if let Tick::Emitted(e) = scheduler.poll(now, transport) {
            out.push((now, e));
        }
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════
// Delay selection
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn delay_first_two_ticks_are_slow_whatever_came_before() {
    let t = Timing::default();
    for prev in [None, Some(b'\n'), Some(b'~'), Some(b'x')] {
        assert_eq!(t.delay_for(0, prev), 700);
        assert_eq!(t.delay_for(CHORD_INDEX, prev), 700);
    }
}

#[test]
fn delay_after_enter_settles() {
    let t = Timing::default();
    assert_eq!(t.delay_for(2, Some(b'\r')), 250);
    assert_eq!(t.delay_for(9, Some(b'\n')), 250);
}

#[test]
fn delay_after_fast_resume_matches_default() {
    let t = Timing::default();
    assert_eq!(t.delay_for(5, Some(FAST_RESUME)), 10);
    assert_eq!(t.delay_for(5, Some(b'a')), 10);
    assert_eq!(t.delay_for(5, None), 10);
    assert_eq!(t.delay_for(5, Some(FAST_RESUME)), t.delay_for(5, Some(b'a')));
}

#[test]
fn delay_uses_custom_timing() {
    let t = Timing {
        priming_ms: 1,
        chord_hold_ms: 2,
        enter_settle_ms: 3,
        key_ms: 4,
    };
    assert_eq!(t.delay_for(0, None), 1);
    assert_eq!(t.delay_for(1, None), 2);
    assert_eq!(t.delay_for(2, Some(b'\n')), 3);
    assert_eq!(t.delay_for(2, Some(b'q')), 4);
}

// ═══════════════════════════════════════════════════════════════════════════
// Report construction
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn ab_newline_scenario() {
    let mut s = InjectionScheduler::new(Script::new(b"ab\n"), 0);
    let mut t = FakeTransport::default();

    let emitted = run_until(&mut s, &mut t, 0, 1440);
    let summary: Vec<_> = emitted
        .iter()
        .map(|(now, e)| (*now, e.delay_ms, e.report))
        .collect();

    assert_eq!(
        summary,
        vec![
            (700, 700, KeyboardReport::single(0, KEY_A)),
            (1400, 700, KeyboardReport::single(modifier::LEFT_GUI, KEY_A + 1)),
            (1410, 10, KeyboardReport::single(0, KEY_ENTER)),
        ]
    );
    assert_eq!(s.state(), SchedulerState::Drained);
    // First idle tick follows the Enter settle delay.
    assert_eq!(s.next_delay_ms(), 250);
    assert_eq!(s.next_report(), KeyboardReport::empty());
    assert_eq!(s.cursor(), 3);
}

#[test]
fn drained_scheduler_keeps_sending_idle_reports() {
    let mut s = InjectionScheduler::new(Script::new(b"ab\n"), 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 1410);
    let idle = run_until(&mut s, &mut t, 1411, 1700);

    assert_eq!(idle.first().map(|(now, _)| *now), Some(1660));
    for (_, e) in &idle {
        assert_eq!(e.report, KeyboardReport::empty());
        assert_eq!(e.character, None);
    }
    // 1660, then every 10 ms.
    assert_eq!(idle.len(), 5);
    assert_eq!(s.cursor(), 3);
}

#[test]
fn gui_bit_only_on_second_report() {
    let script = Script::new(b"$x:~|)y");
    let mut s = InjectionScheduler::new(script, 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 3000);

    for (i, report) in t.sent.iter().enumerate() {
        assert_eq!(
            report.has_modifier(modifier::LEFT_GUI),
            i == CHORD_INDEX as usize,
            "report {i}"
        );
    }
}

#[test]
fn gui_bit_on_second_report_even_when_drained() {
    let mut s = InjectionScheduler::new(Script::new(b"x"), 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 1400);

    assert_eq!(t.sent.len(), 2);
    assert_eq!(t.sent[1], KeyboardReport::single(modifier::LEFT_GUI, KEY_NONE));
}

#[test]
fn shifted_symbols_set_shift_in_their_report() {
    let script: &[u8] = b"..$^&>:()\"|ab";
    let mut s = InjectionScheduler::new(Script::new(script), 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 2000);

    for (i, &ch) in script.iter().enumerate() {
        let shifted = b"$^&>:()\"|".contains(&ch);
        assert_eq!(
            t.sent[i].has_modifier(modifier::LEFT_SHIFT),
            shifted,
            "char {}",
            ch as char
        );
    }
}

#[test]
fn shift_and_gui_combine_on_the_chord_report() {
    let mut s = InjectionScheduler::new(Script::new(b"a("), 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 1400);

    assert_eq!(
        t.sent[1],
        KeyboardReport::single(modifier::LEFT_GUI | modifier::LEFT_SHIFT, KEY_9)
    );
}

#[test]
fn tilde_sends_an_empty_report_between_repeated_letters() {
    let mut s = InjectionScheduler::new(Script::new(b"~rl~l"), 0);
    let mut t = FakeTransport::default();

    run_until(&mut s, &mut t, 0, 1500);

    let keys: Vec<u8> = t.sent.iter().take(5).map(|r| r.keycodes[0]).collect();
    assert_eq!(keys, vec![KEY_NONE, KEY_A + 17, KEY_A + 11, KEY_NONE, KEY_A + 11]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Cursor and timing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn n_reports_advance_cursor_to_n_and_no_further() {
    let script = Script::new(b"hello world\n");
    let mut s = InjectionScheduler::new(script, 0);
    let mut t = FakeTransport::default();

    let mut now = 0;
    while t.sent.len() < script.len() {
        s.poll(now, &mut t);
        now += 1;
    }
    assert_eq!(s.cursor(), script.len());
    assert_eq!(s.state(), SchedulerState::Drained);

    run_until(&mut s, &mut t, now, now + 5_000);
    assert_eq!(s.cursor(), script.len());
    assert!(t.sent.len() > script.len());
}

#[test]
fn state_progression() {
    let mut s = InjectionScheduler::new(Script::new(b"ab"), 0);
    let mut t = FakeTransport::default();
    assert_eq!(s.state(), SchedulerState::Priming);

    run_until(&mut s, &mut t, 0, 700);
    assert_eq!(s.state(), SchedulerState::Running);

    run_until(&mut s, &mut t, 701, 1400);
    assert_eq!(s.state(), SchedulerState::Drained);
}

#[test]
fn empty_script_drains_on_first_report() {
    let mut s = InjectionScheduler::new(Script::new(b""), 0);
    let mut t = FakeTransport::default();

    assert!(matches!(s.poll(700, &mut t), Tick::Emitted(e) if e.character.is_none()));
    assert_eq!(s.state(), SchedulerState::Drained);
    assert_eq!(s.cursor(), 0);
}

#[test]
fn waits_until_delay_elapsed() {
    let mut s = InjectionScheduler::new(Script::new(b"a"), 100);
    let mut t = FakeTransport::default();

    assert_eq!(s.poll(0, &mut t), Tick::Waiting);
    assert_eq!(s.poll(799, &mut t), Tick::Waiting);
    assert!(matches!(s.poll(800, &mut t), Tick::Emitted(_)));
}

#[test]
fn last_emit_advances_by_delay_not_to_now() {
    let mut s = InjectionScheduler::new(Script::new(b"abcdef"), 0);
    let mut t = FakeTransport::default();

    // Polled late: the slot still moves by exactly 700.
    assert!(matches!(s.poll(735, &mut t), Tick::Emitted(_)));
    assert_eq!(s.last_emit_ms(), 700);

    assert!(matches!(s.poll(1403, &mut t), Tick::Emitted(_)));
    assert_eq!(s.last_emit_ms(), 1400);

    // 3 ms late on a 10 ms tick: next one is due at 1420, not 1423.
    assert!(matches!(s.poll(1413, &mut t), Tick::Emitted(_)));
    assert_eq!(s.last_emit_ms(), 1410);
    assert_eq!(s.poll(1419, &mut t), Tick::Waiting);
    assert!(matches!(s.poll(1420, &mut t), Tick::Emitted(_)));
}

#[test]
fn busy_transport_freezes_state_then_resumes() {
    let mut s = InjectionScheduler::new(Script::new(b"abc"), 0);
    let mut t = FakeTransport::default();

    assert!(matches!(s.poll(700, &mut t), Tick::Emitted(_)));
    let (cursor, last) = (s.cursor(), s.last_emit_ms());

    t.busy = true;
    for now in 1400..1900 {
        assert_eq!(s.poll(now, &mut t), Tick::Busy);
        assert_eq!(s.cursor(), cursor);
        assert_eq!(s.last_emit_ms(), last);
    }
    assert_eq!(t.sent.len(), 1);

    t.busy = false;
    match s.poll(1900, &mut t) {
        Tick::Emitted(e) => {
            assert_eq!(e.index, 1);
            assert_eq!(e.character, Some(b'b'));
        }
        other => panic!("expected emission, got {other:?}"),
    }
    assert_eq!(s.cursor(), cursor + 1);
    assert_eq!(s.last_emit_ms(), last + 700);
}

#[test]
fn suspended_transport_requests_wakeup_without_advancing() {
    let mut s = InjectionScheduler::new(Script::new(b"abc"), 0);
    let mut t = FakeTransport {
        suspended: true,
        ..Default::default()
    };

    for now in 700..710 {
        assert_eq!(s.poll(now, &mut t), Tick::WakeupRequested);
    }
    assert_eq!(t.wakeups, 10);
    assert!(t.sent.is_empty());
    assert_eq!(s.cursor(), 0);
    assert_eq!(s.last_emit_ms(), 0);
    assert_eq!(s.state(), SchedulerState::Priming);

    t.suspended = false;
    assert!(matches!(s.poll(710, &mut t), Tick::Emitted(_)));
}

#[test]
fn waiting_does_not_touch_a_suspended_transport() {
    let mut s = InjectionScheduler::new(Script::new(b"a"), 0);
    let mut t = FakeTransport {
        suspended: true,
        ..Default::default()
    };

    assert_eq!(s.poll(10, &mut t), Tick::Waiting);
    assert_eq!(t.wakeups, 0);
}

#[test]
fn next_report_previews_without_side_effects() {
    let s = InjectionScheduler::new(Script::new(b"Q"), 0);
    assert_eq!(s.next_report(), KeyboardReport::single(0, KEY_A + 16));
    assert_eq!(s.next_delay_ms(), 700);
    assert_eq!(s.cursor(), 0);
    assert_eq!(s.emitted(), 0);
}

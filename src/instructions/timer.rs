/*!
instructions/timer.rs - TON / TOF / TP timer primitives.

Each function is a pure transition from `(old instance, inputs, clock)`
to a fresh instance; none mutate their argument. `now` and any internal
`start_time` are milliseconds on the clock the runtime supplies for the
current scan (spec.md §4.6: "the clock source is unified").
*/

use crate::value::TimerInstance;

/// On-delay. Rising edge of `IN` starts timing; while `IN` holds, `ET`
/// tracks elapsed time clamped at `PT` and `Q` latches once `ET >= PT`.
/// `IN` going false resets `ET`/`Q`/the in-progress timing run.
pub fn ton(old: &TimerInstance, input: bool, preset_ms: i64, now: i64) -> TimerInstance {
    let mut next = *old;
    next.preset_ms = preset_ms;

    if input {
        if !next.input {
            // Rising edge: (re)start timing.
            next.start_time = Some(now);
        }
        let start = next.start_time.unwrap_or(now);
        next.elapsed_ms = (now - start).max(0).min(preset_ms);
        next.output = next.elapsed_ms >= preset_ms;
    } else {
        next.elapsed_ms = 0;
        next.output = false;
        next.start_time = None;
    }
    next.input = input;
    next
}

/// Off-delay. While `IN` is true, `Q` is held true and `ET` is zero.
/// Falling edge of `IN` starts timing; while `IN` stays false, `ET`
/// tracks elapsed time clamped at `PT` and `Q` drops once `ET >= PT`.
pub fn tof(old: &TimerInstance, input: bool, preset_ms: i64, now: i64) -> TimerInstance {
    let mut next = *old;
    next.preset_ms = preset_ms;

    if input {
        next.elapsed_ms = 0;
        next.output = true;
        next.start_time = None;
    } else {
        if next.input {
            // Falling edge: start timing.
            next.start_time = Some(now);
        }
        let start = next.start_time.unwrap_or(now);
        next.elapsed_ms = (now - start).max(0).min(preset_ms);
        next.output = !(next.elapsed_ms >= preset_ms);
    }
    next.input = input;
    next
}

/// Pulse. Rising edge of `IN` (only while not already triggered) fires a
/// fixed-width pulse on `Q` of length `PT`, tracked by `ET`. Retriggering
/// requires `IN` to have gone false since the last trigger — a falling
/// edge clears the one-shot guard even mid-pulse is not required by the
/// guard itself; the guard only blocks a *new* rising edge while set.
pub fn tp(old: &TimerInstance, input: bool, preset_ms: i64, now: i64) -> TimerInstance {
    let mut next = *old;
    next.preset_ms = preset_ms;

    if input && !next.input && !next.triggered {
        next.start_time = Some(now);
        next.elapsed_ms = 0;
        next.output = true;
        next.triggered = true;
    } else if next.triggered {
        let start = next.start_time.unwrap_or(now);
        next.elapsed_ms = (now - start).max(0).min(preset_ms);
        if next.elapsed_ms >= preset_ms {
            next.output = false;
            next.triggered = false;
        }
    }
    next.input = input;
    next
}

//! Elapsed wall-clock time formatting for long-running pipeline steps.

use std::time::Duration;

/// Format an elapsed duration as "done in ..." with hour/minute/second tiers.
///
/// Units are singular when their count is exactly one, matching the log
/// output operators are used to scanning.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total - hours * 3600.0 - minutes * 60.0;

    let hour_unit = if hours as u64 == 1 { "hour" } else { "hours" };
    let minute_unit = if minutes as u64 == 1 {
        "minute"
    } else {
        "minutes"
    };

    if hours == 0.0 && minutes == 0.0 {
        format!("done in {seconds:.2} seconds")
    } else if hours == 0.0 {
        format!("done in {minutes:.0} {minute_unit} {seconds:.2} seconds")
    } else {
        format!("done in {hours:.0} {hour_unit} {minutes:.0} {minute_unit} {seconds:.2} seconds")
    }
}

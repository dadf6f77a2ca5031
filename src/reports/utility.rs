/// Renders whole seconds the way an elapsed-time clock reads: `H:MM:SS`,
/// prefixed with `N day(s), ` once the total reaches a full day.
///
/// Fractional seconds are truncated.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let days = total / 86_400;
    let rem = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed_under_a_day() {
        assert_eq!(format_elapsed(0.0), "0:00:00");
        assert_eq!(format_elapsed(59.9), "0:00:59");
        assert_eq!(format_elapsed(3725.0), "1:02:05");
    }

    #[test]
    fn test_format_elapsed_days() {
        assert_eq!(format_elapsed(86_400.0 + 7384.0), "1 day, 2:03:04");
        assert_eq!(format_elapsed(3.0 * 86_400.0 + 5.0), "3 days, 0:00:05");
    }
}

//!
//! Status line formatting for the progress meter
//!

const N_BARS: usize = 10;

/// Marker used when a value cannot be computed yet
pub const UNKNOWN: &str = "?";

/// Render a duration in seconds as `H:MM:SS`, or `MM:SS` below one hour.
///
/// Fractional seconds are dropped.
pub fn format_interval(seconds: f64) -> String {
    let total = seconds as u64;
    let (mins, s) = (total / 60, total % 60);
    let (h, m) = (mins / 60, mins % 60);

    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// Build the status line for `n` processed items after `elapsed` seconds.
///
/// A `total` that is zero or smaller than `n` is treated as unknown, which
/// drops the bar, percentage and ETA from the line.
pub fn format_meter(n: u64, total: Option<u64>, elapsed: f64) -> String {
    let total = total.filter(|t| *t > 0 && n <= *t);

    let elapsed_str = format_interval(elapsed);
    let rate = if elapsed > 0.0 {
        format!("{:5.2}", n as f64 / elapsed)
    } else {
        UNKNOWN.to_string()
    };

    match total {
        Some(total) => {
            let bar_length = ratio_floor(n, total, N_BARS as u64) as usize;
            let bar = format!("{}{}", "#".repeat(bar_length), "-".repeat(N_BARS - bar_length));

            let percentage = format!("{:3}%", ratio_floor(n, total, 100));

            let left_str = if n > 0 {
                format_interval(elapsed / n as f64 * (total - n) as f64)
            } else {
                UNKNOWN.to_string()
            };

            format!(
                "|{bar}| {n}/{total} {percentage} [elapsed: {elapsed_str} left: {left_str}, {rate} iters/sec]"
            )
        }
        None => format!("{n} [elapsed: {elapsed_str}, {rate} iters/sec]"),
    }
}

// floor(n / total * scale) without float rounding, n <= total
fn ratio_floor(n: u64, total: u64, scale: u64) -> u64 {
    (u128::from(n) * u128::from(scale) / u128::from(total)) as u64
}

#[test]
fn test_format_interval() {
    assert_eq!(format_interval(0.0), "00:00");
    assert_eq!(format_interval(59.9), "00:59");
    assert_eq!(format_interval(61.0), "01:01");
    assert_eq!(format_interval(3599.0), "59:59");
    assert_eq!(format_interval(3661.0), "1:01:01");
    assert_eq!(format_interval(36000.0), "10:00:00");
}

#[test]
fn test_format_meter_initial() {
    assert_eq!(
        format_meter(0, Some(4), 0.0),
        "|----------| 0/4   0% [elapsed: 00:00 left: ?, ? iters/sec]"
    );
    assert_eq!(format_meter(0, None, 0.0), "0 [elapsed: 00:00, ? iters/sec]");
}

#[test]
fn test_format_meter_midway() {
    assert_eq!(
        format_meter(2, Some(4), 10.0),
        "|#####-----| 2/4  50% [elapsed: 00:10 left: 00:10,  0.20 iters/sec]"
    );
    assert_eq!(
        format_meter(7, None, 2.0),
        "7 [elapsed: 00:02,  3.50 iters/sec]"
    );
}

#[test]
fn test_format_meter_percentages() {
    let percentages: Vec<String> = (0..=4)
        .map(|n| {
            let line = format_meter(n, Some(4), 0.0);
            let start = line.find(&format!("{n}/4 ")).unwrap() + 4;
            line[start..start + 4].to_string()
        })
        .collect();

    assert_eq!(percentages, vec!["  0%", " 25%", " 50%", " 75%", "100%"]);
}

#[test]
fn test_format_meter_bar_fill() {
    for total in [1u64, 3, 7, 10, 33, 250] {
        for n in 0..=total {
            let line = format_meter(n, Some(total), 1.0);
            let bar = &line[1..=N_BARS];
            let filled = bar.chars().filter(|c| *c == '#').count();

            assert_eq!(filled, (10 * n / total) as usize, "n={n} total={total}");
            assert!(filled <= N_BARS);
            assert_eq!(bar.chars().filter(|c| *c == '-').count(), N_BARS - filled);
        }
    }
}

#[test]
fn test_format_meter_unknown_markers() {
    let line = format_meter(3, Some(10), 0.0);
    assert!(line.ends_with(", ? iters/sec]"));

    let line = format_meter(0, Some(10), 5.0);
    assert!(line.contains("left: ?,"));
}

#[test]
fn test_format_meter_overflowing_total() {
    assert_eq!(
        format_meter(5, Some(4), 1.0),
        "5 [elapsed: 00:01,  5.00 iters/sec]"
    );
    assert_eq!(format_meter(1, Some(0), 0.0), "1 [elapsed: 00:00, ? iters/sec]");
}

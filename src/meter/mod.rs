//!
//! _Progress meter_
//!
//! Wraps an iterator and keeps a one-line status on a terminal row while the
//! items are consumed.
//!
//! ```rust
//! use std::time::Duration;
//! use line_translate::meter::{MeterOptions, ProgressIteratorExt};
//!
//! let mut out = Vec::<u8>::new();
//! let doubled: Vec<u32> = (1..=3)
//!     .progress_with(
//!         MeterOptions::new().label("numbers").min_interval(Duration::ZERO),
//!         &mut out,
//!     )
//!     .map(|n| n * 2)
//!     .collect();
//!
//! assert_eq!(doubled, vec![2, 4, 6]);
//! ```
//!

use std::{
    io::{self, Write},
    iter::FusedIterator,
    time::{Duration, Instant},
};

use log::debug;

mod format;
mod status_printer;

pub use format::{format_interval, format_meter};

use status_printer::StatusPrinter;

/// Options controlling what the meter shows and how often.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterOptions {
    ///Prefix shown before the status, omitted when empty
    pub label: String,
    ///Total number of items, taken from the iterator when not set
    pub total: Option<u64>,
    ///Keep the final line on screen after the iteration ends
    pub leave: bool,
    ///Minimum time between two status updates. Default: 500ms
    pub min_interval: Duration,
    ///Minimum number of items between two status updates. Default: 1
    pub min_iters: u64,
}

impl Default for MeterOptions {
    fn default() -> Self {
        Self {
            label: String::new(),
            total: None,
            leave: false,
            min_interval: Duration::from_millis(500),
            min_iters: 1,
        }
    }
}

impl MeterOptions {
    /// Return the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Label printed in front of the status
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Total count of items
    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Keep the last line after the iteration ends
    pub fn leave(mut self, leave: bool) -> Self {
        self.leave = leave;
        self
    }

    /// Minimum time between updates
    pub fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Minimum items between updates
    pub fn min_iters(mut self, iters: u64) -> Self {
        self.min_iters = iters;
        self
    }
}

/// Iterator adapter yielding the inner items unchanged while reporting
/// progress to `W`.
///
/// Nothing is written until the first item is requested, which prints the
/// initial status and starts the clock. An item is counted when the next one
/// is requested, so the time spent by the consumer on an item is part of the
/// reported rate.
#[derive(Debug)]
pub struct ProgressMeter<I, W: Write> {
    iter: I,
    printer: StatusPrinter<W>,
    prefix: String,
    total: Option<u64>,
    leave: bool,
    min_interval: Duration,
    min_iters: u64,
    n: u64,
    start_time: Instant,
    last_print_time: Instant,
    last_print_n: u64,
    started: bool,
    pending: bool,
    finished: bool,
}

impl<I: Iterator, W: Write> ProgressMeter<I, W> {
    /// Start metering `iterable`, writing the status to `writer`.
    pub fn new<T>(iterable: T, options: MeterOptions, writer: W) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let iter = iterable.into_iter();

        let total = options.total.or_else(|| match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        });

        let prefix = if options.label.is_empty() {
            String::new()
        } else {
            format!("{}: ", options.label)
        };

        let now = Instant::now();

        Self {
            iter,
            printer: StatusPrinter::new(writer),
            prefix,
            total,
            leave: options.leave,
            min_interval: options.min_interval,
            min_iters: options.min_iters,
            n: 0,
            start_time: now,
            last_print_time: now,
            last_print_n: 0,
            started: false,
            pending: false,
            finished: false,
        }
    }

    /// Items consumed so far
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Total used for the bar, if any
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    fn start(&mut self) {
        self.started = true;

        let status = format!("{}{}", self.prefix, format_meter(0, self.total, 0.0));
        report(self.printer.print_status(&status));

        let now = Instant::now();
        self.start_time = now;
        self.last_print_time = now;
    }

    fn print_at(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.start_time).as_secs_f64();
        let status = format!("{}{}", self.prefix, format_meter(self.n, self.total, elapsed));
        report(self.printer.print_status(&status));
    }

    fn count_item(&mut self) {
        self.n += 1;

        if self.n - self.last_print_n >= self.min_iters {
            let now = Instant::now();
            if now.duration_since(self.last_print_time) >= self.min_interval {
                self.print_at(now);
                self.last_print_n = self.n;
                self.last_print_time = now;
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;

        if !self.leave {
            report(self.printer.print_status(""));
            report(self.printer.write_raw("\r"));
        } else {
            if self.last_print_n < self.n {
                self.print_at(Instant::now());
            }
            report(self.printer.write_raw("\n"));
        }
    }
}

impl<I: Iterator, W: Write> Iterator for ProgressMeter<I, W> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.started {
            self.start();
        } else if self.pending {
            self.count_item();
        }

        match self.iter.next() {
            Some(item) => {
                self.pending = true;
                Some(item)
            }
            None => {
                self.pending = false;
                self.finish();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            self.iter.size_hint()
        }
    }
}

impl<I: Iterator, W: Write> FusedIterator for ProgressMeter<I, W> {}

/// Status output never interrupts the iteration.
fn report(res: io::Result<()>) {
    if let Err(e) = res {
        debug!("Could not write progress status: {e}");
    }
}

/// Adds `.progress()` to every iterator.
pub trait ProgressIteratorExt: Iterator + Sized {
    /// Meter this iterator on standard error
    fn progress(self, options: MeterOptions) -> ProgressMeter<Self, io::Stderr> {
        ProgressMeter::new(self, options, io::stderr())
    }

    /// Meter this iterator on the given writer
    fn progress_with<W: Write>(self, options: MeterOptions, writer: W) -> ProgressMeter<Self, W> {
        ProgressMeter::new(self, options, writer)
    }
}

impl<I: Iterator> ProgressIteratorExt for I {}

#[cfg(test)]
fn run_meter<I: IntoIterator>(iterable: I, options: MeterOptions) -> (Vec<I::Item>, String) {
    let mut out = Vec::new();
    let items = ProgressMeter::new(iterable, options, &mut out).collect();
    (items, String::from_utf8(out).unwrap())
}

#[test]
fn test_meter_clears_row_on_exit() {
    let (items, out) = run_meter(
        vec!["a", "b", "c"],
        MeterOptions::new().min_interval(Duration::from_secs(3600)),
    );

    assert_eq!(items, vec!["a", "b", "c"]);

    let initial = "|----------| 0/3   0% [elapsed: 00:00 left: ?, ? iters/sec]";
    let expected = format!("\r{initial}\r{}\r", " ".repeat(initial.len()));
    assert_eq!(out, expected);
    assert!(!out.contains('\n'));
}

#[test]
fn test_meter_persists_final_line() {
    let (items, out) = run_meter(
        0..3,
        MeterOptions::new()
            .leave(true)
            .min_interval(Duration::from_secs(3600)),
    );

    assert_eq!(items, vec![0, 1, 2]);
    assert_eq!(out.matches('\n').count(), 1);
    assert!(out.ends_with('\n'));

    let last = out.rsplit('\r').next().unwrap();
    assert!(
        last.starts_with("|##########| 3/3 100% [elapsed: 00:00 left: 00:00,"),
        "{last:?}"
    );
}

#[test]
fn test_meter_does_not_repeat_final_line() {
    let (_, out) = run_meter(
        0..3,
        MeterOptions::new().leave(true).min_interval(Duration::ZERO),
    );

    // initial, then one line per counted item
    assert_eq!(out.matches("iters/sec").count(), 4);
    assert!(out.contains("\r|###-------| 1/3  33%"));
    assert!(out.contains("\r|######----| 2/3  66%"));
    assert!(out.contains("\r|##########| 3/3 100%"));
    assert!(out.ends_with('\n'));
}

#[test]
fn test_meter_throttles_on_item_count() {
    let (items, out) = run_meter(
        0..4,
        MeterOptions::new().min_iters(5).min_interval(Duration::ZERO),
    );

    assert_eq!(items.len(), 4);
    assert_eq!(out.matches("iters/sec").count(), 1);
}

#[test]
fn test_meter_unknown_length() {
    let (items, out) = run_meter(
        (0..5).filter(|n| n % 2 == 0),
        MeterOptions::new().label("evens").min_interval(Duration::ZERO),
    );

    assert_eq!(items, vec![0, 2, 4]);
    assert!(out.starts_with("\revens: 0 [elapsed: 00:00, ? iters/sec]"));
    assert!(out.contains("\revens: 3 [elapsed: 00:00,"));
    assert!(!out.contains('|'));
}

#[test]
fn test_meter_total_smaller_than_count() {
    let (items, out) = run_meter(
        0..4,
        MeterOptions::new().total(2).min_interval(Duration::ZERO),
    );

    assert_eq!(items.len(), 4);
    assert!(out.contains("\r|##########| 2/2 100%"));
    assert!(out.contains("\r3 [elapsed: 00:00,"));
    assert!(out.contains("\r4 [elapsed: 00:00,"));
}

#[test]
fn test_meter_counts_on_next_pull() {
    let mut out = Vec::<u8>::new();
    let mut meter = ProgressMeter::new(vec![1, 2], MeterOptions::new(), &mut out);

    assert_eq!(meter.total(), Some(2));
    assert_eq!(meter.next(), Some(1));
    assert_eq!(meter.n(), 0);
    assert_eq!(meter.next(), Some(2));
    assert_eq!(meter.n(), 1);
    assert_eq!(meter.next(), None);
    assert_eq!(meter.n(), 2);
    assert_eq!(meter.next(), None);
    assert_eq!(meter.n(), 2);
}

#[test]
fn test_meter_passes_errors_through() {
    let source: Vec<Result<u8, String>> = vec![Ok(1), Err("boom".to_string()), Ok(3)];
    let (items, _) = run_meter(source.clone(), MeterOptions::new());

    assert_eq!(items, source);
}

#[test]
fn test_meter_is_lazy() {
    let mut out = Vec::<u8>::new();
    {
        let meter = ProgressMeter::new(vec![1, 2, 3], MeterOptions::new(), &mut out);
        assert_eq!(meter.n(), 0);
    }
    assert!(out.is_empty());

    let mut meter = ProgressMeter::new(vec![1, 2, 3], MeterOptions::new(), &mut out);
    std::thread::sleep(Duration::from_millis(1100));
    assert_eq!(meter.next(), Some(1));
    drop(meter);

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\r|----------| 0/3   0% [elapsed: 00:00 left: ?, ? iters/sec]"
    );
}

#[test]
fn test_meter_elapsed_starts_on_first_pull() {
    let mut out = Vec::<u8>::new();
    let mut meter = ProgressMeter::new(
        0..2,
        MeterOptions::new().min_interval(Duration::ZERO),
        &mut out,
    );

    // setup time before iterating is not part of the elapsed time
    std::thread::sleep(Duration::from_millis(1100));
    assert_eq!(meter.next(), Some(0));
    assert_eq!(meter.next(), Some(1));
    drop(meter);

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("\r|#####-----| 1/2  50% [elapsed: 00:00 left: 00:00,"), "{out:?}");
}

#[test]
fn test_meter_stays_exhausted() {
    fn assert_fused<I: FusedIterator>(_: &I) {}

    let mut out = Vec::<u8>::new();
    let mut meter = ProgressMeter::new(Vec::<u8>::new(), MeterOptions::new().leave(true), &mut out);
    assert_fused(&meter);

    assert_eq!(meter.next(), None);
    assert_eq!(meter.next(), None);
    assert_eq!(meter.size_hint(), (0, Some(0)));
    drop(meter);

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.matches('\n').count(), 1);
    assert_eq!(out.matches("iters/sec").count(), 1);
}

use std::io::{self, Write};

/// Rewrites a single terminal row in place.
#[derive(Debug)]
pub struct StatusPrinter<W: Write> {
    writer: W,
    last_printed_len: usize,
}

impl<W: Write> StatusPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_printed_len: 0,
        }
    }

    /// Overwrite the current row with `status`, padding out whatever is left
    /// of the previous line.
    pub fn print_status(&mut self, status: &str) -> io::Result<()> {
        let len = status.chars().count();
        let padding = self.last_printed_len.saturating_sub(len);

        write!(self.writer, "\r{status}{}", " ".repeat(padding))?;
        self.writer.flush()?;

        self.last_printed_len = len;
        Ok(())
    }

    /// Write raw text without touching the recorded line length.
    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}

#[test]
fn test_print_status_pads_shorter_lines() {
    let mut out = Vec::new();
    {
        let mut printer = StatusPrinter::new(&mut out);
        printer.print_status("abcdef").unwrap();
        printer.print_status("abc").unwrap();
        printer.print_status("abcd").unwrap();
    }

    assert_eq!(String::from_utf8(out).unwrap(), "\rabcdef\rabc   \rabcd");
}

#[test]
fn test_print_status_counts_characters() {
    let mut out = Vec::new();
    {
        let mut printer = StatusPrinter::new(&mut out);
        printer.print_status("héllo").unwrap();
        printer.print_status("").unwrap();
    }

    assert_eq!(String::from_utf8(out).unwrap(), "\rhéllo\r     ");
}

//! Reading truth tables from text.
//!
//! The input is line oriented:
//!
//! ```text
//! mode 0
//! 00 1
//! 01 -
//! 11 0
//!
//! ```
//!
//! Each line holds an argument vector and a single value character separated
//! by spaces. An optional `mode <c>` directive may only be the very first line.
//! Input ends at the first empty line or at the end of the stream. Lines that
//! cannot be used are collected as [`Rejected`] and reading goes on.

use std::io::BufRead;

use log::{debug, warn};

use crate::error::{ParseError, Result};
use crate::table::VectorTable;
use crate::types::Mode;
use crate::vector::Vector;

/// A line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// 1-based line number.
    pub line_no: usize,
    pub text: String,
    pub error: ParseError,
}

/// Everything read from one input stream.
#[derive(Debug, Default)]
pub struct Input {
    pub table: VectorTable,
    pub mode: Mode,
    pub rejected: Vec<Rejected>,
}

pub struct Reader<R> {
    inner: R,
    mode: Mode,
}

enum Line<'a> {
    Mode(char),
    Entry(&'a str, char),
}

impl<R: BufRead> Reader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            mode: Mode::default(),
        }
    }

    /// Start in `mode` instead of the default. A directive in the input
    /// still overrides it.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Read entries up to the first empty line or the end of the stream.
    ///
    /// Only I/O failures and allocation failures abort; malformed lines end
    /// up in [`Input::rejected`].
    pub fn read_table(mut self) -> Result<Input> {
        let mut input = Input {
            mode: self.mode,
            ..Input::default()
        };
        let mut buf = String::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if self.inner.read_line(&mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let line = buf.trim_end_matches(|c: char| c == '\n' || c == '\r');
            if line.is_empty() {
                break;
            }

            let result = split_line(line).and_then(|parsed| match parsed {
                Line::Mode(_) if line_no != 1 => Err(ParseError::MisplacedMode),
                Line::Mode(ch) => {
                    input.mode = Mode::from_directive(ch);
                    debug!("reader: mode {}", input.mode);
                    Ok(None)
                }
                Line::Entry(vector, value) => Vector::parse(vector, value, input.mode).map(Some),
            });

            match result {
                Ok(Some(vector)) => input.table.push(vector)?,
                Ok(None) => {}
                Err(error) => {
                    warn!("line {}: {} ({:?})", line_no, error, line);
                    input.rejected.try_reserve(1)?;
                    input.rejected.push(Rejected {
                        line_no,
                        text: line.to_string(),
                        error,
                    });
                }
            }
        }

        debug!(
            "reader: {} entries, {} rejected, {} lines",
            input.table.len(),
            input.rejected.len(),
            line_no
        );
        Ok(input)
    }
}

/// Read a whole table from a string.
pub fn parse_table(text: &str) -> Result<Input> {
    Reader::new(text.as_bytes()).read_table()
}

fn split_line(line: &str) -> std::result::Result<Line<'_>, ParseError> {
    let mut fields = line.split(' ').filter(|f| !f.is_empty());
    let vector = fields.next().ok_or(ParseError::MalformedLine)?;
    let value = fields.next().ok_or(ParseError::MissingOutcome)?;

    let mut chars = value.chars();
    let ch = match (chars.next(), chars.next()) {
        (Some(ch), None) => ch,
        _ => return Err(ParseError::MalformedLine),
    };

    if vector == "mode" {
        Ok(Line::Mode(ch))
    } else {
        Ok(Line::Entry(vector, ch))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::types::Outcome;

    fn texts(input: &Input) -> Vec<String> {
        input.table.iter().map(Vector::to_text).collect()
    }

    #[test]
    fn test_read_entries() {
        let input = parse_table("00 1\n01 -\n11 1\n").unwrap();
        assert_eq!(texts(&input), vec!["00", "01", "11"]);
        assert_eq!(input.table[1].outcome(), Outcome::DontCare);
        assert_eq!(input.mode, Mode::One);
        assert!(input.rejected.is_empty());
    }

    #[test]
    fn test_empty_line_ends_input() {
        let input = parse_table("00 1\n\n11 1\n").unwrap();
        assert_eq!(texts(&input), vec!["00"]);
    }

    #[test]
    fn test_last_line_without_newline() {
        let input = parse_table("00 1\r\n10 1").unwrap();
        assert_eq!(texts(&input), vec!["00", "10"]);
    }

    #[test]
    fn test_mode_directive() {
        let input = parse_table("mode 0\n00 0\n01 1\n11 -\n").unwrap();
        assert_eq!(input.mode, Mode::Zero);
        // The `1` row is a zero of the complement and is skipped.
        assert_eq!(texts(&input), vec!["00", "11"]);
        assert_eq!(input.rejected.len(), 1);
        assert_eq!(input.rejected[0].line_no, 3);
        assert_eq!(input.rejected[0].error, ParseError::ZeroOutcome);
    }

    #[test]
    fn test_mode_only_on_first_line() {
        let input = parse_table("00 1\nmode 0\n01 1\n").unwrap();
        assert_eq!(input.mode, Mode::One);
        assert_eq!(texts(&input), vec!["00", "01"]);
        assert_eq!(
            input.rejected,
            vec![Rejected {
                line_no: 2,
                text: "mode 0".to_string(),
                error: ParseError::MisplacedMode,
            }]
        );
    }

    #[test]
    fn test_rejected_lines() {
        let input = parse_table("0x 1\n01\n01 10\n 1 1\n0 2\n0 0\n1  1\n").unwrap();
        assert_eq!(texts(&input), vec!["1", "1"]);
        let errors: Vec<ParseError> = input.rejected.iter().map(|r| r.error).collect();
        assert_eq!(
            errors,
            vec![
                ParseError::InvalidDigit { ch: 'x', position: 1 },
                ParseError::MissingOutcome,
                ParseError::MalformedLine,
                ParseError::InvalidOutcome { ch: '2' },
                ParseError::ZeroOutcome,
            ]
        );
    }

    #[test]
    fn test_too_long_vector() {
        let long = "1".repeat(Vector::MAX_LEN + 1);
        let input = parse_table(&format!("{} 1\n", long)).unwrap();
        assert!(input.table.is_empty());
        assert_eq!(input.rejected[0].error, ParseError::TooLong { len: 33 });
    }

    #[test]
    fn test_reader_default_mode() {
        let input = Reader::new("0 0\n".as_bytes()).with_mode(Mode::Zero).read_table().unwrap();
        assert_eq!(input.mode, Mode::Zero);
        assert_eq!(input.table.len(), 1);
    }
}

//! Process-Definition Parser
//!
//! # Format
//!
//! One process per non-empty, non-comment (`#`-prefixed) line, with
//! whitespace-separated fields in order:
//!
//! ```text
//! P<pid> <arrival> <burst_list> <priority> <required_pages>
//! ```
//!
//! `burst_list` is a sequence of `CPU(<n>)` and `E/S(<n>)` tokens (the
//! latter an I/O burst), joined by commas, whitespace, or both:
//!
//! ```text
//! # pid  arrival  bursts                 priority  pages
//! P1     0        CPU(4),E/S(3),CPU(5)   2         6
//! 2      3        CPU(2) E/S(1) CPU(2)   1         4
//! ```
//!
//! The pid may be bare or `P`/`p`-prefixed. Invalid lines are skipped
//! with a logged diagnostic and do not abort parsing.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::domain::clock::Tick;
use crate::domain::process::{Burst, BurstKind, Pid, ProcessDescriptor};

/// Failure to read a definition file at all. Per-line problems are not
/// errors; offending lines are skipped with a diagnostic.
#[derive(Debug)]
pub enum ParseError {
    /// The file could not be opened or read.
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "cannot read process definitions: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Parse a definition file into descriptors.
///
/// # Errors
///
/// Only I/O failures are errors; malformed lines are skipped.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<ProcessDescriptor>, ParseError> {
    let content = fs::read_to_string(path)?;
    Ok(parse_str(&content))
}

/// Parse definitions from a string, skipping invalid lines.
pub fn parse_str(input: &str) -> Vec<ProcessDescriptor> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .filter_map(|(idx, line)| {
            let result = parse_line(line);
            if result.is_none() {
                warn!(target: "sys", line = idx + 1, "invalid process definition skipped");
            }
            result
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ProcessDescriptor> {
    let mut tokens = line.split_whitespace();

    let pid = parse_pid(tokens.next()?)?;
    let arrival_time: Tick = tokens.next()?.parse().ok()?;

    // Burst tokens run until the first token that is not one; that token
    // is the priority.
    let mut bursts = Vec::new();
    let mut priority: Option<i32> = None;
    for token in tokens.by_ref() {
        if token.starts_with("CPU(") || token.starts_with("E/S(") {
            bursts.extend(parse_burst_group(token));
        } else {
            priority = token.parse().ok();
            break;
        }
    }
    let priority = priority?;
    let required_pages: usize = tokens.next()?.parse().ok()?;

    if bursts.is_empty() {
        return None;
    }

    Some(ProcessDescriptor {
        pid,
        arrival_time,
        priority,
        required_pages,
        bursts,
    })
}

/// `"P1"`, `"p1"`, or `"1"`.
fn parse_pid(token: &str) -> Option<Pid> {
    let digits = token.strip_prefix(['P', 'p']).unwrap_or(token);
    digits.parse().ok().map(Pid::new)
}

/// One whitespace token of comma-joined burst specs, e.g.
/// `"CPU(4),E/S(3)"`. Unparseable segments are dropped with a diagnostic.
fn parse_burst_group(token: &str) -> Vec<Burst> {
    token
        .split(',')
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let burst = parse_burst(segment);
            if burst.is_none() {
                warn!(target: "sys", segment, "invalid burst token skipped");
            }
            burst
        })
        .collect()
}

/// `"CPU(4)"` or `"E/S(3)"` with a strictly positive duration.
fn parse_burst(segment: &str) -> Option<Burst> {
    let (kind, rest) = if let Some(rest) = segment.strip_prefix("CPU(") {
        (BurstKind::Cpu, rest)
    } else if let Some(rest) = segment.strip_prefix("E/S(") {
        (BurstKind::Io, rest)
    } else {
        return None;
    };
    let duration: u32 = rest.strip_suffix(')')?.parse().ok()?;
    Burst::new(kind, duration)
}

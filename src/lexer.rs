//! Shared lexing helpers for the table decoders.
//!
//! All seven NBO tables are decoded the same way: the section block is split
//! into physical lines, blank lines, rules and column headers are dropped, and
//! the remaining lines are grouped into [`LogicalRow`]s. A logical row starts
//! at a line that matches the table's row-start pattern and, for tables that
//! wrap, absorbs the continuation lines printed directly below it.
//!
//! This module also parses the NBO labels (`BD*(   1) C   5 - C   6`) shared
//! by four of the tables, and provides strict numeric field parsing that
//! reports the offending row.

use crate::error::DecodeError;
use crate::locator::SectionBlock;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    // "BD*(   1) C   5 - C   6", "CR (   1) C   1", "3C (   1) B   1 - H   3 - B   2"
    static ref LABEL_RE: Regex = Regex::new(
        r"^\s*(?P<kind>[A-Z0-9]{2}n?\*?)\s*\(\s*(?P<serial>\d+)\s*\)\s*(?P<centers>[A-Z][a-z]?\s*\d+(?:\s*-\s*[A-Z][a-z]?\s*\d+)*)"
    ).unwrap();

    static ref CENTER_RE: Regex = Regex::new(r"(?P<symbol>[A-Z][a-z]?)\s*(?P<number>\d+)").unwrap();

    // Leading NBO index: "  12. "
    static ref INDEX_RE: Regex = Regex::new(r"^\s*(?P<index>\d+)\.\s*").unwrap();
}

/// How a table treats unrecognized lines once its first row was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prose {
    /// The first unrecognized line ends the table
    Ends,
    /// Unrecognized lines are skipped
    Skipped,
}

/// Line classification rules of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    /// Pattern of a line that opens a row; loose enough that a damaged data
    /// line still opens one and is rejected by the decoder
    pub row_start: &'static Regex,
    /// Literal substrings of column-header lines
    pub headers: &'static [&'static str],
    /// Literal substrings of lines that close the table
    pub ends: &'static [&'static str],
    /// Whether non-blank lines directly below a row belong to it
    pub continuation: bool,
    /// Handling of prose after the first row
    pub prose: Prose,
}

/// One table row, possibly spanning several physical lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRow {
    /// 1-based log line number of the first physical line
    pub line: usize,
    /// Physical lines in file order, first one is the row start
    pub lines: Vec<String>,
}

impl LogicalRow {
    fn new(line: usize, text: &str) -> Self {
        Self {
            line,
            lines: vec![text.to_string()],
        }
    }

    /// First physical line of the row.
    pub fn head(&self) -> &str {
        &self.lines[0]
    }

    /// Physical lines below the first one.
    pub fn continuation(&self) -> &[String] {
        &self.lines[1..]
    }

    /// Row text with continuation lines merged in, joined by single spaces.
    pub fn text(&self) -> String {
        let mut merged = self.lines[0].trim_end().to_string();
        for line in &self.lines[1..] {
            merged.push(' ');
            merged.push_str(line.trim());
        }
        merged
    }

    /// Builds a [`DecodeError::MalformedRow`] for this row.
    pub fn malformed(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::MalformedRow {
            line: self.line,
            text: self.text().trim().to_string(),
            reason: reason.into(),
        }
    }

    /// Parses a floating-point field, failing on anything but a finite number.
    pub fn float(&self, token: &str, field: &str) -> Result<f64, DecodeError> {
        token
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.malformed(format!("invalid {} '{}'", field, token)))
    }

    /// Parses an unsigned integer field.
    pub fn integer(&self, token: &str, field: &str) -> Result<u32, DecodeError> {
        token
            .parse::<u32>()
            .map_err(|_| self.malformed(format!("invalid {} '{}'", field, token)))
    }

    /// Parses a field that is either a number or the `--` placeholder.
    pub fn optional_float(&self, token: &str, field: &str) -> Result<Option<f64>, DecodeError> {
        if token == "--" {
            Ok(None)
        } else {
            self.float(token, field).map(Some)
        }
    }
}

/// Returns true for lines made only of `-`, `=` and spaces.
pub fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-' || c == '=' || c == ' ')
}

/// Groups the lines of `block` into logical rows according to `layout`.
pub fn logical_rows(block: &SectionBlock<'_>, layout: &TableLayout) -> Vec<LogicalRow> {
    let mut rows = Vec::new();
    let mut current: Option<LogicalRow> = None;

    for (line_no, line) in block.numbered_lines() {
        let started = current.is_some() || !rows.is_empty();

        if started && layout.ends.iter().any(|end| line.contains(end)) {
            break;
        }
        if line.trim().is_empty()
            || is_rule(line)
            || layout.headers.iter().any(|header| line.contains(header))
        {
            rows.extend(current.take());
            continue;
        }
        if layout.row_start.is_match(line) {
            rows.extend(current.take());
            current = Some(LogicalRow::new(line_no, line));
            continue;
        }
        if layout.continuation {
            if let Some(row) = current.as_mut() {
                row.lines.push(line.to_string());
                continue;
            }
        }
        if started && layout.prose == Prose::Ends {
            break;
        }
    }

    rows.extend(current);
    rows
}

/// Kind of a natural bond orbital, in NBO notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NboKind {
    /// `CR` one-center core pair
    Core,
    /// `LP` one-center valence lone pair
    LonePair,
    /// `LP*` one-center empty lone pair
    EmptyLonePair,
    /// `LV` one-center lone vacancy
    LoneVacancy,
    /// `BD` two-center bond
    Bond,
    /// `BD*` two-center antibond
    Antibond,
    /// `3C` three-center bond
    ThreeCenter,
    /// `3Cn` three-center nonbond
    ThreeCenterNonbond,
    /// `3C*` three-center antibond
    ThreeCenterAntibond,
    /// `RY*` (or `RY`) one-center Rydberg orbital
    Rydberg,
}

impl NboKind {
    /// Whether the orbital belongs to the Lewis structure.
    pub fn is_lewis(self) -> bool {
        matches!(
            self,
            NboKind::Core
                | NboKind::LonePair
                | NboKind::Bond
                | NboKind::ThreeCenter
                | NboKind::ThreeCenterNonbond
        )
    }

    /// NBO notation of the kind.
    pub fn notation(self) -> &'static str {
        match self {
            NboKind::Core => "CR",
            NboKind::LonePair => "LP",
            NboKind::EmptyLonePair => "LP*",
            NboKind::LoneVacancy => "LV",
            NboKind::Bond => "BD",
            NboKind::Antibond => "BD*",
            NboKind::ThreeCenter => "3C",
            NboKind::ThreeCenterNonbond => "3Cn",
            NboKind::ThreeCenterAntibond => "3C*",
            NboKind::Rydberg => "RY*",
        }
    }
}

impl FromStr for NboKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CR" => Ok(NboKind::Core),
            "LP" => Ok(NboKind::LonePair),
            "LP*" => Ok(NboKind::EmptyLonePair),
            "LV" => Ok(NboKind::LoneVacancy),
            "BD" => Ok(NboKind::Bond),
            "BD*" => Ok(NboKind::Antibond),
            "3C" => Ok(NboKind::ThreeCenter),
            "3Cn" => Ok(NboKind::ThreeCenterNonbond),
            "3C*" => Ok(NboKind::ThreeCenterAntibond),
            "RY*" | "RY" => Ok(NboKind::Rydberg),
            other => Err(format!("unknown NBO type '{}'", other)),
        }
    }
}

impl fmt::Display for NboKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

/// An atomic center: element symbol and atom number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Center {
    /// Element symbol as printed (e.g. "C", "Cl")
    pub symbol: String,
    /// 1-based atom number
    pub number: u32,
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.symbol, self.number)
    }
}

/// An NBO label such as `BD*(1) C5-C6`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NboLabel {
    /// Orbital kind
    pub kind: NboKind,
    /// Serial number among orbitals of the same kind on the same centers
    pub serial: u32,
    /// Atomic centers, one for CR/LP/RY, two for BD, three for 3C
    pub centers: Vec<Center>,
}

impl fmt::Display for NboLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) ", self.kind, self.serial)?;
        for (i, center) in self.centers.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", center)?;
        }
        Ok(())
    }
}

/// Parses an NBO label at the start of `text`.
///
/// Returns the label and the unparsed remainder, or `None` when `text` does
/// not start with a label.
pub fn parse_label(text: &str) -> Option<(NboLabel, &str)> {
    let caps = LABEL_RE.captures(text)?;
    let kind = caps["kind"].parse::<NboKind>().ok()?;
    let serial = caps["serial"].parse::<u32>().ok()?;

    let mut centers = Vec::new();
    for center in CENTER_RE.captures_iter(&caps["centers"]) {
        centers.push(Center {
            symbol: center["symbol"].to_string(),
            number: center["number"].parse().ok()?,
        });
    }

    let end = caps.get(0)?.end();
    Some((
        NboLabel {
            kind,
            serial,
            centers,
        },
        &text[end..],
    ))
}

/// Parses `"  12. BD (   1) C   1 - H   2 ..."` into index, label and remainder.
pub fn parse_indexed_label(text: &str) -> Option<(u32, NboLabel, &str)> {
    let caps = INDEX_RE.captures(text)?;
    let index = caps["index"].parse::<u32>().ok()?;
    let rest = &text[caps.get(0)?.end()..];
    let (label, rest) = parse_label(rest)?;
    Some((index, label, rest))
}

//! Second order perturbation theory analysis of the Fock matrix.
//!
//! ```text
//!      Threshold for printing:   0.50 kcal/mol
//!                                                           E(2)  E(j)-E(i) F(i,j)
//!       Donor NBO (i)                Acceptor NBO (j)      kcal/mol   a.u.      a.u.
//!  ===================================================================================
//!
//!  within unit  1
//!    2. BD (   1) C   1 - H   2      / 15. RY*(   1) H   3            0.59    1.37    0.025
//! ```
//!
//! Each donor-acceptor pair is printed under the molecular-unit heading it
//! belongs to. Long acceptor labels wrap onto the next line.

use crate::decoder::{non_empty, SectionDecoder};
use crate::error::DecodeError;
use crate::lexer::{logical_rows, parse_indexed_label, LogicalRow, NboLabel, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*(?:\d|within unit|from unit)").unwrap();

    static ref WITHIN_UNIT_RE: Regex = Regex::new(r"^\s*within unit\s+(?P<unit>\d+)\s*$").unwrap();

    static ref FROM_UNIT_RE: Regex =
        Regex::new(r"^\s*from unit\s+(?P<from>\d+)\s+to unit\s+(?P<to>\d+)\s*$").unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["Threshold for printing", "E(2)", "Donor NBO", "None above threshold"],
        ends: &[],
        continuation: true,
        prose: Prose::Ends,
    }
}

/// Molecular units a donor-acceptor pair spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitScope {
    /// Unit holding the donor
    pub from: u32,
    /// Unit holding the acceptor
    pub to: u32,
}

impl UnitScope {
    /// Whether donor and acceptor sit on the same unit.
    pub fn is_intramolecular(&self) -> bool {
        self.from == self.to
    }
}

/// One donor-acceptor interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    /// Donor NBO index
    pub donor_index: u32,
    /// Donor NBO label
    pub donor: NboLabel,
    /// Acceptor NBO index
    pub acceptor_index: u32,
    /// Acceptor NBO label
    pub acceptor: NboLabel,
    /// Stabilization energy E(2) in kcal/mol
    pub e2: f64,
    /// Orbital energy difference E(j)-E(i) in a.u.
    pub energy_gap: f64,
    /// Fock matrix element F(i,j) in a.u.
    pub fock: f64,
    /// Unit heading the row was printed under
    pub units: Option<UnitScope>,
}

enum Line {
    Scope(UnitScope),
    Pair(Interaction),
}

/// Decoder for [`SectionMarker::SecondOrderPerturbation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PerturbationDecoder;

impl PerturbationDecoder {
    fn decode_row(row: &LogicalRow, units: Option<UnitScope>) -> Result<Line, DecodeError> {
        let text = row.text();

        if let Some(caps) = WITHIN_UNIT_RE.captures(&text) {
            let unit = row.integer(&caps["unit"], "unit")?;
            return Ok(Line::Scope(UnitScope { from: unit, to: unit }));
        }
        if let Some(caps) = FROM_UNIT_RE.captures(&text) {
            return Ok(Line::Scope(UnitScope {
                from: row.integer(&caps["from"], "donor unit")?,
                to: row.integer(&caps["to"], "acceptor unit")?,
            }));
        }

        let (donor_text, acceptor_text) = text
            .split_once('/')
            .ok_or_else(|| row.malformed("missing `/` between donor and acceptor"))?;

        let (donor_index, donor, rest) =
            parse_indexed_label(donor_text).ok_or_else(|| row.malformed("invalid donor NBO"))?;
        if !rest.trim().is_empty() {
            return Err(row.malformed(format!("unexpected text '{}' after donor NBO", rest.trim())));
        }

        let (acceptor_index, acceptor, rest) =
            parse_indexed_label(acceptor_text).ok_or_else(|| row.malformed("invalid acceptor NBO"))?;
        let values: Vec<&str> = rest.split_whitespace().collect();
        if values.len() != 3 {
            return Err(row.malformed(format!(
                "expected E(2), E(j)-E(i) and F(i,j), found {} values",
                values.len()
            )));
        }

        Ok(Line::Pair(Interaction {
            donor_index,
            donor,
            acceptor_index,
            acceptor,
            e2: row.float(values[0], "E(2)")?,
            energy_gap: row.float(values[1], "E(j)-E(i)")?,
            fock: row.float(values[2], "F(i,j)")?,
            units,
        }))
    }
}

impl SectionDecoder for PerturbationDecoder {
    type Record = Vec<Interaction>;
    const MARKER: SectionMarker = SectionMarker::SecondOrderPerturbation;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let mut units = None;
        let mut interactions = Vec::new();
        for row in logical_rows(block, &layout()) {
            match Self::decode_row(&row, units)? {
                Line::Scope(scope) => units = Some(scope),
                Line::Pair(interaction) => interactions.push(interaction),
            }
        }
        non_empty(interactions)
    }
}

//! Summary of natural population analysis.
//!
//! ```text
//!  Summary of Natural Population Analysis:
//!
//!                                      Natural Population
//!               Natural  ---------------------------------------------
//!    Atom  No    Charge         Core      Valence    Rydberg      Total
//!  -----------------------------------------------------------------------
//!       C    1   -0.62458      1.99914     4.60809    0.01735     6.62458
//!  =======================================================================
//!    * Total *    0.00000      1.99914     7.96743    0.01343    10.00000
//! ```
//!
//! Some outputs print the table without atom numbers or without the total
//! column. The column set is fixed once per block, from the column header when
//! one is printed and from the first row otherwise; every row must carry it.

use crate::decoder::{non_empty, SectionDecoder};
use crate::error::DecodeError;
use crate::lexer::{logical_rows, LogicalRow, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*[A-Z][a-z]?\s+\S").unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["Natural", "Charge"],
        ends: &["* Total *", "===="],
        continuation: false,
        prose: Prose::Ends,
    }
}

/// Per-atom natural population row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtomPopulation {
    /// Element symbol
    pub symbol: String,
    /// Atom number, when the table prints one
    pub number: Option<u32>,
    /// Natural atomic charge
    pub natural_charge: f64,
    /// Core electron population
    pub core: f64,
    /// Valence electron population
    pub valence: f64,
    /// Rydberg electron population
    pub rydberg: f64,
    /// Total electron population, when the table prints one
    pub total: Option<f64>,
}

impl AtomPopulation {
    /// Atom label: `C1` when numbered, `C` otherwise.
    pub fn atom_label(&self) -> String {
        match self.number {
            Some(number) => format!("{}{}", self.symbol, number),
            None => self.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    numbered: bool,
    total: bool,
}

impl Columns {
    fn from_header(block: &SectionBlock<'_>) -> Option<Self> {
        block
            .text
            .lines()
            .find(|line| line.contains("Charge") && line.contains("Core"))
            .map(|line| Columns {
                numbered: line.split_whitespace().any(|t| t == "No"),
                total: line.contains("Total"),
            })
    }

    fn from_row(tokens: &[&str]) -> Self {
        let numbered = tokens
            .get(1)
            .is_some_and(|t| t.chars().all(|c| c.is_ascii_digit()));
        let values = tokens.len().saturating_sub(1 + usize::from(numbered));
        Columns {
            numbered,
            total: values >= 5,
        }
    }

    fn width(self) -> usize {
        1 + usize::from(self.numbered) + 4 + usize::from(self.total)
    }
}

/// Decoder for [`SectionMarker::NaturalPopulation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NpaDecoder;

impl NpaDecoder {
    fn decode_row(row: &LogicalRow, columns: Columns) -> Result<AtomPopulation, DecodeError> {
        let text = row.text();
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != columns.width() {
            return Err(row.malformed(format!(
                "expected {} fields, found {}",
                columns.width(),
                tokens.len()
            )));
        }

        let mut fields = tokens.iter().copied();
        let symbol = fields.next().unwrap_or_default().to_string();
        let number = if columns.numbered {
            Some(row.integer(fields.next().unwrap_or_default(), "atom number")?)
        } else {
            None
        };
        let natural_charge = row.float(fields.next().unwrap_or_default(), "natural charge")?;
        let core = row.float(fields.next().unwrap_or_default(), "core population")?;
        let valence = row.float(fields.next().unwrap_or_default(), "valence population")?;
        let rydberg = row.float(fields.next().unwrap_or_default(), "Rydberg population")?;
        let total = if columns.total {
            Some(row.float(fields.next().unwrap_or_default(), "total population")?)
        } else {
            None
        };

        Ok(AtomPopulation {
            symbol,
            number,
            natural_charge,
            core,
            valence,
            rydberg,
            total,
        })
    }
}

impl SectionDecoder for NpaDecoder {
    type Record = Vec<AtomPopulation>;
    const MARKER: SectionMarker = SectionMarker::NaturalPopulation;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let rows = logical_rows(block, &layout());
        let columns = match Columns::from_header(block) {
            Some(columns) => columns,
            None => match rows.first() {
                Some(first) => Columns::from_row(&first.text().split_whitespace().collect::<Vec<_>>()),
                None => return Err(DecodeError::EmptySection),
            },
        };

        let atoms = rows
            .iter()
            .map(|row| Self::decode_row(row, columns))
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(atoms)
    }
}

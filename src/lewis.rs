//! Lewis-structure search summary printed under the NBO analysis banner.
//!
//! ```text
//!  NATURAL BOND ORBITAL ANALYSIS:
//!
//!                        Occupancies       Lewis Structure    Low   High
//!            Max    Occ  -------------------  -----------------   occ   occ
//!     Cycle  Ctr   Thresh   Lewis   Non-Lewis     CR  BD  3C  LP    (L)   (NL)   Dev
//!  =============================================================================
//!    1(1)    2     1.90     9.95184   0.04816      1   4   0   0     0      0    0.03
//!  -----------------------------------------------------------------------------
//!
//!  Structure accepted: No low occupancy Lewis orbitals
//!
//!  --------------------------------------------------------
//!    Core                      1.99914 ( 99.957% of   2)
//!    Valence Lewis             7.95270 ( 99.409% of   8)
//!   ==================       ============================
//!    Total Lewis               9.95184 ( 99.518% of  10)
//! ```
//!
//! The block carries two tables: one row per search cycle and one row per
//! occupancy category. Prose between them is skipped.

use crate::decoder::SectionDecoder;
use crate::error::DecodeError;
use crate::lexer::{logical_rows, LogicalRow, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex =
        Regex::new(r"^\s*(?:\d|(?:Core|Valence|Rydberg|Total)\s)").unwrap();

    static ref CYCLE_RE: Regex = Regex::new(r"^\s*(?P<cycle>\d+)\(\s*(?P<pass>\d+)\)\s+(?P<rest>.*)$").unwrap();

    static ref SHARE_RE: Regex = Regex::new(
        r"^\s*(?P<category>[A-Za-z][A-Za-z -]*?)\s+(?P<occupancy>\S+)\s+\(\s*(?P<percent>\S+)%\s+of\s+(?P<electrons>\S+)\s*\)\s*$"
    ).unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["Occupancies", "Cycle", "Structure accepted"],
        ends: &[],
        continuation: false,
        prose: Prose::Skipped,
    }
}

/// One cycle of the Lewis-structure search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCycle {
    /// Cycle number
    pub cycle: u32,
    /// Pass within the cycle
    pub pass: u32,
    /// Maximum number of centers searched
    pub max_centers: u32,
    /// Occupancy threshold
    pub threshold: f64,
    /// Total Lewis occupancy
    pub lewis: f64,
    /// Total non-Lewis occupancy
    pub non_lewis: f64,
    /// Core orbitals in the structure
    pub core: u32,
    /// Two-center bonds in the structure
    pub bonds: u32,
    /// Three-center bonds in the structure
    pub three_center: u32,
    /// Lone pairs in the structure
    pub lone_pairs: u32,
    /// Low-occupancy Lewis orbitals
    pub low_occupancy_lewis: u32,
    /// High-occupancy non-Lewis orbitals
    pub high_occupancy_non_lewis: u32,
    /// Deviation
    pub deviation: f64,
}

/// Share of the electrons held by one occupancy category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyShare {
    /// Category as printed (`Core`, `Valence Lewis`, `Total non-Lewis`, ...)
    pub category: String,
    /// Occupancy (electrons)
    pub occupancy: f64,
    /// Percentage of the reference electron count
    pub percent: f64,
    /// Reference electron count
    pub electrons: u32,
}

/// Decoded Lewis-structure summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LewisSummary {
    /// Search cycles in file order
    pub cycles: Vec<SearchCycle>,
    /// Occupancy categories in file order
    pub occupancies: Vec<OccupancyShare>,
}

impl LewisSummary {
    /// Total number of decoded rows.
    pub fn len(&self) -> usize {
        self.cycles.len() + self.occupancies.len()
    }

    /// Whether no row was decoded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupancy of a category, e.g. `"Total Lewis"`.
    pub fn occupancy_of(&self, category: &str) -> Option<f64> {
        self.occupancies
            .iter()
            .find(|share| share.category == category)
            .map(|share| share.occupancy)
    }
}

/// Decoder for [`SectionMarker::NaturalBondOrbitalAnalysis`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LewisDecoder;

impl LewisDecoder {
    fn decode_cycle(row: &LogicalRow, caps: &regex::Captures<'_>) -> Result<SearchCycle, DecodeError> {
        let values: Vec<&str> = caps["rest"].split_whitespace().collect();
        if values.len() != 11 {
            return Err(row.malformed(format!(
                "expected 12 columns ({}), found {}",
                SectionMarker::NaturalBondOrbitalAnalysis.spec().column_list(),
                values.len() + 1
            )));
        }
        Ok(SearchCycle {
            cycle: row.integer(&caps["cycle"], "cycle")?,
            pass: row.integer(&caps["pass"], "pass")?,
            max_centers: row.integer(values[0], "max centers")?,
            threshold: row.float(values[1], "occupancy threshold")?,
            lewis: row.float(values[2], "Lewis occupancy")?,
            non_lewis: row.float(values[3], "non-Lewis occupancy")?,
            core: row.integer(values[4], "CR count")?,
            bonds: row.integer(values[5], "BD count")?,
            three_center: row.integer(values[6], "3C count")?,
            lone_pairs: row.integer(values[7], "LP count")?,
            low_occupancy_lewis: row.integer(values[8], "low occupancy count")?,
            high_occupancy_non_lewis: row.integer(values[9], "high occupancy count")?,
            deviation: row.float(values[10], "deviation")?,
        })
    }

    fn decode_share(row: &LogicalRow, text: &str) -> Result<OccupancyShare, DecodeError> {
        let caps = SHARE_RE
            .captures(text)
            .ok_or_else(|| row.malformed("expected `category occupancy ( percent% of electrons )`"))?;
        Ok(OccupancyShare {
            category: caps["category"].to_string(),
            occupancy: row.float(&caps["occupancy"], "occupancy")?,
            percent: row.float(&caps["percent"], "percentage")?,
            electrons: row.integer(&caps["electrons"], "electron count")?,
        })
    }
}

impl SectionDecoder for LewisDecoder {
    type Record = LewisSummary;
    const MARKER: SectionMarker = SectionMarker::NaturalBondOrbitalAnalysis;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let mut summary = LewisSummary {
            cycles: Vec::new(),
            occupancies: Vec::new(),
        };
        for row in logical_rows(block, &layout()) {
            let text = row.text();
            if text.trim_start().starts_with(|c: char| c.is_ascii_digit()) {
                let caps = CYCLE_RE
                    .captures(&text)
                    .ok_or_else(|| row.malformed("expected `cycle(pass)` row"))?;
                summary.cycles.push(Self::decode_cycle(&row, &caps)?);
            } else {
                summary.occupancies.push(Self::decode_share(&row, &text)?);
            }
        }
        if summary.is_empty() {
            return Err(DecodeError::EmptySection);
        }
        Ok(summary)
    }
}

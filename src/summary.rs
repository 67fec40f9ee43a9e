//! Natural bond orbital summary listing.
//!
//! ```text
//!                                                      Principal Delocalizations
//!            NBO                 Occupancy    Energy   (geminal,vicinal,remote)
//!  ===============================================================================
//!  Molecular unit  1  (CH4)
//!  ------ Lewis --------------------------------------
//!     1. CR (   1) C   1           1.99914   -10.02139
//!     2. BD (   1) C   1 - H   2   1.99858    -0.68744   12(v),13(v)
//!  ------ non-Lewis ----------------------------------
//!     6. BD*(   1) C   1 - H   2   0.00034     0.62451
//!           -------------------------------
//!                  Total Lewis    9.99476  ( 99.9476%)
//! ```

use crate::decoder::{non_empty, SectionDecoder};
use crate::error::DecodeError;
use crate::lexer::{logical_rows, parse_indexed_label, LogicalRow, NboLabel, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*(?:\d+\.\s|Molecular unit)").unwrap();

    static ref UNIT_RE: Regex =
        Regex::new(r"^\s*Molecular unit\s+(?P<unit>\d+)\s*(?:\((?P<formula>[^)]*)\))?\s*$").unwrap();

    static ref DELOCALIZATION_RE: Regex = Regex::new(r"^(?P<nbo>\d+)\((?P<reach>[gvr])\)$").unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["------ Lewis", "------ non-Lewis", "Principal Delocalizations", "Occupancy"],
        ends: &[
            "NATURAL LOCALIZED MOLECULAR ORBITAL",
            "NBO analysis completed",
            "Leave Link",
        ],
        continuation: true,
        prose: Prose::Skipped,
    }
}

/// Topological relation between a donor and the acceptor it delocalizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reach {
    /// `g`: acceptor shares an atom with the donor
    Geminal,
    /// `v`: acceptor is one bond away
    Vicinal,
    /// `r`: acceptor is further away
    Remote,
}

/// Entry of the principal delocalization list, e.g. `12(v)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrincipalDelocalization {
    /// Acceptor NBO index
    pub acceptor: u32,
    /// Relation to the donor
    pub reach: Reach,
}

/// One orbital of the summary listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    /// NBO index
    pub index: u32,
    /// NBO label
    pub label: NboLabel,
    /// Occupancy (electrons)
    pub occupancy: f64,
    /// Orbital energy (hartree)
    pub energy: f64,
    /// Principal delocalizations, possibly none
    pub delocalizations: Vec<PrincipalDelocalization>,
    /// Molecular unit the orbital was listed under
    pub unit: Option<u32>,
}

impl SummaryEntry {
    /// Whether the orbital belongs to the Lewis structure.
    pub fn is_lewis(&self) -> bool {
        self.label.kind.is_lewis()
    }
}

fn parse_delocalizations(row: &LogicalRow, text: &str) -> Result<Vec<PrincipalDelocalization>, DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|item| !item.is_empty())
        .map(|item| {
            let caps = DELOCALIZATION_RE
                .captures(item)
                .ok_or_else(|| row.malformed(format!("invalid delocalization '{}'", item)))?;
            let reach = match &caps["reach"] {
                "g" => Reach::Geminal,
                "v" => Reach::Vicinal,
                _ => Reach::Remote,
            };
            Ok(PrincipalDelocalization {
                acceptor: row.integer(&caps["nbo"], "delocalization acceptor")?,
                reach,
            })
        })
        .collect()
}

enum Line {
    Unit(u32),
    Entry(SummaryEntry),
}

/// Decoder for [`SectionMarker::NaturalBondOrbitalSummary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryDecoder;

impl SummaryDecoder {
    fn decode_row(row: &LogicalRow, unit: Option<u32>) -> Result<Line, DecodeError> {
        let text = row.text();
        if let Some(caps) = UNIT_RE.captures(&text) {
            return Ok(Line::Unit(row.integer(&caps["unit"], "molecular unit")?));
        }

        let (index, label, rest) =
            parse_indexed_label(&text).ok_or_else(|| row.malformed("expected `index. NBO label`"))?;
        let mut fields = rest.split_whitespace();
        let occupancy = fields.next().ok_or_else(|| row.malformed("missing occupancy"))?;
        let energy = fields.next().ok_or_else(|| row.malformed("missing energy"))?;
        let delocalizations = fields.collect::<String>();

        Ok(Line::Entry(SummaryEntry {
            index,
            label,
            occupancy: row.float(occupancy, "occupancy")?,
            energy: row.float(energy, "energy")?,
            delocalizations: parse_delocalizations(row, &delocalizations)?,
            unit,
        }))
    }
}

impl SectionDecoder for SummaryDecoder {
    type Record = Vec<SummaryEntry>;
    const MARKER: SectionMarker = SectionMarker::NaturalBondOrbitalSummary;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let mut unit = None;
        let mut entries = Vec::new();
        for row in logical_rows(block, &layout()) {
            match Self::decode_row(&row, unit)? {
                Line::Unit(number) => unit = Some(number),
                Line::Entry(entry) => entries.push(entry),
            }
        }
        non_empty(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> SectionBlock<'_> {
        SectionBlock {
            marker: SectionMarker::NaturalBondOrbitalSummary,
            occurrence: 0,
            first_line: 400,
            text,
        }
    }

    const TABLE: &str = "
                                                     Principal Delocalizations
           NBO                 Occupancy    Energy   (geminal,vicinal,remote)
 ===============================================================================
 Molecular unit  1  (CH4)
 ------ Lewis --------------------------------------
    1. CR (   1) C   1           1.99914   -10.02139
    2. BD (   1) C   1 - H   2   1.99858    -0.68744   12(v),13(v),14(v),15(g),
                                                    16(r)
 ------ non-Lewis ----------------------------------
    6. BD*(   1) C   1 - H   2   0.00034     0.62451
          -------------------------------
                 Total Lewis    9.99476  ( 99.9476%)
           Valence non-Lewis    0.00024  (  0.0024%)
          -------------------------------
               Total unit  1   10.00000  (100.0000%)
              Charge unit  1    0.00000
";

    #[test]
    fn test_decode_summary() {
        let entries = SummaryDecoder.decode(&block(TABLE)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].label.to_string(), "CR(1) C1");
        assert!(entries[0].delocalizations.is_empty());
        assert!((entries[0].energy + 10.02139).abs() < 1e-12);
        assert_eq!(entries[1].unit, Some(1));
        assert!(entries[1].is_lewis());
        assert!(!entries[2].is_lewis());
    }

    #[test]
    fn test_wrapped_delocalizations_are_merged() {
        let entries = SummaryDecoder.decode(&block(TABLE)).unwrap();
        let list = &entries[1].delocalizations;
        assert_eq!(list.len(), 5);
        assert_eq!(list[3], PrincipalDelocalization { acceptor: 15, reach: Reach::Geminal });
        assert_eq!(list[4], PrincipalDelocalization { acceptor: 16, reach: Reach::Remote });
    }

    #[test]
    fn test_table_ends_before_localized_orbitals() {
        let text = format!(
            "{}
 NATURAL LOCALIZED MOLECULAR ORBITAL (NLMO) ANALYSIS:

 Maximum off-diagonal element of DM in NLMO basis:  0.10000D-11

 Hybridization/Polarization Analysis of NLMOs in NAO Basis:
 NLMO/Occupancy/Percent from Parent NBO/ Atomic Hybrid Contributions
 -------------------------------------------------------------------------------
   1. (2.00000)  99.9570%  CR ( 1) C  1
                           99.957% C  1 s(100.00%)
   2. (2.00000)  99.9290%  BD ( 1) C  1- H  2
                           49.873% C  1 s( 25.00%)p 3.00( 75.00%)
",
            TABLE
        );
        let entries = SummaryDecoder.decode(&block(&text)).unwrap();
        assert_eq!(entries, SummaryDecoder.decode(&block(TABLE)).unwrap());
    }

    #[test]
    fn test_missing_energy_is_malformed() {
        let text = "    1. CR (   1) C   1           1.99914\n";
        let err = SummaryDecoder.decode(&block(text)).unwrap_err();
        assert!(err.to_string().contains("missing energy"));
    }

    #[test]
    fn test_bad_delocalization_is_malformed() {
        let text = "    2. BD (   1) C   1 - H   2   1.99858    -0.68744   12(x)\n";
        let err = SummaryDecoder.decode(&block(text)).unwrap_err();
        assert!(err.to_string().contains("invalid delocalization '12(x)'"));
    }
}

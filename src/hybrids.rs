//! Bond orbitals with their hybrid compositions and coefficient vectors.
//!
//! ```text
//!      (Occupancy)   Bond orbital/ Coefficients/ Hybrids
//!  ---------------------------------------------------------------------------------
//!      1. (1.99914) CR (   1) C   1           s(100.00%)
//!                                          1.0000  0.0000  0.0000  0.0000  0.0000
//!      2. (1.99858) BD (   1) C   1- H   2
//!                ( 60.56%)   0.7782* C   1 s( 25.00%)p 3.00( 74.97%)d 0.00(  0.03%)
//!                                          0.0000  0.5000  0.0045  0.7070  0.0000
//!                ( 39.44%)   0.6280* H   2 s(100.00%)
//!                                          1.0000
//! ```
//!
//! One-center orbitals print their composition on the header line; polarized
//! orbitals print one line per center. Compositions with many shells wrap onto
//! a continuation line below the hybrid they belong to.

use crate::decoder::{non_empty, SectionDecoder};
use crate::error::DecodeError;
use crate::lexer::{logical_rows, parse_label, Center, LogicalRow, NboLabel, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*\d+\.\s+\(\s*\d+\.\d+\)").unwrap();

    static ref HEAD_RE: Regex =
        Regex::new(r"^\s*(?P<index>\d+)\.\s+\(\s*(?P<occupancy>\S+)\)\s*(?P<rest>.*)$").unwrap();

    // "( 60.56%)   0.7782* C   1 s( 25.00%)p 3.00( 74.97%)"
    static ref POLARIZATION_RE: Regex = Regex::new(
        r"^\s*\(\s*(?P<percent>\S+)%\)\s+(?P<coefficient>-?\d+\.\d+)\*\s*(?P<symbol>[A-Z][a-z]?)\s*(?P<number>\d+)\s*(?P<rest>.*)$"
    ).unwrap();

    static ref CONTRIBUTION_RE: Regex =
        Regex::new(r"(?P<shell>[spdfg])\s*(?P<ratio>\d+\.\d+)?\(\s*(?P<percent>\d+\.\d+)%\)").unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["(Occupancy)"],
        ends: &[],
        continuation: true,
        prose: Prose::Ends,
    }
}

/// Share of one angular shell in a hybrid, e.g. `p 3.00( 74.97%)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    /// Shell letter (`s`, `p`, `d`, `f`, `g`)
    pub shell: char,
    /// Ratio to the s contribution, printed for every shell but `s`
    pub ratio: Option<f64>,
    /// Percentage of the hybrid
    pub percent: f64,
}

/// Natural hybrid orbital on one center of a bond orbital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hybrid {
    /// Polarization percentage; absent for one-center orbitals
    pub polarization: Option<f64>,
    /// Polarization coefficient; absent for one-center orbitals
    pub coefficient: Option<f64>,
    /// Atomic center
    pub center: Center,
    /// Angular composition
    pub composition: Vec<Contribution>,
    /// Printed NAO coefficient vector
    pub coefficients: Vec<f64>,
}

/// One entry of the bond orbital table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BondOrbital {
    /// NBO index
    pub index: u32,
    /// Occupancy (electrons)
    pub occupancy: f64,
    /// NBO label
    pub label: NboLabel,
    /// One hybrid per center
    pub hybrids: Vec<Hybrid>,
}

/// Parses a run of `s( 25.00%)p 3.00( 74.97%)` contributions.
///
/// Returns `None` unless the whole text is consumed.
fn parse_composition(text: &str) -> Option<Vec<Contribution>> {
    let text = text.trim();
    let mut parts = Vec::new();
    let mut cursor = 0;
    for caps in CONTRIBUTION_RE.captures_iter(text) {
        let whole = caps.get(0)?;
        if !text[cursor..whole.start()].trim().is_empty() {
            return None;
        }
        cursor = whole.end();
        parts.push(Contribution {
            shell: caps["shell"].chars().next()?,
            ratio: match caps.name("ratio") {
                Some(ratio) => Some(ratio.as_str().parse().ok()?),
                None => None,
            },
            percent: caps["percent"].parse().ok()?,
        });
    }
    if parts.is_empty() || !text[cursor..].trim().is_empty() {
        return None;
    }
    Some(parts)
}

/// Parses a line holding only floating-point numbers.
fn parse_coefficients(text: &str) -> Option<Vec<f64>> {
    text.split_whitespace()
        .map(|token| token.parse::<f64>().ok().filter(|value| value.is_finite()))
        .collect()
}

/// Decoder for [`SectionMarker::BondOrbitalHybrids`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridsDecoder;

impl HybridsDecoder {
    fn decode_row(row: &LogicalRow) -> Result<BondOrbital, DecodeError> {
        let head = HEAD_RE
            .captures(row.head())
            .ok_or_else(|| row.malformed("expected `index. (occupancy) label`"))?;
        let index = row.integer(&head["index"], "NBO index")?;
        let occupancy = row.float(&head["occupancy"], "occupancy")?;
        let (label, rest) = parse_label(&head["rest"]).ok_or_else(|| row.malformed("invalid NBO label"))?;

        let mut hybrids = Vec::new();
        if !rest.trim().is_empty() {
            let composition = parse_composition(rest)
                .ok_or_else(|| row.malformed(format!("invalid hybrid composition '{}'", rest.trim())))?;
            let center = match label.centers.as_slice() {
                [center] => center.clone(),
                _ => return Err(row.malformed("composition printed for a multi-center orbital")),
            };
            hybrids.push(Hybrid {
                polarization: None,
                coefficient: None,
                center,
                composition,
                coefficients: Vec::new(),
            });
        }

        for line in row.continuation() {
            if let Some(caps) = POLARIZATION_RE.captures(line) {
                let composition = parse_composition(&caps["rest"]).ok_or_else(|| {
                    row.malformed(format!("invalid hybrid composition '{}'", caps["rest"].trim()))
                })?;
                hybrids.push(Hybrid {
                    polarization: Some(row.float(&caps["percent"], "polarization")?),
                    coefficient: Some(row.float(&caps["coefficient"], "polarization coefficient")?),
                    center: Center {
                        symbol: caps["symbol"].to_string(),
                        number: row.integer(&caps["number"], "atom number")?,
                    },
                    composition,
                    coefficients: Vec::new(),
                });
                continue;
            }

            let hybrid = hybrids
                .last_mut()
                .ok_or_else(|| row.malformed(format!("unexpected line '{}'", line.trim())))?;
            if let Some(values) = parse_coefficients(line) {
                hybrid.coefficients.extend(values);
            } else if let Some(more) = parse_composition(line) {
                hybrid.composition.extend(more);
            } else {
                return Err(row.malformed(format!("unexpected line '{}'", line.trim())));
            }
        }

        if hybrids.is_empty() {
            return Err(row.malformed("bond orbital without hybrids"));
        }

        Ok(BondOrbital {
            index,
            occupancy,
            label,
            hybrids,
        })
    }
}

impl SectionDecoder for HybridsDecoder {
    type Record = Vec<BondOrbital>;
    const MARKER: SectionMarker = SectionMarker::BondOrbitalHybrids;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let orbitals = logical_rows(block, &layout())
            .iter()
            .map(Self::decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(orbitals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::NboKind;

    fn block(text: &str) -> SectionBlock<'_> {
        SectionBlock {
            marker: SectionMarker::BondOrbitalHybrids,
            occurrence: 0,
            first_line: 200,
            text,
        }
    }

    const TABLE: &str = " ---------------------------------------------------------------------------------
     1. (1.99914) CR (   1) C   1           s(100.00%)
                                         1.0000  0.0000  0.0000  0.0000  0.0000
     2. (1.99858) BD (   1) C   1- H   2
               ( 60.56%)   0.7782* C   1 s( 25.00%)p 3.00( 74.97%)d 0.00(  0.03%)
                                         0.0000  0.5000  0.0045  0.7070  0.0000
                                        -0.0010  0.0150
               ( 39.44%)   0.6280* H   2 s(100.00%)
                                         1.0000
     6. (0.00034) BD*(   1) C   1- H   2
               ( 39.44%)   0.6280* C   1 s( 25.00%)p 3.00( 74.97%)
                                                  d 0.00(  0.03%)
                                         0.0000 -0.5000
               ( 60.56%)  -0.7782* H   2 s(100.00%)
                                        -1.0000

 NHO Directionality and \"Bond Bending\"
";

    #[test]
    fn test_decode_one_and_two_center_orbitals() {
        let orbitals = HybridsDecoder.decode(&block(TABLE)).unwrap();
        assert_eq!(orbitals.len(), 3);

        let core = &orbitals[0];
        assert_eq!(core.label.kind, NboKind::Core);
        assert_eq!(core.hybrids.len(), 1);
        assert_eq!(core.hybrids[0].polarization, None);
        assert_eq!(core.hybrids[0].center.to_string(), "C1");
        assert_eq!(core.hybrids[0].composition[0].percent, 100.0);
        assert_eq!(core.hybrids[0].coefficients.len(), 5);

        let bond = &orbitals[1];
        assert_eq!(bond.label.to_string(), "BD(1) C1-H2");
        assert_eq!(bond.hybrids.len(), 2);
        assert_eq!(bond.hybrids[0].polarization, Some(60.56));
        assert_eq!(bond.hybrids[0].composition.len(), 3);
        assert_eq!(bond.hybrids[0].composition[1].ratio, Some(3.0));
        assert_eq!(bond.hybrids[0].coefficients.len(), 7);
        assert_eq!(bond.hybrids[1].center.to_string(), "H2");
    }

    #[test]
    fn test_wrapped_composition_joins_its_hybrid() {
        let orbitals = HybridsDecoder.decode(&block(TABLE)).unwrap();
        let antibond = &orbitals[2];
        assert_eq!(antibond.index, 6);
        assert_eq!(antibond.hybrids[0].composition.len(), 3);
        assert_eq!(antibond.hybrids[0].composition[2].shell, 'd');
        assert_eq!(antibond.hybrids[1].coefficient, Some(-0.7782));
    }

    #[test]
    fn test_garbled_hybrid_line_is_malformed() {
        let text = "     2. (1.99858) BD (   1) C   1- H   2\n               ( 60.56%)   0.7782* C   1 s( 25.00%)p 3.00(\n";
        match HybridsDecoder.decode(&block(text)).unwrap_err() {
            DecodeError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 200);
                assert!(reason.contains("composition"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_composition_must_be_fully_consumed() {
        assert!(parse_composition("s( 25.00%)p 3.00( 74.97%)").is_some());
        assert!(parse_composition("s( 25.00%) junk").is_none());
        assert!(parse_composition("").is_none());
    }
}

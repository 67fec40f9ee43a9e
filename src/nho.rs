//! NHO directionality and bond bending.
//!
//! ```text
//!                          Line of Centers        Hybrid 1              Hybrid 2
//!                          ---------------  -------------------   ------------------
//!            NBO           Theta   Phi    Theta   Phi    Dev    Theta   Phi    Dev
//!  ===============================================================================
//!      2. BD (   1) C   1- H   2   54.7   45.0    --     --     --     56.1   45.0   1.4
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
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*\d").unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["Line of Centers", "Theta"],
        ends: &[],
        continuation: false,
        prose: Prose::Ends,
    }
}

/// Polar angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Direction {
    /// Polar angle
    pub theta: Option<f64>,
    /// Azimuthal angle
    pub phi: Option<f64>,
}

/// Direction of one hybrid and its deviation from the line of centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HybridDirection {
    /// Hybrid direction
    pub direction: Direction,
    /// Deviation from the line of centers in degrees
    pub deviation: Option<f64>,
}

/// One row of the directionality table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NhoDirection {
    /// NBO index
    pub index: u32,
    /// NBO label
    pub label: NboLabel,
    /// Direction of the internuclear axis
    pub line_of_centers: Direction,
    /// First hybrid
    pub hybrid1: HybridDirection,
    /// Second hybrid
    pub hybrid2: HybridDirection,
}

impl NhoDirection {
    /// Largest printed deviation of either hybrid.
    pub fn max_deviation(&self) -> Option<f64> {
        match (self.hybrid1.deviation, self.hybrid2.deviation) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Decoder for [`SectionMarker::NhoDirectionality`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NhoDecoder;

impl NhoDecoder {
    fn decode_row(row: &LogicalRow) -> Result<NhoDirection, DecodeError> {
        let text = row.text();
        let (index, label, rest) =
            parse_indexed_label(&text).ok_or_else(|| row.malformed("expected `index. NBO label`"))?;

        let cells: Vec<&str> = rest.split_whitespace().collect();
        if cells.len() != 8 {
            return Err(row.malformed(format!(
                "expected 8 angle columns ({}), found {}",
                SectionMarker::NhoDirectionality.spec().column_list(),
                cells.len()
            )));
        }
        let angle = |i: usize, field: &str| row.optional_float(cells[i], field);

        Ok(NhoDirection {
            index,
            label,
            line_of_centers: Direction {
                theta: angle(0, "line of centers theta")?,
                phi: angle(1, "line of centers phi")?,
            },
            hybrid1: HybridDirection {
                direction: Direction {
                    theta: angle(2, "hybrid 1 theta")?,
                    phi: angle(3, "hybrid 1 phi")?,
                },
                deviation: angle(4, "hybrid 1 deviation")?,
            },
            hybrid2: HybridDirection {
                direction: Direction {
                    theta: angle(5, "hybrid 2 theta")?,
                    phi: angle(6, "hybrid 2 phi")?,
                },
                deviation: angle(7, "hybrid 2 deviation")?,
            },
        })
    }
}

impl SectionDecoder for NhoDecoder {
    type Record = Vec<NhoDirection>;
    const MARKER: SectionMarker = SectionMarker::NhoDirectionality;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let rows = logical_rows(block, &layout())
            .iter()
            .map(Self::decode_row)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> SectionBlock<'_> {
        SectionBlock {
            marker: SectionMarker::NhoDirectionality,
            occurrence: 0,
            first_line: 1,
            text,
        }
    }

    const TABLE: &str = " (deviations from line of nuclear centers)

         [Thresholds for printing:  angular deviation  >  1.0 degree]
                                   hybrid p-character > 25.0%
                                   orbital occupancy  >  0.10e

                         Line of Centers        Hybrid 1              Hybrid 2
                         ---------------  -------------------   ------------------
           NBO           Theta   Phi    Theta   Phi    Dev    Theta   Phi    Dev
 ===============================================================================
     2. BD (   1) C   1- H   2   54.7   45.0    --     --     --     56.1   45.0   1.4
     3. BD (   1) C   1- H   3  125.3  315.0  124.1  315.0   1.2     --     --     --

";

    #[test]
    fn test_decode_directionality() {
        let rows = NhoDecoder.decode(&block(TABLE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 2);
        assert_eq!(rows[0].label.to_string(), "BD(1) C1-H2");
        assert_eq!(rows[0].line_of_centers.theta, Some(54.7));
        assert_eq!(rows[0].hybrid1.direction.theta, None);
        assert_eq!(rows[0].hybrid2.deviation, Some(1.4));
        assert_eq!(rows[1].hybrid2.deviation, None);
        assert_eq!(rows[1].max_deviation(), Some(1.2));
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let text = "     2. BD (   1) C   1- H   2   54.7   45.0    --     --     --     56.1   45.0\n";
        let err = NhoDecoder.decode(&block(text)).unwrap_err();
        assert!(err.to_string().contains("found 7"));
    }

    #[test]
    fn test_row_missing_index_period_is_malformed() {
        let text = TABLE.replace("     2. BD", "     2 BD");
        match NhoDecoder.decode(&block(&text)).unwrap_err() {
            DecodeError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 11);
                assert!(reason.contains("index. NBO label"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_text_cell_is_malformed() {
        let text = "     2. BD (   1) C   1- H   2   54.7   n/a    --     --     --     56.1   45.0   1.4\n";
        let err = NhoDecoder.decode(&block(text)).unwrap_err();
        assert!(err.to_string().contains("line of centers phi"));
    }
}

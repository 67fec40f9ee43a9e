//! Natural atomic orbital occupancies.
//!
//! ```text
//!  NATURAL POPULATIONS:  Natural atomic orbital occupancies
//!
//!   NAO Atom No lang   Type(AO)    Occupancy      Energy
//!  ---------------------------------------------------------
//!     1    C  1  S      Cor( 1S)     1.99914     -10.02140
//!     2    C  1  S      Val( 2S)     1.08930      -0.19560
//! ```

use crate::decoder::{non_empty, SectionDecoder};
use crate::error::DecodeError;
use crate::lexer::{logical_rows, Prose, TableLayout};
use crate::locator::SectionBlock;
use crate::sections::SectionMarker;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref ROW_START_RE: Regex = Regex::new(r"^\s*\d").unwrap();

    static ref ROW_RE: Regex = Regex::new(
        r"^\s*(?P<index>\d+)\s+(?P<symbol>[A-Z][a-z]?)\s+(?P<atom>\d+)\s+(?P<lang>\S+)\s+(?P<kind>Cor|Val|Ryd)\(\s*(?P<shell>\w+)\)\s+(?P<occupancy>\S+)\s+(?P<energy>\S+)\s*$"
    ).unwrap();
}

fn layout() -> TableLayout {
    TableLayout {
        row_start: &ROW_START_RE,
        headers: &["NAO Atom", "Type(AO)"],
        ends: &[],
        continuation: false,
        prose: Prose::Ends,
    }
}

/// Shell type of a natural atomic orbital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShellKind {
    /// `Cor`
    Core,
    /// `Val`
    Valence,
    /// `Ryd`
    Rydberg,
}

impl ShellKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Cor" => Some(ShellKind::Core),
            "Val" => Some(ShellKind::Valence),
            "Ryd" => Some(ShellKind::Rydberg),
            _ => None,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            ShellKind::Core => "Cor",
            ShellKind::Valence => "Val",
            ShellKind::Rydberg => "Ryd",
        }
    }
}

/// One row of the NAO occupancy table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NaoOccupancy {
    /// NAO index
    pub index: u32,
    /// Element symbol
    pub symbol: String,
    /// Atom number
    pub atom: u32,
    /// Angular label (`S`, `px`, `dxy`, ...)
    pub angular: String,
    /// Shell type
    pub shell_kind: ShellKind,
    /// Shell label (`1S`, `3p`, ...)
    pub shell: String,
    /// Occupancy (electrons)
    pub occupancy: f64,
    /// Orbital energy (hartree)
    pub energy: f64,
}

impl NaoOccupancy {
    /// Atom label such as `C1`.
    pub fn atom_label(&self) -> String {
        format!("{}{}", self.symbol, self.atom)
    }

    /// Orbital label such as `Val(2S)`.
    pub fn orbital_label(&self) -> String {
        format!("{}({})", self.shell_kind.tag(), self.shell)
    }
}

/// Decoder for [`SectionMarker::NaturalAtomicOrbitals`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NaoDecoder;

impl SectionDecoder for NaoDecoder {
    type Record = Vec<NaoOccupancy>;
    const MARKER: SectionMarker = SectionMarker::NaturalAtomicOrbitals;

    fn decode(&self, block: &SectionBlock<'_>) -> Result<Self::Record, DecodeError> {
        let mut rows = Vec::new();
        for row in logical_rows(block, &layout()) {
            let text = row.text();
            let caps = ROW_RE.captures(&text).ok_or_else(|| {
                row.malformed(format!(
                    "expected columns {}",
                    Self::MARKER.spec().column_list()
                ))
            })?;
            let shell_kind = ShellKind::from_tag(&caps["kind"])
                .ok_or_else(|| row.malformed("unknown orbital type"))?;

            rows.push(NaoOccupancy {
                index: row.integer(&caps["index"], "NAO index")?,
                symbol: caps["symbol"].to_string(),
                atom: row.integer(&caps["atom"], "atom number")?,
                angular: caps["lang"].to_string(),
                shell_kind,
                shell: caps["shell"].to_string(),
                occupancy: row.float(&caps["occupancy"], "occupancy")?,
                energy: row.float(&caps["energy"], "energy")?,
            });
        }
        non_empty(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> SectionBlock<'_> {
        SectionBlock {
            marker: SectionMarker::NaturalAtomicOrbitals,
            occurrence: 0,
            first_line: 1,
            text,
        }
    }

    const TABLE: &str = "
  NAO Atom No lang   Type(AO)    Occupancy      Energy
 ---------------------------------------------------------
     1    C  1  S      Cor( 1S)     1.99914     -10.02140
     2    C  1  S      Val( 2S)     1.08930      -0.19560
     3    C  1  px     Val( 2p)     1.17263      -0.03987

     4    H  2  S      Val( 1S)     0.78989       0.15234
     5    H  2  S      Ryd( 2S)     0.00150       0.71922


 WARNING:  1 low occupancy (<1.9990e) core orbital  found on  C  1
";

    #[test]
    fn test_decode_nao_table() {
        let rows = NaoDecoder.decode(&block(TABLE)).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].atom_label(), "C1");
        assert_eq!(rows[0].orbital_label(), "Cor(1S)");
        assert_eq!(rows[0].shell_kind, ShellKind::Core);
        assert!((rows[0].energy + 10.02140).abs() < 1e-12);
        assert_eq!(rows[2].angular, "px");
        assert_eq!(rows[4].shell_kind, ShellKind::Rydberg);
        assert!((rows[4].occupancy - 0.00150).abs() < 1e-12);
    }

    #[test]
    fn test_missing_energy_is_malformed() {
        let text = "     1    C  1  S      Cor( 1S)     1.99914\n";
        match NaoDecoder.decode(&block(text)).unwrap_err() {
            DecodeError::MalformedRow { line, text, .. } => {
                assert_eq!(line, 1);
                assert!(text.contains("Cor( 1S)"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_occupancy_is_malformed() {
        let text = "     1    C  1  S      Cor( 1S)     1.9x914     -10.02140\n";
        let err = NaoDecoder.decode(&block(text)).unwrap_err();
        assert!(err.to_string().contains("occupancy"));
    }

    #[test]
    fn test_row_missing_atom_number_is_malformed() {
        let text = "     1    C  1  S      Cor( 1S)     1.99914     -10.02140
     2    C     S      Val( 2S)     1.08930      -0.19560
     3    C  1  px     Val( 2p)     1.17263      -0.03987
";
        match NaoDecoder.decode(&block(text)).unwrap_err() {
            DecodeError::MalformedRow { line, text, .. } => {
                assert_eq!(line, 2);
                assert!(text.starts_with("2    C     S"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_header_only_block_is_empty() {
        let text = "\n  NAO Atom No lang   Type(AO)    Occupancy      Energy\n -------\n\n";
        assert_eq!(NaoDecoder.decode(&block(text)).unwrap_err(), DecodeError::EmptySection);
    }
}

//! Section markers and the static section table.
//!
//! Every analysis table the parser understands is identified by one
//! [`SectionMarker`]. The literal header text each marker is matched against,
//! the occurrence the content builder reads, and the column layout the table
//! is expected to carry all live in a single static table, so adding a section
//! type means one new variant and one new table entry.
//!
//! # Header Literals
//!
//! | Marker | Header substring | Occurrence |
//! |--------|------------------|------------|
//! | `NaturalAtomicOrbitals` | `NATURAL POPULATIONS:  Natural atomic orbital occupancies` | 0 |
//! | `NaturalPopulation` | `Summary of Natural Population Analysis` | 0 |
//! | `NaturalBondOrbitalAnalysis` | `NATURAL BOND ORBITAL ANALYSIS` | 0 |
//! | `BondOrbitalHybrids` | `Bond orbital/ Coefficients/ Hybrids` | 0 |
//! | `NhoDirectionality` | `NHO Directionality and "Bond Bending"` | 0 |
//! | `SecondOrderPerturbation` | `SECOND ORDER PERTURBATION THEORY ANALYSIS` | 1 |
//! | `NaturalBondOrbitalSummary` | `Natural Bond Orbitals (Summary)` | 0 |
//!
//! The second-order perturbation table is read from its second occurrence:
//! Gaussian prints it once per orbital basis and the natural-basis table is
//! the one that follows.

use serde::Serialize;
use std::fmt;

/// Identifies one of the seven NBO analysis sections of a Gaussian log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMarker {
    /// Natural atomic orbital occupancies (per atom, per orbital).
    NaturalAtomicOrbitals,
    /// Summary of natural population analysis (per atom charges).
    NaturalPopulation,
    /// Lewis-structure search summary printed under the NBO analysis banner.
    NaturalBondOrbitalAnalysis,
    /// Bond orbital coefficients and hybrid compositions.
    BondOrbitalHybrids,
    /// NHO directionality and bond bending.
    NhoDirectionality,
    /// Second-order perturbation theory analysis of the Fock matrix.
    SecondOrderPerturbation,
    /// Natural bond orbital summary listing.
    NaturalBondOrbitalSummary,
}

/// Static description of one section type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// The marker this entry describes
    pub marker: SectionMarker,
    /// Literal text that identifies the header line of the section
    pub header: &'static str,
    /// Human-readable section title
    pub title: &'static str,
    /// Zero-based occurrence the content builder decodes
    pub occurrence: usize,
    /// Declared field layout of one decoded row
    pub columns: &'static [&'static str],
}

impl SectionSpec {
    /// Returns the declared columns as a comma separated list.
    pub fn column_list(&self) -> String {
        self.columns.join(", ")
    }
}

const SECTIONS: [SectionSpec; 7] = [
    SectionSpec {
        marker: SectionMarker::NaturalAtomicOrbitals,
        header: "NATURAL POPULATIONS:  Natural atomic orbital occupancies",
        title: "natural atomic orbital occupancies",
        occurrence: 0,
        columns: &["NAO", "Atom", "No", "lang", "Type(AO)", "Occupancy", "Energy"],
    },
    SectionSpec {
        marker: SectionMarker::NaturalPopulation,
        header: "Summary of Natural Population Analysis",
        title: "natural population analysis",
        occurrence: 0,
        columns: &["Atom", "No", "Charge", "Core", "Valence", "Rydberg", "Total"],
    },
    SectionSpec {
        marker: SectionMarker::NaturalBondOrbitalAnalysis,
        header: "NATURAL BOND ORBITAL ANALYSIS",
        title: "natural bond orbital analysis",
        occurrence: 0,
        columns: &[
            "Cycle", "Max Ctr", "Occ Thresh", "Lewis", "Non-Lewis", "CR", "BD", "3C", "LP",
            "Low occ (L)", "High occ (NL)", "Dev",
        ],
    },
    SectionSpec {
        marker: SectionMarker::BondOrbitalHybrids,
        header: "Bond orbital/ Coefficients/ Hybrids",
        title: "bond orbital coefficients & hybrids",
        occurrence: 0,
        columns: &["NBO", "Occupancy", "Bond orbital", "Coefficients", "Hybrids"],
    },
    SectionSpec {
        marker: SectionMarker::NhoDirectionality,
        header: "NHO Directionality and \"Bond Bending\"",
        title: "NHO directionality",
        occurrence: 0,
        columns: &[
            "NBO", "Theta", "Phi", "Theta 1", "Phi 1", "Dev 1", "Theta 2", "Phi 2", "Dev 2",
        ],
    },
    SectionSpec {
        marker: SectionMarker::SecondOrderPerturbation,
        header: "SECOND ORDER PERTURBATION THEORY ANALYSIS",
        title: "second order perturbation",
        occurrence: 1,
        columns: &["Donor NBO (i)", "Acceptor NBO (j)", "E(2)", "E(j)-E(i)", "F(i,j)"],
    },
    SectionSpec {
        marker: SectionMarker::NaturalBondOrbitalSummary,
        header: "Natural Bond Orbitals (Summary)",
        title: "natural bond orbital summary",
        occurrence: 0,
        columns: &["NBO", "Occupancy", "Energy", "Principal Delocalizations"],
    },
];

impl SectionMarker {
    /// All markers in declaration order.
    pub const ALL: [SectionMarker; 7] = [
        SectionMarker::NaturalAtomicOrbitals,
        SectionMarker::NaturalPopulation,
        SectionMarker::NaturalBondOrbitalAnalysis,
        SectionMarker::BondOrbitalHybrids,
        SectionMarker::NhoDirectionality,
        SectionMarker::SecondOrderPerturbation,
        SectionMarker::NaturalBondOrbitalSummary,
    ];

    /// Returns the static table entry for this marker.
    pub fn spec(self) -> &'static SectionSpec {
        let slot = match self {
            SectionMarker::NaturalAtomicOrbitals => 0,
            SectionMarker::NaturalPopulation => 1,
            SectionMarker::NaturalBondOrbitalAnalysis => 2,
            SectionMarker::BondOrbitalHybrids => 3,
            SectionMarker::NhoDirectionality => 4,
            SectionMarker::SecondOrderPerturbation => 5,
            SectionMarker::NaturalBondOrbitalSummary => 6,
        };
        &SECTIONS[slot]
    }

    /// Literal header text matched against the log.
    pub fn header(self) -> &'static str {
        self.spec().header
    }

    /// Occurrence index the content builder decodes.
    pub fn occurrence(self) -> usize {
        self.spec().occurrence
    }
}

impl fmt::Display for SectionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries_match_their_markers() {
        for marker in SectionMarker::ALL {
            assert_eq!(marker.spec().marker, marker);
            assert!(!marker.header().is_empty());
            assert!(!marker.spec().columns.is_empty());
        }
    }

    #[test]
    fn test_only_perturbation_reads_second_occurrence() {
        for marker in SectionMarker::ALL {
            let expected = if marker == SectionMarker::SecondOrderPerturbation { 1 } else { 0 };
            assert_eq!(marker.occurrence(), expected, "{:?}", marker);
        }
    }

    #[test]
    fn test_headers_do_not_contain_each_other() {
        for a in SectionMarker::ALL {
            for b in SectionMarker::ALL {
                if a != b {
                    assert!(!a.header().contains(b.header()), "{:?} contains {:?}", a, b);
                }
            }
        }
    }
}

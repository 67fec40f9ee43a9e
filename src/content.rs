//! Content builder: runs every section decoder over one log.
//!
//! [`build`] is the entry point used by export and display code. It is
//! all-or-nothing: either every section decodes and a complete
//! [`ContentSet`] is returned, or the first failure is reported with the
//! section that caused it.
//!
//! # Examples
//!
//! ```no_run
//! use gaussnbo::content::build_from_path;
//! use std::path::Path;
//!
//! fn main() -> gaussnbo::Result<()> {
//!     let content = build_from_path(Path::new("methane.log"))?;
//!     for population in content.natural_population().unwrap_or_default() {
//!         println!("{} {:+.5}", population.atom_label(), population.natural_charge);
//!     }
//!     Ok(())
//! }
//! ```

use crate::decoder::SectionDecoder;
use crate::error::Result;
use crate::hybrids::{BondOrbital, HybridsDecoder};
use crate::io::read_log;
use crate::lewis::{LewisDecoder, LewisSummary};
use crate::locator::Locator;
use crate::nao::{NaoDecoder, NaoOccupancy};
use crate::nho::{NhoDecoder, NhoDirection};
use crate::npa::{AtomPopulation, NpaDecoder};
use crate::perturbation::{Interaction, PerturbationDecoder};
use crate::sections::SectionMarker;
use crate::summary::{SummaryDecoder, SummaryEntry};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Decoded content of one section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// Natural atomic orbital occupancies
    NaturalAtomicOrbitals(Vec<NaoOccupancy>),
    /// Natural population analysis
    NaturalPopulation(Vec<AtomPopulation>),
    /// Lewis-structure search summary
    NaturalBondOrbitalAnalysis(LewisSummary),
    /// Bond orbitals with hybrids
    BondOrbitalHybrids(Vec<BondOrbital>),
    /// NHO directionality
    NhoDirectionality(Vec<NhoDirection>),
    /// Second order perturbation interactions
    SecondOrderPerturbation(Vec<Interaction>),
    /// Natural bond orbital summary
    NaturalBondOrbitalSummary(Vec<SummaryEntry>),
}

impl Record {
    /// Section the record was decoded from.
    pub fn marker(&self) -> SectionMarker {
        match self {
            Record::NaturalAtomicOrbitals(_) => SectionMarker::NaturalAtomicOrbitals,
            Record::NaturalPopulation(_) => SectionMarker::NaturalPopulation,
            Record::NaturalBondOrbitalAnalysis(_) => SectionMarker::NaturalBondOrbitalAnalysis,
            Record::BondOrbitalHybrids(_) => SectionMarker::BondOrbitalHybrids,
            Record::NhoDirectionality(_) => SectionMarker::NhoDirectionality,
            Record::SecondOrderPerturbation(_) => SectionMarker::SecondOrderPerturbation,
            Record::NaturalBondOrbitalSummary(_) => SectionMarker::NaturalBondOrbitalSummary,
        }
    }

    /// Number of decoded rows.
    pub fn len(&self) -> usize {
        match self {
            Record::NaturalAtomicOrbitals(rows) => rows.len(),
            Record::NaturalPopulation(rows) => rows.len(),
            Record::NaturalBondOrbitalAnalysis(summary) => summary.len(),
            Record::BondOrbitalHybrids(rows) => rows.len(),
            Record::NhoDirectionality(rows) => rows.len(),
            Record::SecondOrderPerturbation(rows) => rows.len(),
            Record::NaturalBondOrbitalSummary(rows) => rows.len(),
        }
    }

    /// Whether the record holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decoded sections of one log, keyed by marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentSet {
    sections: BTreeMap<SectionMarker, Record>,
}

impl ContentSet {
    /// Number of decoded sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no section was decoded.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Record of `marker`, if decoded.
    pub fn get(&self, marker: SectionMarker) -> Option<&Record> {
        self.sections.get(&marker)
    }

    /// Iterates the records in marker order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionMarker, &Record)> {
        self.sections.iter().map(|(marker, record)| (*marker, record))
    }

    /// Natural atomic orbital occupancies.
    pub fn natural_atomic_orbitals(&self) -> Option<&[NaoOccupancy]> {
        match self.get(SectionMarker::NaturalAtomicOrbitals)? {
            Record::NaturalAtomicOrbitals(rows) => Some(rows),
            _ => None,
        }
    }

    /// Natural population analysis rows.
    pub fn natural_population(&self) -> Option<&[AtomPopulation]> {
        match self.get(SectionMarker::NaturalPopulation)? {
            Record::NaturalPopulation(rows) => Some(rows),
            _ => None,
        }
    }

    /// Lewis-structure search summary.
    pub fn lewis_summary(&self) -> Option<&LewisSummary> {
        match self.get(SectionMarker::NaturalBondOrbitalAnalysis)? {
            Record::NaturalBondOrbitalAnalysis(summary) => Some(summary),
            _ => None,
        }
    }

    /// Bond orbitals with their hybrids.
    pub fn bond_orbitals(&self) -> Option<&[BondOrbital]> {
        match self.get(SectionMarker::BondOrbitalHybrids)? {
            Record::BondOrbitalHybrids(rows) => Some(rows),
            _ => None,
        }
    }

    /// NHO directionality rows.
    pub fn nho_directions(&self) -> Option<&[NhoDirection]> {
        match self.get(SectionMarker::NhoDirectionality)? {
            Record::NhoDirectionality(rows) => Some(rows),
            _ => None,
        }
    }

    /// Second order perturbation interactions.
    pub fn interactions(&self) -> Option<&[Interaction]> {
        match self.get(SectionMarker::SecondOrderPerturbation)? {
            Record::SecondOrderPerturbation(rows) => Some(rows),
            _ => None,
        }
    }

    /// Natural bond orbital summary entries.
    pub fn summary(&self) -> Option<&[SummaryEntry]> {
        match self.get(SectionMarker::NaturalBondOrbitalSummary)? {
            Record::NaturalBondOrbitalSummary(rows) => Some(rows),
            _ => None,
        }
    }

    /// Serializes the set as a JSON object keyed by section name.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(&self.sections)
        } else {
            serde_json::to_string(&self.sections)
        }
    }

    fn insert(&mut self, record: Record) {
        debug!("{}: {} row(s)", record.marker(), record.len());
        self.sections.insert(record.marker(), record);
    }
}

/// Decodes every section of `log`.
///
/// # Arguments
///
/// * `log` - Complete text of a Gaussian log with NBO output
///
/// # Returns
///
/// Returns a [`ContentSet`] with one non-empty record per section, or the
/// first [`NboError::SectionNotFound`](crate::error::NboError::SectionNotFound)
/// or [`NboError::Section`](crate::error::NboError::Section) encountered.
/// No partial set is ever returned.
pub fn build(log: &str) -> Result<ContentSet> {
    let locator = Locator::new(log);
    let mut content = ContentSet::default();

    content.insert(Record::NaturalAtomicOrbitals(NaoDecoder.extract(&locator)?));
    content.insert(Record::NaturalPopulation(NpaDecoder.extract(&locator)?));
    content.insert(Record::NaturalBondOrbitalAnalysis(LewisDecoder.extract(&locator)?));
    content.insert(Record::BondOrbitalHybrids(HybridsDecoder.extract(&locator)?));
    content.insert(Record::NhoDirectionality(NhoDecoder.extract(&locator)?));
    content.insert(Record::SecondOrderPerturbation(PerturbationDecoder.extract(&locator)?));
    content.insert(Record::NaturalBondOrbitalSummary(SummaryDecoder.extract(&locator)?));

    info!("Decoded {} NBO sections", content.len());
    Ok(content)
}

/// Validates, reads and decodes the log at `path`.
///
/// Fails with [`NboError::InvalidFormat`](crate::error::NboError::InvalidFormat)
/// for a non-`.log` path, [`NboError::FileNotFound`](crate::error::NboError::FileNotFound)
/// when the file does not exist, [`NboError::Io`](crate::error::NboError::Io)
/// when it cannot be read, and otherwise as [`build`] does.
pub fn build_from_path(path: &Path) -> Result<ContentSet> {
    info!("Parsing {}", path.display());
    let log = read_log(path)?;
    build(&log)
}

use gaussnbo::content::{build, build_from_path};
use gaussnbo::lexer::NboKind;
use gaussnbo::npa::NpaDecoder;
use gaussnbo::perturbation::UnitScope;
use gaussnbo::{DecodeError, Locator, NboError, SectionDecoder, SectionMarker};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const METHANE: &str = include_str!("data/methane_nbo.log");

#[test]
fn test_build_decodes_all_sections() {
    let content = build(METHANE).unwrap();
    assert_eq!(content.len(), 7);
    for marker in SectionMarker::ALL {
        let record = content.get(marker).unwrap();
        assert_eq!(record.marker(), marker);
        assert!(!record.is_empty(), "{} is empty", marker);
    }

    assert_eq!(content.natural_atomic_orbitals().unwrap().len(), 17);
    assert_eq!(content.natural_population().unwrap().len(), 5);
    assert_eq!(content.bond_orbitals().unwrap().len(), 11);
    assert_eq!(content.nho_directions().unwrap().len(), 2);
    assert_eq!(content.summary().unwrap().len(), 11);
}

#[test]
fn test_population_values() {
    let content = build(METHANE).unwrap();
    let atoms = content.natural_population().unwrap();
    assert_eq!(atoms[0].atom_label(), "C1");
    assert!((atoms[0].natural_charge + 0.60903).abs() < 1e-12);
    assert!((atoms[0].total.unwrap() - 6.60903).abs() < 1e-12);
    let charge: f64 = atoms.iter().map(|a| a.natural_charge).sum();
    assert!(charge.abs() < 1e-4);
}

#[test]
fn test_lewis_summary_values() {
    let content = build(METHANE).unwrap();
    let lewis = content.lewis_summary().unwrap();
    assert_eq!(lewis.cycles.len(), 1);
    assert_eq!(lewis.cycles[0].bonds, 4);
    assert_eq!(lewis.occupancy_of("Total non-Lewis"), Some(0.00548));
}

#[test]
fn test_bond_orbital_hybrids() {
    let content = build(METHANE).unwrap();
    let orbitals = content.bond_orbitals().unwrap();

    let core = &orbitals[0];
    assert_eq!(core.label.kind, NboKind::Core);
    assert_eq!(core.hybrids[0].coefficients.len(), 9);

    let bond = &orbitals[1];
    assert_eq!(bond.label.to_string(), "BD(1) C1-H2");
    assert_eq!(bond.hybrids.len(), 2);
    let total: f64 = bond.hybrids.iter().filter_map(|h| h.polarization).sum();
    assert!((total - 100.0).abs() < 1e-9);

    let rydberg = &orbitals[9];
    assert_eq!(rydberg.index, 10);
    assert_eq!(rydberg.hybrids[0].composition.len(), 2);
}

#[test]
fn test_second_perturbation_table_is_selected() {
    let content = build(METHANE).unwrap();
    let interactions = content.interactions().unwrap();
    assert_eq!(interactions.len(), 4);
    assert_eq!(interactions[0].acceptor.to_string(), "BD*(1) C1-H3");
    assert!((interactions[1].e2 - 0.52).abs() < 1e-12);
    assert!(interactions
        .iter()
        .all(|i| i.units == Some(UnitScope { from: 1, to: 1 })));
}

#[test]
fn test_wrapped_rows_are_merged() {
    let content = build(METHANE).unwrap();
    let interactions = content.interactions().unwrap();
    assert_eq!(interactions[3].acceptor.to_string(), "BD*(1) C1-H5");
    assert!((interactions[3].fock - 0.009).abs() < 1e-12);

    let summary = content.summary().unwrap();
    assert_eq!(summary[2].delocalizations.len(), 4);
    assert_eq!(summary[2].delocalizations[3].acceptor, 15);
}

#[test]
fn test_build_is_idempotent() {
    assert_eq!(build(METHANE).unwrap(), build(METHANE).unwrap());
}

#[test]
fn test_missing_section_is_reported() {
    let log = METHANE.replace("NHO Directionality and \"Bond Bending\"", "NHO listing");
    match build(&log).unwrap_err() {
        NboError::SectionNotFound {
            marker,
            occurrence,
            found,
        } => {
            assert_eq!(marker, SectionMarker::NhoDirectionality);
            assert_eq!(occurrence, 0);
            assert_eq!(found, 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_single_perturbation_table_is_not_enough() {
    let header = "SECOND ORDER PERTURBATION";
    let first = METHANE.find(header).unwrap();
    let second = first + 1 + METHANE[first + 1..].find(header).unwrap();
    let log = format!(
        "{}{}",
        &METHANE[..second],
        METHANE[second..].replacen("SECOND ORDER", "THIRD ORDER", 1)
    );
    let err = build(&log).unwrap_err();
    assert_eq!(err.marker(), Some(SectionMarker::SecondOrderPerturbation));
    assert!(err.to_string().contains("1 present"));
}

#[test]
fn test_malformed_row_names_section_and_line() {
    let log = METHANE.replace(
        "      H    3    0.15226      0.00000     0.84624    0.00150     0.84774",
        "      H    3    0.15226      0.00000     0.84624    0.84774",
    );
    let line = log
        .lines()
        .position(|l| l.starts_with("      H    3    0.15226"))
        .unwrap()
        + 1;
    match build(&log).unwrap_err() {
        NboError::Section {
            marker,
            source: DecodeError::MalformedRow { line: at, .. },
            ..
        } => {
            assert_eq!(marker, SectionMarker::NaturalPopulation);
            assert_eq!(at, line);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_damaged_data_rows_fail_the_build() {
    let cases = [
        (
            "    5    C  1  px     Ryd( 3p)",
            "    5    C     px     Ryd( 3p)",
            SectionMarker::NaturalAtomicOrbitals,
        ),
        (
            "   2. BD ( 1) C  1- H  2   54.7",
            "   2 BD ( 1) C  1- H  2   54.7",
            SectionMarker::NhoDirectionality,
        ),
        ("   1(1)    2     1.90", "   1 1)    2     1.90", SectionMarker::NaturalBondOrbitalAnalysis),
    ];
    for (row, damaged, section) in cases {
        let log = METHANE.replace(row, damaged);
        let line = log.lines().position(|l| l.starts_with(damaged)).unwrap() + 1;
        match build(&log).unwrap_err() {
            NboError::Section {
                marker,
                source: DecodeError::MalformedRow { line: at, .. },
                ..
            } => {
                assert_eq!(marker, section);
                assert_eq!(at, line);
            }
            other => panic!("unexpected error for {}: {:?}", section, other),
        }
    }
}

#[test]
fn test_localized_orbital_analysis_after_summary() {
    let nlmo = "              Charge unit  1    0.00000

 NATURAL LOCALIZED MOLECULAR ORBITAL (NLMO) ANALYSIS:

 Hybridization/Polarization Analysis of NLMOs in NAO Basis:
 NLMO/Occupancy/Percent from Parent NBO/ Atomic Hybrid Contributions
 -------------------------------------------------------------------------------
   1. (2.00000)  99.9570%  CR ( 1) C  1
                           99.957% C  1 s(100.00%)
";
    let log = METHANE.replace("              Charge unit  1    0.00000\n", nlmo);
    assert_ne!(log, METHANE);
    assert_eq!(build(&log).unwrap(), build(METHANE).unwrap());
}

#[test]
fn test_minimal_population_log() {
    let log = "\n Summary of Natural Population Analysis:\n C  -0.123  1.998  3.876  0.249\n H   0.123  0.000  0.877  0.000\n";
    let atoms = NpaDecoder.extract(&Locator::new(log)).unwrap();
    assert_eq!(atoms.len(), 2);
    assert_eq!(atoms[0].symbol, "C");
    assert_eq!(atoms[1].symbol, "H");
    assert!((atoms[0].natural_charge + 0.123).abs() < 1e-12);
    assert!((atoms[0].core - 1.998).abs() < 1e-12);
    assert!((atoms[0].valence - 3.876).abs() < 1e-12);
    assert!((atoms[0].rydberg - 0.249).abs() < 1e-12);
    assert!((atoms[1].valence - 0.877).abs() < 1e-12);
}

#[test]
fn test_empty_section_is_reported() {
    let log = "\n Summary of Natural Population Analysis:\n\n Atom No    Charge    Core\n -----\n";
    match NpaDecoder.extract(&Locator::new(log)).unwrap_err() {
        NboError::Section { marker, source, .. } => {
            assert_eq!(marker, SectionMarker::NaturalPopulation);
            assert_eq!(source, DecodeError::EmptySection);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_build_from_path() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/methane_nbo.log");
    let content = build_from_path(&path).unwrap();
    assert_eq!(content, build(METHANE).unwrap());
}

#[test]
fn test_build_from_path_errors() {
    let dir = tempdir().unwrap();

    let wrong = dir.path().join("methane.out");
    fs::write(&wrong, METHANE).unwrap();
    assert!(matches!(build_from_path(&wrong), Err(NboError::InvalidFormat(_))));

    let missing = dir.path().join("missing.log");
    assert!(matches!(build_from_path(&missing), Err(NboError::FileNotFound(_))));
}

#[test]
fn test_json_export_keys_sections() {
    let content = build(METHANE).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content.to_json(false).unwrap()).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 7);
    assert!(object.contains_key("natural_population"));
    assert_eq!(json["natural_population"][0]["symbol"], "C");
    assert_eq!(json["second_order_perturbation"].as_array().unwrap().len(), 4);
}

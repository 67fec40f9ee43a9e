#![deny(missing_docs)]

//! gaussnbo - Natural Bond Orbital section parser for Gaussian logs
//!
//! gaussnbo locates the NBO analysis sections in a Gaussian output log and
//! decodes each fixed-layout table into typed records.
//!
//! # Overview
//!
//! Parsing runs in three stages:
//!
//! 1. **Locate**: [`Locator`] scans the whole log once for the literal header
//!    of every known section and hands out the text between one header and
//!    the next
//! 2. **Decode**: one stateless [`SectionDecoder`] per section turns a block
//!    into rows, failing on the first row that does not fit the table
//! 3. **Assemble**: [`build`] runs all seven decoders and returns a
//!    [`ContentSet`], or the first error
//!
//! # Quick Start
//!
//! ```no_run
//! use gaussnbo::content::build_from_path;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = build_from_path(Path::new("methane.log"))?;
//!     if let Some(interactions) = content.interactions() {
//!         for pair in interactions {
//!             println!("{} -> {}: {:.2} kcal/mol", pair.donor, pair.acceptor, pair.e2);
//!         }
//!     }
//!     println!("{}", content.to_json(true)?);
//!     Ok(())
//! }
//! ```
//!
//! # Sections
//!
//! | Marker | Record |
//! |--------|--------|
//! | Natural atomic orbital occupancies | [`nao::NaoOccupancy`] rows |
//! | Natural population analysis | [`npa::AtomPopulation`] rows |
//! | NBO analysis (Lewis structure search) | [`lewis::LewisSummary`] |
//! | Bond orbital coefficients & hybrids | [`hybrids::BondOrbital`] rows |
//! | NHO directionality | [`nho::NhoDirection`] rows |
//! | Second order perturbation | [`perturbation::Interaction`] rows |
//! | NBO summary | [`summary::SummaryEntry`] rows |
//!
//! # Modules
//!
//! - [`sections`](sections/index.html) - Section markers and the static section table
//! - [`locator`](locator/index.html) - Section location
//! - [`lexer`](lexer/index.html) - Logical rows, NBO labels, strict field parsing
//! - [`decoder`](decoder/index.html) - The decoder trait
//! - [`content`](content/index.html) - Content builder and JSON export
//! - [`settings`](settings/index.html) - Configuration files
//! - [`help`](help/index.html) - Built-in help system

pub mod content;
pub mod decoder;
pub mod error;
/// Built-in help system
pub mod help;
/// Bond orbital coefficients and hybrids
pub mod hybrids;
/// Log reading and JSON writing
pub mod io;
pub mod lewis;
pub mod lexer;
pub mod locator;
/// Natural atomic orbital occupancies
pub mod nao;
/// NHO directionality and bond bending
pub mod nho;
/// Natural population analysis
pub mod npa;
/// Second order perturbation theory analysis
pub mod perturbation;
pub mod sections;
/// Configuration management system
pub mod settings;
/// Natural bond orbital summary
pub mod summary;
/// Log path validation
pub mod validation;

pub use content::{build, build_from_path, ContentSet, Record};
pub use decoder::SectionDecoder;
pub use error::{DecodeError, NboError, Result};
pub use locator::{Locator, SectionBlock};
pub use sections::SectionMarker;

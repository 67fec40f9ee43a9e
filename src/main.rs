//! gnbo Command-Line Interface
//!
//! Thin entry point over the gaussnbo library: argument handling, logger
//! setup and output routing.
//!
//! # Usage
//!
//! 1. **Export** (`gnbo <file.log> [output.json]`): decodes every NBO section
//!    and writes the result as JSON; stdout is used when no output path is
//!    given and no `output_dir` is configured
//! 2. **Scan** (`gnbo scan <file.log>`): counts the section headers in a log
//! 3. **Settings template** (`gnbo ci gaussnbo_config.cfg`)
//!
//! # Examples
//!
//! ```bash
//! gnbo methane.log > methane.json
//! gnbo methane.log out/methane.json
//! gnbo scan methane.log
//! gnbo --help sections
//! ```

use gaussnbo::help::{print_global_help, print_section_help};
use gaussnbo::io::{export_path, read_log, write_json};
use gaussnbo::settings::{SettingsManager, CONFIG_FILE_NAME};
use gaussnbo::{build, Locator, NboError, SectionMarker};
use log::info;
use std::env;
use std::path::Path;
use std::process;

fn main() {
    let settings = match SettingsManager::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            process::exit(1);
        }
    };

    // JSON owns stdout; RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(settings.logging().level_filter())
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .init();
    info!("Configuration loaded from: {}", settings.config_source());

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    check_help_flags(&args);

    match args[1].as_str() {
        "ci" => {
            if args.get(2).map(String::as_str) != Some(CONFIG_FILE_NAME) {
                eprintln!("Error: Missing or unsupported file argument");
                eprintln!("Usage:");
                eprintln!("  {} ci {}   - Create settings template", args[0], CONFIG_FILE_NAME);
                process::exit(1);
            }
            match SettingsManager::create_template(Path::new(CONFIG_FILE_NAME)) {
                Ok(()) => {
                    println!("✓ Settings template created successfully!");
                    println!("  Output file: {}", CONFIG_FILE_NAME);
                }
                Err(e) => {
                    eprintln!("Error creating settings template: {}", e);
                    process::exit(1);
                }
            }
        }
        "scan" => {
            let Some(log_path) = args.get(2) else {
                eprintln!("Error: Missing log file argument");
                print_usage(&args[0]);
                process::exit(1);
            };
            if let Err(e) = run_scan(Path::new(log_path)) {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        command if command.starts_with('-') => {
            eprintln!("Error: Unknown command: {}", command);
            print_usage(&args[0]);
            process::exit(1);
        }
        log_path => {
            let output = args.get(2).map(Path::new);
            if let Err(e) = run_export(Path::new(log_path), output, &settings) {
                eprintln!("Error: {}", e);
                if let Some(marker) = e.marker() {
                    eprintln!("  Section: {}", marker);
                    eprintln!("  Cause:   {}", e.root_cause());
                }
                process::exit(1);
            }
        }
    }
}

/// Decodes the log and writes its JSON export.
fn run_export(log_path: &Path, output: Option<&Path>, settings: &SettingsManager) -> Result<(), NboError> {
    let log = read_log(log_path)?;
    let content = build(&log)?;
    let json = content.to_json(settings.export().pretty)?;

    let target = match (output, settings.export().output_dir.as_deref()) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => Some(export_path(log_path, Some(dir))),
        (None, None) => None,
    };
    match target {
        Some(path) => write_json(&json, &path),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

/// Prints how many times each section header occurs in the log.
fn run_scan(log_path: &Path) -> Result<(), NboError> {
    let log = read_log(log_path)?;
    let locator = Locator::new(&log);

    println!("{:<40} {:>5} {:>10}", "Section", "Found", "Required");
    println!("{}", "-".repeat(57));
    for marker in SectionMarker::ALL {
        let found = locator.occurrences(marker);
        let status = if found > marker.occurrence() { "ok" } else { "missing" };
        println!(
            "{:<40} {:>5} {:>10}",
            marker.to_string(),
            found,
            format!("#{} {}", marker.occurrence(), status)
        );
    }
    Ok(())
}

/// Check for help flags and print appropriate help
fn check_help_flags(args: &[String]) {
    if args[1] != "--help" && args[1] != "-h" {
        return;
    }
    match args.get(2).map(String::as_str) {
        Some("sections") => print_section_help(),
        _ => print_global_help(),
    }
    process::exit(0);
}

/// Prints usage information to stderr.
fn print_usage(program_name: &str) {
    eprintln!("gnbo - Natural Bond Orbital section parser for Gaussian logs");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} <file.log> [output.json]", program_name);
    eprintln!("                    Parse the NBO sections and export them as JSON");
    eprintln!();
    eprintln!("  {} scan <file.log>", program_name);
    eprintln!("                    Count the NBO section headers in a log");
    eprintln!();
    eprintln!("  {} ci {}", program_name, CONFIG_FILE_NAME);
    eprintln!("                    Create a settings template file");
    eprintln!();
    eprintln!("  {} --help [sections]", program_name);
}

//! Help text for the gnbo command line.

use crate::sections::{SectionMarker, SectionSpec};
use crate::settings::CONFIG_FILE_NAME;

/// Print global help
pub fn print_global_help() {
    println!("gnbo - Natural Bond Orbital section parser for Gaussian logs");
    println!();
    println!("USAGE:");
    println!("    gnbo [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    <file.log> [output.json]");
    println!("                        Parse every NBO section and write them as JSON");
    println!("                        Without an output path, JSON goes to stdout");
    println!();
    println!("    scan <file.log>");
    println!("                        Count the NBO section headers found in the log");
    println!();
    println!("    ci {}", CONFIG_FILE_NAME);
    println!("                        Create a configuration template file");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help [topic]   Show help. Topics: sections");
    println!();
    println!("CONFIGURATION FILE:");
    println!("    Supported locations:");
    println!("      - ./{} (local, highest priority)", CONFIG_FILE_NAME);
    println!("      - ~/.config/gaussnbo/{} (user)", CONFIG_FILE_NAME);
    println!("      - /etc/gaussnbo/{} (system)", CONFIG_FILE_NAME);
    println!("    Settings: [logging] level, [export] pretty, output_dir");
    println!();
    println!("EXAMPLES:");
    println!("    Export to stdout:    gnbo methane.log");
    println!("    Export to a file:    gnbo methane.log methane.json");
    println!("    Check a log:         gnbo scan methane.log");
    println!("    Debug output:        RUST_LOG=debug gnbo methane.log");
    println!();
}

/// Print the table of recognized sections
pub fn print_section_help() {
    println!("SECTION REFERENCE");
    println!("═══════════════════════════════════════════════════════════════════════");
    println!();
    for marker in SectionMarker::ALL {
        for line in section_entry(marker.spec()) {
            println!("{}", line);
        }
        println!();
    }
    println!("Every section is required. The occurrence is the zero-based index of the");
    println!("header copy that is decoded when the log prints a section more than once.");
    println!();
}

fn section_entry(spec: &SectionSpec) -> Vec<String> {
    vec![
        spec.title.to_string(),
        format!("    Header:     {}", spec.header),
        format!("    Occurrence: {}", spec.occurrence),
        format!("    Columns:    {}", spec.column_list()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_entry_names_header_and_occurrence() {
        let lines = section_entry(SectionMarker::SecondOrderPerturbation.spec());
        assert_eq!(lines[0], "second order perturbation");
        assert!(lines[1].ends_with("SECOND ORDER PERTURBATION THEORY ANALYSIS"));
        assert_eq!(lines[2], "    Occurrence: 1");
    }
}

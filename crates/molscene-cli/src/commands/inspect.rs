use crate::cli::InspectArgs;
use crate::error::{CliError, Result};
use molscene::core::geometry::framing::Framing;
use molscene::core::geometry::{bonds, framing};
use molscene::core::io::traits::CoordinateFile;
use molscene::core::io::xyz::{XyzFile, XyzRecord};
use molscene::core::models::bond::Bond;
use molscene::core::models::element;
use molscene::engine::config::ViewerConfig;
use std::fmt::Write;
use tracing::info;

pub fn run(args: InspectArgs, config: &ViewerConfig) -> Result<()> {
    info!("Reading XYZ record from {:?}", &args.file);
    let record = XyzFile::read_from_path(&args.file).map_err(|e| CliError::FileParsing {
        path: args.file.clone(),
        source: e.into(),
    })?;

    let bonds = bonds::infer(&record.atoms);
    let framing = framing::frame_with(&record.atoms, &config.framing);
    info!(
        "Parsed {} atoms and inferred {} bonds.",
        record.atoms.len(),
        bonds.len()
    );

    let mut out = String::new();
    render_report(&mut out, &record, &bonds, &framing).map_err(|e| CliError::Other(e.into()))?;
    print!("{}", out);
    Ok(())
}

fn render_report(
    out: &mut String,
    record: &XyzRecord,
    bonds: &[Bond],
    framing: &Framing,
) -> std::fmt::Result {
    writeln!(out, "Comment: {}", record.comment)?;
    match record.declared_count {
        Some(n) => writeln!(out, "Declared atoms: {}", n)?,
        None => writeln!(out, "Declared atoms: (missing)")?,
    }

    writeln!(out, "\nAtoms ({}):", record.atoms.len())?;
    for (i, atom) in record.atoms.iter().enumerate() {
        let marker = if element::is_known(&atom.element) {
            ""
        } else {
            "  (unknown element)"
        };
        writeln!(
            out,
            "  {:>4}  {:<3} {:>10.4} {:>10.4} {:>10.4}  #{:06X}  r={:.2}{}",
            i,
            atom.element,
            atom.position.x,
            atom.position.y,
            atom.position.z,
            atom.color,
            atom.radius,
            marker
        )?;
    }

    writeln!(out, "\nBonds ({}):", bonds.len())?;
    for bond in bonds {
        writeln!(
            out,
            "  {:>4} - {:<4}  {:.4}",
            bond.atom1_idx, bond.atom2_idx, bond.distance
        )?;
    }

    writeln!(
        out,
        "\nFraming: center ({:.4}, {:.4}, {:.4}), scale {:.4}",
        framing.center.x, framing.center.y, framing.center.z, framing.scale
    )?;

    if !record.rejected.is_empty() {
        writeln!(out, "\nQuarantined lines ({}):", record.rejected.len())?;
        for rejected in &record.rejected {
            writeln!(out, "  {}", rejected)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use molscene::core::io::xyz;

    fn report(text: &str) -> String {
        let record = xyz::parse_record(text);
        let bonds = bonds::infer(&record.atoms);
        let framing = framing::frame(&record.atoms);
        let mut out = String::new();
        render_report(&mut out, &record, &bonds, &framing).unwrap();
        out
    }

    #[test]
    fn report_lists_atoms_bonds_and_framing() {
        let out = report("2\nhydrogen\nH 0 0 0\nH 0 0 0.9\n");
        assert!(out.contains("Comment: hydrogen"));
        assert!(out.contains("Atoms (2):"));
        assert!(out.contains("Bonds (1):"));
        assert!(out.contains("0.9000"));
        assert!(out.contains("#FFFFFF"));
        assert!(!out.contains("Quarantined"));
    }

    #[test]
    fn report_flags_unknown_elements_and_quarantined_lines() {
        let out = report("2\nodd\nXx 0 0 0\nC 1 nan 0\n");
        assert!(out.contains("(unknown element)"));
        assert!(out.contains("#808080"));
        assert!(out.contains("Quarantined lines (1):"));
        assert!(out.contains("Line 4"));
    }

    #[test]
    fn run_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = InspectArgs {
            file: dir.path().join("missing.xyz"),
        };
        let result = run(args, &ViewerConfig::default());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}

use crate::core::io::traits::CoordinateFile;
use crate::core::models::atom::Atom;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Read};
use thiserror::Error;
use tracing::{debug, warn};

/// Index of the first line that may hold an atom; lines 0 and 1 are the count and comment.
const FIRST_ATOM_LINE: usize = 2;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A line whose atom was quarantined instead of being added to the record.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Line {line}: {kind}")]
pub struct XyzLineError {
    /// 1-based line number within the record.
    pub line: usize,
    pub kind: XyzLineErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XyzLineErrorKind {
    #[error("Invalid {axis} coordinate (value: '{value}')")]
    InvalidCoordinate { axis: char, value: String },
    #[error("Position is out of range once centered on the other atoms")]
    OutOfRange,
}

/// The result of reading one XYZ record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzRecord {
    /// Atom count declared on the first line, if it parsed as an integer.
    pub declared_count: Option<usize>,
    /// The free-form comment line.
    pub comment: String,
    /// Accepted atoms, centered so their centroid is the origin.
    pub atoms: Vec<Atom>,
    /// Lines whose atoms were quarantined.
    pub rejected: Vec<XyzLineError>,
}

impl XyzRecord {
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

/// Parses an XYZ record and returns its centered atoms.
///
/// Convenience wrapper over [`parse_record`] for callers that do not need the header
/// or the list of quarantined lines.
pub fn parse(text: &str) -> Vec<Atom> {
    parse_record(text).atoms
}

/// Parses an XYZ record.
///
/// The first two lines are skipped as header. Every following line is split on runs of
/// whitespace; lines with fewer than four fields are ignored. The first field is the
/// element symbol and the next three are the x, y and z coordinates. A coordinate that
/// is not a finite number causes that atom to be left out and reported in
/// [`XyzRecord::rejected`].
///
/// After parsing, the centroid of all accepted atoms is subtracted from each of them.
/// An atom so far from the rest that its centered position overflows is quarantined as
/// [`XyzLineErrorKind::OutOfRange`] and the centroid is taken again without it.
/// Empty text yields an empty record.
pub fn parse_record(text: &str) -> XyzRecord {
    let mut record = XyzRecord::default();
    let mut lines = text.lines();
    let mut accepted = Vec::new();

    record.declared_count = lines.next().and_then(|l| l.trim().parse().ok());
    record.comment = lines.next().map(|l| l.trim().to_string()).unwrap_or_default();

    for (offset, line) in lines.enumerate() {
        let line_num = FIRST_ATOM_LINE + offset + 1;
        match parse_atom_line(line) {
            Ok(Some(atom)) => accepted.push((line_num, atom)),
            Ok(None) => continue,
            Err(kind) => {
                warn!("Quarantining atom on line {}: {}", line_num, kind);
                record.rejected.push(XyzLineError {
                    line: line_num,
                    kind,
                });
            }
        }
    }

    record.atoms = center_atoms(accepted, &mut record.rejected);

    if let Some(declared) = record.declared_count {
        if declared != record.atoms.len() {
            debug!(
                "XYZ header declares {} atoms but {} were accepted.",
                declared,
                record.atoms.len()
            );
        }
    }
    record
}

fn parse_atom_line(line: &str) -> Result<Option<Atom>, XyzLineErrorKind> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Ok(None);
    }

    let x = parse_coordinate(parts[1], 'x')?;
    let y = parse_coordinate(parts[2], 'y')?;
    let z = parse_coordinate(parts[3], 'z')?;
    Ok(Some(Atom::new(parts[0], Point3::new(x, y, z))))
}

fn parse_coordinate(token: &str, axis: char) -> Result<f64, XyzLineErrorKind> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| XyzLineErrorKind::InvalidCoordinate {
            axis,
            value: token.to_string(),
        })
}

fn center_atoms(
    mut accepted: Vec<(usize, Atom)>,
    rejected: &mut Vec<XyzLineError>,
) -> Vec<Atom> {
    loop {
        let centroid = centroid_of(accepted.iter().map(|(_, atom)| &atom.position));
        let (kept, overflowed): (Vec<_>, Vec<_>) = accepted.into_iter().partition(|(_, atom)| {
            (atom.position - centroid)
                .coords
                .iter()
                .all(|v| v.is_finite())
        });

        if overflowed.is_empty() {
            return kept
                .into_iter()
                .map(|(_, mut atom)| {
                    atom.position -= centroid;
                    atom
                })
                .collect();
        }

        for (line, _) in &overflowed {
            warn!("Quarantining atom on line {}: position out of range.", line);
            rejected.push(XyzLineError {
                line: *line,
                kind: XyzLineErrorKind::OutOfRange,
            });
        }
        rejected.sort_by_key(|e| e.line);
        accepted = kept;
    }
}

// Each term is divided before summing, so finite inputs cannot overflow the total.
fn centroid_of<'a>(positions: impl ExactSizeIterator<Item = &'a Point3<f64>>) -> Vector3<f64> {
    let n = positions.len();
    if n == 0 {
        return Vector3::zeros();
    }
    let n = n as f64;
    positions.fold(Vector3::zeros(), |acc, p| acc + p.coords / n)
}

pub struct XyzFile;

impl CoordinateFile for XyzFile {
    type Record = XyzRecord;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Record, Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(parse_record(&content))
    }
}

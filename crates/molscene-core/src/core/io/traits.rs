use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading molecular coordinate formats.
///
/// Implementors handle format-specific parsing; the provided methods take care of
/// opening files and wrapping them in a buffered reader.
pub trait CoordinateFile {
    /// The parsed representation of one record.
    type Record;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a single record from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Record, Self::Error>;

    /// Reads a single record from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Record, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the provided
/// methods add path-based convenience wrappers with scoped file handles.
pub trait StructureFile {
    /// The in-memory representation produced by reading a whole file.
    type Structure;

    /// Format-specific switches applied when writing.
    type WriteOptions: Default;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Structure, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the structure cannot be represented.
    fn write_to(
        structure: &Self::Structure,
        options: &Self::WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a structure to a writer using the default options.
    fn write_structure_to(
        structure: &Self::Structure,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        Self::write_to(structure, &Self::WriteOptions::default(), writer)
    }

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Structure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a structure to a file path, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Self::Structure,
        options: &Self::WriteOptions,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Appends a structure to a file path, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or writing fails.
    fn append_to_path<P: AsRef<Path>>(
        structure: &Self::Structure,
        options: &Self::WriteOptions,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

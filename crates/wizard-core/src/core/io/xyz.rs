use super::format::{format_float, format_scientific};
use super::traits::StructureFile;
use crate::core::models::element::{normalize_symbol, standard_mass};
use crate::core::models::frame::{AtomicFrame, FrameError};
use crate::core::models::group::BoundingBox;
use nalgebra::{Matrix3, Point3};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufWriter, Lines, Write};
use std::path::Path;
use thiserror::Error;

/// Column declaration written on every comment line.
pub const PROPERTIES: &str = "Properties=species:S:1:pos:R:3:mass:R:1";
/// Suffix appended to [`PROPERTIES`] when the frame carries group tags.
pub const GROUP_PROPERTY: &str = ":group:I:1";

const FLOAT_PRECISION: usize = 8;
const FLOAT_WIDTH: usize = 15;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Invalid frame ending on line {line}: {source}")]
    Frame {
        line: usize,
        #[source]
        source: FrameError,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count (value: '{value}')")]
    InvalidAtomCount { value: String },
    #[error("Frame header is missing its comment line")]
    MissingComment,
    #[error("Comment line has no Lattice=\"...\" entry")]
    MissingLattice,
    #[error("Lattice must contain nine floats (value: '{value}')")]
    InvalidLattice { value: String },
    #[error("pbc must contain three flags (value: '{value}')")]
    InvalidPbc { value: String },
    #[error("Invalid float format in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
    #[error("Atom line has {found} columns, at least 4 are required")]
    LineTooShort { found: usize },
    #[error("File ended after {found} of {expected} atom lines")]
    TruncatedFrame { expected: usize, found: usize },
}

/// Where a single-frame write puts its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Append to the file, building a multi-frame trajectory across calls.
    #[default]
    Append,
    /// Replace the file content.
    Truncate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzWriteOptions {
    /// Text appended verbatim after the `Properties=` declaration.
    pub comment: String,
}

/// The extended-XYZ trajectory format.
///
/// Each frame is an atom-count line, a comment line carrying `pbc="..."`,
/// `Lattice="..."` and `Properties=...`, then one line per atom with the species,
/// position, mass and an optional group tag.
pub struct ExtXyzFile;

impl ExtXyzFile {
    /// Returns an iterator parsing frames from `reader` one at a time.
    ///
    /// The iterator stops after the first error.
    pub fn frames<R: BufRead>(reader: R) -> FrameIter<R> {
        FrameIter {
            lines: reader.lines(),
            line_num: 0,
            failed: false,
        }
    }

    /// Serializes one frame, followed by `comment` on its header line.
    ///
    /// Group tags are written (and declared in `Properties=`) only when the frame
    /// carries them.
    pub fn write_frame(
        frame: &AtomicFrame,
        comment: &str,
        writer: &mut impl Write,
    ) -> Result<(), XyzError> {
        let pbc = frame
            .pbc()
            .iter()
            .map(|&periodic| if periodic { "T" } else { "F" })
            .collect::<Vec<_>>()
            .join(" ");
        let lattice = frame
            .lattice_row_major()
            .iter()
            .map(|&value| format_float(value))
            .collect::<Vec<_>>()
            .join(" ");
        let group_property = if frame.groups().is_some() {
            GROUP_PROPERTY
        } else {
            ""
        };

        writeln!(writer, "{}", frame.len())?;
        writeln!(
            writer,
            "pbc=\"{}\" Lattice=\"{}\" {}{}{}",
            pbc, lattice, PROPERTIES, group_property, comment
        )?;

        let atoms = frame
            .species()
            .iter()
            .zip(frame.positions())
            .zip(frame.masses());
        for (i, ((symbol, position), &mass)) in atoms.enumerate() {
            write!(
                writer,
                "{:<2} {} {} {} {}",
                symbol,
                format_scientific(position.x, FLOAT_PRECISION, FLOAT_WIDTH),
                format_scientific(position.y, FLOAT_PRECISION, FLOAT_WIDTH),
                format_scientific(position.z, FLOAT_PRECISION, FLOAT_WIDTH),
                format_scientific(mass, FLOAT_PRECISION, FLOAT_WIDTH),
            )?;
            if let Some(groups) = frame.groups() {
                write!(writer, " {}", groups[i])?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Writes one frame to `path`, appending or truncating according to `mode`.
    pub fn write_frame_to_path<P: AsRef<Path>>(
        path: P,
        frame: &AtomicFrame,
        comment: &str,
        mode: WriteMode,
    ) -> Result<(), XyzError> {
        let file = match mode {
            WriteMode::Append => OpenOptions::new().create(true).append(true).open(path)?,
            WriteMode::Truncate => File::create(path)?,
        };
        let mut writer = BufWriter::new(file);
        Self::write_frame(frame, comment, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Overwrites `path` with a single frame whose atoms are tagged by their position
    /// relative to `bbox`.
    ///
    /// The input frame is left untouched; any groups it already carries are replaced
    /// in the written copy.
    pub fn write_grouped_to_path<P: AsRef<Path>>(
        path: P,
        frame: &AtomicFrame,
        bbox: &BoundingBox,
    ) -> Result<(), XyzError> {
        let mut grouped = frame.clone();
        grouped.assign_groups(bbox);
        Self::write_frame_to_path(path, &grouped, "", WriteMode::Truncate)
    }
}

impl StructureFile for ExtXyzFile {
    type Structure = Vec<AtomicFrame>;
    type WriteOptions = XyzWriteOptions;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Structure, Self::Error> {
        Self::frames(reader).collect()
    }

    fn write_to(
        structure: &Self::Structure,
        options: &Self::WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for frame in structure {
            Self::write_frame(frame, &options.comment, writer)?;
        }
        Ok(())
    }
}

/// Lazily parses frames from an extended-XYZ stream. Created by [`ExtXyzFile::frames`].
pub struct FrameIter<R> {
    lines: Lines<R>,
    line_num: usize,
    failed: bool,
}

impl<R: BufRead> FrameIter<R> {
    fn next_line(&mut self) -> Result<Option<String>, XyzError> {
        match self.lines.next() {
            Some(line) => {
                self.line_num += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    fn parse_error(&self, kind: XyzParseErrorKind) -> XyzError {
        XyzError::Parse {
            line: self.line_num,
            kind,
        }
    }

    fn read_frame(&mut self) -> Result<Option<AtomicFrame>, XyzError> {
        let count_line = loop {
            match self.next_line()? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
                None => return Ok(None),
            }
        };
        let natoms: usize = count_line.trim().parse().map_err(|_| {
            self.parse_error(XyzParseErrorKind::InvalidAtomCount {
                value: count_line.trim().to_string(),
            })
        })?;

        let comment = self
            .next_line()?
            .ok_or_else(|| self.parse_error(XyzParseErrorKind::MissingComment))?;
        let pbc = parse_pbc(&comment).map_err(|kind| self.parse_error(kind))?;
        let cell = parse_lattice(&comment).map_err(|kind| self.parse_error(kind))?;

        let mut species = Vec::with_capacity(natoms);
        let mut positions = Vec::with_capacity(natoms);
        let mut masses = Vec::with_capacity(natoms);
        for found in 0..natoms {
            let line = self.next_line()?.ok_or_else(|| {
                self.parse_error(XyzParseErrorKind::TruncatedFrame {
                    expected: natoms,
                    found,
                })
            })?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 4 {
                return Err(self.parse_error(XyzParseErrorKind::LineTooShort {
                    found: tokens.len(),
                }));
            }

            let symbol = normalize_symbol(tokens[0]);
            let mut coords = [0.0; 3];
            for (axis, coord) in coords.iter_mut().enumerate() {
                let token = tokens[axis + 1];
                *coord = token.parse().map_err(|_| {
                    self.parse_error(XyzParseErrorKind::InvalidFloat {
                        column: axis + 2,
                        value: token.to_string(),
                    })
                })?;
            }
            let mass = standard_mass(&symbol)
                .or_else(|| tokens.get(4).and_then(|token| token.parse().ok()))
                .ok_or_else(|| XyzError::Frame {
                    line: self.line_num,
                    source: FrameError::UnknownElement(symbol.clone()),
                })?;

            species.push(symbol);
            positions.push(Point3::from(coords));
            masses.push(mass);
        }

        AtomicFrame::with_masses(species, positions, masses, cell, pbc)
            .map(Some)
            .map_err(|source| XyzError::Frame {
                line: self.line_num,
                source,
            })
    }
}

impl<R: BufRead> Iterator for FrameIter<R> {
    type Item = Result<AtomicFrame, XyzError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_frame() {
            Ok(frame) => frame.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

fn extract_between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let rest = &text[text.find(start)? + start.len()..];
    let stop = rest.find(end).unwrap_or(rest.len());
    Some(&rest[..stop])
}

fn parse_pbc(comment: &str) -> Result<[bool; 3], XyzParseErrorKind> {
    let Some(raw) = extract_between(comment, "pbc=\"", "\"") else {
        return Ok([true; 3]);
    };
    let flags: Vec<bool> = raw
        .split_whitespace()
        .map(|flag| matches!(flag, "T" | "t" | "True" | "true"))
        .collect();
    flags
        .try_into()
        .map_err(|_| XyzParseErrorKind::InvalidPbc {
            value: raw.to_string(),
        })
}

fn parse_lattice(comment: &str) -> Result<Matrix3<f64>, XyzParseErrorKind> {
    const START: &str = "Lattice=\"";
    let start = comment.find(START).ok_or(XyzParseErrorKind::MissingLattice)? + START.len();
    let rest = &comment[start..];
    let stop = rest
        .find("\" Properties=")
        .or_else(|| rest.find('"'))
        .unwrap_or(rest.len());
    let raw = rest[..stop].trim();

    let invalid = || XyzParseErrorKind::InvalidLattice {
        value: raw.to_string(),
    };
    let values = raw
        .split_whitespace()
        .map(|token| token.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    if values.len() != 9 {
        return Err(invalid());
    }
    Ok(Matrix3::from_row_slice(&values))
}

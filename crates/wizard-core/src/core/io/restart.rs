use super::format::format_float;
use super::traits::StructureFile;
use crate::core::models::restart::{RestartAtom, RestartRecord};
use nalgebra::Vector3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const MASS_FIELD: usize = 4;
const VELOCITY_FIELDS: [usize; 3] = [5, 6, 7];
const GROUP_FIELD: usize = 8;

#[derive(Debug, Error)]
pub enum RestartError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: RestartParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum RestartParseErrorKind {
    #[error("File is empty, expected a header line")]
    MissingHeader,
    #[error("Invalid atom count in header (value: '{value}')")]
    InvalidAtomCount { value: String },
    #[error("File ended before the box line")]
    MissingBoxLine,
    #[error("Atom line has {found} columns, at least {} are required", GROUP_FIELD + 1)]
    LineTooShort { found: usize },
    #[error("Invalid float format in column {column} (value: '{value}')")]
    InvalidFloat { column: usize, value: String },
    #[error("File ended after {found} of {expected} atom lines")]
    TruncatedRecord { expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartWriteOptions {
    /// End every atom line with `" \n"` instead of `"\n"`.
    pub trailing_space: bool,
}

/// The tabular restart layout consumed by the PKA setup.
///
/// ```text
/// <atom_count> ...
/// <box line>
/// <type> <x> <y> <z> <mass> <vx> <vy> <vz> <group> [<group> ...]
/// ```
///
/// Columns other than mass and velocity are carried as raw tokens.
pub struct RestartFile;

impl StructureFile for RestartFile {
    type Structure = RestartRecord;
    type WriteOptions = RestartWriteOptions;
    type Error = RestartError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Structure, Self::Error> {
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.ok_or(RestartError::Parse {
            line: 1,
            kind: RestartParseErrorKind::MissingHeader,
        })?;
        let count_token = header.split_whitespace().next().unwrap_or("");
        let natoms: usize = count_token.parse().map_err(|_| RestartError::Parse {
            line: 1,
            kind: RestartParseErrorKind::InvalidAtomCount {
                value: count_token.to_string(),
            },
        })?;

        let box_line = lines.next().transpose()?.ok_or(RestartError::Parse {
            line: 2,
            kind: RestartParseErrorKind::MissingBoxLine,
        })?;

        let mut atoms = Vec::with_capacity(natoms);
        for found in 0..natoms {
            let line_num = found + 3;
            let line = lines.next().transpose()?.ok_or(RestartError::Parse {
                line: line_num,
                kind: RestartParseErrorKind::TruncatedRecord {
                    expected: natoms,
                    found,
                },
            })?;
            atoms.push(parse_atom(&line).map_err(|kind| RestartError::Parse {
                line: line_num,
                kind,
            })?);
        }

        Ok(RestartRecord {
            header,
            box_line,
            atoms,
        })
    }

    fn write_to(
        structure: &Self::Structure,
        options: &Self::WriteOptions,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.header)?;
        writeln!(writer, "{}", structure.box_line)?;
        for atom in &structure.atoms {
            write!(
                writer,
                "{} {} {} {} {}",
                atom.leading.join("  "),
                format_float(atom.velocity.x),
                format_float(atom.velocity.y),
                format_float(atom.velocity.z),
                atom.group.join(" "),
            )?;
            if options.trailing_space {
                write!(writer, " ")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

fn parse_atom(line: &str) -> Result<RestartAtom, RestartParseErrorKind> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= GROUP_FIELD {
        return Err(RestartParseErrorKind::LineTooShort {
            found: tokens.len(),
        });
    }

    let parse_field = |index: usize| -> Result<f64, RestartParseErrorKind> {
        tokens[index]
            .parse()
            .map_err(|_| RestartParseErrorKind::InvalidFloat {
                column: index + 1,
                value: tokens[index].to_string(),
            })
    };

    let mass = parse_field(MASS_FIELD)?;
    let velocity = Vector3::new(
        parse_field(VELOCITY_FIELDS[0])?,
        parse_field(VELOCITY_FIELDS[1])?,
        parse_field(VELOCITY_FIELDS[2])?,
    );

    Ok(RestartAtom {
        leading: tokens[..=MASS_FIELD].iter().map(|t| t.to_string()).collect(),
        mass,
        velocity,
        group: tokens[GROUP_FIELD..].iter().map(|t| t.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = "3 2 5.0 0 1 1\n\
        0 0 0 10.0 0 0 0 10.0 0 0 0 10.0\n\
        Fe  0.0  0.0  0.0  55.845 0.01 -0.02 0.0 0\n\
        Fe  1.4  1.4  1.4  55.845 -0.01 0.02 0.5 1\n\
        C  2.8  0.0  0.0  12.011 0.0 0.0 -0.5 1 3\n";

    fn read_sample() -> RestartRecord {
        RestartFile::read_from(&mut Cursor::new(SAMPLE)).unwrap()
    }

    #[test]
    fn read_parses_mass_velocity_and_keeps_raw_tokens() {
        let record = read_sample();

        assert_eq!(record.header, "3 2 5.0 0 1 1");
        assert_eq!(record.box_line, "0 0 0 10.0 0 0 0 10.0 0 0 0 10.0");
        assert_eq!(record.atom_count(), 3);

        let first = &record.atoms[0];
        assert_eq!(first.leading, ["Fe", "0.0", "0.0", "0.0", "55.845"]);
        assert_eq!(first.mass, 55.845);
        assert_eq!(first.velocity, Vector3::new(0.01, -0.02, 0.0));
        assert_eq!(first.group, ["0"]);

        assert_eq!(record.atoms[2].group, ["1", "3"]);
    }

    #[test]
    fn write_reproduces_normalized_input_exactly() {
        let record = read_sample();
        let mut buffer = Vec::new();
        RestartFile::write_structure_to(&record, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), SAMPLE);
    }

    #[test]
    fn group_tags_are_written_with_either_terminator() {
        let record = read_sample();
        for trailing_space in [false, true] {
            let mut buffer = Vec::new();
            RestartFile::write_to(&record, &RestartWriteOptions { trailing_space }, &mut buffer)
                .unwrap();

            let content = String::from_utf8(buffer).unwrap();
            let atom_lines: Vec<&str> = content.lines().skip(2).collect();
            assert_eq!(atom_lines.len(), 3);
            assert_eq!(atom_lines[0].split_whitespace().count(), 9);
            assert_eq!(atom_lines[0].split_whitespace().last(), Some("0"));
            assert!(atom_lines[2].trim_end().ends_with("-0.5 1 3"));
            assert!(atom_lines.iter().all(|l| l.ends_with(' ') == trailing_space));
            assert_eq!(RestartFile::read_from(&mut content.as_bytes()).unwrap(), record);
        }
    }

    #[test]
    fn read_rejects_bad_header_and_missing_box() {
        let err = RestartFile::read_from(&mut Cursor::new("")).unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 1,
                kind: RestartParseErrorKind::MissingHeader
            }
        ));

        let err = RestartFile::read_from(&mut Cursor::new("abc\n")).unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 1,
                kind: RestartParseErrorKind::InvalidAtomCount { .. }
            }
        ));

        let err = RestartFile::read_from(&mut Cursor::new("1\n")).unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 2,
                kind: RestartParseErrorKind::MissingBoxLine
            }
        ));
    }

    #[test]
    fn read_rejects_short_truncated_and_malformed_atom_lines() {
        let err = RestartFile::read_from(&mut Cursor::new("1\nbox\nFe 0 0 0 55.8 0 0 0\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 3,
                kind: RestartParseErrorKind::LineTooShort { found: 8 }
            }
        ));

        let err = RestartFile::read_from(&mut Cursor::new("2\nbox\nFe 0 0 0 55.8 0 0 0 0\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 4,
                kind: RestartParseErrorKind::TruncatedRecord {
                    expected: 2,
                    found: 1
                }
            }
        ));

        let err = RestartFile::read_from(&mut Cursor::new("1\nbox\nFe 0 0 0 55.8 0 fast 0 0\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            RestartError::Parse {
                line: 3,
                kind: RestartParseErrorKind::InvalidFloat { column: 7, .. }
            }
        ));
    }

    #[test]
    fn path_round_trip_preserves_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.xyz");
        let record = read_sample();

        RestartFile::write_to_path(&record, &RestartWriteOptions::default(), &path).unwrap();
        assert_eq!(RestartFile::read_from_path(&path).unwrap(), record);
    }
}

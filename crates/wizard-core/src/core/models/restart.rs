use nalgebra::Vector3;

/// One atom line of a restart file.
///
/// Only the mass and velocity are interpreted. Every other column is kept as the raw
/// token it was read from so that a read-modify-write cycle reproduces it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartAtom {
    /// Fields 0 through 4 as read (type, x, y, z and the mass token).
    pub leading: Vec<String>,
    /// Mass parsed from field 4.
    pub mass: f64,
    /// Velocity from fields 5 through 7.
    pub velocity: Vector3<f64>,
    /// Field 8 and any further grouping columns.
    pub group: Vec<String>,
}

impl RestartAtom {
    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }
}

/// A restart file: a header line whose first token is the atom count, an opaque box
/// line, and one [`RestartAtom`] per atom.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartRecord {
    pub header: String,
    pub box_line: String,
    pub atoms: Vec<RestartAtom>,
}

impl RestartRecord {
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Sum of `mass * velocity` over all atoms.
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.atoms
            .iter()
            .fold(Vector3::zeros(), |acc, atom| acc + atom.momentum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(mass: f64, velocity: [f64; 3]) -> RestartAtom {
        RestartAtom {
            leading: vec!["0".into(), "0".into(), "0".into(), "0".into(), mass.to_string()],
            mass,
            velocity: Vector3::from(velocity),
            group: vec!["0".into()],
        }
    }

    #[test]
    fn momentum_is_mass_times_velocity() {
        let a = atom(2.0, [1.0, -0.5, 3.0]);
        assert_eq!(a.momentum(), Vector3::new(2.0, -1.0, 6.0));
    }

    #[test]
    fn total_momentum_sums_every_atom() {
        let record = RestartRecord {
            header: "2".into(),
            box_line: "10 10 10".into(),
            atoms: vec![atom(1.0, [1.0, 0.0, 0.0]), atom(3.0, [0.0, 1.0, -1.0])],
        };
        assert_eq!(record.atom_count(), 2);
        assert_eq!(record.total_momentum(), Vector3::new(1.0, 3.0, -3.0));
    }
}

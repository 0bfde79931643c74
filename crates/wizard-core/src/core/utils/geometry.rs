use nalgebra::{Matrix3, Point3, Vector3};

/// A lattice with per-axis periodicity, used to measure minimum-image distances.
///
/// The lattice vectors are the rows of `cell`, so a fractional coordinate `f` maps to
/// the Cartesian position `cellᵀ · f`.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicCell {
    to_cartesian: Matrix3<f64>,
    to_fractional: Matrix3<f64>,
    pbc: [bool; 3],
}

impl PeriodicCell {
    /// Returns `None` when a periodic axis is requested on a singular cell.
    pub fn new(cell: &Matrix3<f64>, pbc: [bool; 3]) -> Option<Self> {
        let to_cartesian = cell.transpose();
        let to_fractional = if pbc.iter().any(|&p| p) {
            to_cartesian.try_inverse()?
        } else {
            Matrix3::identity()
        };
        Some(Self {
            to_cartesian,
            to_fractional,
            pbc,
        })
    }

    /// Wraps a displacement into its shortest periodic image.
    ///
    /// Exact for orthogonal cells; for strongly skewed cells the result is the image
    /// obtained by rounding fractional components independently.
    pub fn minimum_image(&self, delta: Vector3<f64>) -> Vector3<f64> {
        if !self.pbc.iter().any(|&p| p) {
            return delta;
        }
        let mut fractional = self.to_fractional * delta;
        for axis in 0..3 {
            if self.pbc[axis] {
                fractional[axis] -= fractional[axis].round();
            }
        }
        self.to_cartesian * fractional
    }

    pub fn distance(&self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        self.minimum_image(b - a).norm()
    }

    /// Lattice translations that can move a minimum-image displacement to within
    /// `cutoff`, the zero translation included.
    ///
    /// Along a periodic axis the fractional component of such a displacement is at most
    /// `cutoff / h + 1/2` away from zero, where `h` is the spacing of the lattice planes
    /// spanned by the other two vectors. Non-periodic axes contribute no translation.
    pub fn image_translations(&self, cutoff: f64) -> Vec<Vector3<f64>> {
        let mut reach = [0i64; 3];
        for axis in 0..3 {
            if self.pbc[axis] {
                // |row| of the inverse is the reciprocal of the plane spacing.
                let per_height = self.to_fractional.row(axis).norm();
                reach[axis] = (cutoff * per_height + 0.5).ceil() as i64;
            }
        }

        let mut translations = Vec::new();
        for i in -reach[0]..=reach[0] {
            for j in -reach[1]..=reach[1] {
                for k in -reach[2]..=reach[2] {
                    let shift = Vector3::new(i as f64, j as f64, k as f64);
                    translations.push(self.to_cartesian * shift);
                }
            }
        }
        translations
    }
}

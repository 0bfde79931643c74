use nalgebra::Point3;
use serde::Deserialize;
use std::fmt;

/// Membership of an atom relative to an axis-aligned bounding box.
///
/// The discriminants are the integer tags written to the `group` column of an
/// extended-XYZ file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    /// At least one coordinate lies below the box minimum.
    BelowMin = 0,
    /// No coordinate lies below the minimum, but at least one is at or above the maximum.
    AboveMax = 1,
    /// Every coordinate lies in `[min, max)`.
    Inside = 2,
}

impl Group {
    /// Returns the integer tag used in the file format.
    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Group {
    type Error = u8;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Group::BelowMin),
            1 => Ok(Group::AboveMax),
            2 => Ok(Group::Inside),
            other => Err(other),
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// An axis-aligned box `[min, max)` used to partition atoms into groups.
///
/// Deserializes from a table with `min` and `max` given as three-element arrays.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Classifies a position against the box.
    ///
    /// The minimum bound is checked on all three axes before the maximum bound, so a
    /// point below the minimum on any axis is [`Group::BelowMin`] even when it also
    /// exceeds the maximum on another axis.
    pub fn classify(&self, position: &Point3<f64>) -> Group {
        if (0..3).any(|axis| position[axis] < self.min[axis]) {
            Group::BelowMin
        } else if (0..3).any(|axis| position[axis] >= self.max[axis]) {
            Group::AboveMax
        } else {
            Group::Inside
        }
    }
}

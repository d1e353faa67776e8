use nalgebra::{Point3, Vector3};

/// A bond inferred between two atoms of the same record.
///
/// `start` and `end` are copies of the two atoms' centered positions, so a bond stays
/// valid on its own even after the atom list it came from is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub atom1_idx: usize, // index of the first atom, always < atom2_idx
    pub atom2_idx: usize,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub distance: f64,
}

impl Bond {
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bond() -> Bond {
        Bond {
            atom1_idx: 0,
            atom2_idx: 3,
            start: Point3::new(0.0, 0.0, -1.0),
            end: Point3::new(0.0, 0.0, 1.0),
            distance: 2.0,
        }
    }

    #[test]
    fn midpoint_lies_halfway_between_ends() {
        assert_eq!(sample_bond().midpoint(), Point3::origin());
    }

    #[test]
    fn direction_points_from_start_to_end() {
        assert_eq!(sample_bond().direction(), Vector3::new(0.0, 0.0, 2.0));
    }
}

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use std::f64::consts::FRAC_PI_2;

const DEGENERATE_EPSILON: f64 = 1e-12;

/// Orientation of a bond cylinder spanning `start` to `end`.
///
/// Cylinder primitives have their long axis along local +Y, while a look-at frame
/// points local +Z along the viewing direction. The rotation is therefore built as a
/// look-at from `start` towards `end` (world up +Y) followed by a quarter turn about the
/// local X axis, in that order. Applied to +Y, the result is parallel to `end - start`.
///
/// Coincident endpoints give the identity rotation.
pub fn cylinder_orientation(start: &Point3<f64>, end: &Point3<f64>) -> UnitQuaternion<f64> {
    // A look-at frame's +Z points from the target back to the eye.
    let back = start - end;
    if back.norm_squared() < DEGENERATE_EPSILON {
        return UnitQuaternion::identity();
    }

    let look_at = UnitQuaternion::face_towards(&back, &up_for(&back));
    look_at * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2)
}

fn up_for(direction: &Vector3<f64>) -> Vector3<f64> {
    let unit = Unit::new_normalize(*direction);
    if unit.cross(&Vector3::y()).norm_squared() < DEGENERATE_EPSILON {
        Vector3::z()
    } else {
        Vector3::y()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_long_axis_aligned(start: Point3<f64>, end: Point3<f64>) {
        let rotation = cylinder_orientation(&start, &end);
        let axis = rotation * Vector3::y();
        let direction = (end - start).normalize();
        assert!(
            axis.cross(&direction).norm() < 1e-9,
            "axis {:?} not parallel to {:?}",
            axis,
            direction
        );
        assert!((axis.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn long_axis_follows_bond_direction() {
        let origin = Point3::origin();
        let targets = [
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -2.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-0.3, 0.7, -1.9),
            Point3::new(2.5, -0.1, 0.4),
        ];
        for target in targets {
            assert_long_axis_aligned(origin, target);
            assert_long_axis_aligned(target, origin);
        }
    }

    #[test]
    fn vertical_bonds_do_not_degenerate() {
        assert_long_axis_aligned(Point3::new(0.0, -1.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        assert_long_axis_aligned(Point3::new(3.0, 2.0, 1.0), Point3::new(3.0, -5.0, 1.0));
    }

    #[test]
    fn coincident_endpoints_give_identity() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(cylinder_orientation(&p, &p), UnitQuaternion::identity());
    }

    #[test]
    fn reversed_composition_misaligns_cylinder() {
        let start = Point3::origin();
        let end = Point3::new(1.0, 0.0, 0.0);
        let back = start - end;
        let look_at = UnitQuaternion::face_towards(&back, &Vector3::y());
        let quarter = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);

        let reversed_axis = (quarter * look_at) * Vector3::y();
        assert!(reversed_axis.cross(&Vector3::x()).norm() > 0.5);

        let axis = cylinder_orientation(&start, &end) * Vector3::y();
        assert!(axis.cross(&Vector3::x()).norm() < 1e-9);
    }
}

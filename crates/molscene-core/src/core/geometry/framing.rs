use crate::core::models::atom::Atom;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;

/// Tuning constants for [`frame_with`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FramingParams {
    /// Apparent size, in scene units, that the largest bounding-box dimension is scaled to.
    pub target_span: f64,
    /// Lower clamp for the scale of multi-atom molecules.
    pub min_scale: f64,
    /// Upper clamp for the scale of multi-atom molecules.
    pub max_scale: f64,
    /// Scale used for a lone atom, which has no extent to measure.
    pub single_atom_scale: f64,
    /// Scale used when several atoms share one position.
    pub fallback_scale: f64,
}

impl Default for FramingParams {
    fn default() -> Self {
        Self {
            target_span: 10.0,
            min_scale: 0.5,
            max_scale: 5.0,
            single_atom_scale: 3.0,
            fallback_scale: 3.0,
        }
    }
}

/// Translation and uniform scale that fit a molecule into the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub center: Point3<f64>,
    pub scale: f64,
}

impl Framing {
    pub fn identity() -> Self {
        Self {
            center: Point3::origin(),
            scale: 1.0,
        }
    }

    /// Group translation that maps `center` onto the viewport origin once the group is scaled.
    pub fn translation(&self) -> Vector3<f64> {
        -self.center.coords * self.scale
    }
}

impl Default for Framing {
    fn default() -> Self {
        Self::identity()
    }
}

/// Frames an atom list with the reference constants.
pub fn frame(atoms: &[Atom]) -> Framing {
    frame_with(atoms, &FramingParams::default())
}

/// Computes the framing of an atom list.
///
/// With no atoms the identity framing is returned. A lone atom is centered on its own
/// position with `single_atom_scale`. Otherwise the center is the midpoint of the
/// axis-aligned bounding box and the scale is `target_span / max_dim`, clamped to
/// `[min_scale, max_scale]`, where `max_dim` is the largest box extent.
pub fn frame_with(atoms: &[Atom], params: &FramingParams) -> Framing {
    match atoms {
        [] => Framing::identity(),
        [atom] => Framing {
            center: atom.position,
            scale: params.single_atom_scale,
        },
        [first, rest @ ..] => {
            let (min, max) = rest.iter().fold((first.position, first.position), |(lo, hi), a| {
                (lo.inf(&a.position), hi.sup(&a.position))
            });
            let max_dim = (max - min).max();
            let base_scale = if max_dim > 0.0 {
                params.target_span / max_dim
            } else {
                params.fallback_scale
            };
            Framing {
                center: nalgebra::center(&min, &max),
                scale: base_scale.max(params.min_scale).min(params.max_scale),
            }
        }
    }
}

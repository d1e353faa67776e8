//! Pure geometry routines over parsed atom lists.
//!
//! - [`bonds`] - Distance-threshold bond inference
//! - [`framing`] - Centering translation and uniform scale for a fixed viewport
//! - [`orientation`] - Rotations that align bond cylinders with their segments

pub mod bonds;
pub mod framing;
pub mod orientation;

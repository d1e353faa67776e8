//! # Core Models Module
//!
//! Data structures describing a parsed molecule.
//!
//! - [`atom`] - A single atom with its element, centered position and display attributes
//! - [`bond`] - A bond inferred between two atoms from their separation
//! - [`element`] - Compile-time element palettes, display radii and bond thresholds
//!
//! ```ignore
//! use molscene::core::models::atom::Atom;
//! use nalgebra::Point3;
//!
//! let atom = Atom::new("Cu", Point3::new(0.0, 0.0, 0.0));
//! assert_eq!(atom.radius, 0.7);
//! ```

pub mod atom;
pub mod bond;
pub mod element;

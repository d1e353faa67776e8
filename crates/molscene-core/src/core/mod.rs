//! # Core Module
//!
//! Stateless building blocks of the geometry pipeline.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, inferred bonds and the element tables
//!   that give them their colors, radii and bonding thresholds
//! - **File I/O** ([`io`]) - Reading XYZ coordinate records
//! - **Geometry** ([`geometry`]) - Bond inference, scene framing and cylinder orientation
//!
//! Everything in here is a pure function of its input. Parsing completes before bonds
//! and framing are derived, and neither of those holds hidden state, so the same atom
//! list always yields the same bonds and the same framing.

pub mod geometry;
pub mod io;
pub mod models;

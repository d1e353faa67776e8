//! # MolScene Core Library
//!
//! The molecule geometry pipeline behind the catalyst-discovery demo: it turns XYZ
//! coordinate records into framed, renderable scenes of spheres and cylinders, and keeps
//! the graphics resources behind those scenes on a strict allocate-per-version,
//! release-on-invalidate discipline.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `Bond`), compile-time
//!   element tables, the XYZ reader and the pure geometry routines (bond inference,
//!   framing, cylinder orientation).
//!
//! - **[`engine`]: The Stateful Layer.** The `MoleculeSceneBuilder` that owns every
//!   geometry and material it creates in a slot-map arena, the `MoleculeViewer` state
//!   machine that drives dispose-and-rebuild per molecule version, and the
//!   `RenderBackend` seam to the external rendering engine.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures built on the other two
//!   layers, namely the simulated catalyst discovery pipeline and its step navigation.

pub mod core;
pub mod engine;
pub mod workflows;

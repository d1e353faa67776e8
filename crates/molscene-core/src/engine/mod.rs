//! # Engine Module
//!
//! The stateful half of the pipeline: everything that owns graphics resources or
//! remembers which molecule is currently shown.
//!
//! ## Architecture
//!
//! - **Backend Seam** ([`backend`]) - Descriptions of geometries and materials, and the
//!   `RenderBackend` trait through which they are created and released
//! - **Headless Backend** ([`headless`]) - A bookkeeping backend for the CLI and tests
//! - **Resource Arena** ([`resources`]) - Slot-map storage for every handle a scene owns
//! - **Scene Builder** ([`scene`]) - Spheres, oriented cylinders, the placeholder and
//!   the group transform, rebuilt wholesale per molecule version
//! - **Version Tokens** ([`state`]) - `SceneVersion` and the once-per-version readiness signal
//! - **Viewer** ([`viewer`]) - The load/reveal/context-loss state machine hosts drive
//! - **Configuration** ([`config`]) - Styles, framing constants and idle rotation, loadable
//!   from TOML
//!
//! ## Resource Discipline
//!
//! A scene never holds resources from two molecule versions at once. Each rebuild
//! releases the previous set before creating the next, released handles are consumed by
//! value, and the arena keys of a released generation no longer resolve.

pub mod backend;
pub mod config;
pub mod headless;
pub mod resources;
pub mod scene;
pub mod state;
pub mod viewer;

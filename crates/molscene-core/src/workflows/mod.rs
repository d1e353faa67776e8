//! # Workflows Module
//!
//! End-to-end procedures of the catalyst-discovery demo, built on the parser and
//! geometry routines of [`crate::core`].
//!
//! - **Molecule Library** ([`manifest`]) - `manifest.json` entries, XYZ loading, the default
//!   epoxides and the explanation-screen showcase
//! - **Discovery** ([`discovery`]) - Candidate generation, simulated gap and binding-energy
//!   prediction, top-K selection and the interactive `DiscoverySession`
//! - **Navigation** ([`steps`]) - The seven demo steps with their titles and narration tracks
//! - **Progress** ([`progress`]) - Callback-based progress reporting
//! - **Errors** ([`error`]) - `WorkflowError`
//!
//! Every prediction is a random placeholder. Randomness is always injected as an `Rng`,
//! so a seeded generator reproduces a run exactly.

pub mod discovery;
pub mod error;
pub mod manifest;
pub mod progress;
pub mod steps;

use super::discovery::GenerationMode;
use super::steps::DiscoveryStep;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid molecule manifest '{path}': {source}")]
    Manifest {
        path: String,
        source: serde_json::Error,
    },

    #[error("Molecule file '{file}' was not found in the molecule directory")]
    MissingMolecule { file: String },

    #[error("The manifest lists no {mode} molecules")]
    EmptyPool { mode: GenerationMode },

    #[error("Cannot {action} at step '{}': {reason}", .step.title())]
    OutOfOrder {
        action: &'static str,
        step: DiscoveryStep,
        reason: &'static str,
    },
}

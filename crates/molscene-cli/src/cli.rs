use clap::{Args, Parser, Subcommand, ValueEnum};
use molscene::workflows::discovery::GenerationMode;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "MolScene CLI - Inspect XYZ molecules, dump their renderable scenes and run the simulated catalyst-discovery pipeline.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a viewer configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific viewer configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S framing.target-span=12
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse an XYZ file and report its atoms, inferred bonds and framing.
    Inspect(InspectArgs),
    /// Build the renderable scene for an XYZ file and print its primitives.
    Scene(SceneArgs),
    /// Run the simulated catalyst-discovery pipeline over a molecule directory.
    Discover(DiscoverArgs),
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the XYZ file.
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the `scene` subcommand.
#[derive(Args, Debug)]
pub struct SceneArgs {
    /// Path to the XYZ file. Without one, the placeholder scene is built.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Use the highlighted placeholder color.
    #[arg(long)]
    pub highlighted: bool,

    /// Number of animation frames to advance after the scene is revealed.
    #[arg(long, default_value_t = 0, value_name = "INT")]
    pub frames: u32,

    /// Print the scene as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `discover` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Directory holding `manifest.json` and the XYZ files it lists.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub molecules: PathBuf,

    /// Which part of the manifest the candidate pool is drawn from.
    #[arg(long, value_enum, default_value_t = ModeArg::Ai)]
    pub mode: ModeArg,

    /// Seed for the random predictions. Omit for a fresh run every time.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Override the number of molecules drawn into the candidate pool.
    #[arg(long, value_name = "INT")]
    pub pool_size: Option<usize>,

    /// Override how many lowest-gap catalysts are kept.
    #[arg(long, value_name = "INT")]
    pub top_k_gap: Option<usize>,

    /// Override how many strongest binders are kept.
    #[arg(long, value_name = "INT")]
    pub top_k_binding: Option<usize>,

    /// Also print the explanation-step examples, the generation-step building blocks
    /// and the sampled binding-energy combinations.
    #[arg(long)]
    pub showcase: bool,

    /// Print the full report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Ai,
    Combinatorial,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Ai => GenerationMode::Ai,
            ModeArg::Combinatorial => GenerationMode::Combinatorial,
        }
    }
}

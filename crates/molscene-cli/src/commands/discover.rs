use crate::cli::DiscoverArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molscene::workflows::discovery::{
    self, BINDING_DISPLAY_LIMIT, Combination, DiscoveryConfig, DiscoveryReport, GenerationMode,
};
use molscene::workflows::manifest::{
    MoleculeData, MoleculeLibrary, SelectionPreviews, Showcase, default_epoxides,
};
use molscene::workflows::progress::ProgressReporter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct ShowcaseOutput {
    examples: Showcase,
    previews: SelectionPreviews,
    binding_sample: Vec<Combination>,
}

#[derive(Serialize)]
struct DiscoverOutput<'a> {
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    showcase: Option<&'a ShowcaseOutput>,
    report: &'a DiscoveryReport,
}

pub fn run(args: DiscoverArgs) -> Result<()> {
    let config = discovery_config(&args)?;
    let mode = GenerationMode::from(args.mode);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Running {} discovery with seed {}.", mode, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let library = MoleculeLibrary::open(&args.molecules)?;
    let examples = args.showcase.then(|| library.showcase(&mut rng));
    let previews = if args.showcase {
        Some(library.selection_previews()?)
    } else {
        None
    };

    let progress_handler = if args.json {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let report = discovery::run(
        &library,
        &default_epoxides(),
        mode,
        &config,
        &mut rng,
        &reporter,
    )?;

    let showcase = examples.zip(previews).map(|(examples, previews)| ShowcaseOutput {
        examples,
        previews,
        binding_sample: discovery::binding_display_sample(
            &report.combinations,
            BINDING_DISPLAY_LIMIT,
            &mut rng,
        ),
    });

    if args.json {
        let output = DiscoverOutput {
            seed,
            showcase: showcase.as_ref(),
            report: &report,
        };
        let json = serde_json::to_string_pretty(&output).map_err(|e| CliError::Other(e.into()))?;
        println!("{}", json);
    } else {
        if let Some(showcase) = &showcase {
            print_showcase(showcase);
        }
        print_report(&report, seed);
    }
    Ok(())
}

fn discovery_config(args: &DiscoverArgs) -> Result<DiscoveryConfig> {
    let defaults = DiscoveryConfig::default();
    let config = DiscoveryConfig {
        pool_size: args.pool_size.unwrap_or(defaults.pool_size),
        top_k_gap: args.top_k_gap.unwrap_or(defaults.top_k_gap),
        top_k_binding: args.top_k_binding.unwrap_or(defaults.top_k_binding),
    };
    for (name, value) in [
        ("--pool-size", config.pool_size),
        ("--top-k-gap", config.top_k_gap),
        ("--top-k-binding", config.top_k_binding),
    ] {
        if value == 0 {
            return Err(CliError::Argument(format!("{} must be at least 1", name)));
        }
    }
    Ok(config)
}

fn print_showcase(showcase: &ShowcaseOutput) {
    println!("Example molecules:");
    for entry in &showcase.examples.generation {
        println!("  generated  {:<24} {}", entry.id, entry.name);
    }
    for entry in &showcase.examples.filtered {
        let gap = entry
            .gap
            .map(|g| format!("{:.3}", g))
            .unwrap_or_else(|| "-".to_string());
        println!("  filtered   {:<24} {} (gap {})", entry.id, entry.name, gap);
    }

    println!("Building blocks:");
    print_previews("metals", &showcase.previews.metals);
    print_previews("substituents", &showcase.previews.substituents);
    print_previews("structures", &showcase.previews.structures);

    println!("Binding sample:");
    for combo in &showcase.binding_sample {
        println!(
            "  {} + {}  binding energy {:.3}",
            combo.catalyst.molecule.name,
            combo.epoxide.name,
            combo.binding_energy.unwrap_or(f64::NAN)
        );
    }
    println!();
}

fn print_previews(label: &str, molecules: &[MoleculeData]) {
    let summary: Vec<String> = molecules
        .iter()
        .map(|m| format!("{} ({} atoms)", m.name, m.atom_count))
        .collect();
    println!("  {:<13} {}", label, summary.join(", "));
}

fn print_report(report: &DiscoveryReport, seed: u64) {
    println!("Mode: {} (seed {})", report.mode, seed);
    println!("Generated candidates ({}):", report.generated.len());
    for candidate in &report.generated {
        let marker = if report.selected_top_k.contains(&candidate.unique_id) {
            "*"
        } else {
            " "
        };
        println!(
            " {} {:<28} gap {:>6}  atoms {:>4}  bonds {:>4}",
            marker,
            candidate.unique_id,
            candidate
                .gap
                .map(|g| format!("{:.3}", g))
                .unwrap_or_else(|| "-".to_string()),
            candidate.molecule.atom_count,
            candidate.molecule.bond_count
        );
    }
    println!(
        "Combinations scored: {} ({} catalysts x epoxides)",
        report.combinations.len(),
        report.selected_top_k.len()
    );
    println!("Final candidates:");
    for (rank, combo) in report.final_candidates.iter().enumerate() {
        println!(
            "  {}. {} + {}  binding energy {:.3}",
            rank + 1,
            combo.catalyst.molecule.name,
            combo.epoxide.name,
            combo.binding_energy.unwrap_or(f64::NAN)
        );
    }
}

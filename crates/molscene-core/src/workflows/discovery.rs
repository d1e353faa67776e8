use super::error::WorkflowError;
use super::manifest::{EpoxideEntry, MoleculeData, MoleculeLibrary};
use super::progress::{Progress, ProgressReporter};
use super::steps::DiscoveryStep;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use tracing::{info, instrument};

/// Most combinations shown at once on the binding-energy screen.
pub const BINDING_DISPLAY_LIMIT: usize = 5;

/// Which half of the manifest the candidate pool is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Ai,
    Combinatorial,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ai => f.write_str("AI"),
            Self::Combinatorial => f.write_str("combinatorial"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryConfig {
    pub pool_size: usize,
    pub top_k_gap: usize,
    pub top_k_binding: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pool_size: 10,
            top_k_gap: 5,
            top_k_binding: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub unique_id: String,
    pub molecule: MoleculeData,
    /// Predicted HOMO-LUMO gap, once property prediction has run.
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combination {
    pub id: String,
    pub catalyst: Candidate,
    pub epoxide: MoleculeData,
    pub binding_energy: Option<f64>,
}

/// Interactive state of one discovery run: the current step and every result so far.
#[derive(Debug, Clone)]
pub struct DiscoverySession {
    config: DiscoveryConfig,
    step: DiscoveryStep,
    mode: Option<GenerationMode>,
    generated: Vec<Candidate>,
    with_gap: Vec<Candidate>,
    selected_top_k: Vec<String>,
    combinations: Vec<Combination>,
    final_candidates: Vec<Combination>,
}

impl Default for DiscoverySession {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}

impl DiscoverySession {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            step: DiscoveryStep::VideoIntroduction,
            mode: None,
            generated: Vec::new(),
            with_gap: Vec::new(),
            selected_top_k: Vec::new(),
            combinations: Vec::new(),
            final_candidates: Vec::new(),
        }
    }

    pub fn step(&self) -> DiscoveryStep {
        self.step
    }

    pub fn can_go_forward(&self) -> bool {
        match self.step {
            DiscoveryStep::VideoIntroduction | DiscoveryStep::WorkflowExplanation => true,
            DiscoveryStep::CatalystGeneration => !self.generated.is_empty(),
            DiscoveryStep::PropertyPrediction => !self.with_gap.is_empty(),
            DiscoveryStep::GapAnalysis => !self.selected_top_k.is_empty(),
            DiscoveryStep::BindingEnergy => !self.final_candidates.is_empty(),
            DiscoveryStep::FinalCandidates => false,
        }
    }

    pub fn go_forward(&mut self) -> bool {
        match self.step.next() {
            Some(next) if self.can_go_forward() => {
                self.step = next;
                true
            }
            _ => false,
        }
    }

    pub fn go_back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Jumps to any step that is not past the first one still gated.
    pub fn go_to(&mut self, step: DiscoveryStep) -> bool {
        if step <= self.step {
            self.step = step;
            return true;
        }
        let start = self.step;
        while self.step < step {
            if !self.go_forward() {
                self.step = start;
                return false;
            }
        }
        true
    }

    /// Clears every result and returns to the explanation step.
    pub fn start_new_analysis(&mut self) {
        self.clear_results();
        self.mode = None;
        self.step = DiscoveryStep::WorkflowExplanation;
    }

    /// Draws the candidate pool from the manifest and moves on to property prediction.
    ///
    /// Previous results of every later step are discarded first.
    pub fn generate(
        &mut self,
        library: &MoleculeLibrary,
        mode: GenerationMode,
        reporter: &ProgressReporter,
    ) -> Result<&[Candidate], WorkflowError> {
        self.clear_results();
        self.mode = Some(mode);
        self.generated = generate(library, mode, self.config.pool_size, reporter)?;
        self.step = DiscoveryStep::PropertyPrediction;
        Ok(&self.generated)
    }

    /// Predicts a gap for every generated candidate, keeps the lowest gaps and pairs
    /// them with every epoxide. Moves on to gap analysis.
    pub fn predict_properties<R: Rng + ?Sized>(
        &mut self,
        epoxides: &[MoleculeData],
        rng: &mut R,
        reporter: &ProgressReporter,
    ) -> Result<(), WorkflowError> {
        if self.generated.is_empty() {
            return Err(WorkflowError::OutOfOrder {
                action: "predict properties",
                step: self.step,
                reason: "no molecules have been generated",
            });
        }
        reporter.report(Progress::PhaseStart {
            step: DiscoveryStep::PropertyPrediction,
        });
        let mut with_gap = self.generated.clone();
        predict_gaps(&mut with_gap, rng, reporter);
        let selected = select_lowest_gaps(&with_gap, self.config.top_k_gap);

        self.selected_top_k = selected.iter().map(|c| c.unique_id.clone()).collect();
        self.combinations = combine(&selected, epoxides);
        self.with_gap = with_gap;
        self.final_candidates.clear();
        reporter.report(Progress::PhaseFinish {
            step: DiscoveryStep::PropertyPrediction,
        });

        self.step = DiscoveryStep::GapAnalysis;
        Ok(())
    }

    /// Scores every combination and keeps the strongest binders. Moves on to the final
    /// candidates.
    pub fn predict_binding<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        reporter: &ProgressReporter,
    ) -> Result<&[Combination], WorkflowError> {
        if self.combinations.is_empty() {
            return Err(WorkflowError::OutOfOrder {
                action: "predict binding energies",
                step: self.step,
                reason: "there are no catalyst-epoxide combinations",
            });
        }
        reporter.report(Progress::PhaseStart {
            step: DiscoveryStep::BindingEnergy,
        });
        predict_binding_energies(&mut self.combinations, rng, reporter);
        self.final_candidates =
            select_strongest_binders(&self.combinations, self.config.top_k_binding);
        reporter.report(Progress::PhaseFinish {
            step: DiscoveryStep::BindingEnergy,
        });

        self.step = DiscoveryStep::FinalCandidates;
        Ok(&self.final_candidates)
    }

    pub fn mode(&self) -> Option<GenerationMode> {
        self.mode
    }

    pub fn generated(&self) -> &[Candidate] {
        &self.generated
    }

    /// Candidates with predicted gaps, in generation order.
    pub fn with_gap(&self) -> &[Candidate] {
        &self.with_gap
    }

    /// Candidates with predicted gaps, lowest gap first.
    pub fn sorted_by_gap(&self) -> Vec<Candidate> {
        select_lowest_gaps(&self.with_gap, self.with_gap.len())
    }

    pub fn selected_top_k(&self) -> &[String] {
        &self.selected_top_k
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn final_candidates(&self) -> &[Combination] {
        &self.final_candidates
    }

    fn clear_results(&mut self) {
        self.generated.clear();
        self.with_gap.clear();
        self.selected_top_k.clear();
        self.combinations.clear();
        self.final_candidates.clear();
    }
}

/// Loads up to `pool_size` manifest molecules of the given mode, in manifest order.
pub fn generate(
    library: &MoleculeLibrary,
    mode: GenerationMode,
    pool_size: usize,
    reporter: &ProgressReporter,
) -> Result<Vec<Candidate>, WorkflowError> {
    reporter.report(Progress::PhaseStart {
        step: DiscoveryStep::CatalystGeneration,
    });
    let pool: Vec<_> = library
        .entries()
        .iter()
        .filter(|entry| match mode {
            GenerationMode::Ai => entry.is_ai(),
            GenerationMode::Combinatorial => !entry.is_ai(),
        })
        .take(pool_size)
        .collect();
    if pool.is_empty() {
        return Err(WorkflowError::EmptyPool { mode });
    }

    reporter.report(Progress::MoleculesQueued {
        total: pool.len() as u64,
    });
    let mut candidates = Vec::with_capacity(pool.len());
    for (idx, entry) in pool.into_iter().enumerate() {
        let molecule = library.load_molecule(&entry.id, &entry.name, &entry.file)?;
        reporter.report(Progress::MoleculeLoaded {
            id: entry.id.clone(),
        });
        candidates.push(Candidate {
            unique_id: format!("{}-{}", entry.id, idx),
            molecule,
            gap: None,
        });
    }
    info!("Generated {} {} candidates.", candidates.len(), mode);
    reporter.report(Progress::PhaseFinish {
        step: DiscoveryStep::CatalystGeneration,
    });
    Ok(candidates)
}

/// Assigns every candidate a gap in [0.080, 0.110] Hartree: drawn uniformly from
/// [0.08, 0.11), then rounded to three decimals.
pub fn predict_gaps<R: Rng + ?Sized>(
    candidates: &mut [Candidate],
    rng: &mut R,
    reporter: &ProgressReporter,
) {
    for candidate in candidates {
        let gap = round3(rng.gen_range(0.08..0.11));
        candidate.gap = Some(gap);
        reporter.report(Progress::Scored {
            id: candidate.unique_id.clone(),
            value: gap,
        });
    }
}

/// Returns the `top_k` candidates with the lowest gap; candidates without one sort last.
pub fn select_lowest_gaps(candidates: &[Candidate], top_k: usize) -> Vec<Candidate> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.gap.unwrap_or(f64::INFINITY);
        let b = b.gap.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    sorted.truncate(top_k);
    sorted
}

/// Pairs every catalyst with every epoxide, catalyst-major.
pub fn combine(catalysts: &[Candidate], epoxides: &[MoleculeData]) -> Vec<Combination> {
    catalysts
        .iter()
        .flat_map(|catalyst| {
            epoxides.iter().map(move |epoxide| Combination {
                id: format!("combo-{}-{}", catalyst.unique_id, epoxide.id),
                catalyst: catalyst.clone(),
                epoxide: epoxide.clone(),
                binding_energy: None,
            })
        })
        .collect()
}

/// Assigns every combination a binding energy in [-0.800, -0.500]: drawn uniformly from
/// (-0.8, -0.5], then rounded to three decimals.
pub fn predict_binding_energies<R: Rng + ?Sized>(
    combinations: &mut [Combination],
    rng: &mut R,
    reporter: &ProgressReporter,
) {
    for combination in combinations {
        let energy = round3(-0.5 - rng.r#gen::<f64>() * 0.3);
        combination.binding_energy = Some(energy);
        reporter.report(Progress::Scored {
            id: combination.id.clone(),
            value: energy,
        });
    }
}

/// Returns the `top_k` combinations with the most negative binding energy.
pub fn select_strongest_binders(combinations: &[Combination], top_k: usize) -> Vec<Combination> {
    let mut sorted = combinations.to_vec();
    sorted.sort_by(|a, b| {
        let a = a.binding_energy.unwrap_or(f64::INFINITY);
        let b = b.binding_energy.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });
    sorted.truncate(top_k);
    sorted
}

/// Picks one random combination per catalyst, in order of first appearance, and keeps
/// at most `limit` of them for display.
pub fn binding_display_sample<R: Rng + ?Sized>(
    combinations: &[Combination],
    limit: usize,
    rng: &mut R,
) -> Vec<Combination> {
    let mut groups: Vec<(&str, Vec<&Combination>)> = Vec::new();
    for combination in combinations {
        let catalyst = combination.catalyst.unique_id.as_str();
        match groups.iter_mut().find(|(id, _)| *id == catalyst) {
            Some((_, members)) => members.push(combination),
            None => groups.push((catalyst, vec![combination])),
        }
    }

    let mut sample: Vec<Combination> = groups
        .iter()
        .filter_map(|(_, members)| members.choose(rng).map(|c| (*c).clone()))
        .collect();
    sample.truncate(limit);
    sample
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Everything a non-interactive discovery run produced.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryReport {
    pub mode: GenerationMode,
    pub generated: Vec<Candidate>,
    pub selected_top_k: Vec<String>,
    pub combinations: Vec<Combination>,
    pub final_candidates: Vec<Combination>,
}

/// Runs generation, property prediction and binding-energy prediction back to back.
#[instrument(skip_all, name = "discovery_workflow", fields(mode = %mode))]
pub fn run<R: Rng + ?Sized>(
    library: &MoleculeLibrary,
    epoxides: &[EpoxideEntry],
    mode: GenerationMode,
    config: &DiscoveryConfig,
    rng: &mut R,
    reporter: &ProgressReporter,
) -> Result<DiscoveryReport, WorkflowError> {
    let epoxides = library.load_epoxides(epoxides)?;
    let mut session = DiscoverySession::new(*config);
    session.go_to(DiscoveryStep::CatalystGeneration);

    session.generate(library, mode, reporter)?;
    session.predict_properties(&epoxides, rng, reporter)?;
    session.predict_binding(rng, reporter)?;

    reporter.report(Progress::Message(format!(
        "{} final candidates out of {} combinations.",
        session.final_candidates().len(),
        session.combinations().len()
    )));
    info!(
        "Discovery finished with {} final candidates.",
        session.final_candidates().len()
    );

    Ok(DiscoveryReport {
        mode,
        generated: session.with_gap().to_vec(),
        selected_top_k: session.selected_top_k().to_vec(),
        combinations: session.combinations().to_vec(),
        final_candidates: session.final_candidates().to_vec(),
    })
}

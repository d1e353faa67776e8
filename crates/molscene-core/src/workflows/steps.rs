use std::fmt;

/// The seven screens of the guided discovery demo, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscoveryStep {
    VideoIntroduction,
    WorkflowExplanation,
    CatalystGeneration,
    PropertyPrediction,
    GapAnalysis,
    BindingEnergy,
    FinalCandidates,
}

impl DiscoveryStep {
    pub const ALL: [DiscoveryStep; 7] = [
        DiscoveryStep::VideoIntroduction,
        DiscoveryStep::WorkflowExplanation,
        DiscoveryStep::CatalystGeneration,
        DiscoveryStep::PropertyPrediction,
        DiscoveryStep::GapAnalysis,
        DiscoveryStep::BindingEnergy,
        DiscoveryStep::FinalCandidates,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::VideoIntroduction => "Video Introduction",
            Self::WorkflowExplanation => "Workflow Explanation",
            Self::CatalystGeneration => "Catalysts Generation",
            Self::PropertyPrediction => "Molecular Properties Prediction",
            Self::GapAnalysis => "GAP Analysis and Filtering",
            Self::BindingEnergy => "Binding Energy",
            Self::FinalCandidates => "Final Candidates",
        }
    }

    /// Narration track played when the step opens; the intro has its own video instead.
    pub fn narration(self) -> Option<&'static str> {
        match self {
            Self::VideoIntroduction => None,
            Self::WorkflowExplanation => Some("audio/audio-WorkflowExplanationStep.mp3"),
            Self::CatalystGeneration => Some("audio/audio-GenerationStep.mp3"),
            Self::PropertyPrediction => Some("audio/audio-PropertyPredictionStep.mp3"),
            Self::GapAnalysis => Some("audio/audio-GapAnalysisStep.mp3"),
            Self::BindingEnergy => Some("audio/audio-BindingEnergyStep.mp3"),
            Self::FinalCandidates => Some("audio/audio-FinalCandidatesStep.mp3"),
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

impl fmt::Display for DiscoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

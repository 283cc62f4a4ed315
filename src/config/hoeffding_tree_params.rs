use crate::config::ParamChoice;
use crate::drift::{Adwin, DriftDetector, Eddm};
use crate::error::LearnerError;
use crate::learners::hoeffding_tree::split_criteria::{
    GiniSplitCriterion, InfoGainSplitCriterion, SplitCriterion, VarianceReductionSplitCriterion,
};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_confidence() -> f64 {
    0.05
}
fn default_grace_period() -> usize {
    200
}
fn default_tie_threshold() -> f64 {
    0.05
}
fn default_min_merit() -> f64 {
    0.01
}
fn default_max_memory_bytes() -> usize {
    33_554_432
}
fn default_memory_estimate_period() -> usize {
    1_000
}
fn default_nb_threshold() -> usize {
    0
}
fn default_drift_evaluation_period() -> usize {
    100
}
fn default_drift_switch_margin() -> f64 {
    0.05
}
fn default_drift_max_losing_windows() -> usize {
    10
}
fn default_max_bins() -> usize {
    64
}
fn default_min_branch_fraction() -> f64 {
    0.01
}
fn default_adwin_delta() -> f64 {
    0.002
}
fn default_eddm_min_num_instances() -> u64 {
    30
}
fn default_eddm_warning_level() -> f64 {
    0.95
}
fn default_eddm_out_control_level() -> f64 {
    0.9
}

/// Empty parameter object so every choice still carries a "params" field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct NoParams {}

/// Whether the tree predicts classes or numeric targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Classification,
    Regression,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HistogramParams {
    #[serde(default = "default_max_bins")]
    #[schemars(
        title = "Maximum bins",
        description = "Histogram bins kept per numeric feature and leaf.",
        range(min = 2)
    )]
    pub max_bins: usize,
}
impl Default for HistogramParams {
    fn default() -> Self {
        Self {
            max_bins: default_max_bins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InfoGainParams {
    #[serde(default = "default_min_branch_fraction")]
    #[schemars(
        title = "Minimum branch fraction",
        description = "At least two branches must hold more than this share of the weight.",
        range(min = 0.0, max = 0.5)
    )]
    pub min_branch_fraction: f64,
}
impl Default for InfoGainParams {
    fn default() -> Self {
        Self {
            min_branch_fraction: default_min_branch_fraction(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AdwinParams {
    #[serde(default = "default_adwin_delta")]
    #[schemars(
        title = "Delta",
        description = "Confidence of the window cut test (0–1).",
        range(min = 0.0, max = 1.0)
    )]
    pub delta: f64,
}
impl Default for AdwinParams {
    fn default() -> Self {
        Self {
            delta: default_adwin_delta(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EddmParams {
    #[serde(default = "default_eddm_min_num_instances")]
    #[schemars(
        title = "Minimum instances",
        description = "Observations before drift can be signalled."
    )]
    pub min_num_instances: u64,

    #[serde(default = "default_eddm_warning_level")]
    #[schemars(title = "Warning level", range(min = 0.0, max = 1.0))]
    pub warning_level: f64,

    #[serde(default = "default_eddm_out_control_level")]
    #[schemars(title = "Out-control level", range(min = 0.0, max = 1.0))]
    pub out_control_level: f64,
}
impl Default for EddmParams {
    fn default() -> Self {
        Self {
            min_num_instances: default_eddm_min_num_instances(),
            warning_level: default_eddm_warning_level(),
            out_control_level: default_eddm_out_control_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(NumericEstimatorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum NumericEstimatorChoice {
    #[strum_discriminants(strum(
        message = "Adaptive histogram",
        detailed_message = "Bounded histogram of bin means with per-bin target statistics."
    ))]
    Histogram(HistogramParams),
}
impl Default for NumericEstimatorChoice {
    fn default() -> Self {
        Self::Histogram(HistogramParams::default())
    }
}
impl NumericEstimatorChoice {
    pub fn max_bins(&self) -> usize {
        match self {
            NumericEstimatorChoice::Histogram(p) => p.max_bins,
        }
    }
}
impl ParamChoice for NumericEstimatorChoice {
    type Kind = NumericEstimatorKind;

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            NumericEstimatorKind::Histogram => json!(HistogramParams::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(SplitCriterionKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum SplitCriterionChoice {
    #[strum_discriminants(strum(
        message = "Information gain",
        detailed_message = "Entropy reduction in bits; classification."
    ))]
    InfoGain(InfoGainParams),
    #[strum_discriminants(strum(
        message = "Gini",
        detailed_message = "Gini impurity reduction; classification."
    ))]
    Gini(NoParams),
    #[strum_discriminants(strum(
        message = "Variance reduction",
        detailed_message = "Share of target variance removed; regression."
    ))]
    VarianceReduction(NoParams),
}
impl Default for SplitCriterionChoice {
    fn default() -> Self {
        Self::InfoGain(InfoGainParams::default())
    }
}
impl SplitCriterionChoice {
    pub fn task_kind(&self) -> TaskKind {
        match self {
            SplitCriterionChoice::InfoGain(_) | SplitCriterionChoice::Gini(_) => {
                TaskKind::Classification
            }
            SplitCriterionChoice::VarianceReduction(_) => TaskKind::Regression,
        }
    }

    pub fn build(&self) -> Box<dyn SplitCriterion> {
        match self {
            SplitCriterionChoice::InfoGain(p) => {
                Box::new(InfoGainSplitCriterion::new(p.min_branch_fraction))
            }
            SplitCriterionChoice::Gini(_) => Box::new(GiniSplitCriterion::new()),
            SplitCriterionChoice::VarianceReduction(_) => {
                Box::new(VarianceReductionSplitCriterion::default())
            }
        }
    }
}
impl ParamChoice for SplitCriterionChoice {
    type Kind = SplitCriterionKind;

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            SplitCriterionKind::InfoGain => json!(InfoGainParams::default()),
            SplitCriterionKind::Gini | SplitCriterionKind::VarianceReduction => {
                json!(NoParams::default())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(LeafPredictionKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum LeafPredictionChoice {
    #[serde(rename = "nb-adaptive")]
    #[strum_discriminants(strum(
        serialize = "nb-adaptive",
        message = "Naive Bayes Adaptive",
        detailed_message = "NB vs MC adaptively."
    ))]
    NBAdaptive(NoParams),
    #[strum_discriminants(strum(
        message = "Naive Bayes",
        detailed_message = "Always NB at leaves."
    ))]
    NaiveBayes(NoParams),
    #[strum_discriminants(strum(
        message = "Majority Class",
        detailed_message = "Predict majority class."
    ))]
    MajorityClass(NoParams),
    #[strum_discriminants(strum(
        message = "Target mean",
        detailed_message = "Predict the mean target; regression."
    ))]
    Mean(NoParams),
}
impl Default for LeafPredictionChoice {
    fn default() -> Self {
        Self::NBAdaptive(NoParams::default())
    }
}
impl ParamChoice for LeafPredictionChoice {
    type Kind = LeafPredictionKind;

    fn default_params(_kind: Self::Kind) -> Value {
        json!(NoParams::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(DriftDetectorKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum DriftDetectorChoice {
    #[strum_discriminants(strum(
        message = "ADWIN",
        detailed_message = "Adaptive windowing over the error signal."
    ))]
    Adwin(AdwinParams),
    #[strum_discriminants(strum(
        message = "EDDM",
        detailed_message = "Early drift detection from the distance between errors."
    ))]
    Eddm(EddmParams),
}
impl Default for DriftDetectorChoice {
    fn default() -> Self {
        Self::Adwin(AdwinParams::default())
    }
}
impl DriftDetectorChoice {
    pub fn build(&self) -> Box<dyn DriftDetector> {
        match self {
            DriftDetectorChoice::Adwin(p) => Box::new(Adwin::new(p.delta)),
            DriftDetectorChoice::Eddm(p) => Box::new(Eddm::new(
                p.min_num_instances,
                p.warning_level,
                p.out_control_level,
            )),
        }
    }
}
impl ParamChoice for DriftDetectorChoice {
    type Kind = DriftDetectorKind;

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            DriftDetectorKind::Adwin => json!(AdwinParams::default()),
            DriftDetectorKind::Eddm => json!(EddmParams::default()),
        }
    }
}

/// Hoeffding tree configuration, immutable once the tree is built.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HoeffdingTreeParams {
    #[serde(default = "default_confidence")]
    #[schemars(
        title = "Split confidence",
        description = "Probability of choosing a wrong split (delta, 0–1).",
        range(min = 0.0, max = 1.0)
    )]
    pub confidence: f64,

    #[serde(default = "default_grace_period")]
    #[schemars(
        title = "Grace period",
        description = "Weight a leaf should observe between split attempts.",
        range(min = 1)
    )]
    pub grace_period: usize,

    #[serde(default = "default_tie_threshold")]
    #[schemars(
        title = "Tie threshold",
        description = "Split anyway once the bound falls below this value.",
        range(min = 0.0, max = 1.0)
    )]
    pub tie_threshold: f64,

    #[serde(default = "default_min_merit")]
    #[schemars(
        title = "Minimum merit",
        description = "A tie-broken split must beat this merit.",
        range(min = 0.0)
    )]
    pub min_merit: f64,

    #[serde(default = "default_max_memory_bytes")]
    #[schemars(
        title = "Maximum memory",
        description = "Bytes active leaf statistics may occupy."
    )]
    pub max_memory_bytes: usize,

    #[serde(default = "default_memory_estimate_period")]
    #[schemars(
        title = "Memory estimate period",
        description = "Observations between memory checks.",
        range(min = 1)
    )]
    pub memory_estimate_period: usize,

    #[serde(default)]
    #[schemars(skip)]
    pub leaf_prediction: LeafPredictionChoice,

    #[serde(default)]
    #[schemars(skip)]
    pub split_criterion: SplitCriterionChoice,

    #[serde(default)]
    #[schemars(skip)]
    pub numeric_estimator: NumericEstimatorChoice,

    #[serde(default)]
    #[schemars(
        title = "Enforce binary splits?",
        description = "Only allow binary splits."
    )]
    pub binary_splits: bool,

    #[serde(default)]
    #[schemars(
        title = "Disable pre-pruning?",
        description = "Do not offer the null split as a candidate."
    )]
    pub no_pre_prune: bool,

    #[serde(default = "default_nb_threshold")]
    #[schemars(
        title = "Naive Bayes threshold",
        description = "Weight a leaf must see before naive Bayes is used."
    )]
    pub nb_threshold: usize,

    #[serde(default)]
    #[schemars(
        title = "Maximum depth",
        description = "Leaves at this depth never split."
    )]
    pub max_depth: Option<usize>,

    #[serde(default)]
    #[schemars(
        title = "Drift adaptation?",
        description = "Monitor branches and grow alternate subtrees on drift."
    )]
    pub drift_detection: bool,

    #[serde(default)]
    #[schemars(skip)]
    pub drift_detector: DriftDetectorChoice,

    #[serde(default = "default_drift_evaluation_period")]
    #[schemars(
        title = "Drift evaluation period",
        description = "Observations per alternate-versus-original comparison window.",
        range(min = 1)
    )]
    pub drift_evaluation_period: usize,

    #[serde(default = "default_drift_switch_margin")]
    #[schemars(
        title = "Drift switch margin",
        description = "Error-rate advantage an alternate needs to replace the original.",
        range(min = 0.0, max = 1.0)
    )]
    pub drift_switch_margin: f64,

    #[serde(default = "default_drift_max_losing_windows")]
    #[schemars(
        title = "Maximum losing windows",
        description = "Windows an alternate may lose before it is discarded.",
        range(min = 1)
    )]
    pub drift_max_losing_windows: usize,
}
impl Default for HoeffdingTreeParams {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            grace_period: default_grace_period(),
            tie_threshold: default_tie_threshold(),
            min_merit: default_min_merit(),
            max_memory_bytes: default_max_memory_bytes(),
            memory_estimate_period: default_memory_estimate_period(),
            leaf_prediction: LeafPredictionChoice::default(),
            split_criterion: SplitCriterionChoice::default(),
            numeric_estimator: NumericEstimatorChoice::default(),
            binary_splits: false,
            no_pre_prune: false,
            nb_threshold: default_nb_threshold(),
            max_depth: None,
            drift_detection: false,
            drift_detector: DriftDetectorChoice::default(),
            drift_evaluation_period: default_drift_evaluation_period(),
            drift_switch_margin: default_drift_switch_margin(),
            drift_max_losing_windows: default_drift_max_losing_windows(),
        }
    }
}

impl HoeffdingTreeParams {
    /// Defaults for a regression tree: variance reduction and mean leaves.
    pub fn regression() -> Self {
        Self {
            leaf_prediction: LeafPredictionChoice::Mean(NoParams::default()),
            split_criterion: SplitCriterionChoice::VarianceReduction(NoParams::default()),
            ..Self::default()
        }
    }

    pub fn task_kind(&self) -> TaskKind {
        self.split_criterion.task_kind()
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let params: Self =
            serde_json::from_str(raw).context("parsing Hoeffding tree parameters")?;
        params
            .validate()
            .context("validating Hoeffding tree parameters")?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), LearnerError> {
        fn invalid(msg: impl Into<String>) -> Result<(), LearnerError> {
            Err(LearnerError::Configuration(msg.into()))
        }

        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return invalid(format!(
                "confidence must lie in (0, 1), got {}",
                self.confidence
            ));
        }
        if self.grace_period == 0 {
            return invalid("grace_period must be positive");
        }
        if !(self.tie_threshold >= 0.0 && self.tie_threshold.is_finite()) {
            return invalid(format!(
                "tie_threshold must be non-negative, got {}",
                self.tie_threshold
            ));
        }
        if !(self.min_merit >= 0.0 && self.min_merit.is_finite()) {
            return invalid(format!("min_merit must be non-negative, got {}", self.min_merit));
        }
        if self.memory_estimate_period == 0 {
            return invalid("memory_estimate_period must be positive");
        }
        if self.numeric_estimator.max_bins() < 2 {
            return invalid("histogram max_bins must be at least 2");
        }
        if let SplitCriterionChoice::InfoGain(p) = &self.split_criterion {
            if !(0.0..0.5).contains(&p.min_branch_fraction) {
                return invalid("min_branch_fraction must lie in [0, 0.5)");
            }
        }

        let is_mean = matches!(self.leaf_prediction, LeafPredictionChoice::Mean(_));
        match (self.task_kind(), is_mean) {
            (TaskKind::Regression, false) => {
                return invalid("regression trees predict with the mean leaf prediction");
            }
            (TaskKind::Classification, true) => {
                return invalid("the mean leaf prediction requires the variance-reduction criterion");
            }
            _ => {}
        }

        if self.drift_evaluation_period == 0 {
            return invalid("drift_evaluation_period must be positive");
        }
        if !(0.0..=1.0).contains(&self.drift_switch_margin) {
            return invalid("drift_switch_margin must lie in [0, 1]");
        }
        if self.drift_max_losing_windows == 0 {
            return invalid("drift_max_losing_windows must be positive");
        }
        match &self.drift_detector {
            DriftDetectorChoice::Adwin(p) if !(p.delta > 0.0 && p.delta < 1.0) => {
                invalid(format!("ADWIN delta must lie in (0, 1), got {}", p.delta))
            }
            DriftDetectorChoice::Eddm(p)
                if !(0.0 < p.out_control_level
                    && p.out_control_level <= p.warning_level
                    && p.warning_level <= 1.0) =>
            {
                invalid("EDDM levels must satisfy 0 < out_control <= warning <= 1")
            }
            _ => Ok(()),
        }
    }
}

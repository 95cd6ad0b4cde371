//! Step plan derivation
//!
//! A step plan is the ordered, dependency-annotated list of tasks derived
//! from an installation request: metadata resolution first, then one
//! download per required artifact, then the external processor when an
//! add-on needs one, then finalization. Downloads may run concurrently;
//! the stages between them are strictly ordered.

use launchcore_types::InstallationRequest;

/// What one planned step does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Resolve download URLs and processor metadata.
    Resolve,
    /// Fetch one named artifact.
    Download { artifact: String },
    /// Run the add-on installer in the external execution environment.
    RunProcessor,
    /// Persist installed-version state.
    Finalize,
}

/// One entry of a step plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub kind: StepKind,
}

impl PlannedStep {
    /// Stable semantic label for this step's task record.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.kind {
            StepKind::Resolve => "resolve-metadata".to_string(),
            StepKind::Download { artifact } => format!("download-artifact:{artifact}"),
            StepKind::RunProcessor => "run-external-process".to_string(),
            StepKind::Finalize => "finalize".to_string(),
        }
    }
}

/// The ordered plan for one run.
#[derive(Debug, Clone)]
pub struct StepPlan {
    steps: Vec<PlannedStep>,
}

impl StepPlan {
    /// Derive the plan for `request`.
    #[must_use]
    pub fn from_request(request: &InstallationRequest) -> Self {
        let mut steps = vec![PlannedStep {
            kind: StepKind::Resolve,
        }];
        for artifact in request.artifact_names() {
            steps.push(PlannedStep {
                kind: StepKind::Download { artifact },
            });
        }
        if request.requires_processor() {
            steps.push(PlannedStep {
                kind: StepKind::RunProcessor,
            });
        }
        steps.push(PlannedStep {
            kind: StepKind::Finalize,
        });
        Self { steps }
    }

    /// The planned steps, in execution order.
    #[must_use]
    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    /// Number of planned steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan is empty (it never is for a well-formed request).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

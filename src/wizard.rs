//! Wizard step sequencing: upload → questionnaire → report.
//!
//! The wizard owns the handoff data between steps (job identifier, raw
//! questionnaire answers) and the process-wide busy flag that gates the
//! blocking overlay during network-bound steps.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::WizardError;
use crate::questionnaire::QuestionnaireAnswers;

/// The three wizard steps.
///
/// Linear except for one backward edge: the questionnaire can return to the
/// upload step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Upload,
    Questionnaire,
    Report,
}

impl WizardStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: WizardStep) -> bool {
        use WizardStep::*;
        matches!(
            (self, target),
            (Upload, Questionnaire) | (Questionnaire, Report) | (Questionnaire, Upload)
        )
    }

    /// Whether this is the final step.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Report)
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Upload => "upload",
            Self::Questionnaire => "questionnaire",
            Self::Report => "report",
        };
        write!(f, "{s}")
    }
}

/// RAII hold on the busy flag. The overlay clears when the guard drops,
/// on every exit path.
#[must_use = "the busy flag clears as soon as the guard is dropped"]
pub struct BusyGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Top-level wizard state.
pub struct Wizard {
    step: WizardStep,
    job_id: Option<String>,
    answers: Option<QuestionnaireAnswers>,
    busy: Arc<AtomicBool>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Upload,
            job_id: None,
            answers: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Job identifier from the upload step, once set.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// Questionnaire answers, if the step was completed with data.
    pub fn answers(&self) -> Option<&QuestionnaireAnswers> {
        self.answers.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Relaxed)
    }

    /// Raise the busy flag for the duration of a network-bound step.
    pub fn begin_busy(&self) -> BusyGuard {
        self.busy.store(true, Ordering::Relaxed);
        BusyGuard {
            flag: Arc::clone(&self.busy),
        }
    }

    /// Leave the upload step with the job identifier the backend returned.
    pub fn complete_upload(&mut self, job_id: impl Into<String>) -> Result<(), WizardError> {
        self.transition(WizardStep::Questionnaire)?;
        self.job_id = Some(job_id.into());
        Ok(())
    }

    /// Leave the questionnaire step. Answers are optional: the step may be
    /// skipped or its data discarded.
    pub fn complete_questionnaire(
        &mut self,
        answers: Option<QuestionnaireAnswers>,
    ) -> Result<(), WizardError> {
        if self.job_id.is_none() {
            return Err(WizardError::MissingJobId);
        }
        self.transition(WizardStep::Report)?;
        if answers.is_some() {
            self.answers = answers;
        }
        Ok(())
    }

    /// The single backward edge: return from the questionnaire to upload.
    pub fn back_to_upload(&mut self) -> Result<(), WizardError> {
        self.transition(WizardStep::Upload)
    }

    fn transition(&mut self, target: WizardStep) -> Result<(), WizardError> {
        if !self.step.can_transition_to(target) {
            return Err(WizardError::InvalidTransition {
                from: self.step.to_string(),
                to: target.to_string(),
            });
        }
        tracing::debug!(from = %self.step, to = %target, "Wizard step transition");
        self.step = target;
        Ok(())
    }
}

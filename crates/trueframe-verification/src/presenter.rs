//! Step presenter
//!
//! Pure functions from a [`VerificationState`] to what the upload screen
//! displays. Nothing here holds state; callers re-derive the view whenever the
//! session's state changes.

use serde::Serialize;
use trueframe_core::models::{StepStatus, VerificationState, VerificationStep};
use trueframe_core::AppError;

/// Status of `step` while the attempt is in `state`.
pub fn step_status(state: VerificationState, step: VerificationStep) -> StepStatus {
    use VerificationState as S;
    use VerificationStep as Step;

    match (state, step) {
        (S::Idle, _) => StepStatus::Pending,
        (S::Scanning, Step::Scanning) => StepStatus::Active,
        (S::Scanning, _) => StepStatus::Pending,
        (S::Analyzing, Step::Scanning) => StepStatus::Complete,
        (S::Analyzing, Step::Analysis) => StepStatus::Active,
        (S::Analyzing, Step::Result) => StepStatus::Pending,
        (S::Verified, _) => StepStatus::Complete,
        (S::Rejected, Step::Result) => StepStatus::Error,
        (S::Warning, Step::Result) => StepStatus::Warning,
        (S::Rejected | S::Warning, _) => StepStatus::Complete,
    }
}

/// [`step_status`] addressed by the 1-based step number.
pub fn step_status_at(state: VerificationState, index: u8) -> Result<StepStatus, AppError> {
    let step = VerificationStep::from_index(index)
        .ok_or_else(|| AppError::InvalidInput(format!("Step index must be 1-3, got {}", index)))?;
    Ok(step_status(state, step))
}

pub fn step_title(step: VerificationStep) -> &'static str {
    match step {
        VerificationStep::Scanning => "Scanning Media",
        VerificationStep::Analysis => "AI Analysis",
        VerificationStep::Result => "Verification Result",
    }
}

pub fn step_description(state: VerificationState, step: VerificationStep) -> &'static str {
    match step {
        VerificationStep::Scanning => "Extracting frames and metadata",
        VerificationStep::Analysis => "Checking for synthetic content",
        VerificationStep::Result => match state {
            VerificationState::Verified => "Content is authentic",
            VerificationState::Rejected => "Deepfake detected",
            VerificationState::Warning => "Needs review",
            _ => "Awaiting scan completion",
        },
    }
}

/// Headline for each state.
pub fn status_message(state: VerificationState) -> &'static str {
    match state {
        VerificationState::Idle => "Select media to upload",
        VerificationState::Scanning => "Scanning for deepfake indicators...",
        VerificationState::Analyzing => "Analyzing authenticity...",
        VerificationState::Verified => "Authentic content verified!",
        VerificationState::Rejected => "Deepfake detected — upload blocked",
        VerificationState::Warning => "Potential manipulation detected",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayIndicator {
    Spinner,
    RejectedShield,
    WarningTriangle,
}

/// Overlay drawn over the preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub indicator: OverlayIndicator,
    pub message: &'static str,
}

/// `None` while idle and once verified; the verified badge replaces it.
pub fn overlay(state: VerificationState) -> Option<Overlay> {
    let indicator = match state {
        VerificationState::Idle | VerificationState::Verified => return None,
        VerificationState::Scanning | VerificationState::Analyzing => OverlayIndicator::Spinner,
        VerificationState::Rejected => OverlayIndicator::RejectedShield,
        VerificationState::Warning => OverlayIndicator::WarningTriangle,
    };
    Some(Overlay {
        indicator,
        message: status_message(state),
    })
}

/// Notice shown under the steps after a rejected or flagged outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeNotice {
    pub title: &'static str,
    pub body: &'static str,
    pub can_request_review: bool,
}

pub fn outcome_notice(state: VerificationState) -> Option<OutcomeNotice> {
    match state {
        VerificationState::Rejected => Some(OutcomeNotice {
            title: "Upload Blocked",
            body: "Synthetic facial artifacts detected. This content cannot be published.",
            can_request_review: false,
        }),
        VerificationState::Warning => Some(OutcomeNotice {
            title: "Content Flagged",
            body: "Potential manipulation detected. You can request a manual review.",
            can_request_review: true,
        }),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub step: VerificationStep,
    pub index: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub status: StepStatus,
}

/// Everything the upload screen derives from the verification state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadView {
    pub state: VerificationState,
    pub message: &'static str,
    pub steps: Vec<StepView>,
    pub overlay: Option<Overlay>,
    pub verified_badge: bool,
    /// Caption field and publish button
    pub can_publish: bool,
    pub notice: Option<OutcomeNotice>,
}

pub fn present(state: VerificationState) -> UploadView {
    let steps = VerificationStep::ALL
        .iter()
        .map(|&step| StepView {
            step,
            index: step.index(),
            title: step_title(step),
            description: step_description(state, step),
            status: step_status(state, step),
        })
        .collect();

    UploadView {
        state,
        message: status_message(state),
        steps,
        overlay: overlay(state),
        verified_badge: state == VerificationState::Verified,
        can_publish: state == VerificationState::Verified,
        notice: outcome_notice(state),
    }
}

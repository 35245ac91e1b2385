//! Upload session: the verification state machine for one upload screen.
//!
//! `idle → scanning → analyzing → {verified | rejected | warning}`
//!
//! Selecting media moves the session to `scanning` before
//! [`UploadSession::select_media`] returns. A timer task spawned at selection
//! applies `analyzing` after `timings.analyzing_after` and the policy's
//! terminal status after `timings.outcome_after`, both measured from the
//! selection instant.
//!
//! Re-selecting or resetting cancels the previous attempt's timers. Every
//! transition is also fenced by the attempt id, so a timer that fires late can
//! never touch a newer attempt.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use trueframe_core::models::{
    PublishedUpload, ReviewRequest, SelectedMedia, TerminalStatus, UploadAttempt,
    VerificationState,
};
use trueframe_core::{AppError, VerificationConfig, VerificationTimings};

use crate::policy::VerificationPolicy;
use crate::registry::PolicyRegistry;

struct SessionInner {
    attempt: UploadAttempt,
    cancel: Option<CancellationToken>,
    outcomes: Vec<TerminalStatus>,
}

/// Owns the current upload attempt and drives its verification.
///
/// Must be used from within a tokio runtime.
pub struct UploadSession {
    policy: Arc<dyn VerificationPolicy>,
    timings: VerificationTimings,
    inner: Arc<Mutex<SessionInner>>,
    state_tx: Arc<watch::Sender<VerificationState>>,
}

impl UploadSession {
    pub fn new(policy: Arc<dyn VerificationPolicy>, timings: VerificationTimings) -> Self {
        let (state_tx, _) = watch::channel(VerificationState::Idle);
        Self {
            policy,
            timings,
            inner: Arc::new(Mutex::new(SessionInner {
                attempt: UploadAttempt::new(),
                cancel: None,
                outcomes: Vec::new(),
            })),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Build a session using the policy and timings named by `config`.
    pub async fn from_config(
        config: &VerificationConfig,
        registry: &PolicyRegistry,
    ) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Configuration(e.to_string()))?;
        let policy = registry.get(&config.policy).await?;
        Ok(Self::new(policy, config.timings))
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    pub fn timings(&self) -> VerificationTimings {
        self.timings
    }

    /// Current verification state.
    pub fn state(&self) -> VerificationState {
        *self.state_tx.borrow()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<VerificationState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current attempt.
    pub async fn attempt(&self) -> UploadAttempt {
        self.inner.lock().await.attempt.clone()
    }

    /// Terminal statuses reached by attempts in this session, oldest first.
    pub async fn outcome_history(&self) -> Vec<TerminalStatus> {
        self.inner.lock().await.outcomes.clone()
    }

    /// Handle a picker result: the first file starts a new attempt, an empty
    /// selection changes nothing.
    pub async fn handle_selection<I>(&self, files: I) -> Option<Uuid>
    where
        I: IntoIterator<Item = SelectedMedia>,
    {
        let media = files.into_iter().next()?;
        Some(self.select_media(media).await)
    }

    /// Start a new attempt for `media` and schedule its transitions.
    #[tracing::instrument(
        skip(self, media),
        fields(media_id = %media.id, media_kind = %media.kind)
    )]
    pub async fn select_media(&self, media: SelectedMedia) -> Uuid {
        let token = CancellationToken::new();
        let attempt = UploadAttempt::for_media(media.clone());
        let attempt_id = attempt.id;

        {
            let mut inner = self.inner.lock().await;
            if let Some(previous) = inner.cancel.replace(token.clone()) {
                previous.cancel();
                tracing::debug!(
                    previous_attempt_id = %inner.attempt.id,
                    "Cancelled pending transitions of previous attempt"
                );
            }
            inner.attempt = attempt;
            self.state_tx.send_replace(VerificationState::Scanning);
        }

        tracing::info!(
            attempt_id = %attempt_id,
            state = %VerificationState::Scanning,
            "Verification started"
        );

        self.schedule_transitions(attempt_id, media, token);
        attempt_id
    }

    fn schedule_transitions(
        &self,
        attempt_id: Uuid,
        media: SelectedMedia,
        token: CancellationToken,
    ) {
        let started = Instant::now();
        let timings = self.timings;
        let policy = self.policy.clone();
        let inner = self.inner.clone();
        let state_tx = self.state_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = sleep_until(started + timings.analyzing_after) => {}
            }
            let analyzing = VerificationState::Analyzing;
            if !apply_transition(&inner, &state_tx, attempt_id, analyzing).await {
                return;
            }

            tokio::select! {
                _ = token.cancelled() => return,
                _ = sleep_until(started + timings.outcome_after) => {}
            }
            let status = tokio::select! {
                _ = token.cancelled() => return,
                result = policy.evaluate(&media) => match result {
                    Ok(status) => status,
                    Err(e) => {
                        tracing::error!(
                            attempt_id = %attempt_id,
                            policy = policy.name(),
                            error = %e,
                            "Verification policy failed, flagging upload for review"
                        );
                        TerminalStatus::Warning
                    }
                },
            };
            apply_transition(&inner, &state_tx, attempt_id, status.into()).await;
        });
    }

    /// Update the caption of the current attempt.
    pub async fn set_caption(&self, caption: impl Into<String>) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        if !inner.attempt.has_media() {
            return Err(AppError::InvalidState {
                action: "edit the caption",
                state: inner.attempt.state.to_string(),
            });
        }
        inner.attempt.caption = caption.into();
        Ok(())
    }

    /// Discard the current attempt and return to `idle`.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(token) = inner.cancel.take() {
            token.cancel();
        }
        let previous = inner.attempt.id;
        inner.attempt = UploadAttempt::new();
        self.state_tx.send_replace(VerificationState::Idle);
        tracing::info!(attempt_id = %previous, "Upload reset");
    }

    /// Publish a verified attempt. The session returns to `idle`.
    pub async fn publish(&self) -> Result<PublishedUpload, AppError> {
        let mut inner = self.inner.lock().await;
        let attempt = &inner.attempt;
        if attempt.state != VerificationState::Verified {
            return Err(AppError::InvalidState {
                action: "publish",
                state: attempt.state.to_string(),
            });
        }
        let (media, preview) = match (&attempt.media, &attempt.preview) {
            (Some(media), Some(preview)) => (media, preview),
            _ => {
                return Err(AppError::Internal(
                    "verified attempt has no media".to_string(),
                ))
            }
        };

        let published = PublishedUpload {
            attempt_id: attempt.id,
            media_id: media.id,
            media_kind: media.kind,
            preview: preview.clone(),
            caption: attempt.caption.clone(),
        };

        inner.cancel = None;
        inner.attempt = UploadAttempt::new();
        self.state_tx.send_replace(VerificationState::Idle);

        tracing::info!(
            attempt_id = %published.attempt_id,
            media_kind = %published.media_kind,
            "Upload published"
        );
        Ok(published)
    }

    /// Ask for a manual review of a flagged attempt. The state is unchanged.
    pub async fn request_review(&self) -> Result<ReviewRequest, AppError> {
        let inner = self.inner.lock().await;
        let attempt = &inner.attempt;
        if attempt.state != VerificationState::Warning {
            return Err(AppError::InvalidState {
                action: "request a review",
                state: attempt.state.to_string(),
            });
        }
        let media_id = attempt
            .media
            .as_ref()
            .map(|m| m.id)
            .ok_or_else(|| AppError::Internal("flagged attempt has no media".to_string()))?;

        let request = ReviewRequest {
            id: Uuid::new_v4(),
            attempt_id: attempt.id,
            media_id,
            requested_at: Utc::now(),
        };
        tracing::info!(
            review_id = %request.id,
            attempt_id = %request.attempt_id,
            "Manual review requested"
        );
        Ok(request)
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_lock() {
            if let Some(token) = inner.cancel.take() {
                token.cancel();
            }
        }
    }
}

/// Apply `state` if `attempt_id` is still current. Returns false for a stale attempt.
async fn apply_transition(
    inner: &Mutex<SessionInner>,
    state_tx: &watch::Sender<VerificationState>,
    attempt_id: Uuid,
    state: VerificationState,
) -> bool {
    let mut inner = inner.lock().await;
    if inner.attempt.id != attempt_id {
        tracing::debug!(
            attempt_id = %attempt_id,
            state = %state,
            "Dropped transition for stale attempt"
        );
        return false;
    }

    inner.attempt.state = state;
    if let Some(status) = state.terminal_status() {
        inner.outcomes.push(status);
        inner.cancel = None;
    }
    state_tx.send_replace(state);

    tracing::info!(attempt_id = %attempt_id, state = %state, "Verification state changed");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FixedOutcomePolicy;
    use bytes::Bytes;
    use std::time::Duration;
    use trueframe_core::models::MediaKind;

    fn sample_media() -> SelectedMedia {
        SelectedMedia {
            id: Uuid::new_v4(),
            file_name: "portrait.png".to_string(),
            content_type: "image/png".to_string(),
            kind: MediaKind::Image,
            size_bytes: 4,
            duration_secs: None,
            data: Bytes::from_static(b"\x89PNG"),
        }
    }

    fn session(status: TerminalStatus) -> UploadSession {
        UploadSession::new(
            Arc::new(FixedOutcomePolicy::new(status)),
            VerificationTimings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn selection_scans_synchronously() {
        let session = session(TerminalStatus::Verified);
        assert_eq!(session.state(), VerificationState::Idle);

        session.select_media(sample_media()).await;
        assert_eq!(session.state(), VerificationState::Scanning);

        let attempt = session.attempt().await;
        assert_eq!(attempt.state, VerificationState::Scanning);
        assert!(attempt.preview.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_selection_is_ignored() {
        let session = session(TerminalStatus::Verified);
        assert!(session.handle_selection(Vec::new()).await.is_none());
        assert_eq!(session.state(), VerificationState::Idle);
        assert!(!session.attempt().await.has_media());
    }

    #[tokio::test(start_paused = true)]
    async fn state_holds_until_each_deadline() {
        let session = session(TerminalStatus::Warning);
        session.select_media(sample_media()).await;

        tokio::time::advance(Duration::from_millis(1499)).await;
        tokio::task::yield_now().await;
        assert_eq!(session.state(), VerificationState::Scanning);

        let mut rx = session.subscribe();
        rx.wait_for(|s| *s == VerificationState::Analyzing).await.unwrap();

        tokio::time::advance(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(session.state(), VerificationState::Analyzing);

        rx.wait_for(|s| s.is_terminal()).await.unwrap();
        assert_eq!(session.state(), VerificationState::Warning);
    }

    #[tokio::test(start_paused = true)]
    async fn caption_requires_media() {
        let session = session(TerminalStatus::Verified);
        assert!(matches!(
            session.set_caption("hello").await,
            Err(AppError::InvalidState { .. })
        ));
        session.select_media(sample_media()).await;
        session.set_caption("hello").await.unwrap();
        assert_eq!(session.attempt().await.caption, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn publish_only_when_verified() {
        let session = session(TerminalStatus::Verified);
        session.select_media(sample_media()).await;
        assert!(matches!(
            session.publish().await,
            Err(AppError::InvalidState { action: "publish", .. })
        ));

        session.set_caption("golden hour").await.unwrap();
        let mut rx = session.subscribe();
        rx.wait_for(|s| s.is_terminal()).await.unwrap();

        let published = session.publish().await.unwrap();
        assert_eq!(published.caption, "golden hour");
        assert_eq!(published.media_kind, MediaKind::Image);
        assert_eq!(session.state(), VerificationState::Idle);
        assert!(!session.attempt().await.has_media());
    }

    #[tokio::test(start_paused = true)]
    async fn review_only_when_flagged() {
        let session = session(TerminalStatus::Warning);
        let media = sample_media();
        let media_id = media.id;
        let attempt_id = session.select_media(media).await;
        assert!(session.request_review().await.is_err());

        let mut rx = session.subscribe();
        rx.wait_for(|s| s.is_terminal()).await.unwrap();

        let review = session.request_review().await.unwrap();
        assert_eq!(review.attempt_id, attempt_id);
        assert_eq!(review.media_id, media_id);
        assert_eq!(session.state(), VerificationState::Warning);
    }

    #[tokio::test(start_paused = true)]
    async fn outcome_history_records_terminal_states() {
        let session = session(TerminalStatus::Rejected);
        let mut rx = session.subscribe();
        for _ in 0..3 {
            session.select_media(sample_media()).await;
            rx.wait_for(|s| s.is_terminal()).await.unwrap();
        }
        assert_eq!(
            session.outcome_history().await,
            vec![TerminalStatus::Rejected; 3]
        );
    }
}

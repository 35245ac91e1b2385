//! Simulated authenticity verification for uploads.
//!
//! An [`UploadSession`] owns one upload attempt at a time. Selecting media moves
//! it to `scanning` immediately; two timers scheduled at selection move it to
//! `analyzing` and then to the terminal status chosen by a
//! [`VerificationPolicy`]. The [`presenter`] module maps any state to what the
//! upload screen shows.

pub mod intake;
pub mod policy;
pub mod presenter;
pub mod registry;
pub mod session;

pub use intake::MediaIntake;
pub use policy::{FixedOutcomePolicy, OutcomePool, RandomOutcomePolicy, VerificationPolicy};
pub use presenter::{present, step_status, step_status_at, UploadView};
pub use registry::{PolicyInfo, PolicyRegistry};
pub use session::UploadSession;

pub mod media;
pub mod post;
pub mod verification;

pub use media::{MediaKind, PreviewReference, PublishedUpload, SelectedMedia, UploadAttempt};
pub use post::{Post, ReviewRequest, Story};
pub use verification::{StepStatus, TerminalStatus, VerificationState, VerificationStep};

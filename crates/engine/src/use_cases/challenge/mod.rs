//! Challenge use cases: CRUD plus the progress/award pipeline.

use std::sync::Arc;

pub mod crud;
pub mod progress;

pub use crud::{ChallengeError, ChallengeOps, CreateChallengeInput};
pub use progress::{ProgressError, RecordProgress};

/// Container for challenge use cases.
pub struct ChallengeUseCases {
    pub ops: Arc<ChallengeOps>,
    pub record_progress: Arc<RecordProgress>,
}

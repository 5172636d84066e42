//! Challenge creation and listing.

use std::sync::Arc;

use questboard_domain::{Challenge, ChallengeType, Page};

use crate::infrastructure::ports::{ChallengeRepo, RepoError};
use crate::use_cases::validation::{self, ValidationError};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 20;
const MAX_DESCRIPTION_LEN: usize = 100;

/// Input for creating a challenge (domain representation).
pub struct CreateChallengeInput {
    pub challenge_type: String,
    pub target: u32,
    pub points: u32,
    pub description: String,
}

pub struct ChallengeOps {
    challenges: Arc<dyn ChallengeRepo>,
}

impl ChallengeOps {
    pub fn new(challenges: Arc<dyn ChallengeRepo>) -> Self {
        Self { challenges }
    }

    pub async fn create(&self, input: CreateChallengeInput) -> Result<Challenge, ChallengeError> {
        let challenge_type = ChallengeType::parse(&input.challenge_type)
            .map_err(|e| ChallengeError::Validation(e.to_string()))?;
        validation::require_at_least(input.target, 1, "target")?;
        validation::require_non_empty(&input.description, "description")?;
        validation::require_max_length(&input.description, MAX_DESCRIPTION_LEN, "description")?;

        let challenge = Challenge::new(
            challenge_type,
            input.target,
            input.points,
            input.description,
        );
        self.challenges.save(&challenge).await?;
        Ok(challenge)
    }

    /// Active challenges, newest first, optionally filtered by description.
    pub async fn list(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> Result<Page<Challenge>, ChallengeError> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1);
        Ok(self.challenges.list_active(page, limit, search).await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<ValidationError> for ChallengeError {
    fn from(err: ValidationError) -> Self {
        ChallengeError::Validation(err.to_string())
    }
}

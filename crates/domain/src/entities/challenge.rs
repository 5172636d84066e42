//! Challenge entity - a definable unit of work with a target count and a
//! point reward (e.g., "like 20 products").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ChallengeId;

/// What kind of user action a challenge counts.
///
/// `Like` and `Comment` mutate the target product on every progress step.
/// `Share` is a pure counter: progress accrues without touching the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeType {
    Like,
    Comment,
    Share,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::Comment => "Comment",
            Self::Share => "Share",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Like" => Ok(Self::Like),
            "Comment" => Ok(Self::Comment),
            "Share" => Ok(Self::Share),
            other => Err(DomainError::parse(format!(
                "Unknown challenge type: {other}"
            ))),
        }
    }
}

/// Whether a challenge is open for new progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Active,
    Inactive,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            other => Err(DomainError::parse(format!(
                "Unknown challenge status: {other}"
            ))),
        }
    }
}

/// A challenge users can work towards.
///
/// `target` and `points` are treated as immutable once user progress exists;
/// there is no update operation that touches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    id: ChallengeId,
    #[serde(rename = "type")]
    challenge_type: ChallengeType,
    /// Number of actions required to complete the challenge (>= 1).
    target: u32,
    /// Points awarded on completion (>= 0).
    points: u32,
    description: String,
    status: ChallengeStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Challenge {
    pub fn new(
        challenge_type: ChallengeType,
        target: u32,
        points: u32,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ChallengeId::new(),
            challenge_type,
            target,
            points,
            description: description.into(),
            status: ChallengeStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ChallengeId {
        self.id
    }

    pub fn challenge_type(&self) -> ChallengeType {
        self.challenge_type
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ChallengeStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // === Builder Methods ===

    /// Set the challenge ID (used when loading from the store).
    pub fn with_id(mut self, id: ChallengeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: ChallengeStatus) -> Self {
        self.status = status;
        self
    }

    /// Set both timestamps (used when loading from the store).
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

//! UserChallenge entity - one user's progress record against a challenge.
//!
//! Unique per (user, challenge). Created on the first progress call with
//! progress 0, advanced by exactly one unit per call, and closed forever once
//! progress reaches the target. The transition is one-way: there is no path
//! back from `Completed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChallengeId, UserChallengeId, UserId};

/// Progress state of a user's challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserChallengeStatus {
    Inprogress,
    Completed,
}

impl UserChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inprogress => "Inprogress",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "Inprogress" => Ok(Self::Inprogress),
            "Completed" => Ok(Self::Completed),
            other => Err(DomainError::parse(format!(
                "Unknown user challenge status: {other}"
            ))),
        }
    }
}

/// A user's progress against a specific challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChallenge {
    id: UserChallengeId,
    user: UserId,
    challenge: ChallengeId,
    /// Copied from the challenge at creation time.
    target: u32,
    /// 0..=target; advanced by exactly one unit per progress call.
    progress: u32,
    /// Per-challenge award snapshot, written once on the completing call.
    points: u32,
    status: UserChallengeStatus,
    /// Storage revision for compare-and-swap saves.
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserChallenge {
    /// Create the progress record for a (user, challenge) pair.
    pub fn new(user: UserId, challenge: ChallengeId, target: u32) -> Self {
        let now = Utc::now();
        Self {
            id: UserChallengeId::new(),
            user,
            challenge,
            target,
            progress: 0,
            points: 0,
            status: UserChallengeStatus::Inprogress,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> UserChallengeId {
        self.id
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn challenge(&self) -> ChallengeId {
        self.challenge
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn status(&self) -> UserChallengeStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == UserChallengeStatus::Completed
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // === State transitions ===

    /// Apply one unit of progress.
    ///
    /// Returns `true` when this call is the completing one (progress reached
    /// target just now). Errors if the record is already `Completed`;
    /// progress can never exceed target.
    pub fn advance(&mut self) -> Result<bool, DomainError> {
        if self.is_completed() {
            return Err(DomainError::invalid_state_transition(
                "user challenge is already completed",
            ));
        }
        self.progress += 1;
        if self.progress == self.target {
            self.status = UserChallengeStatus::Completed;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Record the per-challenge award on the completing call.
    ///
    /// Overwrites rather than accumulates: this field is a snapshot of the
    /// challenge's reward, independent of the cumulative leaderboard total.
    pub fn set_awarded_points(&mut self, points: u32) {
        self.points = points;
    }

    // === Builder Methods (store loading) ===

    pub fn with_id(mut self, id: UserChallengeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_progress(mut self, progress: u32, status: UserChallengeStatus) -> Self {
        self.progress = progress;
        self.status = status;
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(target: u32) -> UserChallenge {
        UserChallenge::new(UserId::new(), ChallengeId::new(), target)
    }

    #[test]
    fn test_new_record_starts_at_zero_inprogress() {
        let uc = record(5);
        assert_eq!(uc.progress(), 0);
        assert_eq!(uc.points(), 0);
        assert_eq!(uc.status(), UserChallengeStatus::Inprogress);
    }

    #[test]
    fn test_advance_completes_exactly_at_target() {
        let mut uc = record(3);
        assert!(!uc.advance().expect("step 1"));
        assert!(!uc.advance().expect("step 2"));
        assert!(uc.advance().expect("step 3"));
        assert_eq!(uc.progress(), 3);
        assert!(uc.is_completed());
    }

    #[test]
    fn test_advance_after_completion_is_rejected() {
        let mut uc = record(1);
        assert!(uc.advance().expect("completing step"));
        let err = uc.advance().expect_err("must reject");
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        // No mutation happened on the rejected call.
        assert_eq!(uc.progress(), 1);
        assert!(uc.is_completed());
    }

    #[test]
    fn test_target_one_completes_on_first_step() {
        let mut uc = record(1);
        assert!(uc.advance().expect("step"));
        assert!(uc.is_completed());
    }

    #[test]
    fn test_awarded_points_overwrite() {
        let mut uc = record(1);
        uc.advance().expect("step");
        uc.set_awarded_points(10);
        uc.set_awarded_points(10);
        assert_eq!(uc.points(), 10);
    }
}

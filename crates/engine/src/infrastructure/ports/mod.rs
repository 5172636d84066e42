//! Port traits: the seams between use cases and the outside world.

mod auth;
mod error;
mod notifier;
mod repos;

pub use auth::{AuthPort, AuthenticatedUser};
pub use error::{AuthError, RepoError};
pub use notifier::Notifier;
pub use repos::{
    AchievementRepo, BadgeRepo, ChallengeRepo, ClockPort, LeaderRepo, ProductRepo, UserAchievementRepo,
    UserChallengeRepo, UserRepo,
};

#[cfg(test)]
pub use auth::MockAuthPort;
#[cfg(test)]
pub use notifier::MockNotifier;
#[cfg(test)]
pub use repos::{
    MockAchievementRepo, MockBadgeRepo, MockChallengeRepo, MockLeaderRepo, MockProductRepo,
    MockUserAchievementRepo, MockUserChallengeRepo, MockUserRepo,
};

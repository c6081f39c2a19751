use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user on whose behalf an operation runs.
///
/// Passed explicitly into every service call; anonymous calls pass `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub user_id: Uuid,
    pub username: String,
    pub is_staff: bool,
}

impl Requester {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            is_staff: false,
        }
    }

    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}

impl From<&super::User> for Requester {
    fn from(user: &super::User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

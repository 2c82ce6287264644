use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// The slice of a user the reminder subsystem needs: an identity and a
/// push-delivery token. Profile data lives with the external CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    /// Opaque push gateway token; absent when the user has no registered
    /// device. Sends to a user without a token are recorded as failures.
    pub device_token: Option<String>,
}

impl User {
    pub fn new() -> Self {
        Self {
            id: Default::default(),
            device_token: None,
        }
    }

    pub fn with_device_token(token: &str) -> Self {
        Self {
            id: Default::default(),
            device_token: Some(token.to_string()),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

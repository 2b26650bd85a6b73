use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Brand,
    Creator,
    Agent,
    Admin,
}

/// An authenticated caller as handed over by the identity collaborator.
///
/// Role and campaign checks happen at the API boundary before escrow
/// operations run; the engine only re-checks payout ownership.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(role: Role, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
        }
    }
}

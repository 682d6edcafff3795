use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The admin record id.
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// The profile the identity provider hands back after a successful sign-in.
///
/// Every field is optional on the wire; sign-in decides what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

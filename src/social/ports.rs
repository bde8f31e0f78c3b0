// Collaborator seams for the page controllers
// Implemented by the in-memory repository and the Twitter client, or by test fakes

use super::model::{CursoredList, Identity, Profile};
use crate::error::Result;
use async_trait::async_trait;

/// Owns authorization state per identity
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Whether `identity` holds a usable authorization
    async fn is_authorized(&self, identity: &Identity) -> bool;

    /// Route that starts the connection flow, e.g. `/connect/twitter`
    fn connect_path(&self) -> &str;
}

/// Read access to the provider's user API on behalf of an identity
#[async_trait]
pub trait ProfileClient: Send + Sync {
    async fn get_user_profile(&self, identity: &Identity) -> Result<Profile>;

    /// First page of the accounts the identity follows
    async fn get_friends(&self, identity: &Identity) -> Result<CursoredList<Profile>>;
}

/// Resolves who the current user is
pub trait IdentitySource: Send + Sync {
    fn resolve_identity(&self) -> Identity;
}

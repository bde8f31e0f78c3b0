// Identity source that always answers with one configured user

use super::model::Identity;
use super::ports::IdentitySource;

/// Single-user identity source
///
/// The application serves exactly one local user, named in `twitter.user_id`.
#[derive(Debug, Clone)]
pub struct FixedIdentitySource {
    identity: Identity,
}

impl FixedIdentitySource {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(user_id),
        }
    }
}

impl IdentitySource for FixedIdentitySource {
    fn resolve_identity(&self) -> Identity {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_configured_user() {
        let source = FixedIdentitySource::new("testuser");
        assert_eq!(source.resolve_identity(), Identity::new("testuser"));
        assert_eq!(source.resolve_identity().as_str(), "testuser");
    }
}

// In-memory connection repository
// Holds provider access tokens per local user for the lifetime of the process

use super::model::Identity;
use super::ports::ConnectionProvider;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Connections to a single provider, keyed by local user id
pub struct InMemoryConnectionRepository {
    provider_id: String,
    connect_path: String,
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryConnectionRepository {
    pub fn new(provider_id: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            connect_path: format!("/connect/{provider_id}"),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Create a repository pre-populated with `(user_id, access_token)` pairs
    ///
    /// User ids are kept exactly as given. Entries with an empty token are skipped.
    pub fn with_connections<'a>(
        provider_id: &str,
        connections: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut tokens = HashMap::new();
        for (user_id, token) in connections {
            if token.is_empty() {
                crate::logger::log_warning(&format!(
                    "[Connect] Ignoring {provider_id} connection for '{user_id}': empty access token"
                ));
                continue;
            }
            tokens.insert(user_id.to_string(), token.to_string());
        }

        Self {
            tokens: RwLock::new(tokens),
            ..Self::new(provider_id)
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Store or replace the access token of `identity`
    #[cfg(test)]
    pub async fn add_connection(&self, identity: &Identity, access_token: String) {
        self.tokens
            .write()
            .await
            .insert(identity.as_str().to_string(), access_token);
    }

    /// Drop the connection of `identity`, returning whether one existed
    pub async fn remove_connection(&self, identity: &Identity) -> bool {
        self.tokens
            .write()
            .await
            .remove(identity.as_str())
            .is_some()
    }

    pub async fn access_token(&self, identity: &Identity) -> Option<String> {
        self.tokens.read().await.get(identity.as_str()).cloned()
    }

    pub async fn is_connected(&self, identity: &Identity) -> bool {
        self.tokens.read().await.contains_key(identity.as_str())
    }
}

#[async_trait]
impl ConnectionProvider for InMemoryConnectionRepository {
    async fn is_authorized(&self, identity: &Identity) -> bool {
        self.is_connected(identity).await
    }

    fn connect_path(&self) -> &str {
        &self.connect_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_remove_connection() {
        let repo = InMemoryConnectionRepository::new("twitter");
        let user = Identity::new("testuser");

        assert!(!repo.is_authorized(&user).await);
        repo.add_connection(&user, "token-1".to_string()).await;
        assert!(repo.is_authorized(&user).await);
        assert_eq!(repo.access_token(&user).await.as_deref(), Some("token-1"));

        assert!(repo.remove_connection(&user).await);
        assert!(!repo.remove_connection(&user).await);
        assert!(!repo.is_authorized(&user).await);
    }

    #[tokio::test]
    async fn test_seeded_connections_skip_empty_tokens() {
        let seed = [("alice", "abc"), ("bob", "")];

        let repo = InMemoryConnectionRepository::with_connections("twitter", seed);
        assert!(repo.is_connected(&Identity::new("alice")).await);
        assert!(!repo.is_connected(&Identity::new("bob")).await);
    }

    #[tokio::test]
    async fn test_seeded_user_ids_keep_their_case() {
        let repo = InMemoryConnectionRepository::with_connections("twitter", [("Ada", "tok")]);
        assert!(repo.is_connected(&Identity::new("Ada")).await);
        assert!(!repo.is_connected(&Identity::new("ada")).await);
    }

    #[test]
    fn test_connect_path_follows_provider() {
        let repo = InMemoryConnectionRepository::new("twitter");
        assert_eq!(repo.provider_id(), "twitter");
        assert_eq!(repo.connect_path(), "/connect/twitter");
    }
}

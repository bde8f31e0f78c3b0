// Application state module
// Explicit wiring of the repository, API client, controllers and renderer

use std::sync::Arc;
use std::time::Duration;

use super::types::Config;
use crate::controller::{ConnectController, HelloController};
use crate::error::Result;
use crate::render::Renderer;
use crate::social::{FixedIdentitySource, IdentitySource, InMemoryConnectionRepository, TwitterClient};

/// Everything a request handler needs, shared across connections
pub struct AppState {
    pub config: Config,
    pub identity: Arc<dyn IdentitySource>,
    pub hello: HelloController,
    pub connect: ConnectController,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentitySource>,
        hello: HelloController,
        connect: ConnectController,
        renderer: Renderer,
    ) -> Self {
        Self {
            config,
            identity,
            hello,
            connect,
            renderer,
        }
    }

    /// Build the production object graph from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let twitter = &config.twitter;
        let connections = Arc::new(InMemoryConnectionRepository::with_connections(
            &twitter.provider_id,
            twitter
                .connections
                .iter()
                .map(|c| (c.user_id.as_str(), c.access_token.as_str())),
        ));
        if !twitter.connections.iter().any(|c| c.user_id == twitter.user_id) {
            crate::logger::log_info(&format!(
                "[Connect] No {} connection configured for '{}'",
                twitter.provider_id, twitter.user_id
            ));
        }
        let client = Arc::new(TwitterClient::new(
            &twitter.api_base_url,
            Duration::from_secs(twitter.request_timeout),
            &config.http.server_name,
            Arc::clone(&connections),
        )?);

        let hello = HelloController::new(connections.clone(), client);
        let connect = ConnectController::new(connections);
        let identity = Arc::new(FixedIdentitySource::new(twitter.user_id.clone()));
        let renderer = Renderer::new(config.templates.dir.as_deref())?;

        Ok(Self::new(config.clone(), identity, hello, connect, renderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::connect::CONNECTED_TEMPLATE;
    use crate::view::View;

    #[tokio::test]
    async fn test_mixed_case_user_is_connected_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hello.toml");
        std::fs::write(
            &path,
            r#"
[twitter]
user_id = "Ada"

[[twitter.connections]]
user_id = "Ada"
access_token = "tok"
"#,
        )
        .unwrap();
        let cfg = Config::load_from(path.with_extension("").to_str().unwrap()).unwrap();

        let state = AppState::from_config(&cfg).unwrap();
        let identity = state.identity.resolve_identity();
        assert_eq!(identity.as_str(), "Ada");

        let View::Render(render) = state.connect.status(&identity).await.unwrap() else {
            panic!("expected render");
        };
        assert_eq!(render.template, CONNECTED_TEMPLATE);
    }
}

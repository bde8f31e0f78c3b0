//! Connection status controller
//!
//! Shows whether the current user is connected to the provider and lets them
//! drop the connection. Establishing a connection happens outside this app.

use crate::error::Result;
use crate::social::{ConnectionProvider, Identity, InMemoryConnectionRepository};
use crate::view::{View, ViewModel};
use std::sync::Arc;

pub const CONNECT_TEMPLATE: &str = "connect/twitter_connect";
pub const CONNECTED_TEMPLATE: &str = "connect/twitter_connected";

pub struct ConnectController {
    connections: Arc<InMemoryConnectionRepository>,
}

impl ConnectController {
    pub const fn new(connections: Arc<InMemoryConnectionRepository>) -> Self {
        Self { connections }
    }

    pub fn connect_path(&self) -> &str {
        self.connections.connect_path()
    }

    /// Status page for `identity`
    pub async fn status(&self, identity: &Identity) -> Result<View> {
        let template = if self.connections.is_connected(identity).await {
            CONNECTED_TEMPLATE
        } else {
            CONNECT_TEMPLATE
        };

        let mut model = ViewModel::new();
        model.insert("provider_id", &self.connections.provider_id())?;
        model.insert("user_id", &identity.as_str())?;
        Ok(View::render(template, model))
    }

    /// Remove the connection of `identity` and return to the status page
    pub async fn disconnect(&self, identity: &Identity) -> View {
        if self.connections.remove_connection(identity).await {
            crate::logger::log_info(&format!(
                "[Connect] Removed {} connection for '{identity}'",
                self.connections.provider_id()
            ));
        }
        View::redirect(self.connections.connect_path())
    }
}

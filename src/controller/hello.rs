//! Home page controller
//!
//! Sends unconnected users to the connect page; otherwise loads the user's profile
//! and first page of friends for the `hello` template.

use crate::error::Result;
use crate::social::{ConnectionProvider, Identity, ProfileClient};
use crate::view::{View, ViewModel};
use std::sync::Arc;

pub const HELLO_TEMPLATE: &str = "hello";
pub const PROFILE_KEY: &str = "profile";
pub const FRIENDS_KEY: &str = "friends";

pub struct HelloController {
    connections: Arc<dyn ConnectionProvider>,
    profiles: Arc<dyn ProfileClient>,
}

impl HelloController {
    pub fn new(connections: Arc<dyn ConnectionProvider>, profiles: Arc<dyn ProfileClient>) -> Self {
        Self {
            connections,
            profiles,
        }
    }

    /// Build the home page view for `identity`
    ///
    /// Client failures are returned as-is; nothing is rendered from partial data.
    pub async fn handle(&self, identity: &Identity) -> Result<View> {
        if !self.connections.is_authorized(identity).await {
            return Ok(View::redirect(self.connections.connect_path()));
        }

        let mut model = ViewModel::new();
        let profile = self.profiles.get_user_profile(identity).await?;
        model.insert(PROFILE_KEY, &profile)?;
        let friends = self.profiles.get_friends(identity).await?;
        if friends.has_next() {
            crate::logger::log_debug(&format!(
                "[Hello] Showing the first {} friends of '{identity}', more pages not fetched",
                friends.items.len()
            ));
        }
        model.insert(FRIENDS_KEY, &friends)?;

        Ok(View::render(HELLO_TEMPLATE, model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SocialError;
    use crate::social::{CursoredList, Profile};
    use crate::view::{RedirectInstruction, RenderInstruction};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeConnections {
        authorized: bool,
    }

    #[async_trait]
    impl ConnectionProvider for FakeConnections {
        async fn is_authorized(&self, _identity: &Identity) -> bool {
            self.authorized
        }

        fn connect_path(&self) -> &str {
            "/connect/twitter"
        }
    }

    /// Serves queued friend pages in order and counts calls
    #[derive(Default)]
    struct FakeProfiles {
        profile: Profile,
        friend_pages: Mutex<Vec<Vec<Profile>>>,
        fail_friends: bool,
        profile_calls: AtomicUsize,
        friends_calls: AtomicUsize,
    }

    impl FakeProfiles {
        fn new(profile: Profile, friend_pages: Vec<Vec<Profile>>) -> Self {
            Self {
                profile,
                friend_pages: Mutex::new(friend_pages),
                ..Self::default()
            }
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.profile_calls.load(Ordering::SeqCst),
                self.friends_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl ProfileClient for FakeProfiles {
        async fn get_user_profile(&self, _identity: &Identity) -> Result<Profile> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.profile.clone())
        }

        async fn get_friends(&self, _identity: &Identity) -> Result<CursoredList<Profile>> {
            self.friends_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_friends {
                return Err(SocialError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let mut pages = self.friend_pages.lock().unwrap();
            let page = if pages.is_empty() {
                Vec::new()
            } else {
                pages.remove(0)
            };
            Ok(CursoredList::new(page, None))
        }
    }

    fn controller(authorized: bool, profiles: Arc<FakeProfiles>) -> HelloController {
        HelloController::new(Arc::new(FakeConnections { authorized }), profiles)
    }

    #[tokio::test]
    async fn test_unauthorized_redirects_without_fetching() {
        let profiles = Arc::new(FakeProfiles::new(Profile::named("Ada"), vec![]));
        let hello = controller(false, Arc::clone(&profiles));

        let view = hello.handle(&Identity::new("u1")).await.unwrap();

        assert_eq!(
            view,
            View::Redirect(RedirectInstruction {
                location: "/connect/twitter".to_string()
            })
        );
        assert_eq!(profiles.calls(), (0, 0));
    }

    fn hello_model(profile: &str, friends: &[&str]) -> ViewModel {
        let friends: Vec<Profile> = friends.iter().map(|name| Profile::named(*name)).collect();
        let mut model = ViewModel::new();
        model.insert("profile", &Profile::named(profile)).unwrap();
        model.insert("friends", &friends).unwrap();
        model
    }

    #[tokio::test]
    async fn test_authorized_renders_profile_and_friends() {
        let profiles = Arc::new(FakeProfiles::new(
            Profile::named("Ada"),
            vec![vec![Profile::named("Bob")]],
        ));
        let hello = controller(true, Arc::clone(&profiles));

        let view = hello.handle(&Identity::new("u1")).await.unwrap();

        assert_eq!(
            view,
            View::Render(RenderInstruction {
                template: "hello",
                model: hello_model("Ada", &["Bob"]),
            })
        );
        assert_eq!(profiles.calls(), (1, 1));
    }

    #[tokio::test]
    async fn test_friends_are_a_plain_list_in_the_model() {
        let profiles = Arc::new(FakeProfiles::new(
            Profile::named("Ada"),
            vec![vec![Profile::named("Bob")]],
        ));
        let hello = controller(true, profiles);

        let View::Render(render) = hello.handle(&Identity::new("u1")).await.unwrap() else {
            panic!("expected render");
        };
        let model = serde_json::to_value(&render.model).unwrap();
        assert_eq!(model["profile"]["name"], "Ada");
        assert_eq!(model["friends"][0]["name"], "Bob");
        assert_eq!(model["friends"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_friends_failure_propagates() {
        let profiles = Arc::new(FakeProfiles {
            profile: Profile::named("Ada"),
            fail_friends: true,
            ..FakeProfiles::default()
        });
        let hello = controller(true, Arc::clone(&profiles));

        let err = hello.handle(&Identity::new("u1")).await.unwrap_err();

        assert!(matches!(err, SocialError::Api { status: 500, .. }));
        assert_eq!(profiles.calls(), (1, 1));
    }

    #[tokio::test]
    async fn test_each_call_fetches_fresh_data() {
        let profiles = Arc::new(FakeProfiles::new(
            Profile::named("Ada"),
            vec![vec![Profile::named("Bob")], vec![Profile::named("Carol")]],
        ));
        let hello = controller(true, Arc::clone(&profiles));
        let user = Identity::new("u1");

        let first = hello.handle(&user).await.unwrap();
        let second = hello.handle(&user).await.unwrap();

        assert_eq!(profiles.calls(), (2, 2));
        assert_eq!(first, View::render("hello", hello_model("Ada", &["Bob"])));
        assert_eq!(second, View::render("hello", hello_model("Ada", &["Carol"])));
    }
}

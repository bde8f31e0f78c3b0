// Twitter REST client
// Implements ProfileClient against the v2 users and following endpoints

use super::connection::InMemoryConnectionRepository;
use super::model::{CursoredList, Identity, Profile};
use super::ports::ProfileClient;
use crate::error::{Result, SocialError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const ME_PATH: &str = "/2/users/me";
/// Profile fields requested on top of `id`, `name` and `username`
const USER_FIELDS: &str = "description,location,profile_image_url,url,public_metrics";
/// Largest page the following endpoint serves
const FOLLOWING_PAGE_SIZE: &str = "1000";
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// `{"data": ...}` wrapper around single-object responses
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct PublicMetrics {
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    following_count: u64,
}

/// User object as returned by the v2 API
#[derive(Debug, Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    username: String,
    description: Option<String>,
    location: Option<String>,
    profile_image_url: Option<String>,
    url: Option<String>,
    #[serde(default)]
    public_metrics: PublicMetrics,
}

impl From<ApiUser> for Profile {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id,
            screen_name: user.username,
            name: user.name,
            description: user.description.filter(|d| !d.is_empty()),
            location: user.location,
            profile_image_url: user.profile_image_url,
            url: user.url.filter(|u| !u.is_empty()),
            followers_count: user.public_metrics.followers_count,
            friends_count: user.public_metrics.following_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageMeta {
    next_token: Option<String>,
}

/// Body of `users/:id/following`; `data` is absent when the user follows nobody
#[derive(Debug, Deserialize)]
struct FollowingPage {
    #[serde(default)]
    data: Vec<ApiUser>,
    #[serde(default)]
    meta: PageMeta,
}

/// Error body returned by the API on failure
///
/// v2 answers with a problem document (`title`, `detail`); some endpoints
/// still use the `{"errors":[{"message":...}]}` shape.
#[derive(Debug, Deserialize)]
struct ApiProblem {
    title: Option<String>,
    detail: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    message: Option<String>,
}

/// Twitter API client that authorizes each call with the caller's stored
/// OAuth 2.0 user access token
pub struct TwitterClient {
    client: Client,
    base_url: String,
    connections: Arc<InMemoryConnectionRepository>,
}

impl TwitterClient {
    /// Create a client rooted at `base_url` (e.g. `https://api.twitter.com`)
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        connections: Arc<InMemoryConnectionRepository>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            connections,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        identity: &Identity,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let token = self
            .connections
            .access_token(identity)
            .await
            .ok_or_else(|| SocialError::NotConnected {
                provider_id: self.connections.provider_id().to_string(),
                user_id: identity.to_string(),
            })?;

        let res = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(res.json::<T>().await?)
        } else {
            Err(error_from_response(res).await)
        }
    }

    async fn get_me(&self, identity: &Identity, query: &[(&str, &str)]) -> Result<ApiUser> {
        let me: Envelope<ApiUser> = self.get_json(identity, ME_PATH, query).await?;
        Ok(me.data)
    }
}

#[async_trait]
impl ProfileClient for TwitterClient {
    async fn get_user_profile(&self, identity: &Identity) -> Result<Profile> {
        Ok(self
            .get_me(identity, &[("user.fields", USER_FIELDS)])
            .await?
            .into())
    }

    async fn get_friends(&self, identity: &Identity) -> Result<CursoredList<Profile>> {
        // The following endpoint is addressed by numeric id, not by "me"
        let me = self.get_me(identity, &[]).await?;
        let page: FollowingPage = self
            .get_json(
                identity,
                &format!("/2/users/{}/following", me.id),
                &[
                    ("max_results", FOLLOWING_PAGE_SIZE),
                    ("user.fields", USER_FIELDS),
                ],
            )
            .await?;

        Ok(CursoredList::new(
            page.data.into_iter().map(Profile::from).collect(),
            page.meta.next_token,
        ))
    }
}

/// Classify a non-success response
async fn error_from_response(res: Response) -> SocialError {
    let status = res.status();
    let reset = res
        .headers()
        .get(RATE_LIMIT_RESET_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok());
    let body = res.text().await.unwrap_or_default();
    let message = api_error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    match status {
        StatusCode::UNAUTHORIZED => SocialError::ExpiredAuthorization { message },
        StatusCode::TOO_MANY_REQUESTS => SocialError::RateLimitExceeded { reset },
        _ => SocialError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Most specific message in an API error body
fn api_error_message(body: &str) -> Option<String> {
    let problem = serde_json::from_str::<ApiProblem>(body).ok()?;
    problem
        .detail
        .or_else(|| problem.errors.into_iter().find_map(|e| e.message))
        .or(problem.title)
}

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::UserRecord, protocol::RandomUserResponse};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::error::FetchError;

pub const DEFAULT_API_URL: &str = "https://randomuser.me/api/";

/// Origin of the profiles shown on the dashboard.
#[async_trait]
pub trait UserSource: Send + Sync {
    async fn fetch_users(&self, count: usize) -> Result<Vec<UserRecord>, FetchError>;

    async fn fetch_single_user(&self) -> Result<UserRecord, FetchError> {
        self.fetch_users(1)
            .await?
            .into_iter()
            .next()
            .ok_or(FetchError::Empty)
    }
}

pub struct RandomUserClient {
    http: Client,
    api_url: Url,
}

impl RandomUserClient {
    pub fn new(api_url: &str) -> Result<Self, FetchError> {
        let api_url = Url::parse(api_url.trim()).map_err(|err| FetchError::InvalidUrl {
            url: api_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: api_url.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        let http = Client::builder()
            .user_agent(format!("profile-deck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, api_url })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn results_url(&self, count: usize) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("results", &count.to_string());
        url
    }
}

#[async_trait]
impl UserSource for RandomUserClient {
    async fn fetch_users(&self, count: usize) -> Result<Vec<UserRecord>, FetchError> {
        let url = self.results_url(count);
        debug!(%url, count, "requesting random users");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "user source rejected request");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body: RandomUserResponse = response.json().await?;
        if let Some(message) = body.error {
            return Err(FetchError::Api(message));
        }

        Ok(body
            .results
            .into_iter()
            .map(|user| user.into_user_record(|| Uuid::new_v4().to_string()))
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/user_source_tests.rs"]
mod tests;

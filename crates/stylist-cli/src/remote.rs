//! Optional remote recommendation service with local fallback.
//!
//! The service receives the analysed attributes and answers with an
//! outfit of the same shape the local recommender produces. Any failure
//! (connect error, timeout, non-success status, bad body) falls back to the
//! local lookup, so a suggestion is always available offline.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use stylist_core::{
    OutfitSuggestion, PersonAttributes, RecommendationRequest, Recommender, Season, SkinAnalysis,
    Tone, Undertone,
};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("building HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("undecodable response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Body sent to the remote recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequest {
    pub age: u32,
    pub gender: String,
    pub gender_confidence: f32,
    pub skin_hex: String,
    pub skin_tone_bucket: Tone,
    pub undertone: Undertone,
    pub season: Season,
}

impl RemoteRequest {
    pub fn new(person: &PersonAttributes, skin: &SkinAnalysis, season: Season) -> Self {
        Self {
            age: person.age,
            gender: person.gender.clone(),
            gender_confidence: person.gender_confidence,
            skin_hex: skin.hex.clone(),
            skin_tone_bucket: skin.tone,
            undertone: skin.undertone,
            season,
        }
    }

    /// The equivalent local lookup.
    pub fn to_local(&self) -> RecommendationRequest {
        RecommendationRequest {
            season: self.season,
            undertone: self.undertone,
            tone: self.skin_tone_bucket,
            gender: self.gender.clone(),
        }
    }
}

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSource {
    Remote,
    Local,
}

/// HTTP client for one recommendation endpoint.
pub struct RemoteRecommender {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteRecommender {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the request and decode the outfit. No retries.
    pub async fn fetch(&self, request: &RemoteRequest) -> Result<OutfitSuggestion, RemoteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| RemoteError::Network {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                endpoint: self.endpoint.clone(),
                status,
            });
        }

        response
            .json::<OutfitSuggestion>()
            .await
            .map_err(|source| RemoteError::Decode {
                endpoint: self.endpoint.clone(),
                source,
            })
    }
}

/// Ask the remote service if one is configured, else (or on failure) the local table.
pub async fn suggest(
    remote: Option<&RemoteRecommender>,
    request: &RemoteRequest,
    local: &Recommender,
) -> (OutfitSuggestion, SuggestionSource) {
    if let Some(remote) = remote {
        match remote.fetch(request).await {
            Ok(outfit) => {
                tracing::info!(endpoint = remote.endpoint(), "remote recommendation received");
                return (outfit, SuggestionSource::Remote);
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote recommendation failed; using local tables");
            }
        }
    }
    (local.recommend(&request.to_local()), SuggestionSource::Local)
}

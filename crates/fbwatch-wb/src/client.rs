//! HTTP client for the Wildberries public card and feedback APIs.
//!
//! Wraps `reqwest` with typed response deserialization and ordered mirror
//! fallback for the feedback endpoint. The card endpoint resolves an article
//! number (`nm` id) to the feedback-group id that the mirrors are keyed by.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::WbError;
use crate::types::{CardDetailResponse, FeedbacksResponse, RawFeedback};

const DEFAULT_CARD_BASE_URL: &str = "https://u-card.wb.ru";
const DEFAULT_FEEDBACK_MIRRORS: &[&str] = &["https://feedbacks2.wb.ru", "https://feedbacks1.wb.ru"];

/// Client for the Wildberries card and feedback APIs.
///
/// Use [`WbClient::new`] for production or [`WbClient::with_endpoints`] to
/// point at mock servers in tests. Mirror order is significant: the first
/// endpoint returning a non-empty feedback collection wins.
pub struct WbClient {
    client: Client,
    card_base: Url,
    feedback_mirrors: Vec<Url>,
    dest_region: i64,
}

impl WbClient {
    /// Creates a new client pointed at the production Wildberries endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`WbError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(dest_region: i64, timeout_secs: u64) -> Result<Self, WbError> {
        Self::with_endpoints(
            DEFAULT_CARD_BASE_URL,
            DEFAULT_FEEDBACK_MIRRORS,
            dest_region,
            timeout_secs,
        )
    }

    /// Creates a new client with custom endpoints (for testing with wiremock,
    /// or for operator-supplied mirror lists).
    ///
    /// # Errors
    ///
    /// Returns [`WbError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`WbError::InvalidUrl`] if any endpoint URL fails
    /// to parse.
    pub fn with_endpoints(
        card_base_url: &str,
        feedback_mirror_urls: &[&str],
        dest_region: i64,
        timeout_secs: u64,
    ) -> Result<Self, WbError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("fbwatch/0.1 (feedback-tracking)")
            .build()?;

        let card_base = parse_base_url(card_base_url)?;
        let feedback_mirrors = feedback_mirror_urls
            .iter()
            .map(|url| parse_base_url(url))
            .collect::<Result<Vec<Url>, WbError>>()?;

        Ok(Self {
            client,
            card_base,
            feedback_mirrors,
            dest_region,
        })
    }

    /// Resolves an article number to its feedback-group id.
    ///
    /// Calls the card-detail endpoint and extracts `root` from the first
    /// returned product entity.
    ///
    /// # Errors
    ///
    /// - [`WbError::ProductNotFound`] if the response holds no products.
    /// - [`WbError::Http`] on network failure or non-2xx HTTP status.
    /// - [`WbError::Deserialize`] if the body does not match the expected shape.
    pub async fn resolve_group_id(&self, nm_id: i64) -> Result<i64, WbError> {
        let url = self.card_url(nm_id);
        let body = self.request_json(&url).await?;

        let detail: CardDetailResponse =
            serde_json::from_value(body).map_err(|e| WbError::Deserialize {
                context: format!("cards/v4/detail(nm={nm_id})"),
                source: e,
            })?;

        let Some(product) = detail.products.first() else {
            return Err(WbError::ProductNotFound(nm_id));
        };

        tracing::info!(nm_id, group_id = product.root, "resolved feedback group id");
        Ok(product.root)
    }

    /// Fetches the raw feedback collection for a group, trying each mirror in
    /// order and returning the first non-empty result.
    ///
    /// A failed request, an undecodable body, and an explicitly empty
    /// collection all fall through to the next mirror — emptiness is not
    /// distinguished from failure at this layer. Results are never merged
    /// across mirrors.
    ///
    /// # Errors
    ///
    /// Returns [`WbError::FeedbacksUnavailable`] when every mirror is
    /// exhausted without a non-empty collection.
    pub async fn fetch_raw_feedbacks(&self, group_id: i64) -> Result<Vec<RawFeedback>, WbError> {
        for mirror in &self.feedback_mirrors {
            let url = feedbacks_url(mirror, group_id);
            match self.fetch_feedbacks_from(&url).await {
                Ok(feedbacks) if !feedbacks.is_empty() => {
                    tracing::info!(
                        group_id,
                        count = feedbacks.len(),
                        url = %url,
                        "fetched feedback collection"
                    );
                    return Ok(feedbacks);
                }
                Ok(_) => {
                    tracing::warn!(group_id, url = %url, "mirror returned no feedbacks, trying next");
                }
                Err(e) => {
                    tracing::warn!(group_id, url = %url, error = %e, "feedback request failed, trying next");
                }
            }
        }

        tracing::error!(group_id, "all feedback mirrors exhausted");
        Err(WbError::FeedbacksUnavailable(group_id))
    }

    async fn fetch_feedbacks_from(&self, url: &Url) -> Result<Vec<RawFeedback>, WbError> {
        let body = self.request_json(url).await?;
        let response: FeedbacksResponse =
            serde_json::from_value(body).map_err(|e| WbError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        // The mirrors send `"feedbacks": null` for groups without entries.
        Ok(response.feedbacks.unwrap_or_default())
    }

    /// Builds the card-detail URL with the fixed query parameter set.
    fn card_url(&self, nm_id: i64) -> Url {
        let mut url = self.card_base.clone();
        url.set_path("cards/v4/detail");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("appType", "1");
            pairs.append_pair("curr", "rub");
            pairs.append_pair("dest", &self.dest_region.to_string());
            pairs.append_pair("spp", "30");
            pairs.append_pair("ab_testing", "false");
            pairs.append_pair("lang", "ru");
            pairs.append_pair("nm", &nm_id.to_string());
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`WbError::Http`] on network failure or a non-2xx status, and
    /// [`WbError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, WbError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WbError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

fn feedbacks_url(mirror: &Url, group_id: i64) -> Url {
    let mut url = mirror.clone();
    url.set_path(&format!("feedbacks/v2/{group_id}"));
    url
}

/// Normalise: ensure the base URL ends with exactly one slash so that path
/// joins write below the root rather than replacing a trailing segment.
fn parse_base_url(raw: &str) -> Result<Url, WbError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| WbError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

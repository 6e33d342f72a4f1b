//! Wildberries API response types.
//!
//! The card endpoint wraps products in `{"products": [...]}`; the feedback
//! mirrors wrap entries in `{"feedbacks": [...]}` and send `null` instead of
//! an array when a group has nothing. Feedback entries themselves are loosely
//! shaped: every field may be missing, so everything carries
//! `#[serde(default)]` and dict/list sub-structures stay as raw
//! [`serde_json::Value`] until normalization.

use serde::Deserialize;
use serde_json::Value;

/// Response envelope for `cards/v4/detail`.
#[derive(Debug, Deserialize)]
pub struct CardDetailResponse {
    #[serde(default)]
    pub products: Vec<CardProduct>,
}

/// A product entity from the card endpoint.
///
/// Only `root` — the feedback-group (imt) id shared by all size/color
/// variants of a product — is consumed.
#[derive(Debug, Deserialize)]
pub struct CardProduct {
    pub root: i64,
}

/// Response envelope for `feedbacks/v2/{group_id}`.
#[derive(Debug, Deserialize)]
pub struct FeedbacksResponse {
    #[serde(default)]
    pub feedbacks: Option<Vec<RawFeedback>>,
}

/// One feedback entry as delivered by the mirrors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFeedback {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nm_id: i64,
    #[serde(default)]
    pub global_user_id: String,
    #[serde(default)]
    pub wb_user_id: Option<i64>,
    /// Buyer rating 1–5; absent when the buyer left text without a score.
    #[serde(default)]
    pub product_valuation: Option<i32>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pros: String,
    #[serde(default)]
    pub cons: String,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub rank: f64,
    #[serde(default)]
    pub status_id: i32,
    #[serde(default)]
    pub matching_size: String,
    #[serde(default)]
    pub matching_photo: String,
    #[serde(default)]
    pub matching_description: String,
    /// Keyword tags attached by the platform.
    #[serde(default)]
    pub bables: Option<Value>,
    /// `{"good": [...], "bad": [...]}` reason-id lists.
    #[serde(default)]
    pub reasons: Option<Value>,
    /// `{"pluses": N, "minuses": N}` helpfulness votes.
    #[serde(default)]
    pub votes: Option<Value>,
    #[serde(default)]
    pub wb_user_details: Option<Value>,
    /// `{"isExcluded": bool, "reasons": [...]}`.
    #[serde(default)]
    pub excluded_from_rating: Option<Value>,
    #[serde(default)]
    pub video: Option<Value>,
    #[serde(default)]
    pub feedback_helpfulness: Option<Value>,
    #[serde(default)]
    pub answer: Option<RawAnswer>,
}

/// Seller answer attached to a feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub create_date: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub metadata: Option<Value>,
}

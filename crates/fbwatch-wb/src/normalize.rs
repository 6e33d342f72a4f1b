//! Normalization of raw Wildberries feedback entries into the fixed record
//! shape the store persists.
//!
//! [`normalize_feedback`] is a pure function, total over any object-shaped
//! entry: every field read carries an explicit default, so a payload with
//! nothing but an id still produces a well-formed record.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::types::RawFeedback;

/// The platform's "no date" sentinel. Timestamps equal to it are treated as
/// absent, never stored literally.
pub const ZERO_DATE_SENTINEL: &str = "0001-01-01T00:00:00Z";

/// A feedback record in its final, storage-ready shape.
///
/// Dict/list sub-structures stay as opaque [`Value`] blobs; the seller answer
/// is the one exception, flattened into the five `answer_*` fields so that
/// "no answer" and "empty answer" share a shape and differ only in content.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeedback {
    pub id: String,
    pub nm_id: i64,
    pub global_user_id: String,
    pub supplier_id: Option<i64>,
    pub product_valuation: Option<i32>,
    pub text: String,
    pub pros: String,
    pub cons: String,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub color: String,
    pub size: String,
    pub rank: f64,
    pub status_id: i32,
    pub matching_size: String,
    pub matching_photo: String,
    pub matching_description: String,
    pub bables: Value,
    pub good_reasons: Value,
    pub bad_reasons: Value,
    pub votes: Value,
    pub wb_user_details: Value,
    pub excluded_from_rating: Value,
    pub video: Option<String>,
    pub feedback_helpfulness: Option<Value>,
    pub answer_text: String,
    pub answer_create_date: Option<DateTime<Utc>>,
    pub answer_last_update: Option<DateTime<Utc>>,
    pub answer_state: String,
    pub answer_editable: bool,
    pub answer_metadata: Option<Value>,
}

/// Parses a Wildberries timestamp string.
///
/// Accepts RFC 3339 with either a numeric offset or a literal `Z`. Empty
/// strings and the zero-date sentinel parse to `Ok(None)`.
///
/// # Errors
///
/// Returns the underlying [`chrono::ParseError`] for any other malformed
/// input, so callers can decide whether malformed means "absent" (the
/// normalizer) or "drop and log" (the filter).
pub fn parse_wb_datetime(raw: &str) -> Result<Option<DateTime<Utc>>, chrono::ParseError> {
    if raw.is_empty() || raw == ZERO_DATE_SENTINEL {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(raw).map(|dt| Some(dt.with_timezone(&Utc)))
}

/// Converts a [`RawFeedback`] into a [`NormalizedFeedback`] ready for
/// persistence.
#[must_use]
pub fn normalize_feedback(raw: &RawFeedback) -> NormalizedFeedback {
    let reasons = raw.reasons.as_ref();
    let good_reasons = reasons
        .and_then(|r| r.get("good"))
        .cloned()
        .unwrap_or_else(|| json!([]));
    let bad_reasons = reasons
        .and_then(|r| r.get("bad"))
        .cloned()
        .unwrap_or_else(|| json!([]));

    // The video reference travels as an opaque object; anything else upstream
    // (null, bare string, list) means "no video".
    let video = raw
        .video
        .as_ref()
        .filter(|v| v.is_object())
        .map(Value::to_string);

    let answer = raw.answer.as_ref();

    NormalizedFeedback {
        id: raw.id.clone(),
        nm_id: raw.nm_id,
        global_user_id: raw.global_user_id.clone(),
        supplier_id: raw.wb_user_id,
        product_valuation: raw.product_valuation,
        text: raw.text.clone(),
        pros: raw.pros.clone(),
        cons: raw.cons.clone(),
        created_date: normalize_datetime(raw.created_date.as_deref()),
        updated_date: normalize_datetime(raw.updated_date.as_deref()),
        color: raw.color.clone(),
        size: raw.size.clone(),
        rank: raw.rank,
        status_id: raw.status_id,
        matching_size: raw.matching_size.clone(),
        matching_photo: raw.matching_photo.clone(),
        matching_description: raw.matching_description.clone(),
        bables: raw.bables.clone().unwrap_or_else(|| json!([])),
        good_reasons,
        bad_reasons,
        votes: raw
            .votes
            .clone()
            .unwrap_or_else(|| json!({"pluses": 0, "minuses": 0})),
        wb_user_details: raw.wb_user_details.clone().unwrap_or_else(|| json!({})),
        excluded_from_rating: raw
            .excluded_from_rating
            .clone()
            .unwrap_or_else(|| json!({"isExcluded": false, "reasons": []})),
        video,
        feedback_helpfulness: raw.feedback_helpfulness.clone(),
        answer_text: answer.map(|a| a.text.clone()).unwrap_or_default(),
        answer_create_date: normalize_datetime(answer.and_then(|a| a.create_date.as_deref())),
        answer_last_update: normalize_datetime(answer.and_then(|a| a.last_update.as_deref())),
        answer_state: answer.map(|a| a.state.clone()).unwrap_or_default(),
        answer_editable: answer.is_some_and(|a| a.editable),
        answer_metadata: answer.and_then(|a| a.metadata.clone()),
    }
}

/// Sentinel-aware datetime normalization. Absent, sentinel, and malformed
/// inputs all collapse to `None` so the record stays well-formed.
fn normalize_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| parse_wb_datetime(s).ok().flatten())
}

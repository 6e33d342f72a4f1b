//! Wildberries public API integration: typed client, feedback normalization,
//! and the rating/age filter used by the tracking pipeline.

mod client;
mod error;
pub mod filter;
pub mod normalize;
mod types;

pub use client::WbClient;
pub use error::WbError;
pub use filter::{evaluate_feedback, filter_feedbacks, DropReason, FilterDecision};
pub use normalize::{normalize_feedback, parse_wb_datetime, NormalizedFeedback, ZERO_DATE_SENTINEL};
pub use types::{CardDetailResponse, CardProduct, FeedbacksResponse, RawAnswer, RawFeedback};

//! Rating/age filtering of raw feedback collections.

use chrono::{DateTime, Utc};

use crate::normalize::parse_wb_datetime;
use crate::types::RawFeedback;

/// Rating assumed when a feedback carries no valuation: the best score, so
/// unrated entries never count as negative.
const DEFAULT_RATING: i32 = 5;

/// Outcome of the retention predicate for a single feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Kept,
    Dropped(DropReason),
}

/// Why a feedback was not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No creation date (or the zero-date sentinel) — age cannot be evaluated.
    MissingCreatedDate,
    /// The creation date failed to parse.
    MalformedDate,
    /// Rated better than the configured ceiling.
    RatingAboveCeiling,
    /// Newer than the configured minimum age.
    TooRecent,
}

/// Applies the retention predicate to one feedback.
///
/// A feedback is kept iff `rating <= rating_ceiling` and its whole-day age
/// relative to `now` is `>= min_age_days` — both bounds inclusive, age
/// truncated (never rounded) to whole days. Missing, sentinel, and malformed
/// creation dates make the age unevaluable and drop the entry regardless of
/// rating.
#[must_use]
pub fn evaluate_feedback(
    feedback: &RawFeedback,
    rating_ceiling: i32,
    min_age_days: i64,
    now: DateTime<Utc>,
) -> FilterDecision {
    let Some(raw_date) = feedback.created_date.as_deref() else {
        return FilterDecision::Dropped(DropReason::MissingCreatedDate);
    };

    let created = match parse_wb_datetime(raw_date) {
        Ok(Some(created)) => created,
        Ok(None) => return FilterDecision::Dropped(DropReason::MissingCreatedDate),
        Err(_) => return FilterDecision::Dropped(DropReason::MalformedDate),
    };

    let rating = feedback.product_valuation.unwrap_or(DEFAULT_RATING);
    if rating > rating_ceiling {
        return FilterDecision::Dropped(DropReason::RatingAboveCeiling);
    }

    let age_days = (now - created).num_days();
    if age_days < min_age_days {
        return FilterDecision::Dropped(DropReason::TooRecent);
    }

    FilterDecision::Kept
}

/// Filters a raw feedback collection down to the retained subset.
///
/// Per-entry drops are logged and never abort the batch. Input order is
/// preserved.
#[must_use]
pub fn filter_feedbacks(
    feedbacks: Vec<RawFeedback>,
    rating_ceiling: i32,
    min_age_days: i64,
    now: DateTime<Utc>,
) -> Vec<RawFeedback> {
    let total = feedbacks.len();
    let retained: Vec<RawFeedback> = feedbacks
        .into_iter()
        .filter(
            |feedback| match evaluate_feedback(feedback, rating_ceiling, min_age_days, now) {
                FilterDecision::Kept => true,
                FilterDecision::Dropped(reason) => {
                    match reason {
                        DropReason::MissingCreatedDate => {
                            tracing::warn!(id = %feedback.id, "feedback has no creation date, skipping");
                        }
                        DropReason::MalformedDate => {
                            tracing::warn!(
                                id = %feedback.id,
                                date = ?feedback.created_date,
                                "feedback has malformed creation date, skipping"
                            );
                        }
                        DropReason::RatingAboveCeiling | DropReason::TooRecent => {
                            tracing::debug!(id = %feedback.id, ?reason, "feedback filtered out");
                        }
                    }
                    false
                }
            },
        )
        .collect();

    tracing::info!(total, retained = retained.len(), "filtered feedback collection");
    retained
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::normalize::ZERO_DATE_SENTINEL;

    fn feedback(id: &str, rating: Option<i32>, age_days: i64, now: DateTime<Utc>) -> RawFeedback {
        RawFeedback {
            id: id.to_string(),
            product_valuation: rating,
            created_date: Some(
                (now - Duration::days(age_days)).to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            ),
            ..RawFeedback::default()
        }
    }

    #[test]
    fn boundary_rating_and_age_are_inclusive() {
        let now = Utc::now();
        let at_boundary = feedback("b-1", Some(3), 3, now);
        assert_eq!(evaluate_feedback(&at_boundary, 3, 3, now), FilterDecision::Kept);
    }

    #[test]
    fn rating_above_ceiling_is_dropped() {
        let now = Utc::now();
        let too_good = feedback("b-2", Some(4), 10, now);
        assert_eq!(
            evaluate_feedback(&too_good, 3, 3, now),
            FilterDecision::Dropped(DropReason::RatingAboveCeiling)
        );
    }

    #[test]
    fn age_one_day_short_is_dropped() {
        let now = Utc::now();
        let too_new = feedback("b-3", Some(1), 2, now);
        assert_eq!(
            evaluate_feedback(&too_new, 3, 3, now),
            FilterDecision::Dropped(DropReason::TooRecent)
        );
    }

    #[test]
    fn absent_rating_defaults_to_best_score() {
        let now = Utc::now();
        let unrated = feedback("b-4", None, 30, now);
        assert_eq!(
            evaluate_feedback(&unrated, 4, 3, now),
            FilterDecision::Dropped(DropReason::RatingAboveCeiling)
        );
        assert_eq!(evaluate_feedback(&unrated, 5, 3, now), FilterDecision::Kept);
    }

    #[test]
    fn missing_and_sentinel_dates_are_skipped_regardless_of_rating() {
        let now = Utc::now();
        let no_date = RawFeedback {
            id: "b-5".to_string(),
            product_valuation: Some(1),
            ..RawFeedback::default()
        };
        assert_eq!(
            evaluate_feedback(&no_date, 3, 0, now),
            FilterDecision::Dropped(DropReason::MissingCreatedDate)
        );

        let sentinel = RawFeedback {
            id: "b-6".to_string(),
            product_valuation: Some(1),
            created_date: Some(ZERO_DATE_SENTINEL.to_string()),
            ..RawFeedback::default()
        };
        assert_eq!(
            evaluate_feedback(&sentinel, 3, 0, now),
            FilterDecision::Dropped(DropReason::MissingCreatedDate)
        );
    }

    #[test]
    fn malformed_date_drops_without_panicking() {
        let now = Utc::now();
        let garbled = RawFeedback {
            id: "b-7".to_string(),
            product_valuation: Some(1),
            created_date: Some("yesterday-ish".to_string()),
            ..RawFeedback::default()
        };
        assert_eq!(
            evaluate_feedback(&garbled, 3, 0, now),
            FilterDecision::Dropped(DropReason::MalformedDate)
        );
    }

    #[test]
    fn filter_retains_expected_subset() {
        let now = Utc::now();
        let batch = vec![
            feedback("f-1", Some(1), 10, now),
            feedback("f-2", Some(3), 10, now),
            feedback("f-3", Some(5), 1, now),
            feedback("f-4", Some(2), 3, now),
        ];

        let retained = filter_feedbacks(batch, 3, 3, now);
        let ids: Vec<&str> = retained.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f-1", "f-2", "f-4"]);
    }

    #[test]
    fn one_bad_record_never_aborts_the_batch() {
        let now = Utc::now();
        let mut batch = vec![feedback("f-1", Some(1), 10, now)];
        batch.push(RawFeedback {
            id: "f-2".to_string(),
            product_valuation: Some(1),
            created_date: Some("###".to_string()),
            ..RawFeedback::default()
        });
        batch.push(feedback("f-3", Some(2), 10, now));

        let retained = filter_feedbacks(batch, 3, 3, now);
        let ids: Vec<&str> = retained.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f-1", "f-3"]);
    }
}

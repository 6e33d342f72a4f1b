//! Database operations for the `wb_feedbacks` table.
//!
//! The table is a keyed-record store: one row per feedback, keyed by the
//! opaque upstream id. Rows are created exactly once ([`insert_feedback_if_absent`])
//! and only ever removed wholesale ([`reset_schema`]).

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;

use fbwatch_wb::NormalizedFeedback;

use crate::DbError;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS wb_feedbacks (\
     id TEXT PRIMARY KEY NOT NULL, \
     nm_id INTEGER NOT NULL DEFAULT 0, \
     global_user_id TEXT NOT NULL DEFAULT '', \
     supplier_id INTEGER, \
     product_valuation INTEGER, \
     text TEXT NOT NULL DEFAULT '', \
     pros TEXT NOT NULL DEFAULT '', \
     cons TEXT NOT NULL DEFAULT '', \
     created_date TEXT, \
     updated_date TEXT, \
     color TEXT NOT NULL DEFAULT '', \
     size TEXT NOT NULL DEFAULT '', \
     rank REAL NOT NULL DEFAULT 0.0, \
     status_id INTEGER NOT NULL DEFAULT 0, \
     matching_size TEXT NOT NULL DEFAULT '', \
     matching_photo TEXT NOT NULL DEFAULT '', \
     matching_description TEXT NOT NULL DEFAULT '', \
     bables TEXT NOT NULL DEFAULT '[]', \
     good_reasons TEXT NOT NULL DEFAULT '[]', \
     bad_reasons TEXT NOT NULL DEFAULT '[]', \
     votes TEXT NOT NULL DEFAULT '{\"pluses\": 0, \"minuses\": 0}', \
     wb_user_details TEXT NOT NULL DEFAULT '{}', \
     excluded_from_rating TEXT NOT NULL DEFAULT '{\"isExcluded\": false, \"reasons\": []}', \
     video TEXT, \
     feedback_helpfulness TEXT, \
     answer_text TEXT NOT NULL DEFAULT '', \
     answer_create_date TEXT, \
     answer_last_update TEXT, \
     answer_state TEXT NOT NULL DEFAULT '', \
     answer_editable INTEGER NOT NULL DEFAULT 0, \
     answer_metadata TEXT\
 )";

const CREATE_INDEX_SQL: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_wb_feedbacks_nm_id ON wb_feedbacks (nm_id)",
    "CREATE INDEX IF NOT EXISTS idx_wb_feedbacks_valuation ON wb_feedbacks (product_valuation)",
    "CREATE INDEX IF NOT EXISTS idx_wb_feedbacks_created ON wb_feedbacks (created_date)",
];

const DROP_TABLE_SQL: &str = "DROP TABLE IF EXISTS wb_feedbacks";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `wb_feedbacks` table.
///
/// Mirrors the column list one-to-one; dict/list columns decode through
/// [`sqlx::types::Json`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
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
    pub bables: Json<Value>,
    pub good_reasons: Json<Value>,
    pub bad_reasons: Json<Value>,
    pub votes: Json<Value>,
    pub wb_user_details: Json<Value>,
    pub excluded_from_rating: Json<Value>,
    pub video: Option<String>,
    pub feedback_helpfulness: Option<Json<Value>>,
    pub answer_text: String,
    pub answer_create_date: Option<DateTime<Utc>>,
    pub answer_last_update: Option<DateTime<Utc>>,
    pub answer_state: String,
    pub answer_editable: bool,
    pub answer_metadata: Option<Json<Value>>,
}

/// Outcome of an idempotent insert attempt.
///
/// A duplicate key is the defined dedup signal, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

// ---------------------------------------------------------------------------
// Schema operations
// ---------------------------------------------------------------------------

/// Creates the feedback table and its indexes if absent.
///
/// Idempotent; safe to call on every startup.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any DDL statement fails.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;
    for statement in CREATE_INDEX_SQL {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("feedback schema ensured");
    Ok(())
}

/// Drops and recreates the feedback table.
///
/// Runs once per tracking run, before ingestion, so the store holds the
/// latest snapshot rather than an accumulating log.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any DDL statement fails.
pub async fn reset_schema(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(DROP_TABLE_SQL).execute(pool).await?;
    ensure_schema(pool).await?;
    tracing::info!("feedback store reset");
    Ok(())
}

// ---------------------------------------------------------------------------
// Write operations
// ---------------------------------------------------------------------------

/// Inserts a feedback record, skipping silently if the id is already present.
///
/// `ON CONFLICT DO NOTHING` keeps the check-and-insert atomic; the statement
/// is its own transaction, so a failure rolls back only this record.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] for any persistence failure other than a
/// duplicate key.
pub async fn insert_feedback_if_absent(
    pool: &SqlitePool,
    record: &NormalizedFeedback,
) -> Result<InsertOutcome, DbError> {
    let result = sqlx::query(
        "INSERT INTO wb_feedbacks (\
             id, nm_id, global_user_id, supplier_id, product_valuation, \
             text, pros, cons, created_date, updated_date, color, size, rank, \
             status_id, matching_size, matching_photo, matching_description, \
             bables, good_reasons, bad_reasons, votes, wb_user_details, \
             excluded_from_rating, video, feedback_helpfulness, answer_text, \
             answer_create_date, answer_last_update, answer_state, \
             answer_editable, answer_metadata) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(&record.id)
    .bind(record.nm_id)
    .bind(&record.global_user_id)
    .bind(record.supplier_id)
    .bind(record.product_valuation)
    .bind(&record.text)
    .bind(&record.pros)
    .bind(&record.cons)
    .bind(record.created_date)
    .bind(record.updated_date)
    .bind(&record.color)
    .bind(&record.size)
    .bind(record.rank)
    .bind(record.status_id)
    .bind(&record.matching_size)
    .bind(&record.matching_photo)
    .bind(&record.matching_description)
    .bind(Json(&record.bables))
    .bind(Json(&record.good_reasons))
    .bind(Json(&record.bad_reasons))
    .bind(Json(&record.votes))
    .bind(Json(&record.wb_user_details))
    .bind(Json(&record.excluded_from_rating))
    .bind(record.video.as_deref())
    .bind(record.feedback_helpfulness.as_ref().map(Json))
    .bind(&record.answer_text)
    .bind(record.answer_create_date)
    .bind(record.answer_last_update)
    .bind(&record.answer_state)
    .bind(record.answer_editable)
    .bind(record.answer_metadata.as_ref().map(Json))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(id = %record.id, "feedback already stored, skipping");
        Ok(InsertOutcome::Duplicate)
    } else {
        tracing::info!(id = %record.id, nm_id = record.nm_id, "feedback stored");
        Ok(InsertOutcome::Inserted)
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

/// Returns the number of stored feedbacks.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_feedbacks(pool: &SqlitePool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wb_feedbacks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Returns all stored feedbacks for a product, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feedbacks_for_product(
    pool: &SqlitePool,
    nm_id: i64,
) -> Result<Vec<FeedbackRow>, DbError> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, nm_id, global_user_id, supplier_id, product_valuation, \
                text, pros, cons, created_date, updated_date, color, size, rank, \
                status_id, matching_size, matching_photo, matching_description, \
                bables, good_reasons, bad_reasons, votes, wb_user_details, \
                excluded_from_rating, video, feedback_helpfulness, answer_text, \
                answer_create_date, answer_last_update, answer_state, \
                answer_editable, answer_metadata \
         FROM wb_feedbacks \
         WHERE nm_id = ? \
         ORDER BY created_date DESC NULLS LAST",
    )
    .bind(nm_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

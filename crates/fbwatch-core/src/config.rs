use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
///
/// Every variable has a default: the tracker must run with zero env setup, the
/// way the upstream tool does.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = or_default("DATABASE_URL", "sqlite://wb_feedbacks.db");
    let log_level = or_default("FBWATCH_LOG_LEVEL", "info");

    let wb_card_base_url = or_default("FBWATCH_WB_CARD_URL", "https://u-card.wb.ru");
    let wb_feedback_mirrors = parse_mirror_list(
        "FBWATCH_WB_FEEDBACK_MIRRORS",
        &or_default(
            "FBWATCH_WB_FEEDBACK_MIRRORS",
            "https://feedbacks2.wb.ru,https://feedbacks1.wb.ru",
        ),
    )?;
    let wb_dest_region = parse_i64("FBWATCH_WB_DEST", "123586123")?;
    let request_timeout_secs = parse_u64("FBWATCH_REQUEST_TIMEOUT_SECS", "15")?;

    let db_max_connections = parse_u32("FBWATCH_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("FBWATCH_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        log_level,
        wb_card_base_url,
        wb_feedback_mirrors,
        wb_dest_region,
        request_timeout_secs,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a comma-separated mirror list, dropping empty segments.
///
/// The mirror order is significant: the fetch loop tries entries first to last.
fn parse_mirror_list(var: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let mirrors: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();

    if mirrors.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "mirror list must contain at least one URL".to_string(),
        });
    }

    Ok(mirrors)
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub wb_card_base_url: String,
    pub wb_feedback_mirrors: Vec<String>,
    pub wb_dest_region: i64,
    pub request_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("wb_card_base_url", &self.wb_card_base_url)
            .field("wb_feedback_mirrors", &self.wb_feedback_mirrors)
            .field("wb_dest_region", &self.wb_dest_region)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}

// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Rentwise

// Server Configuration
pub const RENTWISE_PORT: &str = "RENTWISE_PORT";
pub const RENTWISE_CORS_ORIGIN: &str = "RENTWISE_CORS_ORIGIN";

// Database Configuration
pub const RENTWISE_DATABASE_URL: &str = "RENTWISE_DATABASE_URL";
pub const RENTWISE_DB_MAX_CONNECTIONS: &str = "RENTWISE_DB_MAX_CONNECTIONS";

// Signup Webhook
pub const RENTWISE_SIGNUP_WEBHOOK_URL: &str = "RENTWISE_SIGNUP_WEBHOOK_URL";
pub const RENTWISE_WEBHOOK_TIMEOUT_SECS: &str = "RENTWISE_WEBHOOK_TIMEOUT_SECS";

// Scheduled Functions
pub const RENTWISE_CRON_SECRET: &str = "RENTWISE_CRON_SECRET";

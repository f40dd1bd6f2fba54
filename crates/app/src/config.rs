//! Application configuration

use clap::{Args, ValueEnum};
use platter::orders::TransitionPolicy;

/// Application settings.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// SQLite database holding the cart, orders and session
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://platter.db?mode=rwc")]
    pub database_url: String,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL", default_value = "http://127.0.0.1:54321")]
    pub supabase_url: String,

    /// Supabase anon key
    #[arg(long, env = "SUPABASE_ANON_KEY", default_value = "", hide_env_values = true)]
    pub supabase_anon_key: String,

    /// Which order status changes are accepted
    #[arg(long, env = "ORDER_TRANSITIONS", value_enum, default_value_t = OrderTransitions::Permissive)]
    pub order_transitions: OrderTransitions,

    /// Let orders be placed without signing in
    #[arg(long, env = "ALLOW_GUEST_CHECKOUT", default_value_t = false)]
    pub allow_guest_checkout: bool,

    /// Push gateway that receives order notifications; logged when unset
    #[arg(long, env = "NOTIFY_WEBHOOK_URL")]
    pub notify_webhook_url: Option<String>,

    /// Bearer token for the push gateway
    #[arg(long, env = "NOTIFY_WEBHOOK_TOKEN", hide_env_values = true)]
    pub notify_webhook_token: Option<String>,
}

/// Order status transition rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderTransitions {
    /// Any status may follow any other.
    Permissive,

    /// Statuses only move forward; cancellation only before delivery.
    ForwardOnly,
}

impl From<OrderTransitions> for TransitionPolicy {
    fn from(value: OrderTransitions) -> Self {
        match value {
            OrderTransitions::Permissive => Self::Permissive,
            OrderTransitions::ForwardOnly => Self::ForwardOnly,
        }
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

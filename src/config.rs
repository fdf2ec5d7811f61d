//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Bind address for the HTTP server.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Reward Parameters ===
    /// Green Miles awarded per kilogram of CO2 saved.
    #[serde(default = "default_miles_per_kg")]
    pub miles_per_kg_co2: Decimal,

    /// Miles awarded for a geofenced check-in.
    #[serde(default = "default_checkin_bonus")]
    pub checkin_bonus_miles: Decimal,

    // === Response Shaping ===
    /// Ledger entries returned with a green-miles lookup.
    #[serde(default = "default_ledger_tail")]
    pub ledger_tail: usize,

    /// Upper bound for the leaderboard `limit` query parameter.
    #[serde(default = "default_leaderboard_max")]
    pub leaderboard_max: usize,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_miles_per_kg() -> Decimal {
    Decimal::new(10, 0) // 10 miles per kg CO2 saved
}

fn default_checkin_bonus() -> Decimal {
    Decimal::new(25, 0)
}

fn default_ledger_tail() -> usize {
    20
}

fn default_leaderboard_max() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(format!("BIND_ADDR is not an IP address: {}", self.bind_addr));
        }

        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.miles_per_kg_co2 <= Decimal::ZERO {
            return Err("MILES_PER_KG_CO2 must be positive".to_string());
        }

        if self.checkin_bonus_miles < Decimal::ZERO {
            return Err("CHECKIN_BONUS_MILES must not be negative".to_string());
        }

        if self.leaderboard_max == 0 {
            return Err("LEADERBOARD_MAX must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            miles_per_kg_co2: default_miles_per_kg(),
            checkin_bonus_miles: default_checkin_bonus(),
            ledger_tail: default_ledger_tail(),
            leaderboard_max: default_leaderboard_max(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

use chrono_tz::Tz;
use mealmind_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// The single reference zone every extracted wall-clock time is
    /// interpreted in. Other zones are out of scope.
    pub canonical_timezone: Tz,
    /// Cadence of the delivery sweep in seconds
    pub sweep_interval_secs: u64,
    /// How far past its planned firing an occurrence may still be
    /// dispatched. Kept at twice the sweep interval so an occurrence
    /// landing exactly on a sweep boundary cannot be missed by one cycle
    /// under clock skew.
    pub delivery_grace_secs: u64,
    /// Upper bound on one push gateway call before the send counts as
    /// failed
    pub dispatch_timeout_secs: u64,
    /// Terminal occurrences older than this are purged by the retention
    /// job
    pub occurrence_retention_days: i64,
    /// Endpoint of the push notification gateway; without it sends are
    /// recorded against an in-memory stub
    pub push_gateway_url: Option<String>,
    /// Secret guarding internal maintenance triggers
    pub internal_trigger_secret: String,
}

fn parsed_env_or<T: std::str::FromStr + std::fmt::Display>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let canonical_timezone = match std::env::var("CANONICAL_TIMEZONE") {
            Ok(name) => match name.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given CANONICAL_TIMEZONE: {} is not a valid zone name, falling back to UTC.",
                        name
                    );
                    chrono_tz::UTC
                }
            },
            Err(_) => chrono_tz::UTC,
        };

        let internal_trigger_secret = match std::env::var("INTERNAL_TRIGGER_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                let secret = create_random_secret(16);
                info!(
                    "Did not find INTERNAL_TRIGGER_SECRET environment variable. Generated one: {}",
                    secret
                );
                secret
            }
        };

        let sweep_interval_secs = parsed_env_or("SWEEP_INTERVAL_SECS", 60);
        Self {
            port: parsed_env_or("PORT", 5000),
            canonical_timezone,
            sweep_interval_secs,
            delivery_grace_secs: parsed_env_or("DELIVERY_GRACE_SECS", sweep_interval_secs * 2),
            dispatch_timeout_secs: parsed_env_or("DISPATCH_TIMEOUT_SECS", 10),
            occurrence_retention_days: parsed_env_or("OCCURRENCE_RETENTION_DAYS", 30),
            push_gateway_url: std::env::var("PUSH_GATEWAY_URL").ok(),
            internal_trigger_secret,
        }
    }

    pub fn delivery_grace_millis(&self) -> i64 {
        self.delivery_grace_secs as i64 * 1000
    }

    pub fn occurrence_retention_millis(&self) -> i64 {
        self.occurrence_retention_days * 24 * 60 * 60 * 1000
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

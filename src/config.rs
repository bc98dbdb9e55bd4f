use std::{net::SocketAddr, ops::RangeInclusive, str::FromStr, time::Duration};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: Option<String>,
    /// Upper bound for one send request, connect to last byte.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxConfig {
    pub poll_interval: Duration,
    pub max_attempts: i32,
    pub retry_base_delay: Duration,
    pub batch_size: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: 5,
            retry_base_delay: Duration::from_secs(30),
            batch_size: 20,
        }
    }
}

/// Settings read from the environment (and `.env` through dotenvy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Frontend page linked from activation emails.
    pub activation_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub auditor: String,
    pub run_migrations: bool,
    pub outbox: OutboxConfig,
    /// `None` means emails are only logged.
    pub brevo: Option<BrevoConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let defaults = OutboxConfig::default();
        let outbox = OutboxConfig {
            poll_interval: Duration::from_secs(parse_in_range(
                &get,
                "OUTBOX_POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
                1..=3600,
            )?),
            max_attempts: parse_in_range(&get, "OUTBOX_MAX_ATTEMPTS", defaults.max_attempts, 1..=100)?,
            retry_base_delay: Duration::from_secs(parse_in_range(
                &get,
                "OUTBOX_RETRY_BASE_SECS",
                defaults.retry_base_delay.as_secs(),
                1..=3600,
            )?),
            batch_size: parse_in_range(&get, "OUTBOX_BATCH_SIZE", defaults.batch_size, 1..=1000)?,
        };

        let brevo = match (get("BREVO_API_KEY"), get("BREVO_SENDER_EMAIL")) {
            (Some(api_key), Some(sender_email)) => Some(BrevoConfig {
                api_key,
                sender_email,
                sender_name: get("BREVO_SENDER_NAME"),
                request_timeout: Duration::from_secs(parse_in_range(
                    &get,
                    "BREVO_TIMEOUT_SECS",
                    10,
                    1..=300,
                )?),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("BREVO_SENDER_EMAIL")),
            (None, Some(_)) => return Err(ConfigError::Missing("BREVO_API_KEY")),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: parse_or(&get, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)))?,
            activation_url: required("ACTIVATION_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_hours: parse_in_range(&get, "JWT_EXPIRATION_HOURS", 24, 1..=8760)?,
            auditor: get("AUDITOR").unwrap_or_else(|| "system".to_string()),
            run_migrations: parse_or(&get, "RUN_MIGRATIONS", true)?,
            outbox,
            brevo,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_in_range<T, G>(
    get: &G,
    key: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + ToString,
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/book_network"),
        ("ACTIVATION_URL", "http://localhost:4200/activate-account"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn defaults_apply_when_only_required_keys_are_set() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.activation_url, "http://localhost:4200/activate-account");
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.jwt_expiration_hours, 24);
        assert_eq!(config.auditor, "system");
        assert!(config.run_migrations);
        assert_eq!(config.outbox, OutboxConfig::default());
        assert_eq!(config.brevo, None);
    }

    #[test]
    fn missing_activation_url_is_reported() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/book_network"),
            ("JWT_SECRET", "secret"),
            ("ACTIVATION_URL", "   "),
        ]));
        assert_eq!(result, Err(ConfigError::Missing("ACTIVATION_URL")));
    }

    #[test]
    fn invalid_numbers_are_reported_with_their_key() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("OUTBOX_MAX_ATTEMPTS", "many"));
        let result = AppConfig::from_lookup(lookup(&pairs));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: "OUTBOX_MAX_ATTEMPTS",
                value: "many".to_string()
            })
        );
    }

    #[test]
    fn brevo_requires_key_and_sender_together() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BREVO_API_KEY", "key"));
        assert_eq!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Missing("BREVO_SENDER_EMAIL"))
        );

        pairs.push(("BREVO_SENDER_EMAIL", "noreply@booknetwork.test"));
        pairs.push(("AUDITOR", "registration-service"));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.brevo,
            Some(BrevoConfig {
                api_key: "key".to_string(),
                sender_email: "noreply@booknetwork.test".to_string(),
                sender_name: None,
                request_timeout: Duration::from_secs(10),
            })
        );
        assert_eq!(config.auditor, "registration-service");
    }

    #[rstest]
    #[case("JWT_EXPIRATION_HOURS", "0")]
    #[case("JWT_EXPIRATION_HOURS", "9223372036854775807")]
    #[case("OUTBOX_POLL_INTERVAL_SECS", "0")]
    #[case("OUTBOX_MAX_ATTEMPTS", "0")]
    #[case("OUTBOX_RETRY_BASE_SECS", "0")]
    #[case("OUTBOX_BATCH_SIZE", "0")]
    fn out_of_range_values_are_rejected(#[case] key: &'static str, #[case] value: &str) {
        let mut pairs = REQUIRED.to_vec();
        pairs.push((key, value));

        assert_eq!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid {
                key,
                value: value.to_string()
            })
        );
    }

    #[test]
    fn brevo_timeout_is_configurable_and_bounded() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("BREVO_API_KEY", "key"));
        pairs.push(("BREVO_SENDER_EMAIL", "noreply@booknetwork.test"));
        pairs.push(("BREVO_TIMEOUT_SECS", "3"));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.brevo.map(|b| b.request_timeout),
            Some(Duration::from_secs(3))
        );

        // later pairs win in the lookup map
        pairs.push(("BREVO_TIMEOUT_SECS", "0"));
        assert_eq!(
            AppConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid {
                key: "BREVO_TIMEOUT_SECS",
                value: "0".to_string()
            })
        );
    }
}

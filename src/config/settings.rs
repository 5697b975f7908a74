use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Which authority resolution strategy the deployment runs
///
/// Exactly one strategy is active; the other is never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityStrategy {
    /// Resolve roles from the local user store, provisioning on first sight
    LocalStore,
    /// Fetch authorities from the external user service over HTTP
    RemoteService,
}

/// Application settings loaded once from the environment at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,

    // Token verification
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,

    // Cookie-to-header bridge
    pub auth_cookie_name: String,

    // Authority resolution
    pub authority_strategy: AuthorityStrategy,
    pub user_service_url: String,

    // Cache policy
    pub cache_max_entries: u64,
    pub cache_ttl_secs: u64,
    pub cache_tti_secs: u64,

    // Daily report scheduler
    pub scheduler_enabled: bool,
    pub scheduler_hour: u8,
    pub scheduler_minute: u8,
    pub report_recipient: String,
}

impl Settings {
    /// Load settings from environment variables
    ///
    /// `JWT_SECRET` is required; everything else has a default matching the
    /// reference deployment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::load(|var| env::var(var).ok())
    }

    fn load<F>(get: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://ems.db?mode=rwc".to_string());

        let jwt_secret = get("JWT_SECRET").ok_or(SettingsError::MissingVar("JWT_SECRET"))?;

        let authority_strategy = match get("AUTHORITY_STRATEGY")
            .unwrap_or_else(|| "local".to_string())
            .to_lowercase()
            .as_str()
        {
            "local" => AuthorityStrategy::LocalStore,
            "remote" => AuthorityStrategy::RemoteService,
            other => {
                return Err(SettingsError::InvalidValue {
                    var: "AUTHORITY_STRATEGY",
                    value: other.to_string(),
                })
            }
        };

        let scheduler_hour = parse_setting("SCHEDULER_HOUR", get("SCHEDULER_HOUR"), 9)?;
        if scheduler_hour > 23 {
            return Err(SettingsError::InvalidValue {
                var: "SCHEDULER_HOUR",
                value: scheduler_hour.to_string(),
            });
        }
        let scheduler_minute = parse_setting("SCHEDULER_MINUTE", get("SCHEDULER_MINUTE"), 0)?;
        if scheduler_minute > 59 {
            return Err(SettingsError::InvalidValue {
                var: "SCHEDULER_MINUTE",
                value: scheduler_minute.to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            jwt_secret,
            jwt_issuer: get("JWT_ISSUER").filter(|v| !v.is_empty()),
            jwt_audience: get("JWT_AUDIENCE").filter(|v| !v.is_empty()),
            auth_cookie_name: get("AUTH_COOKIE_NAME").unwrap_or_else(|| "id_token".to_string()),
            authority_strategy,
            user_service_url: get("USER_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8082".to_string()),
            cache_max_entries: parse_setting("CACHE_MAX_ENTRIES", get("CACHE_MAX_ENTRIES"), 1000)?,
            cache_ttl_secs: parse_setting("CACHE_TTL_SECS", get("CACHE_TTL_SECS"), 600)?,
            cache_tti_secs: parse_setting("CACHE_TTI_SECS", get("CACHE_TTI_SECS"), 300)?,
            scheduler_enabled: parse_setting("SCHEDULER_ENABLED", get("SCHEDULER_ENABLED"), true)?,
            scheduler_hour,
            scheduler_minute,
            report_recipient: get("REPORT_RECIPIENT")
                .unwrap_or_else(|| "admin@ems.com".to_string()),
        })
    }
}

fn parse_setting<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, SettingsError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| SettingsError::InvalidValue { var, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_vars(vars: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::load(|var| {
            vars.iter()
                .find(|(k, _)| k == var)
                .map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn strategy_defaults_to_local() {
        let settings = with_vars(&[("JWT_SECRET", "test-secret-key-minimum-32-characters")])
            .expect("settings should load");
        assert_eq!(settings.authority_strategy, AuthorityStrategy::LocalStore);
        assert_eq!(settings.auth_cookie_name, "id_token");
        assert_eq!(settings.cache_max_entries, 1000);
    }

    #[test]
    fn missing_secret_is_rejected() {
        assert!(matches!(
            with_vars(&[]),
            Err(SettingsError::MissingVar("JWT_SECRET"))
        ));
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let result = with_vars(&[
            ("JWT_SECRET", "test-secret-key-minimum-32-characters"),
            ("AUTHORITY_STRATEGY", "both"),
        ]);
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue {
                var: "AUTHORITY_STRATEGY",
                ..
            })
        ));
    }

    #[test]
    fn out_of_range_hour_is_rejected() {
        let result = with_vars(&[
            ("JWT_SECRET", "test-secret-key-minimum-32-characters"),
            ("SCHEDULER_HOUR", "24"),
        ]);
        assert!(matches!(
            result,
            Err(SettingsError::InvalidValue {
                var: "SCHEDULER_HOUR",
                ..
            })
        ));
    }
}

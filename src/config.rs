use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub jwt_secret: String,
    pub databases: DatabaseNames,
    pub recognition_enabled: bool,
    pub recognizer: RecognizerConfig,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

/// Names of the three logical databases backing the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseNames {
    pub users: String,
    pub students: String,
    pub attendance: String,
}

impl Default for DatabaseNames {
    fn default() -> Self {
        Self {
            users: "userdb".to_string(),
            students: "userdb2".to_string(),
            attendance: "userdb3".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecognizerConfig {
    pub program: String,
    pub script: PathBuf,
    pub timeout: Option<Duration>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let mongo_uri = required("MONGO_URI")?;
        let port = parse::<u16>("PORT", &required("PORT")?)?;
        let frontend_url = required("FRONTEND_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let defaults = DatabaseNames::default();
        let databases = DatabaseNames {
            users: get("USERS_DATABASE").unwrap_or(defaults.users),
            students: get("STUDENTS_DATABASE").unwrap_or(defaults.students),
            attendance: get("ATTENDANCE_DATABASE").unwrap_or(defaults.attendance),
        };

        let recognition_enabled = match get("RECOGNITION_ENABLED") {
            Some(raw) => parse_bool("RECOGNITION_ENABLED", &raw)?,
            None => true,
        };

        let timeout = match get("RECOGNIZER_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse::<u64>("RECOGNIZER_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        let recognizer = RecognizerConfig {
            program: get("RECOGNIZER_PROGRAM").unwrap_or_else(|| "python3".to_string()),
            script: get("RECOGNIZER_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("function").join("face_recognition_code.py")),
            timeout,
        };

        let token_ttl_minutes = match get("TOKEN_TTL_MINUTES") {
            Some(raw) => parse::<i64>("TOKEN_TTL_MINUTES", &raw)?,
            None => 60,
        };
        if token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_MINUTES",
                value: token_ttl_minutes.to_string(),
            });
        }

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(raw) => parse::<u32>("BCRYPT_COST", &raw)?,
            None => 10,
        };
        // bcrypt only accepts costs in 4..=31
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(Self {
            mongo_uri,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            frontend_url,
            jwt_secret,
            databases,
            recognition_enabled,
            recognizer,
            token_ttl_minutes,
            bcrypt_cost,
        })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Failed-login lockout parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    pub max_attempts: u32,
    pub lockout_minutes: i64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` keeps every collection in process memory.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub throttle: ThrottleConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "marketplace".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "marketplace-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
        };
        let defaults = ThrottleConfig::default();
        let throttle = ThrottleConfig {
            max_attempts: env_parse("LOGIN_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            lockout_minutes: env_parse("LOGIN_LOCKOUT_MINUTES")
                .unwrap_or(defaults.lockout_minutes),
        };
        Ok(Self {
            database_url,
            jwt,
            throttle,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_defaults_match_lockout_policy() {
        let t = ThrottleConfig::default();
        assert_eq!(t.max_attempts, 5);
        assert_eq!(t.lockout_minutes, 30);
    }
}

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::gateway::{Gateway, MemoryGateway, PgGateway};
use crate::throttle::{Clock, LoginThrottle, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub config: Arc<AppConfig>,
    pub throttle: Arc<LoginThrottle>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let gateway = match config.database_url.as_deref() {
            Some(url) => {
                info!("using postgres document store");
                Arc::new(PgGateway::connect(url).await?) as Arc<dyn Gateway>
            }
            None => {
                warn!("DATABASE_URL not set; records are kept in memory only");
                Arc::new(MemoryGateway::new()) as Arc<dyn Gateway>
            }
        };

        Ok(Self::from_parts(gateway, config, Arc::new(SystemClock)))
    }

    pub fn from_parts(
        gateway: Arc<dyn Gateway>,
        config: Arc<AppConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let throttle = Arc::new(LoginThrottle::new(&config.throttle, clock));
        Self {
            gateway,
            config,
            throttle,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with_clock(Arc::new(crate::throttle::test_clock::ManualClock::new()))
    }

    #[cfg(test)]
    pub fn fake_with_clock(clock: Arc<dyn Clock>) -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            throttle: crate::config::ThrottleConfig::default(),
        });
        Self::from_parts(Arc::new(MemoryGateway::new()), config, clock)
    }
}

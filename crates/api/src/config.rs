use anyhow::{bail, Context};

/// Deployment environment. Switches cookie hardening and gates the dev-only
/// bootstrap endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn from_env() -> Self {
        match std::env::var("APP_ENV").as_deref() {
            Ok("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Process configuration, read once at startup and injected downward.
///
/// There are no lazy environment reads anywhere below this point.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Symmetric token signing secret. Startup fails without one; there is no
    /// default and no warn-and-continue path.
    pub signing_secret: String,
    pub environment: Environment,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let signing_secret =
            std::env::var("JWT_SECRET").context("JWT_SECRET is not set; refusing to start")?;
        if signing_secret.is_empty() {
            bail!("JWT_SECRET is empty; refusing to start");
        }

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {raw}"))?,
            Err(_) => 3000,
        };

        Ok(Self {
            signing_secret,
            environment: Environment::from_env(),
            port,
        })
    }
}

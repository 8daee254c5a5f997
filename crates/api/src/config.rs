//! Process configuration read from the environment.

use std::net::SocketAddr;

use anyhow::Context;

use hbnb_infra::AdminSeed;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone)]
pub struct ApiConfig {
    /// HS256 key used to verify bearer tokens.
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    /// Administrator to create at startup if no user has its email yet.
    pub bootstrap_admin: Option<AdminSeed>,
}

impl ApiConfig {
    /// Read `JWT_SECRET`, `BIND_ADDR` and the optional `HBNB_ADMIN_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").filter(|s| !s.is_empty()).unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("invalid BIND_ADDR: {bind_addr}"))?;

        let bootstrap_admin = lookup("HBNB_ADMIN_EMAIL").map(|email| AdminSeed {
            email,
            first_name: lookup("HBNB_ADMIN_FIRST_NAME").unwrap_or_else(|| "Admin".to_string()),
            last_name: lookup("HBNB_ADMIN_LAST_NAME").unwrap_or_else(|| "Account".to_string()),
        });

        Ok(Self {
            jwt_secret,
            bind_addr,
            bootstrap_admin,
        })
    }

    /// Local-only config for tests and tooling.
    pub fn for_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            bootstrap_admin: None,
        }
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("jwt_secret", &"<redacted>")
            .field("bind_addr", &self.bind_addr)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .finish()
    }
}

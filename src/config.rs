use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Account created on startup when no user with `email` exists yet.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminBootstrap,
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://matekasse.db?mode=rwc";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@matekasse.de";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-matekasse-session-secret".into()),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "matekasse".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "matekasse-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let admin = AdminBootstrap {
            email: std::env::var("INITIAL_ADMIN_USER")
                .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.into()),
            password: std::env::var("INITIAL_ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.into()),
        };
        if admin.password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!(email = %admin.email, "INITIAL_ADMIN_PASSWORD not set; using placeholder");
        }
        Ok(Self {
            database_url,
            jwt,
            admin,
        })
    }

    /// Configuration for an in-memory database with fixed test secrets.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            admin: AdminBootstrap {
                email: DEFAULT_ADMIN_EMAIL.into(),
                password: DEFAULT_ADMIN_PASSWORD.into(),
            },
        }
    }
}

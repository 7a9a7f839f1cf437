use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tenantdesk_application::MenuServiceConfig;
use tenantdesk_core::AppError;
use tenantdesk_domain::OrphanPolicy;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub _session_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub menu: MenuServiceConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let bootstrap_token = required_non_empty_env("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required_env("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(AppError::Validation(
                "SESSION_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let cookie_secure = flag_enabled(env::var("SESSION_COOKIE_SECURE").ok().as_deref());
        let menu = menu_config(
            env::var("MENU_PERMISSIVE_IF_ANONYMOUS").ok().as_deref(),
            env::var("MENU_ORPHAN_POLICY").ok().as_deref(),
        )?;

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            bootstrap_token,
            _session_secret: session_secret,
            api_host,
            api_port,
            cookie_secure,
            menu,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn menu_config(
    permissive_if_anonymous: Option<&str>,
    orphan_policy: Option<&str>,
) -> Result<MenuServiceConfig, AppError> {
    let orphan_policy = match orphan_policy.filter(|value| !value.trim().is_empty()) {
        Some(value) => OrphanPolicy::from_str(value).map_err(|error| {
            AppError::Validation(format!("invalid MENU_ORPHAN_POLICY: {error}"))
        })?,
        None => OrphanPolicy::default(),
    };

    Ok(MenuServiceConfig {
        permissive_if_anonymous: flag_enabled(permissive_if_anonymous),
        orphan_policy,
    })
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

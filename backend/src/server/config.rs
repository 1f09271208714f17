//! HTTP server configuration object and environment assembly.
//!
//! Session toggles are parsed by the library's session configuration module;
//! this module covers the rest of the runtime surface: the bind address, the
//! optional database pool, and the optional TMDB metadata provider. Each
//! `*_from_env` helper reads through [`mockable::Env`] so tests can drive it
//! with `MockEnv`.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use reqwest::Url;

use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::outbound::tmdb::DEFAULT_TMDB_API_BASE_URL;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const BIND_ADDR_ENV: &str = "BIND_ADDR";
const BIND_ADDR_DEFAULT: &str = "0.0.0.0:8080";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_POOL_MAX_SIZE_ENV: &str = "DATABASE_POOL_MAX_SIZE";
const DATABASE_CONNECT_TIMEOUT_ENV: &str = "DATABASE_CONNECT_TIMEOUT_SECS";
const TMDB_TOKEN_ENV: &str = "TMDB_API_READ_ACCESS_TOKEN";
const TMDB_BASE_URL_ENV: &str = "TMDB_BASE_URL";
const TMDB_TIMEOUT_ENV: &str = "TMDB_TIMEOUT_SECS";
const TMDB_TIMEOUT_DEFAULT_SECS: u64 = 10;

const ADDR_EXPECTED: &str = "a host:port socket address";
const COUNT_EXPECTED: &str = "a positive integer";
const SECONDS_EXPECTED: &str = "a positive integer number of seconds";
const URL_EXPECTED: &str = "an absolute http(s) URL";

/// Errors raised while validating server runtime configuration.
#[derive(thiserror::Error, Debug)]
pub enum ServerConfigError {
    /// A variable is present but holds an unusable value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Connection settings for the hosted TMDB metadata provider.
pub struct TmdbSettings {
    pub(crate) base_url: Url,
    pub(crate) api_token: String,
    pub(crate) timeout: Duration,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) tmdb: Option<TmdbSettings>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            tmdb: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses database-backed implementations for the
    /// user directory and watchlist repository; without it, both fall back to
    /// their fixtures.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach TMDB provider settings to the configuration.
    ///
    /// When absent, catalog browsing serves the fixture metadata gateway.
    #[must_use]
    pub fn with_tmdb(mut self, tmdb: Option<TmdbSettings>) -> Self {
        self.tmdb = tmdb;
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(
            dead_code,
            reason = "Exercised by integration tests; retained for fixture access"
        )
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

/// Read the listener address from `BIND_ADDR`, defaulting to `0.0.0.0:8080`.
pub fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ServerConfigError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| BIND_ADDR_DEFAULT.to_string());
    raw.parse()
        .map_err(|_| ServerConfigError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value: raw,
            expected: ADDR_EXPECTED,
        })
}

/// Read pool settings from `DATABASE_URL` and its sizing companions.
///
/// Returns `None` when no database is configured; the server then runs its
/// persistence ports on fixtures.
pub fn pool_config_from_env<E: Env>(env: &E) -> Result<Option<PoolConfig>, ServerConfigError> {
    let Some(url) = non_blank(env, DATABASE_URL_ENV) else {
        return Ok(None);
    };
    let mut config = PoolConfig::new(url);
    let max_size = positive_from_env::<E, u32>(env, DATABASE_POOL_MAX_SIZE_ENV, COUNT_EXPECTED)?;
    if let Some(max_size) = max_size {
        config = config.with_max_size(max_size);
    }
    let seconds = positive_from_env::<E, u64>(env, DATABASE_CONNECT_TIMEOUT_ENV, SECONDS_EXPECTED)?;
    if let Some(seconds) = seconds {
        config = config.with_connection_timeout(Duration::from_secs(seconds));
    }
    Ok(Some(config))
}

/// Read TMDB provider settings from the environment.
///
/// Returns `None` when `TMDB_API_READ_ACCESS_TOKEN` is unset; the server then
/// serves catalog browsing from the fixture gateway.
pub fn tmdb_settings_from_env<E: Env>(env: &E) -> Result<Option<TmdbSettings>, ServerConfigError> {
    let Some(api_token) = non_blank(env, TMDB_TOKEN_ENV) else {
        return Ok(None);
    };
    let raw_url = env
        .string(TMDB_BASE_URL_ENV)
        .unwrap_or_else(|| DEFAULT_TMDB_API_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url).map_err(|_| ServerConfigError::InvalidEnv {
        name: TMDB_BASE_URL_ENV,
        value: raw_url,
        expected: URL_EXPECTED,
    })?;
    let timeout_secs = positive_from_env::<E, u64>(env, TMDB_TIMEOUT_ENV, SECONDS_EXPECTED)?
        .unwrap_or(TMDB_TIMEOUT_DEFAULT_SECS);

    Ok(Some(TmdbSettings {
        base_url,
        api_token,
        timeout: Duration::from_secs(timeout_secs),
    }))
}

/// Read a variable, treating blank values the same as unset ones.
fn non_blank<E: Env>(env: &E, name: &'static str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn positive_from_env<E: Env, T>(
    env: &E,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ServerConfigError>
where
    T: std::str::FromStr + PartialEq + From<u8>,
{
    let Some(value) = env.string(name) else {
        return Ok(None);
    };
    let invalid = |value: String| ServerConfigError::InvalidEnv {
        name,
        value,
        expected,
    };
    match value.parse::<T>() {
        Ok(parsed) if parsed == T::from(0) => Err(invalid(value)),
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(invalid(value)),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for runtime configuration parsing.

    use std::collections::HashMap;

    use mockable::MockEnv;
    use rstest::rstest;

    use super::*;

    fn mock_env(vars: HashMap<String, String>) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    fn config_error<T>(result: Result<T, ServerConfigError>) -> ServerConfigError {
        match result {
            Ok(_) => panic!("configuration unexpectedly accepted"),
            Err(error) => error,
        }
    }

    #[rstest]
    fn bind_addr_defaults_when_unset() {
        let env = mock_env(HashMap::new());
        let addr = bind_addr_from_env(&env).expect("default address parses");
        assert_eq!(addr.to_string(), BIND_ADDR_DEFAULT);
    }

    #[rstest]
    fn bind_addr_honours_the_environment() {
        let env = mock_env(HashMap::from([(
            BIND_ADDR_ENV.to_string(),
            "127.0.0.1:9090".to_string(),
        )]));
        let addr = bind_addr_from_env(&env).expect("explicit address parses");
        assert_eq!(addr.to_string(), "127.0.0.1:9090");
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("127.0.0.1")]
    fn bind_addr_rejects_unparseable_values(#[case] raw: &str) {
        let env = mock_env(HashMap::from([(
            BIND_ADDR_ENV.to_string(),
            raw.to_string(),
        )]));
        let err = config_error(bind_addr_from_env(&env));
        assert!(matches!(
            err,
            ServerConfigError::InvalidEnv {
                name: BIND_ADDR_ENV,
                ..
            },
        ));
    }

    #[rstest]
    #[case(HashMap::new())]
    #[case(HashMap::from([(DATABASE_URL_ENV.to_string(), "   ".to_string())]))]
    fn pool_config_is_absent_without_a_database_url(#[case] vars: HashMap<String, String>) {
        let env = mock_env(vars);
        let config = pool_config_from_env(&env).expect("absent database is valid");
        assert!(config.is_none());
    }

    #[rstest]
    fn pool_config_carries_the_database_url() {
        let env = mock_env(HashMap::from([
            (
                DATABASE_URL_ENV.to_string(),
                "postgres://localhost/watchlist".to_string(),
            ),
            (DATABASE_POOL_MAX_SIZE_ENV.to_string(), "5".to_string()),
            (DATABASE_CONNECT_TIMEOUT_ENV.to_string(), "3".to_string()),
        ]));
        let config = pool_config_from_env(&env)
            .expect("sized pool settings parse")
            .expect("database configured");
        assert_eq!(config.database_url(), "postgres://localhost/watchlist");
    }

    #[rstest]
    #[case(DATABASE_POOL_MAX_SIZE_ENV, "0")]
    #[case(DATABASE_POOL_MAX_SIZE_ENV, "many")]
    #[case(DATABASE_CONNECT_TIMEOUT_ENV, "0")]
    #[case(DATABASE_CONNECT_TIMEOUT_ENV, "-3")]
    fn pool_config_rejects_unusable_sizing(#[case] name: &str, #[case] raw: &str) {
        let env = mock_env(HashMap::from([
            (
                DATABASE_URL_ENV.to_string(),
                "postgres://localhost/watchlist".to_string(),
            ),
            (name.to_string(), raw.to_string()),
        ]));
        let err = config_error(pool_config_from_env(&env));
        let ServerConfigError::InvalidEnv {
            name: err_name,
            value,
            ..
        } = err;
        assert_eq!(err_name, name);
        assert_eq!(value, raw);
    }

    #[rstest]
    #[case(HashMap::new())]
    #[case(HashMap::from([(TMDB_TOKEN_ENV.to_string(), String::new())]))]
    fn tmdb_settings_are_absent_without_a_token(#[case] vars: HashMap<String, String>) {
        let env = mock_env(vars);
        let settings = tmdb_settings_from_env(&env).expect("absent provider is valid");
        assert!(settings.is_none());
    }

    #[rstest]
    fn tmdb_settings_default_base_url_and_timeout() {
        let env = mock_env(HashMap::from([(
            TMDB_TOKEN_ENV.to_string(),
            "token".to_string(),
        )]));
        let settings = tmdb_settings_from_env(&env)
            .expect("token-only settings parse")
            .expect("provider configured");
        assert_eq!(settings.base_url.as_str(), DEFAULT_TMDB_API_BASE_URL);
        assert_eq!(settings.api_token, "token");
        assert_eq!(settings.timeout, Duration::from_secs(TMDB_TIMEOUT_DEFAULT_SECS));
    }

    #[rstest]
    fn tmdb_settings_honour_overrides() {
        let env = mock_env(HashMap::from([
            (TMDB_TOKEN_ENV.to_string(), "token".to_string()),
            (
                TMDB_BASE_URL_ENV.to_string(),
                "https://tmdb.stage.example/3/".to_string(),
            ),
            (TMDB_TIMEOUT_ENV.to_string(), "3".to_string()),
        ]));
        let settings = tmdb_settings_from_env(&env)
            .expect("override settings parse")
            .expect("provider configured");
        assert_eq!(settings.base_url.as_str(), "https://tmdb.stage.example/3/");
        assert_eq!(settings.timeout, Duration::from_secs(3));
    }

    #[rstest]
    #[case(TMDB_BASE_URL_ENV, "not a url")]
    #[case(TMDB_TIMEOUT_ENV, "0")]
    #[case(TMDB_TIMEOUT_ENV, "soon")]
    fn tmdb_settings_reject_unusable_values(#[case] name: &str, #[case] raw: &str) {
        let env = mock_env(HashMap::from([
            (TMDB_TOKEN_ENV.to_string(), "token".to_string()),
            (name.to_string(), raw.to_string()),
        ]));
        let err = config_error(tmdb_settings_from_env(&env));
        let ServerConfigError::InvalidEnv {
            name: err_name,
            value,
            ..
        } = err;
        assert_eq!(err_name, name);
        assert_eq!(value, raw);
    }
}

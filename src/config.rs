//! Environment-driven settings for the service binary.
//!
//! Everything is read once at startup from `PULSE_*` variables (a `.env`
//! file is honored when present); there is no reload.

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// A setting that could not be used, tagged with the variable it came from.
#[derive(Debug)]
pub struct ConfigError {
    key: &'static str,
    problem: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.problem)
    }
}

impl std::error::Error for ConfigError {}

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    /// Unrecognized values fall back to development rather than erroring;
    /// a typo in `PULSE_ENV` should not keep the service from starting.
    fn detect(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        if matches!(normalized.as_str(), "prod" | "production") {
            Self::Production
        } else if matches!(normalized.as_str(), "test" | "ci") {
            Self::Test
        } else {
            Self::Development
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::detect(&env_or("PULSE_ENV", "development")),
            server: ServerConfig {
                host: env_or("PULSE_HOST", "127.0.0.1"),
                port: parsed_env("PULSE_PORT", "3000")?,
            },
            telemetry: TelemetryConfig {
                log_level: env_or("PULSE_LOG_LEVEL", "info"),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` is accepted as a convenience; anything else must be a
    /// literal IP, name resolution is out of scope here.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = match self.host.to_ascii_lowercase().as_str() {
            "localhost" => IpAddr::from([127, 0, 0, 1]),
            other => IpAddr::from_str(other).map_err(|err| ConfigError {
                key: "PULSE_HOST",
                problem: format!(
                    "'{}' is neither localhost nor an IP address ({err})",
                    self.host
                ),
            })?,
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn env_or(key: &'static str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

fn parsed_env<T: FromStr>(key: &'static str, fallback: &str) -> Result<T, ConfigError> {
    let raw = env_or(key, fallback);
    raw.parse().map_err(|_| ConfigError {
        key,
        problem: format!("'{raw}' is not a usable value"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Env vars are process-global; tests that touch them run one at a time
    // and clean up after themselves.
    fn with_env(vars: &[(&str, &str)], check: impl FnOnce()) {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        let _lock = GUARD.get_or_init(|| Mutex::new(())).lock().expect("env lock");

        for key in ["PULSE_ENV", "PULSE_HOST", "PULSE_PORT", "PULSE_LOG_LEVEL"] {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }

        check();

        for (key, _) in vars {
            env::remove_var(key);
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        with_env(&[], || {
            let config = AppConfig::load().expect("defaults load");
            assert_eq!(config.environment, AppEnvironment::Development);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.telemetry.log_level, "info");
        });
    }

    #[test]
    fn environment_detection_tolerates_case_and_typos() {
        assert_eq!(AppEnvironment::detect("PROD"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::detect(" ci "), AppEnvironment::Test);
        assert_eq!(AppEnvironment::detect("staging"), AppEnvironment::Development);
    }

    #[test]
    fn bad_port_names_the_variable() {
        with_env(&[("PULSE_PORT", "feedback")], || {
            let err = AppConfig::load().expect_err("port must parse");
            assert!(err.to_string().starts_with("PULSE_PORT:"));
        });
    }

    #[test]
    fn localhost_binds_to_loopback() {
        with_env(&[("PULSE_HOST", "localhost")], || {
            let config = AppConfig::load().expect("config loads");
            let addr = config.server.socket_addr().expect("localhost resolves");
            assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        });
    }

    #[test]
    fn hostnames_other_than_localhost_are_rejected() {
        let server = ServerConfig {
            host: "pulse.internal".to_string(),
            port: 3000,
        };
        let err = server.socket_addr().expect_err("names do not resolve");
        assert!(err.to_string().contains("pulse.internal"));
    }
}

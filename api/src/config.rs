use std::net::SocketAddr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => match env.as_str() {
                "dev" => Env::Dev,
                "staging" => Env::Staging,
                "production" => Env::Production,
                _ => Env::Dev,
            },
            _ => Env::Dev,
        }
    }
}

/// Where forum data lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Storage {
    Postgres {
        database_url: String,
        max_connections: usize,
    },
    /// Throwaway in-process store, handy for local development. Sessions
    /// come from `DEV_SESSIONS` since nothing else can issue them.
    Memory { dev_sessions: Vec<DevSession> },
}

/// A session token pre-registered for a user of the in-memory store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevSession {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

/// Parses `token:user_id[:username],...`. The username defaults to the user
/// id.
pub fn parse_dev_sessions(raw: &str) -> Result<Vec<DevSession>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split(':').map(str::trim);
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(token), Some(user_id), username, None)
                    if !token.is_empty() && !user_id.is_empty() =>
                {
                    Ok(DevSession {
                        token: token.to_string(),
                        user_id: user_id.to_string(),
                        username: username
                            .filter(|u| !u.is_empty())
                            .unwrap_or(user_id)
                            .to_string(),
                    })
                }
                _ => Err(format!(
                    "invalid dev session `{entry}`, expected `token:user_id[:username]`"
                )),
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub storage: Storage,
    pub listen_addr: SocketAddr,
}

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => Ok(None),
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

/// Reads and parses an optional variable, falling back to `default` when it
/// is missing or malformed.
fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match var(key) {
        Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Environment variable `{key}` has an invalid value `{raw}`, using default"
            );
            default
        }),
        _ => default,
    }
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        let storage = match var("STORAGE") {
            Ok(Some(s)) if s == "memory" => Storage::Memory {
                dev_sessions: dev_sessions(),
            },
            _ => Storage::Postgres {
                database_url: required_var("DATABASE_URL"),
                max_connections: parsed_var("DATABASE_MAX_CONNECTIONS", 10),
            },
        };

        let host: std::net::IpAddr = parsed_var("HOST", [0, 0, 0, 0].into());
        let port: u16 = parsed_var("PORT", 3000);

        ServerConfig {
            storage,
            listen_addr: SocketAddr::new(host, port),
        }
    }
}

fn dev_sessions() -> Vec<DevSession> {
    let raw = match var("DEV_SESSIONS") {
        Ok(raw) => raw.unwrap_or_default(),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1)
        }
    };

    match parse_dev_sessions(&raw) {
        Ok(sessions) => {
            if sessions.is_empty() {
                tracing::warn!("No `DEV_SESSIONS` configured, every write will be rejected");
            }
            sessions
        }
        Err(e) => {
            tracing::error!("Environment variable `DEV_SESSIONS` is malformed: {e}");
            std::process::exit(1)
        }
    }
}

use std::env;
use std::path::PathBuf;

use chrono::Utc;

/// Application configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Originals and the resize cache
    pub profiles_dir: PathBuf,
    /// JSON snapshot of the user list; `None` keeps users in memory only
    pub users_file: Option<PathBuf>,
    /// Bearer token that marks a request as authorized
    pub admin_token: Option<String>,
    pub cors_origins: Vec<String>,
    pub generator_seed: Option<u64>,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Generator seed, falling back to the current Unix time
    pub fn seed(&self) -> u64 {
        self.generator_seed
            .unwrap_or_else(|| Utc::now().timestamp() as u64)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let profiles_dir = lookup("PROFILES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./profiles"));

        let users_file = match lookup("USERS_FILE") {
            Some(path) if path.is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from("./users.json")),
        };

        let admin_token = lookup("ADMIN_TOKEN").filter(|t| !t.is_empty());

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let generator_seed = lookup("GENERATOR_SEED").and_then(|s| s.parse().ok());

        Self {
            port,
            profiles_dir,
            users_file,
            admin_token,
            cors_origins,
            generator_seed,
        }
    }
}

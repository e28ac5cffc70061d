use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the membership backend, e.g. "https://api.example.org".
    pub backend_url: String,

    /// Bearer token for the admin API. Public registration endpoints work without it.
    pub api_token: Option<Secret<String>>,

    /// Tenant scope for multi-location deployments. Sent as the X-Dojo header.
    pub dojo: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for local development)
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        Ok(Self {
            backend_url: config.get("backend_url")?,
            api_token: config.get::<String>("api_token").ok().map(Secret::new),
            dojo: config.get("dojo").ok(),
        })
    }
}

pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub db_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_allowed_origins")]
        pub allowed_origins: String,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns the configured CORS origins, split from the
        /// comma-separated `ALLOWED_ORIGINS` value.
        pub fn allowed_origins(&self) -> Vec<String> {
            self.allowed_origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        }
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_allowed_origins() -> String {
        "http://localhost:3000".to_string()
    }

}
pub mod entities;
pub mod task;
pub mod web;

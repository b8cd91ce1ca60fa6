pub mod config {
    use serde::Deserialize;

    /// Deployment mode of the process.
    #[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[serde(rename_all = "lowercase")]
    pub enum AppEnv {
        /// Applies pending migrations at start-up and logs verbosely.
        Development,
        #[default]
        Production,
    }

    #[derive(Deserialize, Debug)]
    pub struct Config {
        pub database_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default)]
        pub app_env: AppEnv,
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

        pub fn is_development(&self) -> bool {
            self.app_env == AppEnv::Development
        }

        /// Maximum log level for the process, derived from the deployment mode.
        pub fn log_level(&self) -> tracing::Level {
            match self.app_env {
                AppEnv::Development => tracing::Level::DEBUG,
                AppEnv::Production => tracing::Level::INFO,
            }
        }
    }

    fn default_port() -> u16 {
        8080
    }

}
pub mod cabin;
pub mod entities;
pub mod task;
pub mod validation;
pub mod web;

use crate::adsbdb::AdsbdbConfig;
use crate::opensky::OpenSkyConfig;
use crate::server::ServerConfig;
use crate::watcher::WatcherConfig;

#[derive(serde::Deserialize)]
pub struct ApplicationConfig {
    pub opensky: OpenSkyConfig,
    pub adsbdb: AdsbdbConfig,
    pub server: ServerConfig,
    pub watcher: WatcherConfig,
}

impl ApplicationConfig {
    pub fn construct_from_path(
        path: &std::path::PathBuf,
    ) -> Result<ApplicationConfig, errors::ApplicationConfigError> {
        let string =
            std::fs::read_to_string(path).map_err(|error| errors::ApplicationConfigError::Io {
                source: error,
                path: path.clone(),
            })?;

        let config: Result<ApplicationConfig, errors::ApplicationConfigError> =
            toml::from_str(&string).map_err(|error| errors::ApplicationConfigError::Parse {
                source: error,
                path: path.clone(),
            });
        config
    }
}

pub mod errors {

    #[derive(Debug)]
    pub enum ApplicationConfigError {
        Parse {
            source: toml::de::Error,
            path: std::path::PathBuf,
        },
        Io {
            source: std::io::Error,
            path: std::path::PathBuf,
        },
    }
    impl std::fmt::Display for ApplicationConfigError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ApplicationConfigError::Io {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to read config file '{}': {}",
                        path.display(),
                        error
                    )
                }
                ApplicationConfigError::Parse {
                    source: error,
                    path,
                } => {
                    write!(
                        f,
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        error
                    )
                }
            }
        }
    }
    impl std::error::Error for ApplicationConfigError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                ApplicationConfigError::Io { source: error, .. } => Some(error),
                ApplicationConfigError::Parse { source: error, .. } => Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationConfig;

    #[test]
    fn when_parsing_sample_config_then_all_sections_are_populated() {
        let sample = r#"
            [opensky]
            base_url = "https://opensky-network.org/api"

            [opensky.bounds]
            lamin = 51.50
            lomin = -0.50
            lamax = 51.80
            lomax = 0.20

            [adsbdb]
            base_url = "https://api.adsbdb.com/v0"

            [server]
            port = 4545
            region_label = "North London"

            [watcher]
            period_seconds = 300
        "#;

        let config: ApplicationConfig = toml::from_str(sample).expect("sample config parses");

        assert_eq!(config.opensky.bounds.lamax, 51.80);
        assert_eq!(config.opensky.timeout_seconds, 10);
        assert_eq!(config.adsbdb.timeout_seconds, 10);
        assert_eq!(config.server.port, 4545);
        assert_eq!(config.server.region_label, "North London");
        assert_eq!(config.watcher.period_seconds, 300);
    }
}

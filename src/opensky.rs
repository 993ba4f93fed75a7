use crate::extractor::StatesResponse;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OpenSkyConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    pub bounds: BoundingBox,
}

/// Geographic query box for the state feed: south/west/north/east limits in
/// decimal degrees.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lomin: f64,
    pub lamax: f64,
    pub lomax: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("state feed request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("state feed returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Source of raw positional states for the configured area. Abstracted so the
/// cycle orchestrator can be exercised without the network.
pub trait StateSource {
    fn fetch_states(&self) -> Result<StatesResponse, AcquisitionError>;
}

/// OpenSky `states/all` client, queried anonymously with a fixed bounding box.
pub struct OpenSkyClient {
    client: reqwest::blocking::Client,
    base_url: String,
    bounds: BoundingBox,
}

impl OpenSkyClient {
    pub fn new(config: &OpenSkyConfig) -> Result<Self, AcquisitionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("skyboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(OpenSkyClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bounds: config.bounds,
        })
    }
}

impl StateSource for OpenSkyClient {
    fn fetch_states(&self) -> Result<StatesResponse, AcquisitionError> {
        let url = format!(
            "{0}/states/all?lamin={1}&lomin={2}&lamax={3}&lomax={4}",
            self.base_url,
            self.bounds.lamin,
            self.bounds.lomin,
            self.bounds.lamax,
            self.bounds.lomax
        );
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(AcquisitionError::Status(response.status()));
        }
        Ok(response.json::<StatesResponse>()?)
    }
}

use crate::types::IcaoAddress;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AdsbdbConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Registry fields for one airframe, as returned by the metadata source.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AircraftInfo {
    #[serde(rename = "type")]
    pub aircraft_type: String,
    #[serde(default)]
    pub icao_type: String,
    #[serde(default)]
    pub mode_s: String,
    #[serde(default)]
    pub registration: String,
    pub manufacturer: String,
    pub registered_owner: String,
}

/// One endpoint of a resolved route. Extra airport fields in the payload
/// (country, coordinates, elevation) are ignored.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Airport {
    pub name: String,
    pub icao_code: String,
}

impl Airport {
    /// Display form used on both read surfaces: `"Heathrow Airport (EGLL)"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{0} ({1})", self.name, self.icao_code)
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FlightRoute {
    pub callsign: String,
    pub origin: Airport,
    pub destination: Airport,
}

#[derive(Debug, serde::Deserialize)]
struct AircraftResponse {
    response: AircraftPayload,
}

#[derive(Debug, serde::Deserialize)]
struct AircraftPayload {
    aircraft: AircraftInfo,
}

// The callsign-qualified endpoint returns aircraft and flightroute together;
// only the flightroute half is consumed here.
#[derive(Debug, serde::Deserialize)]
struct CallsignResponse {
    response: CallsignPayload,
}

#[derive(Debug, serde::Deserialize)]
struct CallsignPayload {
    flightroute: FlightRoute,
}

/// 404 body shape of the metadata source: `{"response": "unknown aircraft"}`.
#[derive(Debug, serde::Deserialize)]
struct UnknownResponse {
    response: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("unknown aircraft {0}: {1}")]
    NotFound(IcaoAddress, String),
    #[error("no route found for callsign {0}")]
    RouteNotFound(String),
    #[error("metadata source returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("metadata request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("empty aircraft payload for {0}")]
    EmptyPayload(IcaoAddress),
}

/// Registry and route lookups for one aircraft. The two lookups are
/// independent; the route lookup additionally needs a callsign.
pub trait MetadataSource {
    fn fetch_aircraft(&self, icao_address: IcaoAddress) -> Result<AircraftInfo, MetadataError>;
    fn fetch_route(
        &self,
        icao_address: IcaoAddress,
        callsign: &str,
    ) -> Result<FlightRoute, MetadataError>;
}

/// adsbdb v0 client.
pub struct AdsbdbClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl AdsbdbClient {
    pub fn new(config: &AdsbdbConfig) -> Result<Self, MetadataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("skyboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(AdsbdbClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl MetadataSource for AdsbdbClient {
    fn fetch_aircraft(&self, icao_address: IcaoAddress) -> Result<AircraftInfo, MetadataError> {
        let url = format!("{0}/aircraft/{icao_address}", self.base_url);
        let response = self.client.get(&url).send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            // Decode the "unknown" body best-effort for the log line.
            let reason = response
                .json::<UnknownResponse>()
                .map(|unknown| unknown.response)
                .unwrap_or_default();
            return Err(MetadataError::NotFound(icao_address, reason));
        }
        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status()));
        }

        let aircraft = response.json::<AircraftResponse>()?.response.aircraft;
        if aircraft.mode_s.is_empty() && aircraft.registration.is_empty() {
            return Err(MetadataError::EmptyPayload(icao_address));
        }
        Ok(aircraft)
    }

    fn fetch_route(
        &self,
        icao_address: IcaoAddress,
        callsign: &str,
    ) -> Result<FlightRoute, MetadataError> {
        let url = format!("{0}/aircraft/{icao_address}?callsign={callsign}", self.base_url);
        let response = self.client.get(&url).send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::RouteNotFound(callsign.to_string()));
        }
        if !response.status().is_success() {
            return Err(MetadataError::Status(response.status()));
        }

        Ok(response.json::<CallsignResponse>()?.response.flightroute)
    }
}

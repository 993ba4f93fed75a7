use crate::adsbdb::{MetadataError, MetadataSource};
use crate::types::{AircraftRecord, TrackedAircraft, UNKNOWN_ROUTE};

/// Merges the two metadata lookups into one display record.
///
/// The registry lookup is the hard dependency: any failure there fails the
/// whole enrichment and the aircraft is dropped from the cycle by the caller.
/// The route lookup is soft; it is only attempted when a callsign is known,
/// and any failure leaves origin/destination at the "Unknown" sentinel.
pub struct Enricher<M: MetadataSource> {
    source: M,
}

impl<M: MetadataSource> Enricher<M> {
    #[must_use]
    pub fn new(source: M) -> Self {
        Enricher { source }
    }

    pub fn enrich(
        &self,
        aircraft: &TrackedAircraft,
        timestamp: &str,
    ) -> Result<AircraftRecord, MetadataError> {
        let info = self.source.fetch_aircraft(aircraft.icao_address)?;

        let (origin, destination) = if aircraft.callsign.is_empty() {
            (UNKNOWN_ROUTE.to_string(), UNKNOWN_ROUTE.to_string())
        } else {
            match self
                .source
                .fetch_route(aircraft.icao_address, &aircraft.callsign)
            {
                Ok(route) => (
                    route.origin.display_name(),
                    route.destination.display_name(),
                ),
                Err(err) => {
                    log::debug!("{0}: no route this cycle: {err}", aircraft.icao_address);
                    (UNKNOWN_ROUTE.to_string(), UNKNOWN_ROUTE.to_string())
                }
            }
        };

        Ok(AircraftRecord {
            registration: info.registration,
            owner: info.registered_owner,
            manufacturer: info.manufacturer,
            aircraft_type: info.aircraft_type,
            origin,
            destination,
            last_updated: timestamp.to_string(),
        })
    }
}

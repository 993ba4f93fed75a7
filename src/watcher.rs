use crate::adsbdb::MetadataSource;
use crate::board::BoardStore;
use crate::enrich::Enricher;
use crate::extractor::extract_tracked_aircraft;
use crate::opensky::StateSource;
use crate::thread_manager::SteppableTask;
use crate::types::Snapshot;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct WatcherConfig {
    pub period_seconds: u64,
}

/// Drives one acquisition-enrichment-publish cycle per step. Registered with
/// the thread manager at the configured period, so cycles run strictly one
/// after another on a single thread and can never overlap.
pub struct SkyWatcher<S: StateSource, M: MetadataSource> {
    states: S,
    enricher: Enricher<M>,
    store: BoardStore,
}

impl<S: StateSource, M: MetadataSource> SkyWatcher<S, M> {
    #[must_use]
    pub fn new(states: S, metadata: M, store: BoardStore) -> Self {
        SkyWatcher {
            states,
            enricher: Enricher::new(metadata),
            store,
        }
    }

    fn run_cycle(&self) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        log::info!("Aircraft check at {timestamp}");

        let response = match self.states.fetch_states() {
            Ok(response) => response,
            Err(err) => {
                // The cycle still completes: readers get an empty snapshot
                // whose timestamp is annotated as an error cycle.
                log::error!("Failed to fetch state feed: {err}");
                self.store.replace(Snapshot {
                    records: Vec::new(),
                    last_update: format!("{timestamp} (Error fetching data)"),
                });
                return;
            }
        };

        let tracked = extract_tracked_aircraft(&response);
        if tracked.is_empty() {
            log::info!("No aircraft currently reported inside the configured area.");
            self.store.replace(Snapshot {
                records: Vec::new(),
                last_update: timestamp,
            });
            return;
        }

        log::info!("Found {0} aircraft. Enriching with registry data...", tracked.len());

        let mut records = Vec::with_capacity(tracked.len());
        for aircraft in &tracked {
            match self.enricher.enrich(aircraft, &timestamp) {
                Ok(record) => {
                    log::info!(
                        "Reg: {0} | Owner: {1} | Manufacturer: {2} | Type: {3} | Origin: {4} | Destination: {5}",
                        record.registration,
                        record.owner,
                        record.manufacturer,
                        record.aircraft_type,
                        record.origin,
                        record.destination
                    );
                    records.push(record);
                }
                Err(err) => {
                    log::warn!("{0}: dropped from this cycle: {err}", aircraft.icao_address);
                }
            }
        }

        log::info!("Publishing snapshot with {0} aircraft.", records.len());
        self.store.replace(Snapshot {
            records,
            last_update: timestamp,
        });
    }
}

impl<S, M> SteppableTask for SkyWatcher<S, M>
where
    S: StateSource + Send + 'static,
    M: MetadataSource + Send + 'static,
{
    fn step(&mut self) -> bool {
        self.run_cycle();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::SkyWatcher;
    use crate::board::BoardStore;
    use crate::enrich::tests::ScriptedMetadata;
    use crate::extractor::StatesResponse;
    use crate::opensky::{AcquisitionError, StateSource};
    use crate::types::UNKNOWN_ROUTE;
    use serde_json::json;

    struct ScriptedStates {
        result: Result<serde_json::Value, ()>,
    }

    impl ScriptedStates {
        fn with_rows(rows: serde_json::Value) -> Self {
            ScriptedStates { result: Ok(rows) }
        }

        fn failing() -> Self {
            ScriptedStates { result: Err(()) }
        }
    }

    impl StateSource for ScriptedStates {
        fn fetch_states(&self) -> Result<StatesResponse, AcquisitionError> {
            match &self.result {
                Ok(rows) => Ok(serde_json::from_value(
                    json!({ "time": 1700000000, "states": rows }),
                )
                .expect("test payload should deserialize")),
                Err(()) => Err(AcquisitionError::Status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                )),
            }
        }
    }

    #[test]
    fn when_feed_has_one_valid_and_one_malformed_row_then_one_record_is_published() {
        let states = ScriptedStates::with_rows(json!([["4008f6", "BA123 "], ["bad"]]));
        let metadata = ScriptedMetadata::new().with_aircraft("4008f6", "G-VROS");
        let store = BoardStore::new();
        let viewer = store.viewer();

        SkyWatcher::new(states, metadata, store).run_cycle();

        let snapshot = viewer.snapshot();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].registration, "G-VROS");
        assert_eq!(snapshot.records[0].origin, UNKNOWN_ROUTE);
        assert_eq!(snapshot.records[0].destination, UNKNOWN_ROUTE);
        assert!(!snapshot.last_update.is_empty());
    }

    #[test]
    fn when_acquisition_fails_then_empty_error_snapshot_is_published() {
        let store = BoardStore::new();
        let viewer = store.viewer();

        SkyWatcher::new(ScriptedStates::failing(), ScriptedMetadata::new(), store).run_cycle();

        let snapshot = viewer.snapshot();
        assert!(snapshot.records.is_empty());
        assert!(snapshot.last_update.ends_with("(Error fetching data)"));
    }

    #[test]
    fn when_registry_lookup_fails_for_one_aircraft_then_only_the_other_is_published() {
        let states =
            ScriptedStates::with_rows(json!([["4008f6", "BAW123"], ["3c6444", "DLH9U"]]));
        let metadata = ScriptedMetadata::new().with_aircraft("3c6444", "D-AIZQ");
        let store = BoardStore::new();
        let viewer = store.viewer();

        SkyWatcher::new(states, metadata, store).run_cycle();

        let snapshot = viewer.snapshot();
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].registration, "D-AIZQ");
    }

    #[test]
    fn when_route_is_known_then_record_carries_airport_names() {
        let states = ScriptedStates::with_rows(json!([["4008f6", " BAW123 "]]));
        let metadata = ScriptedMetadata::new()
            .with_aircraft("4008f6", "G-VROS")
            .with_route("BAW123", "London Heathrow Airport", "John F Kennedy International Airport");
        let store = BoardStore::new();
        let viewer = store.viewer();

        SkyWatcher::new(states, metadata, store).run_cycle();

        let snapshot = viewer.snapshot();
        assert_eq!(snapshot.records[0].origin, "London Heathrow Airport (EGLL)");
        assert_eq!(
            snapshot.records[0].destination,
            "John F Kennedy International Airport (KJFK)"
        );
    }

    #[test]
    fn when_feed_is_empty_then_timestamped_empty_snapshot_is_published() {
        let store = BoardStore::new();
        let viewer = store.viewer();

        SkyWatcher::new(
            ScriptedStates::with_rows(json!([])),
            ScriptedMetadata::new(),
            store,
        )
        .run_cycle();

        let snapshot = viewer.snapshot();
        assert!(snapshot.records.is_empty());
        assert!(!snapshot.last_update.is_empty());
        assert!(!snapshot.last_update.contains("Error"));
    }
}

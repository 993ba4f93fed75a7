use crate::types::{IcaoAddress, TrackedAircraft};

/// Raw payload of the state feed. Each state is a loosely-typed positional
/// array; position 0 is the ICAO address, position 1 the callsign. The feed
/// reports `null` instead of an empty array when nothing is airborne.
#[derive(Debug, serde::Deserialize)]
pub struct StatesResponse {
    pub time: i64,
    pub states: Option<Vec<Vec<serde_json::Value>>>,
}

/// Reduces the raw state feed to a deduplicated list of tracked aircraft,
/// sorted ascending by address so every downstream stage (and the published
/// snapshot) has a deterministic order.
///
/// Rows that fail shape validation are skipped individually; extraction
/// itself never fails. The first occurrence of an address wins, including
/// its callsign.
#[must_use]
pub fn extract_tracked_aircraft(response: &StatesResponse) -> Vec<TrackedAircraft> {
    let Some(rows) = &response.states else {
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    let mut tracked = Vec::new();

    for row in rows {
        if row.len() < 2 {
            log::debug!("Discarding state row with {} fields", row.len());
            continue;
        }
        let Some(hex) = row[0].as_str() else {
            continue;
        };
        if hex.is_empty() {
            continue;
        }
        let icao_address = match IcaoAddress::parse_hex(hex) {
            Ok(address) => address,
            Err(err) => {
                log::debug!("Discarding state row: {err}");
                continue;
            }
        };
        if !seen.insert(icao_address) {
            continue;
        }

        let callsign = row[1].as_str().unwrap_or("").trim().to_string();
        tracked.push(TrackedAircraft {
            icao_address,
            callsign,
        });
    }

    tracked.sort_by_key(|aircraft| aircraft.icao_address);
    tracked
}

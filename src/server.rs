use axum::extract::State;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;

use crate::board::BoardViewer;
use crate::opensky::BoundingBox;
use crate::types::{AircraftRecord, Snapshot};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub region_label: String,
}

/// Shape of the JSON read surface.
#[derive(Debug, serde::Serialize)]
struct BoardResponse {
    aircraft: Vec<AircraftRecord>,
    last_update: String,
    count: usize,
}

#[derive(Clone)]
struct AppState {
    viewer: BoardViewer,
    region: String,
    bounds: BoundingBox,
}

/// Runs the two read surfaces on a dedicated thread. They only ever hold a
/// viewer onto the snapshot store, so they are fully independent of the
/// watcher's cycle cadence.
///
/// # Panics
///
/// Will panic if the thread does not spawn successfully.
pub fn spawn(
    config: ServerConfig,
    bounds: BoundingBox,
    viewer: BoardViewer,
) -> std::thread::JoinHandle<()> {
    std::thread::Builder::new()
        .name(String::from("read-surfaces"))
        .spawn(move || serve(config, bounds, viewer))
        .expect("Failed to spawn thread")
}

fn serve(config: ServerConfig, bounds: BoundingBox, viewer: BoardViewer) {
    let port = config.port;
    let state = AppState {
        viewer,
        region: config.region_label,
        bounds,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to start server runtime: {err}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        let app = Router::new()
            .route("/", get(board_page))
            .route("/api", get(board_api))
            .with_state(state);

        let address = format!("0.0.0.0:{port}");
        let listener = match tokio::net::TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(err) => {
                // An unavailable port is the one unrecoverable startup failure.
                log::error!("Failed to bind {address}: {err}");
                std::process::exit(1);
            }
        };

        log::info!("Web server listening on http://localhost:{port}");
        log::info!("JSON surface available at http://localhost:{port}/api");

        if let Err(err) = axum::serve(listener, app).await {
            log::error!("Web server failed: {err}");
            std::process::exit(1);
        }
    });
}

async fn board_page(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.viewer.snapshot();
    Html(render_board(&snapshot, &state.region, &state.bounds))
}

async fn board_api(State(state): State<AppState>) -> Json<BoardResponse> {
    let snapshot = state.viewer.snapshot();
    Json(BoardResponse {
        count: snapshot.records.len(),
        last_update: snapshot.last_update,
        aircraft: snapshot.records,
    })
}

const PAGE_STYLE: &str = r#"
        body { font-family: 'Courier New', monospace; margin: 0; padding: 20px; background-color: #000000; color: #FFFF00; }
        h1 { color: #FFFF00; text-align: center; font-size: 2.5em; margin-bottom: 10px; text-transform: uppercase; letter-spacing: 2px; }
        .header { background-color: #1a1a1a; padding: 15px; border: 2px solid #FFFF00; margin-bottom: 20px; text-align: center; }
        table { border-collapse: collapse; width: 100%; margin-top: 20px; background-color: #000000; border: 2px solid #FFFF00; }
        th, td { border: 1px solid #FFFF00; padding: 15px; text-align: left; font-size: 0.9em; }
        th { background-color: #FFFF00; color: #000000; font-weight: bold; text-transform: uppercase; letter-spacing: 1px; }
        td { background-color: #000000; color: #FFFFFF; }
        tr:nth-child(even) td { background-color: #1a1a1a; }
        tr:hover td { background-color: #333333; }
        .no-aircraft { color: #FFFF00; font-style: italic; text-align: center; padding: 40px; font-size: 1.2em; background-color: #1a1a1a; border: 2px solid #FFFF00; margin: 20px 0; }
        .update-time { color: #FFFF00; font-size: 1em; margin: 5px 0; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 2px solid #FFFF00; color: #FFFF00; font-size: 0.9em; text-align: center; }
"#;

/// Renders the departure-board page. Columns are fixed: Registration, Owner,
/// Manufacturer, Type, Origin, Destination. The page carries an auto-refresh
/// hint so browsers pick up new cycles without scripting.
fn render_board(snapshot: &Snapshot, region: &str, bounds: &BoundingBox) -> String {
    let mut page = String::with_capacity(4096);
    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    page.push_str(&format!(
        "    <title>Aircraft Over {0}</title>\n",
        escape_html(region)
    ));
    page.push_str("    <meta http-equiv=\"refresh\" content=\"60\">\n");
    page.push_str("    <style>");
    page.push_str(PAGE_STYLE);
    page.push_str("    </style>\n</head>\n<body>\n");

    page.push_str(&format!(
        "    <h1>&#9992; DEPARTURES - {0} &#9992;</h1>\n",
        escape_html(region)
    ));

    page.push_str("    <div class=\"header\">\n");
    page.push_str(&format!(
        "        <p><strong>Coverage Area:</strong> {0} (Lat: {1}-{2}, Lon: {3} to {4})</p>\n",
        escape_html(region),
        bounds.lamin,
        bounds.lamax,
        bounds.lomin,
        bounds.lomax
    ));
    page.push_str(&format!(
        "        <p class=\"update-time\"><strong>Last Updated:</strong> {0}</p>\n",
        escape_html(&snapshot.last_update)
    ));
    page.push_str(&format!(
        "        <p class=\"update-time\"><strong>Total Aircraft:</strong> {0}</p>\n",
        snapshot.records.len()
    ));
    page.push_str("        <p><em>Page auto-refreshes every 60 seconds</em></p>\n    </div>\n");

    if snapshot.records.is_empty() {
        page.push_str(&format!(
            "    <div class=\"no-aircraft\">\n        <p>No aircraft currently detected over {0}.</p>\n    </div>\n",
            escape_html(region)
        ));
    } else {
        page.push_str("    <table>\n        <thead>\n            <tr>\n");
        for column in [
            "Registration",
            "Owner",
            "Manufacturer",
            "Aircraft Type",
            "Origin",
            "Destination",
        ] {
            page.push_str(&format!("                <th>{column}</th>\n"));
        }
        page.push_str("            </tr>\n        </thead>\n        <tbody>\n");
        for record in &snapshot.records {
            page.push_str("            <tr>\n");
            for cell in [
                &record.registration,
                &record.owner,
                &record.manufacturer,
                &record.aircraft_type,
                &record.origin,
                &record.destination,
            ] {
                page.push_str(&format!("                <td>{0}</td>\n", escape_html(cell)));
            }
            page.push_str("            </tr>\n");
        }
        page.push_str("        </tbody>\n    </table>\n");
    }

    page.push_str("    <div class=\"footer\">\n");
    page.push_str("        <p><strong>DATA SOURCES</strong></p>\n");
    page.push_str(
        "        <p>LIVE POSITIONS: OPENSKY NETWORK | AIRCRAFT DATA: ADSBDB.COM</p>\n",
    );
    page.push_str("    </div>\n</body>\n</html>\n");
    page
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(character),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_html, render_board, BoardResponse};
    use crate::opensky::BoundingBox;
    use crate::types::{AircraftRecord, Snapshot};

    fn test_bounds() -> BoundingBox {
        BoundingBox {
            lamin: 51.50,
            lomin: -0.50,
            lamax: 51.80,
            lomax: 0.20,
        }
    }

    fn test_record() -> AircraftRecord {
        AircraftRecord {
            registration: String::from("G-VROS"),
            owner: String::from("British Airways"),
            manufacturer: String::from("Boeing"),
            aircraft_type: String::from("777-236ER"),
            origin: String::from("London Heathrow Airport (EGLL)"),
            destination: String::from("Unknown"),
            last_updated: String::from("2026-08-24 10:00:00"),
        }
    }

    #[test]
    fn when_snapshot_has_records_then_page_lists_them_in_column_order() {
        let snapshot = Snapshot {
            records: vec![test_record()],
            last_update: String::from("2026-08-24 10:00:00"),
        };

        let page = render_board(&snapshot, "North London", &test_bounds());

        assert!(page.contains("<meta http-equiv=\"refresh\" content=\"60\">"));
        assert!(page.contains("Last Updated:</strong> 2026-08-24 10:00:00"));
        assert!(page.contains("Total Aircraft:</strong> 1"));

        let cells = ["G-VROS", "British Airways", "Boeing", "777-236ER", "London Heathrow Airport (EGLL)", "Unknown"];
        let mut previous_position = 0;
        for cell in cells {
            let position = page.find(cell).unwrap_or_else(|| panic!("page should contain {cell}"));
            assert!(position > previous_position, "{cell} out of column order");
            previous_position = position;
        }
    }

    #[test]
    fn when_snapshot_is_empty_then_page_shows_no_aircraft_panel() {
        let snapshot = Snapshot {
            records: Vec::new(),
            last_update: String::from("2026-08-24 10:00:00"),
        };

        let page = render_board(&snapshot, "North London", &test_bounds());

        assert!(page.contains("No aircraft currently detected over North London."));
        assert!(page.contains("Total Aircraft:</strong> 0"));
        assert!(!page.contains("<table>"));
    }

    #[test]
    fn when_record_contains_markup_then_it_is_escaped() {
        let mut record = test_record();
        record.owner = String::from("<script>alert('x')</script>");
        let snapshot = Snapshot {
            records: vec![record],
            last_update: String::from("2026-08-24 10:00:00"),
        };

        let page = render_board(&snapshot, "North London", &test_bounds());

        assert!(!page.contains("<script>alert"));
        assert!(page.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn when_serializing_board_response_then_contract_keys_are_used() {
        let response = BoardResponse {
            aircraft: vec![test_record()],
            last_update: String::from("2026-08-24 10:00:00"),
            count: 1,
        };

        let value = serde_json::to_value(&response).expect("response serializes");

        assert_eq!(value["count"], 1);
        assert_eq!(value["last_update"], "2026-08-24 10:00:00");
        let record = &value["aircraft"][0];
        assert_eq!(record["Registration"], "G-VROS");
        assert_eq!(record["Owner"], "British Airways");
        assert_eq!(record["Manufacturer"], "Boeing");
        assert_eq!(record["Type"], "777-236ER");
        assert_eq!(record["Origin"], "London Heathrow Airport (EGLL)");
        assert_eq!(record["Destination"], "Unknown");
        assert_eq!(record["LastUpdated"], "2026-08-24 10:00:00");
    }

    #[test]
    fn when_serializing_empty_board_then_aircraft_is_an_empty_array() {
        let response = BoardResponse {
            aircraft: Vec::new(),
            last_update: String::from("2026-08-24 10:00:00 (Error fetching data)"),
            count: 0,
        };

        let value = serde_json::to_value(&response).expect("response serializes");

        assert_eq!(value["aircraft"], serde_json::json!([]));
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn when_escaping_plain_text_then_it_is_unchanged() {
        assert_eq!(escape_html("G-VROS"), "G-VROS");
    }
}

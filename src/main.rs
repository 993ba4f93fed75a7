use clap::Parser;
use log::info;
use skyboard::adsbdb::AdsbdbClient;
use skyboard::board::BoardStore;
use skyboard::cli::Cli;
use skyboard::config::ApplicationConfig;
use skyboard::logging::setup_logging;
use skyboard::opensky::OpenSkyClient;
use skyboard::server;
use skyboard::thread_manager::ThreadManager;
use skyboard::watcher::SkyWatcher;

fn main() {
    let cli = Cli::parse();
    let application_config = ApplicationConfig::construct_from_path(&cli.config_file)
        .unwrap_or_else(|e| {
            log::error!("{e}");
            panic!("Config error. Exiting.")
        });

    setup_logging(cli.logging_level);
    info!("Main: Application started.");

    let opensky_client = OpenSkyClient::new(&application_config.opensky).unwrap_or_else(|e| {
        log::error!("Error constructing state feed client: {e}");
        panic!("Client error. Exiting.")
    });
    let adsbdb_client = AdsbdbClient::new(&application_config.adsbdb).unwrap_or_else(|e| {
        log::error!("Error constructing metadata client: {e}");
        panic!("Client error. Exiting.")
    });

    let board_store = BoardStore::new();
    let board_viewer = board_store.viewer();

    server::spawn(
        application_config.server,
        application_config.opensky.bounds,
        board_viewer,
    );

    let watcher = SkyWatcher::new(opensky_client, adsbdb_client, board_store);

    let mut thread_manager = ThreadManager::new();
    let watcher_task_id = thread_manager.add_task(
        watcher,
        std::time::Duration::from_secs(application_config.watcher.period_seconds),
    );

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
        thread_manager.stop_all_tasks();
    }

    thread_manager.wait_on_task_finish(watcher_task_id);

    info!("Main: Program finished.");
}

pub mod adsbdb;
pub mod board;
pub mod cli;
pub mod config;
pub mod enrich;
pub mod extractor;
pub mod logging;
pub mod opensky;
pub mod server;
pub mod thread_manager;
pub mod types;
pub mod watcher;

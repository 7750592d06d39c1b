// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod flight_log;
pub mod influx_repository;
pub mod scanner;
pub mod tracking_file;

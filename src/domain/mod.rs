// Domain layer - Core data types and geodesy math
pub mod error;
pub mod flight;
pub mod geo;
pub mod object;
pub mod telemetry;
pub mod video;

// Application layer - Engine algorithms and use-case services
pub mod flight_service;
pub mod fusion;
pub mod fusion_repository;
pub mod interpolator;
pub mod metrics;
pub mod segments;

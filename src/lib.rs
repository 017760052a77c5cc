pub mod agents;
pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod maze;

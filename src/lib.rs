pub mod advisor;
pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod model;
pub mod planner;
pub mod state;
pub mod trip;

pub mod access;
pub mod configuration;
pub mod connectors;
pub mod db;
mod helpers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod startup;
pub mod telemetry;

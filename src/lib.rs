pub mod config;
pub mod gateway;
pub mod hub;
pub mod models;
pub mod routes;
pub mod state;

pub mod app;
pub mod config;
pub mod console;
pub mod credential_gate;
pub mod device_client;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod http_client;
pub mod menu;
pub mod model;

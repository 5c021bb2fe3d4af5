// Composition root: settings, adapters, services and the HTTP surface.

pub mod config;
pub mod graphql;
pub mod http;
pub mod state;

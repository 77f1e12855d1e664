// # ddnsd
//
// HTTP daemon for the DDNS update service.
//
// This is a thin integration layer: it reads configuration, wires the
// SQLite store and the Cloudflare provider into the core reconciler, and
// exposes the result over HTTP. All registration and reconciliation logic
// lives in `ddns-core`.

pub mod api;
pub mod config;

pub use api::{AppState, build_app, serve};
pub use config::Config;

//! JSON command API
//!
//! String in, string out, so hosts without Rust bindings (game engines,
//! scripting layers, the CLI) can drive the engine.

pub mod json_api;

pub use json_api::{simulate_game_json, GameRequest, GameResponse, API_SCHEMA_VERSION};

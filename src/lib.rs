//! Blocktris (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` as
//! `blocktris::{core,engine,input,storage,term,types}` and holds the host
//! configuration used by the `blocktris` binary.

pub mod config;

pub use blocktris_core as core;
pub use blocktris_engine as engine;
pub use blocktris_input as input;
pub use blocktris_storage as storage;
pub use blocktris_term as term;
pub use blocktris_types as types;

pub use config::HostConfig;

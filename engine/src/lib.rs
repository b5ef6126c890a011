// Engine library root: indicator core, analysis pipeline, data providers,
// settings and the gRPC service.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;

pub mod analysis_export;
pub mod analysis_rankings;
pub mod cell;
pub mod config;
pub mod database;
pub mod header;
pub mod state;
pub mod timeline;

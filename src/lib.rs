pub mod analysis;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod text;

pub mod analysis;
pub mod api;
pub mod config;
pub mod display;
pub mod error;
pub mod pipeline;
pub mod preferences;
pub mod rate_limit;
pub mod snapshot;
pub mod view;

pub use error::AppError;

pub mod app;
pub mod cli;
pub mod error;
pub mod map;
pub mod store;
pub mod types;
pub mod utils;

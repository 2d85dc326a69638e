pub mod formatters;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod utils;

pub use crate::commands::giveaway::handlers::{authorize, end, host, server};

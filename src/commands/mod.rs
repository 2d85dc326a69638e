pub mod context;
pub mod giveaway;
pub mod help;

pub use crate::commands::context::{Context, UserData};

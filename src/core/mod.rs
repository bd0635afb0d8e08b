pub mod errors;
pub mod models;
pub mod utils;

pub use errors::KiokuError;
pub use models::{ ItemType, JlptLevel, SourceItem };

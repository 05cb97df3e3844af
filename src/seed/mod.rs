pub mod data;
pub mod import;

pub use data::*;
pub use import::*;

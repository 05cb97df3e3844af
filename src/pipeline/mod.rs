pub mod city_reduction;
pub mod plane_seeding;
pub mod runner;

pub use city_reduction::*;
pub use plane_seeding::*;
pub use runner::*;

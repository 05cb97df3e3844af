pub mod cargo;
pub mod city;
pub mod common;
pub mod plane;

pub use cargo::*;
pub use city::*;
pub use common::*;
pub use plane::*;

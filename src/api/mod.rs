pub mod cargo_handlers;
pub mod handlers;
pub mod routes;

pub use cargo_handlers::*;
pub use handlers::*;
pub use routes::*;

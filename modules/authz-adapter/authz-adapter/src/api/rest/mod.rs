pub mod dto;
pub mod error;
pub mod handlers;
pub mod mappers;
pub mod routes;

pub use routes::router;

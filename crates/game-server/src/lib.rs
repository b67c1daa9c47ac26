pub mod config;
pub mod db;
pub mod error;
pub mod locks;
pub mod models;
pub mod service;
pub mod store;

pub use error::AppError;
pub use service::GameService;

pub mod config;
pub mod ensure;
pub mod pin;

pub use ensure::run_ensure_collection;
pub use pin::run_pin;

pub mod client;
pub mod error;
pub mod types;

pub use client::GeocodeClient;
pub use error::GeocodeError;

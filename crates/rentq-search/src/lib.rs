pub mod client;
pub mod envelope;
pub mod error;

pub use client::MarketplaceClient;
pub use error::SearchError;

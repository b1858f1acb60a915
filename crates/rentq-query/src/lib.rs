pub mod coordinator;
pub mod error;
mod in_flight;
pub mod paginate;
pub mod ports;
pub mod state;

pub use coordinator::QueryCoordinator;
pub use error::QueryError;
pub use paginate::{page_count, paginate, PAGE_SIZE};
pub use ports::{CategorySource, LocationResolver, OfferSearch};
pub use state::{QueryState, SearchPhase, Settlement};

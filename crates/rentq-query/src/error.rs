use rentq_core::ConfigError;
use rentq_geocode::GeocodeError;
use rentq_search::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Pages are numbered from 1.
    #[error("invalid page {0}: pages start at 1")]
    InvalidPage(usize),

    /// `change_page` was called before the current search settled.
    #[error("no settled search to paginate")]
    NotSettled,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("geocode client setup failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("marketplace client setup failed: {0}")]
    Search(#[from] SearchError),
}

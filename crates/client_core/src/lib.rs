use std::sync::Arc;

use anyhow::Result;

pub mod config;
pub mod controller;
pub mod gateway;
pub mod transport;

pub use config::{load_settings, load_settings_from, ClientSettings};
pub use controller::{
    ControllerEvent, ControllerSnapshot, LoadKind, PaginationController,
    INITIAL_LOAD_FAILED_MESSAGE, PAGINATION_FAILED_MESSAGE,
};
pub use gateway::{CollectionGateway, FetchGateway};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};

/// Wires the reqwest-backed gateway for `settings` into a fresh controller.
pub fn controller_from_settings(settings: &ClientSettings) -> Result<Arc<PaginationController>> {
    let gateway = CollectionGateway::from_settings(settings)?;
    Ok(PaginationController::new(Arc::new(gateway)))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

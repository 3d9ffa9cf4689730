//! CBRates Server
//!
//! HTTP front end over the rate repository:
//!
//! - `POST /get_exchange_rates` returns a bank's rate table for today
//! - `POST /convert` converts an amount between two currencies at one bank

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;

pub use config::{ServerConfig, MAX_REQUEST_BODY_BYTES};
pub use error::ApiError;
pub use router::{create_router, AppState};

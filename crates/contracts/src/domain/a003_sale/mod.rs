pub mod aggregate;

pub use aggregate::{Sale, SaleDto, SaleId};

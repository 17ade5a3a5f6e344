//! Price history sources and completed-order stores.

mod csv_source;
mod csv_store;
mod memory_store;

pub use csv_source::CsvBarSource;
pub use csv_store::CsvOrderStore;
pub use memory_store::InMemoryOrderStore;

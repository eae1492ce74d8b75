//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod fields;
pub mod frame;
pub mod log;
pub mod table;

// Re-export main types for cleaner imports
pub use currency::{CurrencySeriesProvider, FetchError, ReportPeriod};
pub use fields::{FieldCatalog, FieldDescriptor, FieldError, RenameMap};
pub use frame::Frame;
pub use table::{ExchangeRate, RateTable, SchemaError};

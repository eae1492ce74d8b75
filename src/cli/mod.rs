pub mod fetch;
pub mod fields;
pub mod setup;
pub mod ui;

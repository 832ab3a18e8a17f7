//! Application services
//!
//! Concrete service implementations that orchestrate the selection model.
//! Services depend on I/O boundary traits (FileSystem, ScoringClient)
//! but are themselves concrete structs, not traits.

mod catalog;
mod session;

pub use catalog::CatalogService;
pub use session::SelectorSession;

//! Budget-based gift recommendations over wishlist registry items.
//!
//! [`recommend::ranking::build_recommendations`] is the pure entry point; the
//! [`server`] and the binary wrap it with item sources and output formats.

pub mod budget;
pub mod config;
pub mod error;
pub mod output;
pub mod recommend;
pub mod registry;
pub mod server;
pub mod service;

pub use budget::Budget;
pub use error::RecommendError;
pub use recommend::ranking::build_recommendations;
pub use recommend::{BudgetCategory, RecommendationReport, RecommendationResult};
pub use registry::{ItemStatus, PricedItem, RegistryItem};

//! Tree resolution: turning a computation tree into the charts that explain it.
pub mod container;
pub mod error;
pub mod family;
pub mod walker;

pub use container::VisualizationContainer;
pub use error::ResolveError;
pub use family::merge_family;
pub use walker::{resolve, Resolver};

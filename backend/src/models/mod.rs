pub mod dataset;
pub mod equipment;

pub use dataset::*;
pub use equipment::*;

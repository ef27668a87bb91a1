pub mod bounds;
pub mod fit;
pub mod mercator;

// Geomath crate: small, well-tested projection primitives only.
pub use bounds::*;
pub use fit::*;
pub use mercator::*;

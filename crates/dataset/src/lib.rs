pub mod feature;
pub mod filter;
pub mod name;
pub mod topology;

pub use feature::*;
pub use filter::*;
pub use name::*;

pub mod preprocessing;
pub mod extraction;
pub mod classification;
pub mod selection;

pub use preprocessing::*;
pub use extraction::*;
pub use classification::*;
pub use selection::*;

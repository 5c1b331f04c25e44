pub mod curriculum;
pub mod errors;

pub use curriculum::*;
pub use errors::*;

pub mod enums;
pub mod filters;
pub mod patient;

pub use enums::*;
pub use filters::*;
pub use patient::*;

pub mod loader;
pub mod urlgen;

pub use loader::*;
pub use urlgen::*;

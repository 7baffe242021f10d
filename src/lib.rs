pub mod config;
pub mod data_io;
pub mod display;
pub mod time_utils;

pub use display::{clear_display, show, CallerId, ShowContext, ShowError, ShowValue};

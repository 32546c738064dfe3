pub mod config;
pub mod error;
pub mod io;
pub mod nudge;
pub mod paths;
pub mod practice;
pub mod rep;
pub mod rollover;
pub mod roster;
pub mod stats;
pub mod types;
pub mod week;

pub use error::{CadenceError, Result};

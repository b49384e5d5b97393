//! Runtime settings read from the environment, plus shared constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;

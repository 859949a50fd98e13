pub mod data;
pub mod defaults;
pub mod io;

pub use data::{Config, GenerationParameters};
pub use io::ConfigError;

#[cfg(test)]
mod tests;

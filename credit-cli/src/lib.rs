pub mod commands;

pub use commands::{CheckReport, OptionList};

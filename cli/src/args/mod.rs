pub mod log;
pub mod output;
pub mod selection;

pub mod api;
pub mod command;
pub mod settings;
pub mod stats;

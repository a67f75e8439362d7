pub mod app;
pub mod commands;

pub use app::Invocation;

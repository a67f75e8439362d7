//! Core functionality for gdgen
//!
//! This crate holds the engine's build-time header generators, the module
//! discovery they rely on, and the debugger inspectors for the engine's
//! container types.

pub mod dispatch;
pub mod env;
pub mod error;
pub mod generators;
pub mod inspect;
pub mod modules;
pub mod output;

pub use dispatch::{ArgShape, CommandArgs, Generator, GeneratorRegistry};
pub use env::BuildEnv;
pub use error::{GenError, Result};
pub use generators::{standard_registry, standard_registry_with};

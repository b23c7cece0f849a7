//! Configuration for fen.
//!
//! - [load]: the [Config] struct, path resolution and `fen --init`.
//! - [general]: listing preferences, no-write mode and the file operation pool size.
//! - [input]: key lists per action and the editor command.

pub mod general;
pub mod input;
pub mod load;

pub use general::{General, InternalGeneral};
pub use input::{Editor, Keys};
pub use load::Config;

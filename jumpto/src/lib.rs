//! Internals of the jumpto CLI: argument parsing, the Markdown heading
//! source, and the render pipeline. Exposed so that integration tests and
//! the xtask crate can reach them.
pub mod cli;
pub mod commands;
pub mod error;
pub mod page;

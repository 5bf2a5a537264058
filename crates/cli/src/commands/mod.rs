//! Command implementations.

pub mod brand;
pub mod debug;
pub mod orders;

/// Write a command result to stdout.
#[allow(clippy::print_stdout)]
pub fn output(text: &str) {
    println!("{text}");
}

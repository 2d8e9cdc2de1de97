//! Core traits for the activation engine.

mod container;

pub use container::{Container, ContainerCore};

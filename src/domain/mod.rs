//! Domain types shared across the server.

mod cards;

pub use cards::{Card, CardSource};

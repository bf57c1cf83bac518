#![no_std]

extern crate alloc;

pub use cell::*;
pub use config::*;
pub use error::*;
pub use grid::*;
pub use layout::*;
pub use manager::*;
pub use types::*;

mod cell;
mod config;
mod error;
mod grid;
mod layout;
mod manager;
mod types;

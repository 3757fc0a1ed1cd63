#![deny(unexpected_cfgs)]
//
#![warn(clippy::cargo)]
#![warn(clippy::nursery)]
//
// https://github.com/rust-lang/rust-clippy/issues/16440
#![allow(clippy::multiple_crate_versions)]

mod error;
mod json_util;
mod validate;

pub mod collection;
pub mod config;
pub mod embed;
pub mod gateway;
pub mod preview;
pub mod session;
pub mod wire;

pub use collection::{EmbedCollection, ImportOutcome, Rerender};
pub use embed::{Author, Color, Embed, Field, Footer, Key};
pub use error::{Error, Result};
pub use wire::{from_wire, to_json, to_wire};

//! Dice notation and structured chat messages for tabletop role-playing.
//!
//! [`roll`] evaluates free text containing dice expressions. [`message`]
//! resolves an incoming chat message into [`entity::Entities`], which are
//! rendered for the chat transport and persisted as JSON.

pub mod common;
pub mod config;
pub mod entity;
mod error;
pub mod message;
pub mod parse;
pub mod roll;
pub mod systems;

pub use config::RollConfig;
pub use entity::{Entities, Entity};
pub use error::{Error, Result};
pub use message::{Resolver, RpgMessage, Snapshot};
pub use roll::{roll, roll_with, RollError, Rolled};

//! Outfit Studio: the workflow behind "photograph your wardrobe, pick a
//! style, get an outfit".
//!
//! A [`Session`] threads the session identity, workflow state and remote
//! service through three stage controllers: [`ItemCollection`],
//! [`StyleSelection`] and [`OutfitComposition`].

pub mod catalog;
pub mod collection;
pub mod composition;
pub mod config;
pub mod demo;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod session;
pub mod style;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use collection::ItemCollection;
pub use composition::OutfitComposition;
pub use error::WorkflowError;
pub use session::Session;
pub use style::StyleSelection;

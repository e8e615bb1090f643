//! Item domain - saved items and the narrow store port

mod entity;
mod repository;

pub use entity::{ItemKind, SavedItem};
pub use repository::ItemRepository;

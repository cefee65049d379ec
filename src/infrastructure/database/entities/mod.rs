//! Database entities module

pub mod collection;

pub use collection::Entity as Collection;

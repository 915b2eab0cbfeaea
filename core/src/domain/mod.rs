//! Domain layer containing business entities and value objects.

pub mod entities;
pub mod value_objects;

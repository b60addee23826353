//! Repositories - Acceso a la API REST por entidad

pub mod entity_repository;

pub use entity_repository::EntityRepository;

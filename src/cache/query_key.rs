//! Claves de consulta compuestas (`["vehicles", "ABC"]`, `["vehicle", "7"]`)

use std::fmt;

use crate::models::{EntityId, Resource};

/// Clave compuesta: nombre de la entidad más los parámetros del filtro
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Prefijo de todas las listas de una entidad
    pub fn list_root<R: Resource>() -> Self {
        Self::new(R::KIND.list_key())
    }

    pub fn list<R: Resource>(search: &str) -> Self {
        Self::list_root::<R>().with(search)
    }

    pub fn detail<R: Resource>(id: EntityId) -> Self {
        Self::new(R::KIND.path()).with(id.to_string())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// La invalidación se aplica por prefijo
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", segment)?;
        }
        write!(f, "]")
    }
}

use crate::types::Entities;

/// Annotates free text with recognized entities.
///
/// Implementations must report every [`crate::types::EntityCategory`], using an
/// empty list when nothing matched, and must not depend on the retrieval index.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Entities;
}

impl<T: EntityExtractor + ?Sized> EntityExtractor for Box<T> {
    fn extract(&self, text: &str) -> Entities {
        (**self).extract(text)
    }
}

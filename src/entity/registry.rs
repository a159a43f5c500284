//! Process-wide cache of resolved descriptors.

use super::{Entity, EntityDescriptor};
use crate::error::Result;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

static DESCRIPTORS: Lazy<RwLock<HashMap<TypeId, Arc<EntityDescriptor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the validated descriptor for `E`, resolving it on first use.
///
/// Invalid metadata is not cached, so every call for a misconfigured type
/// reports the same error.
///
/// # Errors
///
/// Returns [`OrmError::Configuration`](crate::OrmError::Configuration) when
/// the metadata of `E` is inconsistent.
pub fn resolve<E: Entity>() -> Result<Arc<EntityDescriptor>> {
    let key = TypeId::of::<E>();

    if let Some(descriptor) = DESCRIPTORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(Arc::clone(descriptor));
    }

    let descriptor = Arc::new(EntityDescriptor::from_metadata(type_name::<E>(), E::metadata())?);
    log::debug!(
        "Resolved entity {} -> table `{}` ({} columns)",
        descriptor.type_name(),
        descriptor.table(),
        descriptor.columns().len()
    );

    let mut cache = DESCRIPTORS.write().unwrap_or_else(PoisonError::into_inner);
    Ok(Arc::clone(cache.entry(key).or_insert(descriptor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityMetadata, FieldDef};
    use crate::error::OrmError;
    use crate::value::{Value, ValueKind};

    #[derive(Default)]
    struct Tag {
        id: i32,
    }

    impl Entity for Tag {
        fn metadata() -> EntityMetadata {
            EntityMetadata::new(
                Some("tags"),
                vec![FieldDef::new("id", "id", ValueKind::Integer).primary_key()],
            )
        }

        fn get_field(&self, field: &str) -> Option<Value> {
            (field == "id").then(|| Value::from(self.id))
        }

        fn set_field(&mut self, field: &str, _value: Value) -> Result<()> {
            Err(OrmError::unknown_field("Tag", field))
        }
    }

    #[derive(Default)]
    struct Orphan;

    impl Entity for Orphan {
        fn metadata() -> EntityMetadata {
            EntityMetadata::new(None, Vec::new())
        }

        fn get_field(&self, _field: &str) -> Option<Value> {
            None
        }

        fn set_field(&mut self, field: &str, _value: Value) -> Result<()> {
            Err(OrmError::unknown_field("Orphan", field))
        }
    }

    #[test]
    fn test_resolve_is_cached() {
        let first = resolve::<Tag>().unwrap();
        let second = Tag::descriptor().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.type_name().ends_with("Tag"));
    }

    #[test]
    fn test_resolve_error_repeats() {
        for _ in 0..2 {
            let err = resolve::<Orphan>().unwrap_err();
            assert!(matches!(err, OrmError::Configuration { .. }));
        }
    }
}

use crate::interface::container::Container;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::sync::{Arc, OnceLock, Weak,};


/// The single-assignment, type-checked link from a mapper to its container.
pub struct MapperBinding<T: Container> {
    expected: ContainerKind,
    owner: OnceLock<Weak<T>>,
}

impl<T: Container> MapperBinding<T> {
    pub fn new(expected: ContainerKind) -> MapperBinding<T> {
        MapperBinding {
            expected,
            owner: OnceLock::new(),
        }
    }

    pub fn bind(&self, container: Arc<dyn Container>) -> Result<(), ContainerError> {
        let actual = container.kind();
        let owner = container.into_any().downcast::<T>().map_err(|_| {
            ContainerError::MapperMismatch {
                expected: self.expected,
                actual,
            }
        })?;
        self.owner.set(Arc::downgrade(&owner)).map_err(|_| ContainerError::MapperAlreadyBound)
    }

    pub fn owner(&self) -> Option<Arc<T>> {
        self.owner.get().and_then(|owner| owner.upgrade())
    }
}

use crate::core::pipeline::Pipeline;
use crate::framework::logger::container_target;
use crate::interface::container::Container;
use crate::interface::valve::Valve;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::sync::{Arc, OnceLock, Weak,};


/// State every container shares: identity, parent link and pipeline.
pub struct ContainerBase {
    kind: ContainerKind,
    name: String,
    log_target: String,
    parent: OnceLock<Weak<dyn Container>>,
    pipeline: Pipeline,
}

impl ContainerBase {
    pub fn new(kind: ContainerKind, name: &str, basic: Arc<dyn Valve>) -> ContainerBase {
        let display_name = if name.is_empty() { "/" } else { name };
        ContainerBase {
            kind,
            name: name.to_string(),
            log_target: container_target(kind.as_str(), display_name),
            parent: OnceLock::new(),
            pipeline: Pipeline::new(basic),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn log_target(&self) -> &str {
        self.log_target.as_str()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn parent(&self) -> Option<Arc<dyn Container>> {
        self.parent.get().and_then(|parent| parent.upgrade())
    }

    pub fn set_parent(&self, parent: &Arc<dyn Container>) -> Result<(), ContainerError> {
        if parent.kind().child_kind() != Some(self.kind) {
            return Err(ContainerError::InvalidParent {
                child: self.kind,
                parent: parent.kind(),
            });
        }
        self.parent.set(Arc::downgrade(parent)).map_err(|_| {
            ContainerError::ParentAlreadySet {
                name: self.name.clone(),
            }
        })
    }
}

/// Resolves a container's parent to its concrete type.
pub fn parent_as<T: Container>(base: &ContainerBase) -> Option<Arc<T>> {
    base.parent()?.into_any().downcast::<T>().ok()
}

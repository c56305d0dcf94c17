use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use parking_lot::RwLock;

use std::sync::Arc;


pub trait Named {
    fn child_name(&self) -> &str;
}

/// The ordered, uniquely named children of one container.
///
/// Readers take a snapshot of the current table and never block each other;
/// structural changes copy the table and swap the snapshot in.
pub struct ChildTable<T: Named> {
    kind: ContainerKind,
    children: RwLock<Arc<Vec<Arc<T>>>>,
}

impl<T: Named> ChildTable<T> {
    pub fn new(kind: ContainerKind) -> ChildTable<T> {
        ChildTable {
            kind,
            children: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.children.read().clone()
    }

    pub fn find(&self, name: &str) -> Option<Arc<T>> {
        self.snapshot().iter().find(|child| child.child_name() == name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.snapshot().iter().map(|child| child.child_name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Registers `child`, running `attach` while the table is locked so a child
    /// that cannot be attached is never visible to readers.
    pub fn add<F>(&self, child: Arc<T>, attach: F) -> Result<(), ContainerError>
    where
        F: FnOnce(&Arc<T>) -> Result<(), ContainerError>,
    {
        let mut current = self.children.write();
        if current.iter().any(|existing| existing.child_name() == child.child_name()) {
            return Err(ContainerError::DuplicateChild {
                kind: self.kind,
                name: child.child_name().to_string(),
            });
        }
        attach(&child)?;
        let mut children = (**current).clone();
        children.push(child);
        *current = Arc::new(children);
        return Ok(());
    }

    pub fn remove(&self, name: &str) -> Option<Arc<T>> {
        let mut current = self.children.write();
        let position = current.iter().position(|child| child.child_name() == name)?;
        let mut children = (**current).clone();
        let removed = children.remove(position);
        *current = Arc::new(children);
        Some(removed)
    }
}

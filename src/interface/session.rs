#[cfg(test)]
use mockall::automock;

use std::sync::Arc;


#[cfg_attr(test, automock)]
pub trait Session: Send + Sync {
    fn id(&self) -> String;

    fn is_valid(&self) -> bool;

    /// Refreshes the last-access marker; expiry policy belongs to the store.
    fn access(&self);
}

#[cfg_attr(test, automock)]
pub trait SessionStore: Send + Sync {
    fn find_session(&self, id: &str) -> Option<Arc<dyn Session>>;
}

use crate::interface::filter::{Filter, Servlet,};
use crate::interface::session::SessionStore;
use crate::schema::filter::error::LoadError;

use std::sync::Arc;


/// Produces component instances from their implementation identifiers.
///
/// Every application context has its own loader; the container runtime has a
/// separate one for identifiers in its reserved namespaces.
pub trait ClassLoader: Send + Sync {
    fn name(&self) -> &str;

    fn load_filter(&self, class_name: &str) -> Result<Box<dyn Filter>, LoadError>;

    fn load_servlet(&self, class_name: &str) -> Result<Arc<dyn Servlet>, LoadError>;
}

/// Supplies the per-context collaborators needed while deploying descriptors.
pub trait DeploymentResources {
    fn application_loader(&self, host_name: &str, context_path: &str) -> Arc<dyn ClassLoader>;

    fn session_store(&self, host_name: &str, context_path: &str) -> Option<Arc<dyn SessionStore>>;
}

use crate::core::exchange::Exchange;
use crate::core::pipeline::Pipeline;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;
use crate::schema::dispatch::error::DispatchError;

use std::any::Any;
use std::sync::Arc;


/// A node of the engine → host → context → wrapper hierarchy.
pub trait Container: Any + Send + Sync {
    fn kind(&self) -> ContainerKind;

    fn name(&self) -> &str;

    fn parent(&self) -> Option<Arc<dyn Container>>;

    /// Records the owning container; a parent can be assigned only once.
    fn set_parent(&self, parent: &Arc<dyn Container>) -> Result<(), ContainerError>;

    fn child_names(&self) -> Vec<String>;

    fn pipeline(&self) -> &Pipeline;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    fn invoke(&self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        self.pipeline().invoke(exchange)
    }
}

/// Selects the next-level container for a dispatch.
///
/// A mapper is bound to exactly one container of the kind it was written for;
/// binding checks the container's concrete type rather than assuming it.
pub trait Mapper: Send + Sync {
    type Owner: Container;
    type Target: Container;

    fn bind(&self, container: Arc<dyn Container>) -> Result<(), ContainerError>;

    fn owner(&self) -> Option<Arc<Self::Owner>>;

    /// Resolves the next container; with `update` the result is recorded on
    /// the exchange and an already recorded result is returned unchanged.
    fn map(&self, exchange: &mut Exchange<'_>, update: bool) -> Option<Arc<Self::Target>>;
}

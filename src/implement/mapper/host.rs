use crate::core::exchange::Exchange;
use crate::implement::container::context::Context;
use crate::implement::container::host::Host;
use crate::implement::mapper::binding::MapperBinding;
use crate::interface::container::{Container, Mapper,};
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::sync::Arc;


/// Selects the application context for a request from its decoded URI.
pub struct HostMapper {
    binding: MapperBinding<Host>,
}

impl HostMapper {
    pub fn new() -> HostMapper {
        HostMapper {
            binding: MapperBinding::new(ContainerKind::Host),
        }
    }
}

impl Mapper for HostMapper {
    type Owner = Host;
    type Target = Context;

    fn bind(&self, container: Arc<dyn Container>) -> Result<(), ContainerError> {
        self.binding.bind(container)
    }

    fn owner(&self) -> Option<Arc<Host>> {
        self.binding.owner()
    }

    fn map(&self, exchange: &mut Exchange<'_>, update: bool) -> Option<Arc<Context>> {
        if update {
            if let Some(context) = &exchange.mapping.context {
                return Some(context.clone());
            }
        }
        let host = self.binding.owner()?;
        let request = exchange.request;
        let uri = request.as_http()?.decoded_uri();
        let context = host.map_context(uri);
        trace!(
            host,
            "HostMapper::map - {} mapped to context {:?}",
            uri,
            context.as_ref().map(|context| context.path())
        );
        if update {
            exchange.mapping.context = context.clone();
            exchange.mapping.context_path = context.as_ref().map(|context| context.path().to_string());
        }
        context
    }
}

use crate::core::children::{ChildTable, Named,};
use crate::core::pipeline::Pipeline;
use crate::framework::logger::LogTarget;
use crate::implement::container::base::{ContainerBase, parent_as,};
use crate::implement::container::context::Context;
use crate::implement::container::engine::Engine;
use crate::implement::mapper::host::HostMapper;
use crate::implement::valve::host::StandardHostValve;
use crate::interface::container::{Container, Mapper,};
use crate::interface::message::MessageSource;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use parking_lot::RwLock;

use std::any::Any;
use std::sync::{Arc, Weak,};


/// A virtual host, keyed by its lower-case server name.
pub struct Host {
    base: ContainerBase,
    aliases: RwLock<Vec<String>>,
    contexts: ChildTable<Context>,
    mapper: HostMapper,
}

impl Host {
    pub fn new(
        name: &str,
        messages: Arc<dyn MessageSource>,
    ) -> Result<Arc<Host>, ContainerError> {
        let host_name = name.to_lowercase();
        let host = Arc::new_cyclic(|weak: &Weak<Host>| {
            Host {
                base: ContainerBase::new(
                    ContainerKind::Host,
                    host_name.as_str(),
                    Arc::new(StandardHostValve::new(weak.clone(), messages)),
                ),
                aliases: RwLock::new(Vec::new()),
                contexts: ChildTable::new(ContainerKind::Context),
                mapper: HostMapper::new(),
            }
        });
        host.mapper.bind(host.clone())?;
        return Ok(host);
    }

    pub fn engine(&self) -> Option<Arc<Engine>> {
        parent_as::<Engine>(&self.base)
    }

    pub fn add_alias(&self, alias: &str) -> () {
        let alias = alias.to_lowercase();
        let mut aliases = self.aliases.write();
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }

    pub fn remove_alias(&self, alias: &str) -> () {
        let alias = alias.to_lowercase();
        self.aliases.write().retain(|existing| *existing != alias);
    }

    pub fn aliases(&self) -> Vec<String> {
        self.aliases.read().clone()
    }

    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.read().iter().any(|alias| alias == name)
    }

    pub fn add_context(self: &Arc<Self>, context: Arc<Context>) -> Result<(), ContainerError> {
        let parent: Arc<dyn Container> = self.clone();
        self.contexts.add(context, |context| context.set_parent(&parent))?;
        Ok(())
    }

    pub fn find_context(&self, path: &str) -> Option<Arc<Context>> {
        self.contexts.find(path)
    }

    pub fn remove_context(&self, path: &str) -> Option<Arc<Context>> {
        let removed = self.contexts.remove(path)?;
        removed.stop();
        Some(removed)
    }

    pub fn contexts(&self) -> Arc<Vec<Arc<Context>>> {
        self.contexts.snapshot()
    }

    /// Selects the context whose path is the longest segment-wise prefix of
    /// `uri`, falling back to the root context.
    pub fn map_context(&self, uri: &str) -> Option<Arc<Context>> {
        let contexts = self.contexts.snapshot();
        let find = |path: &str| contexts.iter().find(|context| context.path() == path).cloned();
        let mut candidate = uri;
        loop {
            if let Some(context) = find(candidate) {
                return Some(context);
            }
            match candidate.rfind('/') {
                Some(slash) => candidate = &candidate[..slash],
                None => break,
            }
        }
        find("")
    }

    pub fn mapper(&self) -> &HostMapper {
        &self.mapper
    }

    pub fn stop(&self) -> () {
        debug!(self, "Host::stop - stopping {} contexts", self.contexts.len());
        for context in self.contexts.snapshot().iter() {
            context.stop();
        }
    }
}

impl Container for Host {
    fn kind(&self) -> ContainerKind {
        self.base.kind()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn parent(&self) -> Option<Arc<dyn Container>> {
        self.base.parent()
    }

    fn set_parent(&self, parent: &Arc<dyn Container>) -> Result<(), ContainerError> {
        self.base.set_parent(parent)
    }

    fn child_names(&self) -> Vec<String> {
        self.contexts.names()
    }

    fn pipeline(&self) -> &Pipeline {
        self.base.pipeline()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl LogTarget for Host {
    fn log_target(&self) -> &str {
        self.base.log_target()
    }
}

impl Named for Host {
    fn child_name(&self) -> &str {
        self.base.name()
    }
}

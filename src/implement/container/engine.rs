use crate::core::children::ChildTable;
use crate::core::pipeline::Pipeline;
use crate::framework::logger::LogTarget;
use crate::implement::container::base::ContainerBase;
use crate::implement::container::host::Host;
use crate::implement::mapper::engine::EngineMapper;
use crate::implement::valve::engine::StandardEngineValve;
use crate::interface::container::{Container, Mapper,};
use crate::interface::message::MessageSource;
use crate::schema::config::engine::EngineConfig;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use parking_lot::RwLock;

use std::any::Any;
use std::sync::{Arc, Weak,};


/// The root of the hierarchy; every request enters through its pipeline.
pub struct Engine {
    base: ContainerBase,
    default_host: RwLock<Option<String>>,
    hosts: ChildTable<Host>,
    mapper: EngineMapper,
}

impl Engine {
    pub fn new(
        config: &EngineConfig,
        messages: Arc<dyn MessageSource>,
    ) -> Result<Arc<Engine>, ContainerError> {
        let engine = Arc::new_cyclic(|weak: &Weak<Engine>| {
            Engine {
                base: ContainerBase::new(
                    ContainerKind::Engine,
                    config.name.as_str(),
                    Arc::new(StandardEngineValve::new(weak.clone(), messages)),
                ),
                default_host: RwLock::new(config.default_host.as_ref().map(|name| name.to_lowercase())),
                hosts: ChildTable::new(ContainerKind::Host),
                mapper: EngineMapper::new(),
            }
        });
        engine.mapper.bind(engine.clone())?;
        debug!(engine, "Engine::new - created engine {}", engine.name());
        return Ok(engine);
    }

    pub fn default_host(&self) -> Option<String> {
        self.default_host.read().clone()
    }

    pub fn set_default_host(&self, name: Option<&str>) -> () {
        *self.default_host.write() = name.map(|name| name.to_lowercase());
    }

    pub fn add_host(self: &Arc<Self>, host: Arc<Host>) -> Result<(), ContainerError> {
        let parent: Arc<dyn Container> = self.clone();
        self.hosts.add(host, |host| host.set_parent(&parent))?;
        Ok(())
    }

    pub fn find_host(&self, name: &str) -> Option<Arc<Host>> {
        self.hosts.find(name)
    }

    pub fn remove_host(&self, name: &str) -> Option<Arc<Host>> {
        let removed = self.hosts.remove(name)?;
        removed.stop();
        Some(removed)
    }

    /// Hosts in registration order.
    pub fn hosts(&self) -> Arc<Vec<Arc<Host>>> {
        self.hosts.snapshot()
    }

    pub fn mapper(&self) -> &EngineMapper {
        &self.mapper
    }

    pub fn stop(&self) -> () {
        info!(self, "Engine::stop - stopping {} hosts", self.hosts.len());
        for host in self.hosts.snapshot().iter() {
            host.stop();
        }
    }
}

impl Container for Engine {
    fn kind(&self) -> ContainerKind {
        self.base.kind()
    }

    fn name(&self) -> &str {
        self.base.name()
    }

    fn parent(&self) -> Option<Arc<dyn Container>> {
        None
    }

    fn set_parent(&self, _parent: &Arc<dyn Container>) -> Result<(), ContainerError> {
        Err(ContainerError::EngineParent)
    }

    fn child_names(&self) -> Vec<String> {
        self.hosts.names()
    }

    fn pipeline(&self) -> &Pipeline {
        self.base.pipeline()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl LogTarget for Engine {
    fn log_target(&self) -> &str {
        self.base.log_target()
    }
}



#[cfg(test)]
mod tests {
    use super::*;
    use crate::implement::message::standard::StandardMessages;

    #[test]
    fn test_engine_rejects_parent() -> Result<(), ContainerError> {
        let messages = Arc::new(StandardMessages::new());
        let engine = Engine::new(&EngineConfig::new(), messages.clone())?;
        let other: Arc<dyn Container> = Engine::new(&EngineConfig::new(), messages)?;
        assert_eq!(Err(ContainerError::EngineParent), engine.set_parent(&other), "Engine accepted a parent");
        assert!(engine.parent().is_none(), "Engine reports a parent");
        Ok(())
    }

    #[test]
    fn test_default_host_is_lower_cased() -> Result<(), ContainerError> {
        let mut config = EngineConfig::new();
        config.default_host = Some(String::from("WWW.Example.COM"));
        let engine = Engine::new(&config, Arc::new(StandardMessages::new()))?;
        assert_eq!(Some(String::from("www.example.com")), engine.default_host(), "Default host not lower cased");
        Ok(())
    }

    #[test]
    fn test_host_cannot_join_two_engines() -> Result<(), ContainerError> {
        let messages = Arc::new(StandardMessages::new());
        let first = Engine::new(&EngineConfig::new(), messages.clone())?;
        let second = Engine::new(&EngineConfig::new(), messages.clone())?;
        let host = Host::new("localhost", messages)?;
        first.add_host(host.clone())?;
        assert_eq!(
            Err(ContainerError::ParentAlreadySet { name: String::from("localhost") }),
            second.add_host(host),
            "Host was attached to a second engine"
        );
        assert!(second.find_host("localhost").is_none(), "Rejected host is visible");
        assert_eq!(vec![String::from("localhost")], first.child_names(), "Host missing from first engine");
        Ok(())
    }
}

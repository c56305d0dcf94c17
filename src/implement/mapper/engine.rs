use crate::core::exchange::Exchange;
use crate::implement::container::engine::Engine;
use crate::implement::container::host::Host;
use crate::implement::mapper::binding::MapperBinding;
use crate::interface::container::{Container, Mapper,};
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::sync::Arc;


/// Selects the virtual host for a request from its server name.
pub struct EngineMapper {
    binding: MapperBinding<Engine>,
}

impl EngineMapper {
    pub fn new() -> EngineMapper {
        EngineMapper {
            binding: MapperBinding::new(ContainerKind::Engine),
        }
    }

    /// Resolves a server name: an exact host name first, then the first host
    /// in registration order with a matching alias, then the default host.
    pub fn resolve(&self, server_name: Option<&str>) -> Option<Arc<Host>> {
        let engine = self.binding.owner()?;
        let name = match server_name {
            Some(name) => name.to_lowercase(),
            None => engine.default_host()?,
        };
        resolve_host(&engine, name.as_str())
    }
}

fn resolve_host(engine: &Engine, name: &str) -> Option<Arc<Host>> {
    if let Some(host) = engine.find_host(name) {
        trace!(engine, "EngineMapper::resolve - {} matched a host name", name);
        return Some(host);
    }
    if let Some(host) = engine.hosts().iter().find(|host| host.has_alias(name)) {
        trace!(engine, "EngineMapper::resolve - {} matched an alias of {}", name, host.name());
        return Some(host.clone());
    }
    let default_host = engine.default_host()?;
    trace!(engine, "EngineMapper::resolve - {} falling back to default host {}", name, default_host);
    engine.find_host(default_host.as_str())
}

impl Mapper for EngineMapper {
    type Owner = Engine;
    type Target = Host;

    fn bind(&self, container: Arc<dyn Container>) -> Result<(), ContainerError> {
        self.binding.bind(container)
    }

    fn owner(&self) -> Option<Arc<Engine>> {
        self.binding.owner()
    }

    fn map(&self, exchange: &mut Exchange<'_>, update: bool) -> Option<Arc<Host>> {
        let engine = self.binding.owner()?;
        let name = match exchange.request.server_name() {
            Some(name) => name.to_lowercase(),
            None => {
                let default_host = engine.default_host()?;
                if update {
                    exchange.mapping.server_name = Some(default_host.clone());
                }
                default_host
            },
        };
        let host = resolve_host(&engine, name.as_str());
        if update {
            exchange.mapping.host = host.clone();
        }
        host
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::implement::message::standard::StandardMessages;
    use crate::interface::message::MessageSource;
    use crate::schema::config::engine::EngineConfig;
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::response::StandardResponse;

    fn engine_with_hosts(default_host: Option<&str>) -> Result<Arc<Engine>, ContainerError> {
        let messages: Arc<dyn MessageSource> = Arc::new(StandardMessages::new());
        let mut config = EngineConfig::new();
        config.default_host = default_host.map(|name| name.to_string());
        let engine = Engine::new(&config, messages.clone())?;
        let first = Host::new("localhost", messages.clone())?;
        first.add_alias("shared.example");
        let second = Host::new("www.example.com", messages.clone())?;
        second.add_alias("example.com");
        second.add_alias("shared.example");
        engine.add_host(first)?;
        engine.add_host(second)?;
        Ok(engine)
    }

    fn host_name(host: Option<Arc<Host>>) -> Option<String> {
        host.map(|host| host.name().to_string())
    }

    #[test]
    fn test_exact_name_ignores_case() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(Some("localhost"))?;
        assert_eq!(
            Some(String::from("www.example.com")),
            host_name(engine.mapper().resolve(Some("WWW.Example.COM"))),
            "Exact name did not resolve"
        );
        Ok(())
    }

    #[test]
    fn test_alias_resolves_in_registration_order() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(None)?;
        assert_eq!(
            Some(String::from("www.example.com")),
            host_name(engine.mapper().resolve(Some("example.com"))),
            "Alias did not resolve"
        );
        assert_eq!(
            Some(String::from("localhost")),
            host_name(engine.mapper().resolve(Some("shared.example"))),
            "Shared alias did not resolve to the first registered host"
        );
        Ok(())
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(Some("www.example.com"))?;
        assert_eq!(
            Some(String::from("www.example.com")),
            host_name(engine.mapper().resolve(Some("unknown.test"))),
            "Default host not used"
        );
        let without_default = engine_with_hosts(None)?;
        assert_eq!(None, host_name(without_default.mapper().resolve(Some("unknown.test"))), "Resolved without default");
        assert_eq!(None, host_name(without_default.mapper().resolve(None)), "Resolved absent name without default");
        let unregistered_default = engine_with_hosts(Some("missing.example"))?;
        assert_eq!(None, host_name(unregistered_default.mapper().resolve(None)), "Unregistered default host resolved");
        Ok(())
    }

    #[test]
    fn test_map_records_default_substitution() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(Some("LocalHost"))?;
        let request = StandardRequest::new(None, "/");
        let mut response = StandardResponse::new();
        let mut exchange = Exchange::new(&request, &mut response);
        let host = engine.mapper().map(&mut exchange, true);
        assert_eq!(Some(String::from("localhost")), host_name(host), "Absent name did not map to default host");
        assert_eq!(Some(String::from("localhost")), exchange.mapping.server_name, "Substitution not recorded");
        assert!(exchange.mapping.host.is_some(), "Host not recorded");
        Ok(())
    }

    #[test]
    fn test_map_without_update_leaves_mapping_untouched() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(Some("localhost"))?;
        let request = StandardRequest::new(None, "/");
        let mut response = StandardResponse::new();
        let mut exchange = Exchange::new(&request, &mut response);
        assert!(engine.mapper().map(&mut exchange, false).is_some(), "Default host not resolved");
        assert_eq!(None, exchange.mapping.server_name, "Mapping modified without update");
        assert!(exchange.mapping.host.is_none(), "Host recorded without update");
        Ok(())
    }

    #[test]
    fn test_mapper_rejects_wrong_container_and_rebinding() -> Result<(), ContainerError> {
        let engine = engine_with_hosts(None)?;
        let host: Arc<dyn Container> = Host::new("other", Arc::new(StandardMessages::new()))?;
        let mapper = EngineMapper::new();
        assert_eq!(
            Err(ContainerError::MapperMismatch { expected: ContainerKind::Engine, actual: ContainerKind::Host }),
            mapper.bind(host),
            "Engine mapper bound to a host"
        );
        assert_eq!(Err(ContainerError::MapperAlreadyBound), engine.mapper().bind(engine.clone()), "Mapper rebound");
        Ok(())
    }
}

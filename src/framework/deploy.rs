use crate::implement::container::context::{Context, ContextSettings,};
use crate::implement::container::engine::Engine;
use crate::implement::container::host::Host;
use crate::implement::container::wrapper::Wrapper;
use crate::interface::container::Container;
use crate::interface::loader::{ClassLoader, DeploymentResources,};
use crate::interface::message::MessageSource;
use crate::schema::config::descriptor::{ContextDescriptor, EngineDescriptor, HostDescriptor,};
use crate::schema::config::engine::EngineConfig;
use crate::schema::container::error::ContainerError;
use crate::schema::filter::error::{FilterError, LoadError,};

use thiserror::Error;

use std::sync::Arc;


#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Container tree could not be assembled")]
    Container(#[from] ContainerError),
    #[error("Interceptor could not be deployed")]
    Filter(#[from] FilterError),
    #[error("Handler could not be loaded")]
    Load(#[from] LoadError),
}

/// Builds a container tree from already-parsed deployment descriptors.
pub struct Deployer<'d> {
    config: &'d EngineConfig,
    resources: &'d dyn DeploymentResources,
    runtime_loader: Arc<dyn ClassLoader>,
    messages: Arc<dyn MessageSource>,
}

impl<'d> Deployer<'d> {
    pub fn new(
        config: &'d EngineConfig,
        resources: &'d dyn DeploymentResources,
        runtime_loader: Arc<dyn ClassLoader>,
        messages: Arc<dyn MessageSource>,
    ) -> Deployer<'d> {
        Deployer {
            config,
            resources,
            runtime_loader,
            messages,
        }
    }

    /// Creates an engine holding every host in the descriptor. Nothing that was
    /// started is left running when a later part of the descriptor fails.
    pub fn deploy(&self, descriptor: &EngineDescriptor) -> Result<Arc<Engine>, DeployError> {
        let engine = Engine::new(self.config, self.messages.clone())?;
        info!(engine, "Deployer::deploy - start");
        if let Err(why) = self.deploy_hosts(&engine, descriptor) {
            error!(engine, "Deployer::deploy - failed: {}", why);
            engine.stop();
            return Err(why);
        }
        info!(engine, "Deployer::deploy - finish with {} hosts", engine.hosts().len());
        return Ok(engine);
    }

    fn deploy_hosts(&self, engine: &Arc<Engine>, descriptor: &EngineDescriptor) -> Result<(), DeployError> {
        for host_descriptor in descriptor.hosts.iter() {
            let host = Host::new(host_descriptor.name.as_str(), self.messages.clone())?;
            let deployed = self.deploy_contexts(&host, host_descriptor)
                .and_then(|_| engine.add_host(host.clone()).map_err(DeployError::from));
            if let Err(why) = deployed {
                host.stop();
                return Err(why);
            }
        }
        return Ok(());
    }

    fn deploy_contexts(&self, host: &Arc<Host>, descriptor: &HostDescriptor) -> Result<(), DeployError> {
        for alias in descriptor.aliases.iter() {
            host.add_alias(alias.as_str());
        }
        for context_descriptor in descriptor.contexts.iter() {
            let context = self.create_context(host.name(), context_descriptor)?;
            let deployed = self.populate_context(&context, context_descriptor)
                .and_then(|_| host.add_context(context.clone()).map_err(DeployError::from));
            if let Err(why) = deployed {
                context.stop();
                return Err(why);
            }
        }
        return Ok(());
    }

    fn create_context(&self, host_name: &str, descriptor: &ContextDescriptor) -> Result<Arc<Context>, DeployError> {
        let path = descriptor.path.as_str();
        let mut settings = ContextSettings::from_config(
            self.config,
            self.resources.application_loader(host_name, path),
            self.runtime_loader.clone(),
            self.messages.clone(),
        );
        if let Some(swallow_output) = descriptor.swallow_output {
            settings.swallow_output = swallow_output;
        }
        let context = Context::new(path, settings)?;
        context.set_session_store(self.resources.session_store(host_name, path));
        return Ok(context);
    }

    fn populate_context(&self, context: &Arc<Context>, descriptor: &ContextDescriptor) -> Result<(), DeployError> {
        for servlet in descriptor.servlets.iter() {
            let loader = context.loader_for(servlet.servlet_class.as_str());
            let instance = loader.load_servlet(servlet.servlet_class.as_str())?;
            let wrapper = Wrapper::new(
                servlet.servlet_name.as_str(),
                servlet.servlet_class.as_str(),
                instance,
                self.messages.clone(),
            );
            context.add_wrapper(wrapper)?;
        }
        for mapping in descriptor.servlet_mappings.iter() {
            context.add_servlet_mapping(mapping.url_pattern.as_str(), mapping.servlet_name.as_str())?;
        }
        for filter in descriptor.filters.iter() {
            context.add_filter_def(filter.clone())?;
        }
        for filter_map in descriptor.filter_mappings.iter() {
            context.add_filter_map(filter_map.clone())?;
        }
        debug!(
            context,
            "Deployer::deploy_context - deployed {} handlers and {} interceptors",
            descriptor.servlets.len(),
            descriptor.filters.len()
        );
        return Ok(());
    }
}

use crate::core::exchange::Exchange;
use crate::framework::config::{Loadable, ParseError,};
use crate::framework::deploy::{DeployError, Deployer,};
use crate::implement::container::engine::Engine;
use crate::implement::loader::registry::RegistryClassLoader;
use crate::implement::message::standard::StandardMessages;
use crate::interface::container::Container;
use crate::interface::loader::{ClassLoader, DeploymentResources,};
use crate::interface::message::MessageSource;
use crate::interface::request::Request;
use crate::interface::response::Response;
use crate::schema::config::descriptor::EngineDescriptor;
use crate::schema::config::engine::EngineConfig;
use crate::schema::dispatch::error::{DispatchError, ResponseError,};

use chrono::Utc;
use http::status::StatusCode;
use thiserror::Error;

use std::path::PathBuf;
use std::sync::Arc;


#[derive(Error, Debug)]
pub enum HandleRequestError {
    #[error("No container tree has been deployed")]
    NotDeployed,
    #[error("Error while dispatching the request")]
    Dispatch(#[from] DispatchError),
    #[error("Error while writing the response")]
    Write(#[from] ResponseError),
}

/// Owns the engine configuration and the deployed container tree, and is the
/// single entry point the transport layer hands requests to.
pub struct DispatchCore {
    config: EngineConfig,
    config_file_path: Option<PathBuf>,
    messages: Arc<dyn MessageSource>,
    runtime_loader: Arc<dyn ClassLoader>,
    engine: Option<Arc<Engine>>,
}

impl DispatchCore {
    pub fn new(config: EngineConfig) -> DispatchCore {
        DispatchCore {
            config,
            config_file_path: None,
            messages: Arc::new(StandardMessages::new()),
            runtime_loader: Arc::new(RegistryClassLoader::new("runtime")),
            engine: None,
        }
    }

    pub fn with_runtime_loader(mut self, runtime_loader: Arc<dyn ClassLoader>) -> DispatchCore {
        self.runtime_loader = runtime_loader;
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageSource>) -> DispatchCore {
        self.messages = messages;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Replaces the configuration; takes effect at the next deployment.
    pub fn load_config(
        &mut self,
        file_path: PathBuf,
        server_name: Option<&str>,
    ) -> Result<(), ParseError> {
        let config = EngineConfig::load(file_path.as_path(), server_name)?;
        self.config = config;
        self.config_file_path = Some(file_path);
        return Ok(());
    }

    /// Builds a new container tree and swaps it in, stopping the previous one.
    pub fn deploy(
        &mut self,
        descriptor: &EngineDescriptor,
        resources: &dyn DeploymentResources,
    ) -> Result<Arc<Engine>, DeployError> {
        info!(self.config.name, "DispatchCore::deploy - start");
        let deployer = Deployer::new(
            &self.config,
            resources,
            self.runtime_loader.clone(),
            self.messages.clone(),
        );
        let engine = deployer.deploy(descriptor)?;
        if let Some(previous) = self.engine.replace(engine.clone()) {
            previous.stop();
        }
        info!(self.config.name, "DispatchCore::deploy - finish");
        return Ok(engine);
    }

    pub fn engine(&self) -> Option<&Arc<Engine>> {
        self.engine.as_ref()
    }

    /// Runs the request through the engine and commits whatever the handlers
    /// left buffered. Returns the final status for HTTP responses.
    pub fn handle_request(
        &self,
        request: &dyn Request,
        response: &mut dyn Response,
    ) -> Result<Option<StatusCode>, HandleRequestError> {
        let engine = self.engine.as_ref().ok_or(HandleRequestError::NotDeployed)?;
        debug!(engine, "DispatchCore::handle_request - start");
        let mut exchange = Exchange::new(request, response);
        let started = exchange.started;
        let dispatch_result = engine.invoke(&mut exchange);
        drop(exchange);
        if let Err(why) = dispatch_result {
            error!(engine, "DispatchCore::handle_request - dispatch failed: {}", why);
            return Err(HandleRequestError::Dispatch(why));
        }
        if !response.is_committed() {
            response.flush_buffer()?;
        }
        let status = response.as_http().map(|http| http.status());
        debug!(
            engine,
            "DispatchCore::handle_request - finished with {:?} after {}ms",
            status,
            (Utc::now() - started).num_milliseconds()
        );
        return Ok(status);
    }

    pub fn shutdown(&mut self) -> () {
        if let Some(engine) = self.engine.take() {
            engine.stop();
        }
    }
}

impl Drop for DispatchCore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

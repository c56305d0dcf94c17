use crate::core::children::{ChildTable, Named,};
use crate::core::exchange::ApplicationScope;
use crate::core::pipeline::Pipeline;
use crate::framework::logger::LogTarget;
use crate::implement::container::base::{parent_as, ContainerBase,};
use crate::implement::container::host::Host;
use crate::implement::container::wrapper::Wrapper;
use crate::implement::dispatch::dispatcher::RequestDispatcher;
use crate::implement::filter::config::ApplicationFilterConfig;
use crate::implement::mapper::context::ContextMapper;
use crate::implement::valve::context::StandardContextValve;
use crate::interface::container::{Container, Mapper,};
use crate::interface::loader::ClassLoader;
use crate::interface::message::MessageSource;
use crate::interface::session::SessionStore;
use crate::schema::config::engine::EngineConfig;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;
use crate::schema::filter::definition::FilterDef;
use crate::schema::filter::error::FilterError;
use crate::schema::filter::map::FilterMap;

use parking_lot::RwLock;

use std::any::Any;
use std::collections::{BTreeMap, HashMap,};
use std::sync::atomic::{AtomicBool, Ordering,};
use std::sync::{Arc, Weak,};


/// Collaborators and policy an application context is created with.
#[derive(Clone)]
pub struct ContextSettings {
    pub application_loader: Arc<dyn ClassLoader>,
    pub runtime_loader: Arc<dyn ClassLoader>,
    pub reserved_namespaces: Vec<String>,
    pub swallow_output: bool,
    pub protected_paths: Vec<String>,
    pub messages: Arc<dyn MessageSource>,
}

impl ContextSettings {
    pub fn from_config(
        config: &EngineConfig,
        application_loader: Arc<dyn ClassLoader>,
        runtime_loader: Arc<dyn ClassLoader>,
        messages: Arc<dyn MessageSource>,
    ) -> ContextSettings {
        ContextSettings {
            application_loader,
            runtime_loader,
            reserved_namespaces: config.reserved_namespaces.clone(),
            swallow_output: config.swallow_output,
            protected_paths: config.protected_paths.clone(),
            messages,
        }
    }
}

/// One web application, mounted on a host under its context path.
///
/// The root application has the empty path. Besides its handlers, a context
/// owns the servlet mappings used by its mapper, the interceptor definitions
/// and their mappings, and the collaborators the host valve binds onto each
/// exchange.
pub struct Context {
    base: ContainerBase,
    settings: ContextSettings,
    available: AtomicBool,
    session_store: RwLock<Option<Arc<dyn SessionStore>>>,
    servlet_mappings: RwLock<HashMap<String, String>>,
    filter_configs: RwLock<BTreeMap<String, Arc<ApplicationFilterConfig>>>,
    filter_maps: RwLock<Vec<FilterMap>>,
    wrappers: ChildTable<Wrapper>,
    mapper: ContextMapper,
}

impl Context {
    pub fn new(path: &str, settings: ContextSettings) -> Result<Arc<Context>, ContainerError> {
        let context_path = path.trim_end_matches('/');
        let messages = settings.messages.clone();
        let context = Arc::new_cyclic(|weak: &Weak<Context>| {
            Context {
                base: ContainerBase::new(
                    ContainerKind::Context,
                    context_path,
                    Arc::new(StandardContextValve::new(weak.clone(), messages)),
                ),
                settings,
                available: AtomicBool::new(true),
                session_store: RwLock::new(None),
                servlet_mappings: RwLock::new(HashMap::new()),
                filter_configs: RwLock::new(BTreeMap::new()),
                filter_maps: RwLock::new(Vec::new()),
                wrappers: ChildTable::new(ContainerKind::Wrapper),
                mapper: ContextMapper::new(),
            }
        });
        context.mapper.bind(context.clone())?;
        return Ok(context);
    }

    pub fn path(&self) -> &str {
        self.base.name()
    }

    pub fn host(&self) -> Option<Arc<Host>> {
        parent_as::<Host>(&self.base)
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    pub fn messages(&self) -> &Arc<dyn MessageSource> {
        &self.settings.messages
    }

    pub fn swallow_output(&self) -> bool {
        self.settings.swallow_output
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) -> () {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn session_store(&self) -> Option<Arc<dyn SessionStore>> {
        self.session_store.read().clone()
    }

    pub fn set_session_store(&self, store: Option<Arc<dyn SessionStore>>) -> () {
        *self.session_store.write() = store;
    }

    /// The loader for an implementation identifier: the runtime's own loader
    /// for identifiers in a reserved namespace, otherwise the application's.
    pub fn loader_for(&self, class_name: &str) -> Arc<dyn ClassLoader> {
        let reserved = self.settings.reserved_namespaces.iter().any(|namespace| {
            class_name.starts_with(namespace.as_str())
        });
        if reserved {
            self.settings.runtime_loader.clone()
        } else {
            self.settings.application_loader.clone()
        }
    }

    pub fn application_scope(&self) -> ApplicationScope {
        ApplicationScope {
            context_path: self.path().to_string(),
            loader: self.settings.application_loader.clone(),
        }
    }

    /// Whether a context-relative URI falls under one of the private
    /// directories, compared case-insensitively.
    pub fn is_protected(&self, relative_uri: &str) -> bool {
        let uri = relative_uri.to_uppercase();
        self.settings.protected_paths.iter().any(|protected| {
            let protected = protected.to_uppercase();
            match uri.strip_prefix(protected.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }

    pub fn add_wrapper(self: &Arc<Self>, wrapper: Arc<Wrapper>) -> Result<(), ContainerError> {
        let parent: Arc<dyn Container> = self.clone();
        self.wrappers.add(wrapper, |wrapper| wrapper.set_parent(&parent))?;
        Ok(())
    }

    pub fn find_wrapper(&self, name: &str) -> Option<Arc<Wrapper>> {
        self.wrappers.find(name)
    }

    pub fn remove_wrapper(&self, name: &str) -> Option<Arc<Wrapper>> {
        let removed = self.wrappers.remove(name)?;
        self.servlet_mappings.write().retain(|_, servlet_name| servlet_name != name);
        removed.stop();
        Some(removed)
    }

    pub fn wrappers(&self) -> Arc<Vec<Arc<Wrapper>>> {
        self.wrappers.snapshot()
    }

    /// Maps a URL pattern to a registered handler, replacing any previous
    /// mapping of the same pattern.
    pub fn add_servlet_mapping(&self, url_pattern: &str, servlet_name: &str) -> Result<(), ContainerError> {
        if !(url_pattern.starts_with('/') || url_pattern.starts_with("*.")) {
            return Err(ContainerError::InvalidPattern(url_pattern.to_string()));
        }
        if self.wrappers.find(servlet_name).is_none() {
            return Err(ContainerError::UnknownWrapper(servlet_name.to_string()));
        }
        self.servlet_mappings.write().insert(url_pattern.to_string(), servlet_name.to_string());
        debug!(self, "Context::add_servlet_mapping - mapped {} to {}", url_pattern, servlet_name);
        return Ok(());
    }

    pub fn find_servlet_mapping(&self, url_pattern: &str) -> Option<String> {
        self.servlet_mappings.read().get(url_pattern).cloned()
    }

    pub fn remove_servlet_mapping(&self, url_pattern: &str) -> Option<String> {
        self.servlet_mappings.write().remove(url_pattern)
    }

    /// Registers an interceptor definition and eagerly prepares its instance.
    ///
    /// A definition that fails to load or initialise is not registered, and
    /// any definition it would have replaced stays in place.
    pub fn add_filter_def(self: &Arc<Self>, definition: FilterDef) -> Result<(), FilterError> {
        let filter_name = definition.filter_name.clone();
        let config = Arc::new(ApplicationFilterConfig::configured(Arc::downgrade(self), definition));
        if let Err(why) = config.instance() {
            error!(self, "Context::add_filter_def - interceptor {} failed to start: {}", filter_name, why);
            return Err(why);
        }
        let previous = self.filter_configs.write().insert(filter_name.clone(), config);
        if let Some(previous) = previous {
            previous.clear();
        }
        info!(self, "Context::add_filter_def - interceptor {} is active", filter_name);
        Ok(())
    }

    pub fn find_filter_config(&self, filter_name: &str) -> Option<Arc<ApplicationFilterConfig>> {
        self.filter_configs.read().get(filter_name).cloned()
    }

    pub fn remove_filter_def(&self, filter_name: &str) -> Option<Arc<ApplicationFilterConfig>> {
        let removed = self.filter_configs.write().remove(filter_name)?;
        self.filter_maps.write().retain(|map| map.filter_name != filter_name);
        removed.clear();
        Some(removed)
    }

    pub fn add_filter_map(&self, filter_map: FilterMap) -> Result<(), FilterError> {
        if self.find_filter_config(filter_map.filter_name.as_str()).is_none() {
            return Err(FilterError::Unknown(filter_map.filter_name));
        }
        self.filter_maps.write().push(filter_map);
        Ok(())
    }

    /// Filter maps in declaration order.
    pub fn filter_maps(&self) -> Vec<FilterMap> {
        self.filter_maps.read().clone()
    }

    /// A dispatcher for a context-relative path, which must start with `/`.
    pub fn request_dispatcher(self: &Arc<Self>, path: &str) -> Option<RequestDispatcher> {
        if !path.starts_with('/') {
            warn!(self, "Context::request_dispatcher - path {} is not context relative", path);
            return None;
        }
        Some(RequestDispatcher::for_path(self.clone(), path))
    }

    pub fn named_dispatcher(self: &Arc<Self>, servlet_name: &str) -> Option<RequestDispatcher> {
        let wrapper = self.find_wrapper(servlet_name)?;
        Some(RequestDispatcher::for_wrapper(self.clone(), wrapper))
    }

    pub fn mapper(&self) -> &ContextMapper {
        &self.mapper
    }

    /// Takes the application out of service, tearing down every handler and
    /// unregistering every interceptor so none can be rebuilt afterwards.
    pub fn stop(&self) -> () {
        self.set_available(false);
        self.filter_maps.write().clear();
        let configs = std::mem::take(&mut *self.filter_configs.write());
        for config in configs.values() {
            config.clear();
        }
        for wrapper in self.wrappers.snapshot().iter() {
            wrapper.stop();
        }
        info!(self, "Context::stop - stopped {} interceptors and {} handlers", configs.len(), self.wrappers.len());
    }
}

impl Container for Context {
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
        self.wrappers.names()
    }

    fn pipeline(&self) -> &Pipeline {
        self.base.pipeline()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl LogTarget for Context {
    fn log_target(&self) -> &str {
        self.base.log_target()
    }
}

impl Named for Context {
    fn child_name(&self) -> &str {
        self.base.name()
    }
}


#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::implement::loader::registry::RegistryClassLoader;
    use crate::implement::message::standard::StandardMessages;
    use crate::interface::filter::test_utils::NamedServlet;


    pub fn test_settings() -> ContextSettings {
        test_settings_with(Arc::new(RegistryClassLoader::new("application")))
    }

    pub fn test_settings_with(application_loader: Arc<dyn ClassLoader>) -> ContextSettings {
        ContextSettings::from_config(
            &EngineConfig::new(),
            application_loader,
            Arc::new(RegistryClassLoader::new("runtime")),
            Arc::new(StandardMessages::new()),
        )
    }

    pub fn blank_context(path: &str) -> Result<Arc<Context>, ContainerError> {
        Context::new(path, test_settings())
    }

    /// A context with one `NamedServlet` per name, each mapped by `mappings`.
    pub fn context_with_servlets(
        path: &str,
        mappings: &[(&str, &str)],
    ) -> Result<Arc<Context>, ContainerError> {
        let context = blank_context(path)?;
        for (url_pattern, servlet_name) in mappings {
            if context.find_wrapper(servlet_name).is_none() {
                let wrapper = Wrapper::new(
                    servlet_name,
                    "test::NamedServlet",
                    Arc::new(NamedServlet::new(servlet_name)),
                    context.messages().clone(),
                );
                context.add_wrapper(wrapper)?;
            }
            context.add_servlet_mapping(url_pattern, servlet_name)?;
        }
        Ok(context)
    }
}

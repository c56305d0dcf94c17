use crate::implement::container::context::Context;
use crate::interface::filter::Filter;
use crate::schema::filter::definition::FilterDef;
use crate::schema::filter::error::FilterError;

use parking_lot::{Mutex, RwLock,};

use std::io::{self, Write,};
use std::sync::{Arc, Weak,};


enum FilterState {
    Unbound,
    Configured(FilterDef),
    Active(FilterDef, Arc<dyn Filter>),
}

/// The configuration of one interceptor within an application context,
/// owning at most one live instance of it.
///
/// The instance is constructed and initialised at most once per definition;
/// concurrent callers wait for the first construction to finish and then
/// share its instance. A failed construction caches nothing, so the next
/// caller tries again.
pub struct ApplicationFilterConfig {
    context: Weak<Context>,
    state: RwLock<FilterState>,
}

impl ApplicationFilterConfig {
    pub fn new(context: Weak<Context>) -> ApplicationFilterConfig {
        ApplicationFilterConfig {
            context,
            state: RwLock::new(FilterState::Unbound),
        }
    }

    /// A config holding a definition whose instance is built on first use.
    pub fn configured(context: Weak<Context>, definition: FilterDef) -> ApplicationFilterConfig {
        ApplicationFilterConfig {
            context,
            state: RwLock::new(FilterState::Configured(definition)),
        }
    }

    pub fn filter_name(&self) -> Option<String> {
        self.definition().map(|definition| definition.filter_name)
    }

    pub fn init_parameter(&self, name: &str) -> Option<String> {
        self.definition().and_then(|definition| definition.init_params.get(name).cloned())
    }

    pub fn definition(&self) -> Option<FilterDef> {
        match &*self.state.read() {
            FilterState::Unbound => None,
            FilterState::Configured(definition) => Some(definition.clone()),
            FilterState::Active(definition, _) => Some(definition.clone()),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(&*self.state.read(), FilterState::Active(_, _))
    }

    /// Replaces the definition, tearing down any live instance first. A new
    /// definition is constructed and initialised straight away.
    pub fn set_definition(&self, definition: Option<FilterDef>) -> Result<(), FilterError> {
        let mut state = self.state.write();
        if let FilterState::Active(definition, filter) = &*state {
            self.release(definition, filter);
        }
        match definition {
            Some(definition) => {
                *state = FilterState::Configured(definition);
                self.activate(&mut state).map(|_| ())
            },
            None => {
                *state = FilterState::Unbound;
                Ok(())
            },
        }
    }

    /// Drops the definition and tears down any live instance; the config
    /// builds nothing afterwards.
    pub fn clear(&self) -> () {
        let mut state = self.state.write();
        if let FilterState::Active(definition, filter) = &*state {
            self.release(definition, filter);
        }
        *state = FilterState::Unbound;
    }

    /// The live instance, constructing and initialising it on first use.
    pub fn instance(&self) -> Result<Arc<dyn Filter>, FilterError> {
        if let FilterState::Active(_, filter) = &*self.state.read() {
            return Ok(filter.clone());
        }
        let mut state = self.state.write();
        self.activate(&mut state)
    }

    fn release(&self, definition: &FilterDef, filter: &Arc<dyn Filter>) -> () {
        if let Some(context) = self.context.upgrade() {
            debug!(context, "ApplicationFilterConfig::release - destroying {}", definition.filter_name);
        }
        filter.destroy();
    }

    fn activate(&self, state: &mut FilterState) -> Result<Arc<dyn Filter>, FilterError> {
        let definition = match state {
            FilterState::Unbound => return Err(FilterError::Unconfigured),
            FilterState::Active(_, filter) => return Ok(filter.clone()),
            FilterState::Configured(definition) => definition.clone(),
        };
        let context = self.context.upgrade().ok_or_else(|| {
            FilterError::ContextReleased(definition.filter_name.clone())
        })?;
        let loader = context.loader_for(definition.filter_class.as_str());
        debug!(
            context,
            "ApplicationFilterConfig::instance - loading {} as {} through {}",
            definition.filter_name,
            definition.filter_class,
            loader.name()
        );
        let filter: Arc<dyn Filter> = Arc::from(loader.load_filter(definition.filter_class.as_str())?);
        let captured = Mutex::new(Vec::new());
        let outcome = {
            let view = FilterConfigView {
                definition: &definition,
                context: &context,
                captured: if context.swallow_output() { Some(&captured) } else { None },
            };
            filter.init(&view)
        };
        if let Some(output) = drain_console(&captured) {
            for line in output.lines() {
                info!(context, "{}", line);
            }
        }
        outcome?;
        *state = FilterState::Active(definition, filter.clone());
        Ok(filter)
    }
}

/// Everything an interceptor can see of its configuration while initialising.
pub struct FilterConfigView<'a> {
    definition: &'a FilterDef,
    context: &'a Arc<Context>,
    captured: Option<&'a Mutex<Vec<u8>>>,
}

impl<'a> FilterConfigView<'a> {
    pub fn filter_name(&self) -> &'a str {
        self.definition.filter_name.as_str()
    }

    pub fn init_parameter(&self, name: &str) -> Option<&'a str> {
        self.definition.init_params.get(name).map(|value| value.as_str())
    }

    pub fn init_parameter_names(&self) -> Vec<&'a str> {
        self.definition.init_params.keys().map(|name| name.as_str()).collect()
    }

    pub fn context(&self) -> &'a Arc<Context> {
        self.context
    }

    /// Where console output written during initialisation goes: standard
    /// output, or the context's log when output capture is enabled.
    pub fn console(&self) -> ConsoleWriter<'a> {
        ConsoleWriter {
            captured: self.captured,
        }
    }
}

pub struct ConsoleWriter<'a> {
    captured: Option<&'a Mutex<Vec<u8>>>,
}

impl Write for ConsoleWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.captured {
            Some(buffer) => {
                buffer.lock().extend_from_slice(buf);
                Ok(buf.len())
            },
            None => io::stdout().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.captured {
            Some(_) => Ok(()),
            None => io::stdout().flush(),
        }
    }
}

fn drain_console(captured: &Mutex<Vec<u8>>) -> Option<String> {
    let bytes = std::mem::take(&mut *captured.lock());
    if bytes.is_empty() {
        return None;
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

use crate::core::children::Named;
use crate::core::pipeline::Pipeline;
use crate::framework::logger::LogTarget;
use crate::implement::container::base::{parent_as, ContainerBase,};
use crate::implement::container::context::Context;
use crate::implement::valve::wrapper::StandardWrapperValve;
use crate::interface::container::Container;
use crate::interface::filter::Servlet;
use crate::interface::message::MessageSource;
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering,};
use std::sync::{Arc, Weak,};


/// The leaf container holding one handler instance.
pub struct Wrapper {
    base: ContainerBase,
    class_name: String,
    servlet: Arc<dyn Servlet>,
    available: AtomicBool,
}

impl Wrapper {
    pub fn new(
        name: &str,
        class_name: &str,
        servlet: Arc<dyn Servlet>,
        messages: Arc<dyn MessageSource>,
    ) -> Arc<Wrapper> {
        Arc::new_cyclic(|weak: &Weak<Wrapper>| {
            Wrapper {
                base: ContainerBase::new(
                    ContainerKind::Wrapper,
                    name,
                    Arc::new(StandardWrapperValve::new(weak.clone(), messages)),
                ),
                class_name: class_name.to_string(),
                servlet,
                available: AtomicBool::new(true),
            }
        })
    }

    pub fn class_name(&self) -> &str {
        self.class_name.as_str()
    }

    pub fn servlet(&self) -> &Arc<dyn Servlet> {
        &self.servlet
    }

    pub fn context(&self) -> Option<Arc<Context>> {
        parent_as::<Context>(&self.base)
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    pub fn set_available(&self, available: bool) -> () {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Takes the handler out of service; its teardown runs at most once.
    pub fn stop(&self) -> () {
        if self.available.swap(false, Ordering::SeqCst) {
            debug!(self, "Wrapper::stop - destroying handler {}", self.class_name);
            self.servlet.destroy();
        }
    }
}

impl Container for Wrapper {
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
        Vec::new()
    }

    fn pipeline(&self) -> &Pipeline {
        self.base.pipeline()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl LogTarget for Wrapper {
    fn log_target(&self) -> &str {
        self.base.log_target()
    }
}

impl Named for Wrapper {
    fn child_name(&self) -> &str {
        self.base.name()
    }
}

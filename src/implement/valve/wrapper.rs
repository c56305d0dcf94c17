use crate::core::exchange::Exchange;
use crate::core::pipeline::ValveContext;
use crate::implement::container::wrapper::Wrapper;
use crate::implement::filter::chain::FilterChain;
use crate::implement::filter::factory::matching_filters;
use crate::interface::container::Container;
use crate::interface::filter::Filter;
use crate::interface::message::{MessageKey, MessageSource,};
use crate::interface::valve::Valve;
use crate::schema::dispatch::error::DispatchError;

use http::status::StatusCode;

use std::sync::{Arc, Weak,};


/// Tail of the wrapper pipeline: runs the matching interceptors around the
/// handler.
pub struct StandardWrapperValve {
    wrapper: Weak<Wrapper>,
    messages: Arc<dyn MessageSource>,
}

impl StandardWrapperValve {
    pub fn new(wrapper: Weak<Wrapper>, messages: Arc<dyn MessageSource>) -> StandardWrapperValve {
        StandardWrapperValve { wrapper, messages }
    }

    fn fail(&self, wrapper: &Wrapper, exchange: &mut Exchange<'_>, why: &DispatchError) -> Result<(), DispatchError> {
        error!(wrapper, "StandardWrapperValve::invoke - handler {} failed: {}", wrapper.name(), why);
        if exchange.response.is_committed() {
            return Ok(());
        }
        let message = self.messages.message(MessageKey::HandlerFailed, wrapper.name());
        exchange.send_error(StatusCode::INTERNAL_SERVER_ERROR, message.as_str())
    }
}

impl Valve for StandardWrapperValve {
    fn name(&self) -> &str {
        "StandardWrapperValve"
    }

    fn invoke(&self, exchange: &mut Exchange<'_>, _next: ValveContext<'_>) -> Result<(), DispatchError> {
        let wrapper = match self.wrapper.upgrade() {
            Some(wrapper) => wrapper,
            None => return Ok(()),
        };
        if !wrapper.is_available() {
            let message = self.messages.message(MessageKey::WrapperUnavailable, wrapper.name());
            return exchange.send_error(StatusCode::SERVICE_UNAVAILABLE, message.as_str());
        }
        let filters: Vec<Arc<dyn Filter>> = match wrapper.context() {
            Some(context) => {
                let request_path = exchange.mapping.request_path();
                match matching_filters(&context, wrapper.name(), request_path.as_deref()) {
                    Ok(filters) => filters,
                    Err(why) => return self.fail(&wrapper, exchange, &DispatchError::Filter(why)),
                }
            },
            None => Vec::new(),
        };
        trace!(
            wrapper,
            "StandardWrapperValve::invoke - running {} interceptors around {}",
            filters.len(),
            wrapper.name()
        );
        let chain = FilterChain::new(filters.as_slice(), wrapper.servlet().as_ref());
        match chain.do_filter(exchange) {
            Ok(()) => Ok(()),
            Err(why) => self.fail(&wrapper, exchange, &why),
        }
    }
}

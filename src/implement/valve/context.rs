use crate::core::exchange::Exchange;
use crate::core::pipeline::ValveContext;
use crate::implement::container::context::Context;
use crate::interface::container::{Container, Mapper,};
use crate::interface::message::{MessageKey, MessageSource,};
use crate::interface::valve::Valve;
use crate::schema::dispatch::error::DispatchError;

use http::status::StatusCode;

use std::sync::{Arc, Weak,};


/// Tail of the context pipeline: guards private paths and availability,
/// selects the handler and hands over to it.
pub struct StandardContextValve {
    context: Weak<Context>,
    messages: Arc<dyn MessageSource>,
}

impl StandardContextValve {
    pub fn new(context: Weak<Context>, messages: Arc<dyn MessageSource>) -> StandardContextValve {
        StandardContextValve { context, messages }
    }
}

impl Valve for StandardContextValve {
    fn name(&self) -> &str {
        "StandardContextValve"
    }

    fn invoke(&self, exchange: &mut Exchange<'_>, _next: ValveContext<'_>) -> Result<(), DispatchError> {
        if !exchange.is_http() {
            return Ok(());
        }
        let context = match self.context.upgrade() {
            Some(context) => context,
            None => return Ok(()),
        };
        let request = exchange.request;
        let uri = request.as_http().map(|http| http.decoded_uri()).unwrap_or("");
        let relative_uri = uri.strip_prefix(context.path()).unwrap_or(uri);
        if context.is_protected(relative_uri) {
            let message = self.messages.message(MessageKey::ProtectedPath, uri);
            warn!(context, "StandardContextValve::invoke - {}", message);
            return exchange.send_error(StatusCode::NOT_FOUND, message.as_str());
        }
        if !context.is_available() {
            let message = self.messages.message(MessageKey::ContextUnavailable, context.path());
            return exchange.send_error(StatusCode::SERVICE_UNAVAILABLE, message.as_str());
        }
        let wrapper = match context.mapper().map(exchange, true) {
            Some(wrapper) => wrapper,
            None => {
                let message = self.messages.message(MessageKey::NoWrapper, uri);
                debug!(context, "StandardContextValve::invoke - {}", message);
                return exchange.send_error(StatusCode::NOT_FOUND, message.as_str());
            },
        };
        trace!(context, "StandardContextValve::invoke - handing over to handler {}", wrapper.name());
        wrapper.invoke(exchange)
    }
}

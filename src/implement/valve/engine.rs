use crate::core::exchange::Exchange;
use crate::core::pipeline::ValveContext;
use crate::implement::container::engine::Engine;
use crate::interface::container::{Container, Mapper,};
use crate::interface::message::{MessageKey, MessageSource,};
use crate::interface::request::HTTP_1_1;
use crate::interface::valve::Valve;
use crate::schema::dispatch::error::DispatchError;

use http::status::StatusCode;

use std::sync::{Arc, Weak,};


/// Tail of the engine pipeline: selects the virtual host and hands over to it.
pub struct StandardEngineValve {
    engine: Weak<Engine>,
    messages: Arc<dyn MessageSource>,
}

impl StandardEngineValve {
    pub fn new(engine: Weak<Engine>, messages: Arc<dyn MessageSource>) -> StandardEngineValve {
        StandardEngineValve { engine, messages }
    }
}

impl Valve for StandardEngineValve {
    fn name(&self) -> &str {
        "StandardEngineValve"
    }

    fn invoke(&self, exchange: &mut Exchange<'_>, _next: ValveContext<'_>) -> Result<(), DispatchError> {
        if !exchange.is_http() {
            return Ok(());
        }
        let engine = match self.engine.upgrade() {
            Some(engine) => engine,
            None => return Ok(()),
        };
        let request = exchange.request;
        debug!(
            engine,
            "StandardEngineValve::invoke - worker {} dispatching {:?} for {:?}",
            thread_id::get(),
            exchange.decoded_uri(),
            request.server_name()
        );
        if request.protocol() == HTTP_1_1 && request.server_name().is_none() {
            let message = self.messages.message(MessageKey::NoHostHeader, "");
            warn!(engine, "StandardEngineValve::invoke - {}", message);
            return exchange.send_error(StatusCode::BAD_REQUEST, message.as_str());
        }
        let host = match engine.mapper().map(exchange, true) {
            Some(host) => host,
            None => {
                let server_name = exchange.server_name().unwrap_or("").to_string();
                let message = self.messages.message(MessageKey::NoHost, server_name.as_str());
                warn!(engine, "StandardEngineValve::invoke - {}", message);
                return exchange.send_error(StatusCode::BAD_REQUEST, message.as_str());
            },
        };
        host.invoke(exchange)
    }
}

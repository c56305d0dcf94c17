use crate::core::exchange::Exchange;
use crate::core::pipeline::ValveContext;
use crate::implement::container::context::Context;
use crate::implement::container::host::Host;
use crate::interface::container::{Container, Mapper,};
use crate::interface::message::{MessageKey, MessageSource,};
use crate::interface::valve::Valve;
use crate::schema::dispatch::error::DispatchError;

use http::status::StatusCode;

use std::sync::{Arc, Weak,};


/// Tail of the host pipeline: selects the application context, binds its
/// scope onto the exchange and hands over to it.
pub struct StandardHostValve {
    host: Weak<Host>,
    messages: Arc<dyn MessageSource>,
}

impl StandardHostValve {
    pub fn new(host: Weak<Host>, messages: Arc<dyn MessageSource>) -> StandardHostValve {
        StandardHostValve { host, messages }
    }
}

/// Marks the requested session as accessed, when it exists and is still valid.
fn touch_session(context: &Context, session_id: &str) -> () {
    let store = match context.session_store() {
        Some(store) => store,
        None => return,
    };
    match store.find_session(session_id) {
        Some(session) if session.is_valid() => session.access(),
        Some(_) => trace!(context, "StandardHostValve::invoke - session {} has expired", session_id),
        None => trace!(context, "StandardHostValve::invoke - session {} not found", session_id),
    }
}

impl Valve for StandardHostValve {
    fn name(&self) -> &str {
        "StandardHostValve"
    }

    fn invoke(&self, exchange: &mut Exchange<'_>, _next: ValveContext<'_>) -> Result<(), DispatchError> {
        if !exchange.is_http() {
            return Ok(());
        }
        let host = match self.host.upgrade() {
            Some(host) => host,
            None => return Ok(()),
        };
        let context = match host.mapper().map(exchange, true) {
            Some(context) => context,
            None => {
                let uri = exchange.decoded_uri().unwrap_or("").to_string();
                let message = self.messages.message(MessageKey::NoContext, uri.as_str());
                error!(host, "StandardHostValve::invoke - {}", message);
                return exchange.send_error(StatusCode::INTERNAL_SERVER_ERROR, message.as_str());
            },
        };
        exchange.scope = Some(context.application_scope());
        let request = exchange.request;
        if let Some(session_id) = request.as_http().and_then(|http| http.requested_session_id()) {
            touch_session(&context, session_id);
        }
        trace!(host, "StandardHostValve::invoke - handing over to context {}", context.name());
        context.invoke(exchange)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::implement::container::context::test_utils::blank_context;
    use crate::interface::session::{MockSession, MockSessionStore, Session,};

    use std::error::Error;

    fn context_with_session(valid: bool, accesses: usize) -> Result<Arc<Context>, Box<dyn Error>> {
        let mut store = MockSessionStore::new();
        store.expect_find_session()
            .withf(|id: &str| id == "abc123")
            .times(1)
            .returning(move |_| {
                let mut session = MockSession::new();
                session.expect_is_valid().times(1).return_const(valid);
                session.expect_access().times(accesses).return_const(());
                Some(Arc::new(session) as Arc<dyn Session>)
            });
        let context = blank_context("/shop")?;
        context.set_session_store(Some(Arc::new(store)));
        Ok(context)
    }

    #[test]
    fn test_valid_session_is_accessed() -> Result<(), Box<dyn Error>> {
        let context = context_with_session(true, 1)?;
        touch_session(&context, "abc123");
        Ok(())
    }

    #[test]
    fn test_invalid_session_is_left_alone() -> Result<(), Box<dyn Error>> {
        let context = context_with_session(false, 0)?;
        touch_session(&context, "abc123");
        Ok(())
    }

    #[test]
    fn test_missing_session_is_left_alone() -> Result<(), Box<dyn Error>> {
        let mut store = MockSessionStore::new();
        store.expect_find_session().times(1).returning(|_| None);
        let context = blank_context("/shop")?;
        context.set_session_store(Some(Arc::new(store)));
        touch_session(&context, "abc123");
        Ok(())
    }

    #[test]
    fn test_no_store_is_a_no_op() -> Result<(), Box<dyn Error>> {
        let context = blank_context("/shop")?;
        touch_session(&context, "abc123");
        assert!(context.session_store().is_none(), "Blank context unexpectedly has a store");
        Ok(())
    }
}

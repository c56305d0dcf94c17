use crate::interface::message::{MessageKey, MessageSource,};


/// English messages for the error responses the valves send.
pub struct StandardMessages { }

impl StandardMessages {
    pub fn new() -> StandardMessages {
        StandardMessages { }
    }
}

impl MessageSource for StandardMessages {
    fn message(&self, key: MessageKey, detail: &str) -> String {
        match key {
            MessageKey::NoHostHeader => String::from("HTTP/1.1 request without a Host header"),
            MessageKey::NoHost => format!("No virtual host matches server name {}", detail),
            MessageKey::NoContext => format!("No application is configured to process {}", detail),
            MessageKey::NoWrapper => format!("No handler is mapped to {}", detail),
            MessageKey::ProtectedPath => format!("Access to {} is not permitted", detail),
            MessageKey::ContextUnavailable => format!("Application {} is currently unavailable", detail),
            MessageKey::WrapperUnavailable => format!("Handler {} is currently unavailable", detail),
            MessageKey::HandlerFailed => format!("Handler {} failed to process the request", detail),
        }
    }
}

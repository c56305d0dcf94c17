use crate::interface::request::{HttpRequest, Request, HTTP_1_1,};

use http::Method;
use parking_lot::RwLock;
use serde_json::Value;

use std::collections::BTreeMap;


/// A request as handed over by the transport layer.
#[derive(Debug)]
pub struct StandardRequest {
    pub method: Method,
    pub protocol: String,
    pub server_name: Option<String>,
    pub uri: String,
    pub query_string: Option<String>,
    pub session_id: Option<String>,
    attributes: RwLock<BTreeMap<String, Value>>,
}

impl StandardRequest {
    pub fn new(server_name: Option<&str>, uri: &str) -> StandardRequest {
        StandardRequest {
            method: Method::GET,
            protocol: String::from(HTTP_1_1),
            server_name: server_name.map(|name| name.to_string()),
            uri: uri.to_string(),
            query_string: None,
            session_id: None,
            attributes: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_protocol(mut self, protocol: &str) -> StandardRequest {
        self.protocol = protocol.to_string();
        self
    }

    pub fn with_query_string(mut self, query_string: &str) -> StandardRequest {
        self.query_string = Some(query_string.to_string());
        self
    }

    pub fn with_session_id(mut self, session_id: &str) -> StandardRequest {
        self.session_id = Some(session_id.to_string());
        self
    }
}

impl Request for StandardRequest {
    fn protocol(&self) -> &str {
        self.protocol.as_str()
    }

    fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.read().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: Value) -> () {
        self.attributes.write().insert(name.to_string(), value);
    }

    fn remove_attribute(&self, name: &str) -> () {
        self.attributes.write().remove(name);
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.read().keys().cloned().collect()
    }

    fn as_http(&self) -> Option<&dyn HttpRequest> {
        Some(self)
    }
}

impl HttpRequest for StandardRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn decoded_uri(&self) -> &str {
        self.uri.as_str()
    }

    fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    fn requested_session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

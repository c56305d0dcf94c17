use http::Method;
use serde_json::Value;

use std::vec::Vec;


pub const HTTP_1_1: &str = "HTTP/1.1";

/// The protocol-independent view of an inbound request.
///
/// Attribute access takes `&self`: an attribute namespace is shared by every
/// stage of a dispatch, so implementations provide their own synchronisation.
pub trait Request {
    fn protocol(&self) -> &str;

    fn server_name(&self) -> Option<&str>;

    fn attribute(&self, name: &str) -> Option<Value>;

    fn set_attribute(&self, name: &str, value: Value) -> ();

    fn remove_attribute(&self, name: &str) -> ();

    fn attribute_names(&self) -> Vec<String>;

    /// The HTTP capability of this request, when it has one.
    fn as_http(&self) -> Option<&dyn HttpRequest>;
}

/// Additional capability exposed by requests that arrived over HTTP.
pub trait HttpRequest {
    fn method(&self) -> &Method;

    /// Request URI with percent-encoding already decoded, without the query string.
    fn decoded_uri(&self) -> &str;

    fn query_string(&self) -> Option<&str>;

    fn requested_session_id(&self) -> Option<&str>;
}

impl<T: Request + ?Sized> Request for &T {
    fn protocol(&self) -> &str { (**self).protocol() }

    fn server_name(&self) -> Option<&str> { (**self).server_name() }

    fn attribute(&self, name: &str) -> Option<Value> { (**self).attribute(name) }

    fn set_attribute(&self, name: &str, value: Value) -> () { (**self).set_attribute(name, value) }

    fn remove_attribute(&self, name: &str) -> () { (**self).remove_attribute(name) }

    fn attribute_names(&self) -> Vec<String> { (**self).attribute_names() }

    fn as_http(&self) -> Option<&dyn HttpRequest> { (**self).as_http() }
}

impl<T: Request + ?Sized> Request for Box<T> {
    fn protocol(&self) -> &str { (**self).protocol() }

    fn server_name(&self) -> Option<&str> { (**self).server_name() }

    fn attribute(&self, name: &str) -> Option<Value> { (**self).attribute(name) }

    fn set_attribute(&self, name: &str, value: Value) -> () { (**self).set_attribute(name, value) }

    fn remove_attribute(&self, name: &str) -> () { (**self).remove_attribute(name) }

    fn attribute_names(&self) -> Vec<String> { (**self).attribute_names() }

    fn as_http(&self) -> Option<&dyn HttpRequest> { (**self).as_http() }
}

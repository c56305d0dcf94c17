use crate::interface::request::{HttpRequest, Request,};
use crate::schema::dispatch::attribute::is_reserved;

use http::Method;
use parking_lot::Mutex;
use serde_json::Value;

use std::collections::BTreeMap;


static DEFAULT_METHOD: Method = Method::GET;

/// A request as seen by one nested dispatch.
///
/// Holds a private copy of the wrapped request's attributes, taken when it is
/// wrapped. Writes go to both the copy and the wrapped request, except for the
/// reserved include attributes, which only this dispatch sees. A forwarded
/// dispatch can also present a different URI and query string.
pub struct ScopedRequest<R: Request> {
    inner: R,
    attributes: Mutex<BTreeMap<String, Value>>,
    http: Option<HttpView>,
}

struct HttpView {
    method: Method,
    uri: String,
    query_string: Option<String>,
    session_id: Option<String>,
}

impl<R: Request> ScopedRequest<R> {
    pub fn new(inner: R) -> ScopedRequest<R> {
        let scoped = ScopedRequest {
            http: http_view(&inner),
            inner,
            attributes: Mutex::new(BTreeMap::new()),
        };
        scoped.reseed();
        scoped
    }

    /// Presents `uri` and `query_string` in place of the wrapped request's.
    pub fn with_path(mut self, uri: &str, query_string: Option<&str>) -> ScopedRequest<R> {
        if let Some(http) = &mut self.http {
            http.uri = uri.to_string();
            http.query_string = query_string.map(|query| query.to_string());
        }
        self
    }

    /// Swaps the wrapped request, discarding the private attribute copy and
    /// taking a fresh one from the new request.
    pub fn set_request(&mut self, inner: R) -> () {
        self.http = http_view(&inner);
        self.inner = inner;
        self.reseed();
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn reseed(&self) -> () {
        let mut attributes = self.attributes.lock();
        attributes.clear();
        for name in self.inner.attribute_names() {
            if let Some(value) = self.inner.attribute(name.as_str()) {
                attributes.insert(name, value);
            }
        }
    }
}

fn http_view<R: Request>(request: &R) -> Option<HttpView> {
    request.as_http().map(|http| {
        HttpView {
            method: http.method().clone(),
            uri: http.decoded_uri().to_string(),
            query_string: http.query_string().map(|query| query.to_string()),
            session_id: http.requested_session_id().map(|id| id.to_string()),
        }
    })
}

impl<R: Request> Request for ScopedRequest<R> {
    fn protocol(&self) -> &str {
        self.inner.protocol()
    }

    fn server_name(&self) -> Option<&str> {
        self.inner.server_name()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.lock().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: Value) -> () {
        let mut attributes = self.attributes.lock();
        attributes.insert(name.to_string(), value.clone());
        if !is_reserved(name) {
            self.inner.set_attribute(name, value);
        }
    }

    fn remove_attribute(&self, name: &str) -> () {
        let mut attributes = self.attributes.lock();
        attributes.remove(name);
        if !is_reserved(name) {
            self.inner.remove_attribute(name);
        }
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.lock().keys().cloned().collect()
    }

    fn as_http(&self) -> Option<&dyn HttpRequest> {
        match self.http {
            Some(_) => Some(self),
            None => None,
        }
    }
}

impl<R: Request> HttpRequest for ScopedRequest<R> {
    fn method(&self) -> &Method {
        match &self.http {
            Some(http) => &http.method,
            None => &DEFAULT_METHOD,
        }
    }

    fn decoded_uri(&self) -> &str {
        self.http.as_ref().map(|http| http.uri.as_str()).unwrap_or("")
    }

    fn query_string(&self) -> Option<&str> {
        self.http.as_ref().and_then(|http| http.query_string.as_deref())
    }

    fn requested_session_id(&self) -> Option<&str> {
        self.http.as_ref().and_then(|http| http.session_id.as_deref())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::dispatch::attribute::INCLUDE_REQUEST_URI;
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::request::test_utils::OpaqueRequest;

    use serde_json::json;

    #[test]
    fn test_wrap_copies_existing_attributes() {
        let request = StandardRequest::new(Some("localhost"), "/shop/cart");
        request.set_attribute("cart.size", json!(2));
        let scoped = ScopedRequest::new(&request);
        assert_eq!(Some(json!(2)), scoped.attribute("cart.size"), "Existing attribute not copied");
        request.set_attribute("late", json!(true));
        assert_eq!(None, scoped.attribute("late"), "Attribute set after wrapping leaked into the copy");
    }

    #[test]
    fn test_writes_propagate_except_reserved() {
        let request = StandardRequest::new(Some("localhost"), "/shop/cart");
        let scoped = ScopedRequest::new(&request);
        scoped.set_attribute("user", json!("alice"));
        scoped.set_attribute(INCLUDE_REQUEST_URI, json!("/shop/header"));
        assert_eq!(Some(json!("alice")), request.attribute("user"), "Attribute not propagated");
        assert_eq!(None, request.attribute(INCLUDE_REQUEST_URI), "Reserved attribute propagated");
        assert_eq!(Some(json!("/shop/header")), scoped.attribute(INCLUDE_REQUEST_URI), "Reserved attribute lost");
        scoped.remove_attribute("user");
        assert_eq!(None, request.attribute("user"), "Removal not propagated");
        assert_eq!(vec![String::from(INCLUDE_REQUEST_URI)], scoped.attribute_names(), "Incorrect attribute names");
    }

    #[test]
    fn test_rewrap_reseeds_attributes() {
        let first = StandardRequest::new(Some("localhost"), "/first");
        first.set_attribute("origin", json!("first"));
        let second = StandardRequest::new(Some("localhost"), "/second");
        second.set_attribute("other", json!(1));
        let mut scoped = ScopedRequest::new(&first);
        scoped.set_attribute(INCLUDE_REQUEST_URI, json!("/first"));
        scoped.set_request(&second);
        assert_eq!(vec![String::from("other")], scoped.attribute_names(), "Private copy not rebuilt");
        assert_eq!(Some("/second"), scoped.as_http().map(|http| http.decoded_uri()), "URI not taken from new request");
    }

    #[test]
    fn test_forward_path_override() {
        let request = StandardRequest::new(Some("localhost"), "/shop/cart").with_query_string("item=1");
        let scoped = ScopedRequest::new(&request).with_path("/shop/checkout", None);
        let http = scoped.as_http();
        assert_eq!(Some("/shop/checkout"), http.map(|http| http.decoded_uri()), "URI not overridden");
        assert_eq!(None, http.and_then(|http| http.query_string()), "Query string not overridden");
        assert_eq!("/shop/cart", request.uri, "Wrapped request modified");
    }

    #[test]
    fn test_non_http_request_stays_non_http() {
        let request = OpaqueRequest::new();
        let scoped = ScopedRequest::new(&request);
        assert!(scoped.as_http().is_none(), "Non-HTTP request gained HTTP capability");
    }
}

use crate::core::exchange::Exchange;
use crate::implement::container::context::Context;
use crate::implement::container::wrapper::Wrapper;
use crate::implement::dispatch::request::ScopedRequest;
use crate::implement::dispatch::response::ScopedResponse;
use crate::interface::container::Container;
use crate::interface::request::Request;
use crate::schema::dispatch::attribute::IncludeAttribute;
use crate::schema::dispatch::error::{DispatchError, ResponseError,};
use crate::schema::dispatch::mapping::MappingData;

use http::status::StatusCode;
use serde_json::json;

use std::sync::Arc;


enum DispatchTarget {
    Path {
        path: String,
        query_string: Option<String>,
    },
    Named(Arc<Wrapper>),
}

/// Runs another handler of the same application within the current dispatch,
/// either including its output or forwarding the whole response to it.
///
/// Nested dispatches call the handler directly; interceptors only run for the
/// request as it arrived from the client.
pub struct RequestDispatcher {
    context: Arc<Context>,
    target: DispatchTarget,
}

impl RequestDispatcher {
    /// A dispatcher for a context-relative path, which may carry a query string.
    pub fn for_path(context: Arc<Context>, path: &str) -> RequestDispatcher {
        let (path, query_string) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (path, None),
        };
        RequestDispatcher {
            context,
            target: DispatchTarget::Path {
                path: path.to_string(),
                query_string,
            },
        }
    }

    pub fn for_wrapper(context: Arc<Context>, wrapper: Arc<Wrapper>) -> RequestDispatcher {
        RequestDispatcher {
            context,
            target: DispatchTarget::Named(wrapper),
        }
    }

    fn describe(&self) -> String {
        match &self.target {
            DispatchTarget::Path { path, .. } => format!("{}{}", self.context.path(), path),
            DispatchTarget::Named(wrapper) => wrapper.name().to_string(),
        }
    }

    /// The handler to run and the mapping the nested dispatch sees.
    fn resolve(&self, outer: &MappingData) -> Result<(Arc<Wrapper>, MappingData), DispatchError> {
        let mut mapping = outer.clone();
        mapping.context = Some(self.context.clone());
        mapping.context_path = Some(self.context.path().to_string());
        match &self.target {
            DispatchTarget::Path { path, .. } => {
                let found = self.context.mapper().map_relative(path.as_str()).ok_or_else(|| {
                    DispatchError::Status {
                        path: self.describe(),
                        status: StatusCode::NOT_FOUND,
                    }
                })?;
                mapping.wrapper = Some(found.wrapper.clone());
                mapping.servlet_path = Some(found.servlet_path);
                mapping.path_info = found.path_info;
                Ok((found.wrapper, mapping))
            },
            DispatchTarget::Named(wrapper) => {
                mapping.wrapper = Some(wrapper.clone());
                Ok((wrapper.clone(), mapping))
            },
        }
    }

    fn service(&self, wrapper: &Wrapper, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        if !wrapper.is_available() {
            return Err(DispatchError::Status {
                path: self.describe(),
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        wrapper.servlet().service(exchange)
    }

    /// Runs the target with its output appended to the current response.
    ///
    /// The target sees the include attributes describing its own path, while
    /// the outer request keeps its view, and it cannot change the outer
    /// response's status or headers.
    pub fn include(&self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        debug!(self.context, "RequestDispatcher::include - including {}", self.describe());
        let (wrapper, mapping) = self.resolve(&exchange.mapping)?;
        let request = ScopedRequest::new(exchange.request);
        if let DispatchTarget::Path { path, query_string } = &self.target {
            set_include_attributes(&request, self.context.path(), path.as_str(), &mapping, query_string.as_deref());
        }
        let scope = exchange.scope.clone();
        let mut response = ScopedResponse::new(&mut *exchange.response, true);
        let mut nested = Exchange::new(&request, &mut response);
        nested.mapping = mapping;
        nested.scope = scope;
        self.service(&wrapper, &mut nested)
    }

    /// Hands the whole response over to the target, which then sees the
    /// target path as the request URI. Fails once the response is committed;
    /// otherwise anything already buffered is discarded first and the response
    /// is committed when the target returns.
    pub fn forward(&self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        debug!(self.context, "RequestDispatcher::forward - forwarding to {}", self.describe());
        if exchange.response.is_committed() {
            return Err(DispatchError::Response(ResponseError::Committed));
        }
        exchange.response.reset()?;
        let (wrapper, mapping) = self.resolve(&exchange.mapping)?;
        let request = match &self.target {
            DispatchTarget::Path { path, query_string } => {
                let uri = format!("{}{}", self.context.path(), path);
                ScopedRequest::new(exchange.request).with_path(uri.as_str(), query_string.as_deref())
            },
            DispatchTarget::Named(_) => ScopedRequest::new(exchange.request),
        };
        let scope = exchange.scope.clone();
        {
            let mut nested = Exchange::new(&request, &mut *exchange.response);
            nested.mapping = mapping;
            nested.scope = scope;
            self.service(&wrapper, &mut nested)?;
        }
        exchange.response.flush_buffer()?;
        Ok(())
    }
}

fn set_include_attributes<R: Request>(
    request: &ScopedRequest<R>,
    context_path: &str,
    path: &str,
    mapping: &MappingData,
    query_string: Option<&str>,
) -> () {
    request.set_attribute(IncludeAttribute::RequestUri.name(), json!(format!("{}{}", context_path, path)));
    request.set_attribute(IncludeAttribute::ContextPath.name(), json!(context_path));
    if let Some(servlet_path) = &mapping.servlet_path {
        request.set_attribute(IncludeAttribute::ServletPath.name(), json!(servlet_path));
    }
    if let Some(path_info) = &mapping.path_info {
        request.set_attribute(IncludeAttribute::PathInfo.name(), json!(path_info));
    }
    if let Some(query_string) = query_string {
        request.set_attribute(IncludeAttribute::QueryString.name(), json!(query_string));
    }
}

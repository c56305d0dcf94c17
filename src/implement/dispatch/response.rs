use crate::interface::response::{HttpResponse, Response,};
use crate::schema::dispatch::error::ResponseError;

use http::header::{HeaderMap, HeaderName, HeaderValue,};
use http::status::StatusCode;
use mime::Mime;


/// A response as seen by one nested dispatch.
///
/// While `included`, the nested handler may add to the body but cannot change
/// what the outer dispatch has already decided: resetting is a no-op unless
/// the response is committed, and status, error, header, content type and
/// content length changes are dropped.
pub struct ScopedResponse<S: Response> {
    inner: S,
    included: bool,
    no_headers: HeaderMap,
}

impl<S: Response> ScopedResponse<S> {
    pub fn new(inner: S, included: bool) -> ScopedResponse<S> {
        ScopedResponse {
            inner,
            included,
            no_headers: HeaderMap::new(),
        }
    }

    pub fn is_included(&self) -> bool {
        self.included
    }

    pub fn set_included(&mut self, included: bool) -> () {
        self.included = included;
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Response> Response for ScopedResponse<S> {
    fn is_committed(&self) -> bool {
        self.inner.is_committed()
    }

    fn reset(&mut self) -> Result<(), ResponseError> {
        if self.included && !self.inner.is_committed() {
            return Ok(());
        }
        self.inner.reset()
    }

    fn content_type(&self) -> Option<&Mime> {
        self.inner.content_type()
    }

    fn set_content_type(&mut self, content_type: Mime) -> () {
        if !self.included {
            self.inner.set_content_type(content_type);
        }
    }

    fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    fn set_content_length(&mut self, length: u64) -> () {
        if !self.included {
            self.inner.set_content_length(length);
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResponseError> {
        self.inner.write(bytes)
    }

    fn flush_buffer(&mut self) -> Result<(), ResponseError> {
        self.inner.flush_buffer()
    }

    fn as_http(&self) -> Option<&dyn HttpResponse> {
        match self.inner.as_http() {
            Some(_) => Some(self),
            None => None,
        }
    }

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpResponse> {
        if self.inner.as_http().is_none() {
            return None;
        }
        Some(self)
    }
}

impl<S: Response> HttpResponse for ScopedResponse<S> {
    fn status(&self) -> StatusCode {
        self.inner.as_http().map(|http| http.status()).unwrap_or(StatusCode::OK)
    }

    fn set_status(&mut self, status: StatusCode) -> () {
        if self.included {
            return;
        }
        if let Some(http) = self.inner.as_http_mut() {
            http.set_status(status);
        }
    }

    fn send_error(&mut self, status: StatusCode, message: Option<&str>) -> Result<(), ResponseError> {
        if self.included {
            return Ok(());
        }
        match self.inner.as_http_mut() {
            Some(http) => http.send_error(status, message),
            None => Ok(()),
        }
    }

    fn headers(&self) -> &HeaderMap {
        match self.inner.as_http() {
            Some(http) => http.headers(),
            None => &self.no_headers,
        }
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> () {
        if self.included {
            return;
        }
        if let Some(http) = self.inner.as_http_mut() {
            http.set_header(name, value);
        }
    }
}

use crate::schema::dispatch::error::ResponseError;

use http::header::{HeaderMap, HeaderName, HeaderValue,};
use http::status::StatusCode;
use mime::Mime;


/// The protocol-independent view of an outbound response.
pub trait Response {
    fn is_committed(&self) -> bool;

    /// Clears status, headers and buffered body; fails once the response is committed.
    fn reset(&mut self) -> Result<(), ResponseError>;

    fn content_type(&self) -> Option<&Mime>;

    fn set_content_type(&mut self, content_type: Mime) -> ();

    fn content_length(&self) -> Option<u64>;

    fn set_content_length(&mut self, length: u64) -> ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResponseError>;

    /// Sends whatever is buffered, which commits the response.
    fn flush_buffer(&mut self) -> Result<(), ResponseError>;

    fn as_http(&self) -> Option<&dyn HttpResponse>;

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpResponse>;
}

/// Additional capability exposed by responses going back over HTTP.
pub trait HttpResponse {
    fn status(&self) -> StatusCode;

    fn set_status(&mut self, status: StatusCode) -> ();

    fn send_error(&mut self, status: StatusCode, message: Option<&str>) -> Result<(), ResponseError>;

    fn headers(&self) -> &HeaderMap;

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> ();
}

impl<T: Response + ?Sized> Response for &mut T {
    fn is_committed(&self) -> bool { (**self).is_committed() }

    fn reset(&mut self) -> Result<(), ResponseError> { (**self).reset() }

    fn content_type(&self) -> Option<&Mime> { (**self).content_type() }

    fn set_content_type(&mut self, content_type: Mime) -> () { (**self).set_content_type(content_type) }

    fn content_length(&self) -> Option<u64> { (**self).content_length() }

    fn set_content_length(&mut self, length: u64) -> () { (**self).set_content_length(length) }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResponseError> { (**self).write(bytes) }

    fn flush_buffer(&mut self) -> Result<(), ResponseError> { (**self).flush_buffer() }

    fn as_http(&self) -> Option<&dyn HttpResponse> { (**self).as_http() }

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpResponse> { (**self).as_http_mut() }
}

use crate::interface::response::{HttpResponse, Response,};
use crate::schema::dispatch::error::ResponseError;

use http::header::{HeaderMap, HeaderName, HeaderValue,};
use http::status::StatusCode;
use mime::Mime;


/// A buffered response as handed over by the transport layer.
#[derive(Debug)]
pub struct StandardResponse {
    pub status_code: StatusCode,
    pub http_headers: HeaderMap,
    pub error_message: Option<String>,
    pub body: Vec<u8>,
    content_type: Option<Mime>,
    content_length: Option<u64>,
    committed: bool,
    error: bool,
}

impl StandardResponse {
    pub fn new() -> StandardResponse {
        StandardResponse {
            status_code: StatusCode::OK,
            http_headers: HeaderMap::new(),
            error_message: None,
            body: Vec::new(),
            content_type: None,
            content_length: None,
            committed: false,
            error: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn body_as_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for StandardResponse {
    fn default() -> Self {
        StandardResponse::new()
    }
}

impl Response for StandardResponse {
    fn is_committed(&self) -> bool {
        self.committed
    }

    fn reset(&mut self) -> Result<(), ResponseError> {
        if self.committed {
            return Err(ResponseError::Committed);
        }
        self.status_code = StatusCode::OK;
        self.http_headers.clear();
        self.error_message = None;
        self.body.clear();
        self.content_type = None;
        self.content_length = None;
        self.error = false;
        return Ok(());
    }

    fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    fn set_content_type(&mut self, content_type: Mime) -> () {
        if !self.committed {
            self.content_type = Some(content_type);
        }
    }

    fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    fn set_content_length(&mut self, length: u64) -> () {
        if !self.committed {
            self.content_length = Some(length);
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ResponseError> {
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<(), ResponseError> {
        self.committed = true;
        Ok(())
    }

    fn as_http(&self) -> Option<&dyn HttpResponse> {
        Some(self)
    }

    fn as_http_mut(&mut self) -> Option<&mut dyn HttpResponse> {
        Some(self)
    }
}

impl HttpResponse for StandardResponse {
    fn status(&self) -> StatusCode {
        self.status_code
    }

    fn set_status(&mut self, status: StatusCode) -> () {
        if !self.committed {
            self.status_code = status;
        }
    }

    fn send_error(&mut self, status: StatusCode, message: Option<&str>) -> Result<(), ResponseError> {
        if self.committed {
            return Err(ResponseError::Committed);
        }
        self.status_code = status;
        self.error_message = message.map(|text| text.to_string());
        self.body.clear();
        self.error = true;
        return Ok(());
    }

    fn headers(&self) -> &HeaderMap {
        &self.http_headers
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> () {
        if !self.committed {
            self.http_headers.insert(name, value);
        }
    }
}

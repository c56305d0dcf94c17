use crate::interface::loader::ClassLoader;
use crate::interface::request::Request;
use crate::interface::response::Response;
use crate::schema::dispatch::error::DispatchError;
use crate::schema::dispatch::mapping::MappingData;

use chrono::{DateTime, Utc,};
use http::status::StatusCode;

use std::sync::Arc;


/// The application a dispatch is currently running on behalf of.
///
/// Bound by the host valve once the context is known and carried explicitly
/// with the exchange, so a reused worker never inherits a previous dispatch's
/// application.
#[derive(Clone)]
pub struct ApplicationScope {
    pub context_path: String,
    pub loader: Arc<dyn ClassLoader>,
}

impl std::fmt::Debug for ApplicationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationScope")
            .field("context_path", &self.context_path)
            .field("loader", &self.loader.name())
            .finish()
    }
}

/// Everything one dispatch carries through the valve pipelines.
pub struct Exchange<'x> {
    pub request: &'x dyn Request,
    pub response: &'x mut dyn Response,
    pub mapping: MappingData,
    pub scope: Option<ApplicationScope>,
    pub started: DateTime<Utc>,
}

impl<'x> Exchange<'x> {
    pub fn new(request: &'x dyn Request, response: &'x mut dyn Response) -> Exchange<'x> {
        Exchange {
            request,
            response,
            mapping: MappingData::new(),
            scope: None,
            started: Utc::now(),
        }
    }

    /// Whether both sides of the exchange expose the HTTP capability.
    pub fn is_http(&self) -> bool {
        self.request.as_http().is_some() && self.response.as_http().is_some()
    }

    /// The server name used for host mapping, including any default substitution.
    pub fn server_name(&self) -> Option<&str> {
        match &self.mapping.server_name {
            Some(name) => Some(name.as_str()),
            None => self.request.server_name(),
        }
    }

    pub fn decoded_uri(&self) -> Option<&str> {
        self.request.as_http().map(|http| http.decoded_uri())
    }

    /// Sends an error status back over HTTP; a non-HTTP response is left alone.
    pub fn send_error(&mut self, status: StatusCode, message: &str) -> Result<(), DispatchError> {
        if let Some(http) = self.response.as_http_mut() {
            http.send_error(status, Some(message))?;
        }
        Ok(())
    }
}

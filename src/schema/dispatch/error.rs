use crate::schema::filter::error::FilterError;

use http::status::StatusCode;
use thiserror::Error;


#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("Response has already been committed")]
    Committed,
    #[error("IO error while writing the response")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Error while writing the response")]
    Response(#[from] ResponseError),
    #[error("Interceptor could not be prepared")]
    Filter(#[from] FilterError),
    #[error("Handler {name} failed: {reason}")]
    Handler {
        name: String,
        reason: String,
    },
    #[error("Dispatch to {path} failed with status {status}")]
    Status {
        path: String,
        status: StatusCode,
    },
}

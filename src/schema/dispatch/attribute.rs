use const_format::concatcp;
use enum_iterator::IntoEnumIterator;


pub const INCLUDE_ATTRIBUTE_PREFIX: &str = "container_dispatch.include.";

pub const INCLUDE_REQUEST_URI: &str = concatcp!(INCLUDE_ATTRIBUTE_PREFIX, "request_uri");
pub const INCLUDE_CONTEXT_PATH: &str = concatcp!(INCLUDE_ATTRIBUTE_PREFIX, "context_path");
pub const INCLUDE_SERVLET_PATH: &str = concatcp!(INCLUDE_ATTRIBUTE_PREFIX, "servlet_path");
pub const INCLUDE_PATH_INFO: &str = concatcp!(INCLUDE_ATTRIBUTE_PREFIX, "path_info");
pub const INCLUDE_QUERY_STRING: &str = concatcp!(INCLUDE_ATTRIBUTE_PREFIX, "query_string");

/// Request attributes that describe one dispatch's view of the request.
///
/// An included handler sees its own values for these while the outer dispatch
/// keeps its own, so they are never written through to a wrapped request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoEnumIterator)]
pub enum IncludeAttribute {
    RequestUri,
    ContextPath,
    ServletPath,
    PathInfo,
    QueryString,
}

impl IncludeAttribute {
    pub fn name(&self) -> &'static str {
        match self {
            IncludeAttribute::RequestUri => INCLUDE_REQUEST_URI,
            IncludeAttribute::ContextPath => INCLUDE_CONTEXT_PATH,
            IncludeAttribute::ServletPath => INCLUDE_SERVLET_PATH,
            IncludeAttribute::PathInfo => INCLUDE_PATH_INFO,
            IncludeAttribute::QueryString => INCLUDE_QUERY_STRING,
        }
    }

    pub fn from_name(name: &str) -> Option<IncludeAttribute> {
        IncludeAttribute::into_enum_iter().find(|attribute| attribute.name() == name)
    }
}

pub fn is_reserved(name: &str) -> bool {
    IncludeAttribute::from_name(name).is_some()
}

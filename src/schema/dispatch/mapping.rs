use crate::implement::container::context::Context;
use crate::implement::container::host::Host;
use crate::implement::container::wrapper::Wrapper;
use crate::interface::container::Container;

use std::sync::Arc;


/// The resolution results accumulated while a request descends the hierarchy.
///
/// Each mapper writes its level into this record when it runs in binding mode,
/// and a populated level short-circuits a repeated mapping of the same dispatch.
#[derive(Clone, Default)]
pub struct MappingData {
    pub server_name: Option<String>,
    pub host: Option<Arc<Host>>,
    pub context: Option<Arc<Context>>,
    pub context_path: Option<String>,
    pub wrapper: Option<Arc<Wrapper>>,
    pub servlet_path: Option<String>,
    pub path_info: Option<String>,
}

impl MappingData {
    pub fn new() -> MappingData {
        MappingData::default()
    }

    /// Forgets everything below the host level.
    pub fn clear_context(&mut self) -> () {
        self.context = None;
        self.context_path = None;
        self.clear_wrapper();
    }

    pub fn clear_wrapper(&mut self) -> () {
        self.wrapper = None;
        self.servlet_path = None;
        self.path_info = None;
    }

    /// The context-relative path the handler was selected for.
    pub fn request_path(&self) -> Option<String> {
        match (&self.servlet_path, &self.path_info) {
            (Some(servlet_path), Some(path_info)) => Some(format!("{}{}", servlet_path, path_info)),
            (Some(servlet_path), None) => Some(servlet_path.clone()),
            (None, Some(path_info)) => Some(path_info.clone()),
            (None, None) => None,
        }
    }
}

impl std::fmt::Debug for MappingData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingData")
            .field("server_name", &self.server_name)
            .field("host", &self.host.as_ref().map(|host| host.name().to_string()))
            .field("context_path", &self.context_path)
            .field("wrapper", &self.wrapper.as_ref().map(|wrapper| wrapper.name().to_string()))
            .field("servlet_path", &self.servlet_path)
            .field("path_info", &self.path_info)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_joins_servlet_path_and_path_info() {
        let mut mapping = MappingData::new();
        mapping.servlet_path = Some(String::from("/images"));
        mapping.path_info = Some(String::from("/logo.png"));
        assert_eq!(Some(String::from("/images/logo.png")), mapping.request_path(), "Incorrect request path");
        mapping.clear_wrapper();
        assert_eq!(None, mapping.request_path(), "Cleared mapping still has a request path");
    }
}

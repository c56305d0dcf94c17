pub const DEFAULT_ENGINE_NAME: &str = "dispatch";
pub const DEFAULT_HOST_NAME: &str = "localhost";
pub const RUNTIME_NAMESPACE: &str = "container_dispatch::";


#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub name: String,
    pub default_host: Option<String>,
    pub reserved_namespaces: Vec<String>,
    pub swallow_output: bool,
    pub protected_paths: Vec<String>,
}

impl EngineConfig {
    pub fn new() -> EngineConfig {
        EngineConfig {
            name: String::from(DEFAULT_ENGINE_NAME),
            default_host: Some(String::from(DEFAULT_HOST_NAME)),
            reserved_namespaces: vec![String::from(RUNTIME_NAMESPACE)],
            swallow_output: false,
            protected_paths: vec![String::from("/WEB-INF"), String::from("/META-INF")],
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::new()
    }
}

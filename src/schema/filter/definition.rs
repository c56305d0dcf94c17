use serde::Deserialize;

use std::collections::BTreeMap;


/// Configuration of one interceptor as declared for an application context.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilterDef {
    pub filter_name: String,
    pub filter_class: String,
    #[serde(default)]
    pub init_params: BTreeMap<String, String>,
}

impl FilterDef {
    pub fn new(filter_name: &str, filter_class: &str) -> FilterDef {
        FilterDef {
            filter_name: filter_name.to_string(),
            filter_class: filter_class.to_string(),
            init_params: BTreeMap::new(),
        }
    }

    pub fn with_init_param(mut self, name: &str, value: &str) -> FilterDef {
        self.init_params.insert(name.to_string(), value.to_string());
        self
    }
}

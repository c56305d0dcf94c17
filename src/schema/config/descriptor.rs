use crate::schema::filter::definition::FilterDef;
use crate::schema::filter::map::FilterMap;

use serde::Deserialize;


/// The already-parsed container tree handed over by a configuration source.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EngineDescriptor {
    #[serde(default)]
    pub hosts: Vec<HostDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HostDescriptor {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub contexts: Vec<ContextDescriptor>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ContextDescriptor {
    pub path: String,
    #[serde(default)]
    pub swallow_output: Option<bool>,
    #[serde(default)]
    pub servlets: Vec<ServletDescriptor>,
    #[serde(default)]
    pub servlet_mappings: Vec<ServletMapping>,
    #[serde(default)]
    pub filters: Vec<FilterDef>,
    #[serde(default)]
    pub filter_mappings: Vec<FilterMap>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServletDescriptor {
    pub servlet_name: String,
    pub servlet_class: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServletMapping {
    pub url_pattern: String,
    pub servlet_name: String,
}

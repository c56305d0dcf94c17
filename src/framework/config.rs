use crate::schema::config::engine::EngineConfig;

use configparser::ini::Ini;
use thiserror::Error;

use std::path::Path;


pub trait Loadable {
    fn load(
        path: &Path,
        server_name: Option<&str>,
    ) -> Result<EngineConfig, ParseError>;
}

impl Loadable for EngineConfig {
    fn load(
        path: &Path,
        server_name: Option<&str>,
    ) -> Result<EngineConfig, ParseError> {
        let mut ini = Ini::new();
        ini.load(path)?;
        return parse(&ini, server_name);
    }
}

fn parse(
    ini: &Ini,
    server_name: Option<&str>,
) -> Result<EngineConfig, ParseError> {
    let mut config = EngineConfig::new();
    if let Some(name) = server_name {
        config.default_host = Some(name.to_lowercase());
    }
    for section_name in &(ini.sections()) {
        match section_name.to_lowercase().as_str() {
            "engine" => {
                parse_engine(ini, section_name, &mut config)?;
            },
            _ => {
                return Err(ParseError {
                    reason: format!("Unknown section {}", section_name),
                });
            },
        };
    }
    return Ok(config);
}

fn parse_engine(ini: &Ini, section_name: &String, config: &mut EngineConfig) -> Result<(), ParseError> {
    let section = section_name.as_str();
    if let Some(name) = ini.get(section, "name") {
        config.name = name;
    }
    if let Some(default_host) = ini.get(section, "default_host") {
        config.default_host = Some(default_host.to_lowercase());
    }
    if let Some(swallow_output) = ini.getbool(section, "swallow_output")? {
        config.swallow_output = swallow_output;
    }
    if let Some(namespaces) = ini.get(section, "reserved_namespaces") {
        config.reserved_namespaces = split_list(namespaces.as_str());
    }
    if let Some(paths) = ini.get(section, "protected_paths") {
        let protected_paths = split_list(paths.as_str());
        if let Some(invalid) = protected_paths.iter().find(|path| !path.starts_with('/')) {
            return Err(ParseError {
                reason: format!("Protected path {} does not start with /", invalid),
            });
        }
        config.protected_paths = protected_paths;
    }
    return Ok(());
}

fn split_list(value: &str) -> Vec<String> {
    value.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

#[derive(Error, Debug)]
#[error("Engine config parsing failed: {reason}")]
pub struct ParseError {
    reason: String,
}

impl From<String> for ParseError {
    fn from(reason: String) -> Self {
        return ParseError { reason };
    }
}

use serde::Deserialize;


/// Associates an interceptor with the requests it applies to.
///
/// A map applies when any of its URL patterns matches the context-relative
/// request path, or when any of its servlet names is the selected handler.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FilterMap {
    pub filter_name: String,
    #[serde(default)]
    pub url_patterns: Vec<String>,
    #[serde(default)]
    pub servlet_names: Vec<String>,
}

impl FilterMap {
    pub fn for_url(filter_name: &str, url_pattern: &str) -> FilterMap {
        FilterMap {
            filter_name: filter_name.to_string(),
            url_patterns: vec![url_pattern.to_string()],
            servlet_names: Vec::new(),
        }
    }

    pub fn for_servlet(filter_name: &str, servlet_name: &str) -> FilterMap {
        FilterMap {
            filter_name: filter_name.to_string(),
            url_patterns: Vec::new(),
            servlet_names: vec![servlet_name.to_string()],
        }
    }

    pub fn matches_servlet(&self, servlet_name: &str) -> bool {
        self.servlet_names.iter().any(|name| name == servlet_name || name == "*")
    }

    pub fn matches_url(&self, request_path: &str) -> bool {
        self.url_patterns.iter().any(|pattern| matches_url_pattern(pattern, request_path))
    }
}

pub fn matches_url_pattern(url_pattern: &str, request_path: &str) -> bool {
    if url_pattern == request_path || url_pattern == "/*" {
        return true;
    }
    if let Some(prefix) = url_pattern.strip_suffix("/*") {
        let mut candidate = request_path;
        loop {
            if candidate == prefix {
                return true;
            }
            match candidate.rfind('/') {
                Some(slash) => candidate = &candidate[..slash],
                None => return false,
            }
        }
    }
    if let Some(extension) = url_pattern.strip_prefix("*.") {
        let slash = request_path.rfind('/');
        let period = request_path.rfind('.');
        if let (Some(slash), Some(period)) = (slash, period) {
            return period > slash && &request_path[period + 1..] == extension;
        }
    }
    return false;
}

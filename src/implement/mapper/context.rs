use crate::core::exchange::Exchange;
use crate::implement::container::context::Context;
use crate::implement::container::wrapper::Wrapper;
use crate::implement::mapper::binding::MapperBinding;
use crate::interface::container::{Container, Mapper,};
use crate::schema::container::error::ContainerError;
use crate::schema::container::kind::ContainerKind;

use std::sync::Arc;


/// A handler selected for a context-relative URI.
#[derive(Clone)]
pub struct WrapperMatch {
    pub wrapper: Arc<Wrapper>,
    pub servlet_path: String,
    pub path_info: Option<String>,
}

/// Selects the handler within an application context.
///
/// Rules are tried in order: exact match, longest path prefix (`/x/*`),
/// extension (`*.ext`), then the default handler mapped to `/`.
pub struct ContextMapper {
    binding: MapperBinding<Context>,
}

impl ContextMapper {
    pub fn new() -> ContextMapper {
        ContextMapper {
            binding: MapperBinding::new(ContainerKind::Context),
        }
    }

    pub fn map_relative(&self, relative_uri: &str) -> Option<WrapperMatch> {
        let context = self.binding.owner()?;
        let found = map_exact(&context, relative_uri)
            .or_else(|| map_prefix(&context, relative_uri))
            .or_else(|| map_extension(&context, relative_uri))
            .or_else(|| map_default(&context, relative_uri));
        match &found {
            Some(found) => trace!(
                context,
                "ContextMapper::map_relative - {} mapped to {} (servlet path {}, path info {:?})",
                relative_uri,
                found.wrapper.name(),
                found.servlet_path,
                found.path_info
            ),
            None => trace!(context, "ContextMapper::map_relative - no handler for {}", relative_uri),
        };
        found
    }
}

fn mapped_wrapper(context: &Context, url_pattern: &str) -> Option<Arc<Wrapper>> {
    let servlet_name = context.find_servlet_mapping(url_pattern)?;
    context.find_wrapper(servlet_name.as_str())
}

fn map_exact(context: &Context, relative_uri: &str) -> Option<WrapperMatch> {
    if relative_uri == "/" {
        return None;
    }
    let wrapper = mapped_wrapper(context, relative_uri)?;
    Some(WrapperMatch {
        wrapper,
        servlet_path: relative_uri.to_string(),
        path_info: None,
    })
}

fn map_prefix(context: &Context, relative_uri: &str) -> Option<WrapperMatch> {
    let mut servlet_path = relative_uri;
    loop {
        if let Some(wrapper) = mapped_wrapper(context, format!("{}/*", servlet_path).as_str()) {
            let path_info = &relative_uri[servlet_path.len()..];
            return Some(WrapperMatch {
                wrapper,
                servlet_path: servlet_path.to_string(),
                path_info: if path_info.is_empty() { None } else { Some(path_info.to_string()) },
            });
        }
        let slash = servlet_path.rfind('/')?;
        servlet_path = &servlet_path[..slash];
    }
}

fn map_extension(context: &Context, relative_uri: &str) -> Option<WrapperMatch> {
    let slash = relative_uri.rfind('/')?;
    let last_segment = &relative_uri[slash..];
    let period = last_segment.rfind('.')?;
    let wrapper = mapped_wrapper(context, format!("*{}", &last_segment[period..]).as_str())?;
    Some(WrapperMatch {
        wrapper,
        servlet_path: relative_uri.to_string(),
        path_info: None,
    })
}

fn map_default(context: &Context, relative_uri: &str) -> Option<WrapperMatch> {
    let wrapper = mapped_wrapper(context, "/")?;
    Some(WrapperMatch {
        wrapper,
        servlet_path: relative_uri.to_string(),
        path_info: None,
    })
}

impl Mapper for ContextMapper {
    type Owner = Context;
    type Target = Wrapper;

    fn bind(&self, container: Arc<dyn Container>) -> Result<(), ContainerError> {
        self.binding.bind(container)
    }

    fn owner(&self) -> Option<Arc<Context>> {
        self.binding.owner()
    }

    fn map(&self, exchange: &mut Exchange<'_>, update: bool) -> Option<Arc<Wrapper>> {
        if update {
            if let Some(wrapper) = &exchange.mapping.wrapper {
                return Some(wrapper.clone());
            }
        }
        let context = self.binding.owner()?;
        let request = exchange.request;
        let uri = request.as_http()?.decoded_uri();
        let relative_uri = uri.strip_prefix(context.path())?;
        let found = self.map_relative(relative_uri)?;
        if update {
            exchange.mapping.wrapper = Some(found.wrapper.clone());
            exchange.mapping.servlet_path = Some(found.servlet_path);
            exchange.mapping.path_info = found.path_info;
        }
        Some(found.wrapper)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::implement::container::context::test_utils::context_with_servlets;
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::response::StandardResponse;

    fn shop() -> Result<Arc<Context>, ContainerError> {
        context_with_servlets("/shop", &[
            ("/cart", "cart"),
            ("/images/*", "images"),
            ("*.jsp", "pages"),
            ("/", "default"),
        ])
    }

    fn summary(found: Option<WrapperMatch>) -> Option<(String, String, Option<String>)> {
        found.map(|found| (found.wrapper.name().to_string(), found.servlet_path, found.path_info))
    }

    fn expected(name: &str, servlet_path: &str, path_info: Option<&str>) -> Option<(String, String, Option<String>)> {
        Some((name.to_string(), servlet_path.to_string(), path_info.map(|info| info.to_string())))
    }

    #[test]
    fn test_exact_match() -> Result<(), ContainerError> {
        let context = shop()?;
        assert_eq!(expected("cart", "/cart", None), summary(context.mapper().map_relative("/cart")), "Exact rule");
        Ok(())
    }

    #[test]
    fn test_exact_match_precedes_prefix() -> Result<(), ContainerError> {
        let context = context_with_servlets("/app", &[("/a/b", "first"), ("/a/*", "second")])?;
        assert_eq!(expected("first", "/a/b", None), summary(context.mapper().map_relative("/a/b")), "Prefix beat exact");
        Ok(())
    }

    #[test]
    fn test_most_specific_prefix_wins() -> Result<(), ContainerError> {
        let context = context_with_servlets("/app", &[("/a/*", "outer"), ("/a/b/*", "inner")])?;
        assert_eq!(expected("inner", "/a/b", Some("/c")), summary(context.mapper().map_relative("/a/b/c")), "Inner prefix");
        assert_eq!(expected("outer", "/a", Some("/x")), summary(context.mapper().map_relative("/a/x")), "Outer prefix");
        Ok(())
    }

    #[test]
    fn test_prefix_match_splits_path_info() -> Result<(), ContainerError> {
        let context = shop()?;
        assert_eq!(
            expected("images", "/images", Some("/logo.png")),
            summary(context.mapper().map_relative("/images/logo.png")),
            "Prefix rule"
        );
        assert_eq!(
            expected("images", "/images", None),
            summary(context.mapper().map_relative("/images")),
            "Prefix rule without path info"
        );
        Ok(())
    }

    #[test]
    fn test_prefix_beats_extension() -> Result<(), ContainerError> {
        let context = shop()?;
        assert_eq!(
            expected("images", "/images", Some("/index.jsp")),
            summary(context.mapper().map_relative("/images/index.jsp")),
            "Extension rule ran before prefix rule"
        );
        Ok(())
    }

    #[test]
    fn test_extension_match() -> Result<(), ContainerError> {
        let context = shop()?;
        assert_eq!(
            expected("pages", "/catalog/index.jsp", None),
            summary(context.mapper().map_relative("/catalog/index.jsp")),
            "Extension rule"
        );
        Ok(())
    }

    #[test]
    fn test_default_handler() -> Result<(), ContainerError> {
        let context = shop()?;
        assert_eq!(expected("default", "/about", None), summary(context.mapper().map_relative("/about")), "Default rule");
        assert_eq!(expected("default", "/", None), summary(context.mapper().map_relative("/")), "Slash skips exact rule");
        Ok(())
    }

    #[test]
    fn test_universal_prefix_is_last_prefix_candidate() -> Result<(), ContainerError> {
        let context = context_with_servlets("/shop", &[("/*", "everything"), ("*.jsp", "pages")])?;
        assert_eq!(
            expected("everything", "", Some("/catalog/index.jsp")),
            summary(context.mapper().map_relative("/catalog/index.jsp")),
            "Universal prefix did not match"
        );
        Ok(())
    }

    #[test]
    fn test_no_match_without_default() -> Result<(), ContainerError> {
        let context = context_with_servlets("/shop", &[("/cart", "cart")])?;
        assert!(context.mapper().map_relative("/about").is_none(), "Unmapped URI resolved");
        Ok(())
    }

    #[test]
    fn test_map_writes_back_and_short_circuits() -> Result<(), ContainerError> {
        let context = shop()?;
        let request = StandardRequest::new(Some("localhost"), "/shop/images/logo.png");
        let mut response = StandardResponse::new();
        let mut exchange = Exchange::new(&request, &mut response);
        let wrapper = context.mapper().map(&mut exchange, true);
        assert_eq!(Some(String::from("images")), wrapper.map(|wrapper| wrapper.name().to_string()), "Wrong wrapper");
        assert_eq!(Some(String::from("/images")), exchange.mapping.servlet_path, "Servlet path not recorded");
        assert_eq!(Some(String::from("/logo.png")), exchange.mapping.path_info, "Path info not recorded");

        let again = context.mapper().map(&mut exchange, true);
        assert_eq!(Some(String::from("images")), again.map(|wrapper| wrapper.name().to_string()), "Second lookup differs");

        exchange.mapping.wrapper = context.find_wrapper("cart");
        let bound = context.mapper().map(&mut exchange, true);
        assert_eq!(Some(String::from("cart")), bound.map(|wrapper| wrapper.name().to_string()), "Bound wrapper replaced");
        Ok(())
    }
}

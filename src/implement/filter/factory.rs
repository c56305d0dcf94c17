use crate::implement::container::context::Context;
use crate::interface::filter::Filter;
use crate::schema::filter::error::FilterError;
use crate::schema::filter::map::FilterMap;

use std::sync::Arc;


/// The interceptors to run for a handler, in chain order.
///
/// URL-pattern maps are applied first and servlet-name maps second, each in
/// declaration order; an interceptor selected by several maps runs once.
pub fn matching_filters(
    context: &Context,
    servlet_name: &str,
    request_path: Option<&str>,
) -> Result<Vec<Arc<dyn Filter>>, FilterError> {
    let filter_maps = context.filter_maps();
    let by_url = filter_maps.iter().filter(|map| match request_path {
        Some(path) => map.matches_url(path),
        None => false,
    });
    let by_servlet = filter_maps.iter().filter(|map| map.matches_servlet(servlet_name));
    let mut selected: Vec<&FilterMap> = Vec::new();
    for filter_map in by_url.chain(by_servlet) {
        if !selected.iter().any(|existing| existing.filter_name == filter_map.filter_name) {
            selected.push(filter_map);
        }
    }
    let mut filters = Vec::with_capacity(selected.len());
    for filter_map in selected {
        let config = context.find_filter_config(filter_map.filter_name.as_str())
            .ok_or_else(|| FilterError::Unknown(filter_map.filter_name.clone()))?;
        filters.push(config.instance()?);
    }
    Ok(filters)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange::Exchange;
    use crate::implement::container::context::test_utils::test_settings_with;
    use crate::implement::filter::chain::FilterChain;
    use crate::implement::loader::registry::RegistryClassLoader;
    use crate::interface::filter::test_utils::{FilterJournal, NamedServlet, RecordingFilter,};
    use crate::schema::filter::definition::FilterDef;
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::response::StandardResponse;

    use std::error::Error;

    fn context_with_filters(journal: &FilterJournal, names: &[&str]) -> Result<Arc<Context>, Box<dyn Error>> {
        let loader = Arc::new(RegistryClassLoader::new("application"));
        for name in names {
            let factory_journal = journal.clone();
            let label = name.to_string();
            loader.register_filter(
                format!("shop::{}", name).as_str(),
                move || Box::new(RecordingFilter::new(label.as_str(), &factory_journal)),
            );
        }
        let context = Context::new("/shop", test_settings_with(loader))?;
        for name in names {
            context.add_filter_def(FilterDef::new(name, format!("shop::{}", name).as_str()))?;
        }
        Ok(context)
    }

    /// Runs the chain once and reports which interceptors it passed through.
    fn labels(filters: &[Arc<dyn Filter>], journal: &FilterJournal) -> Vec<String> {
        let before = journal.events().len();
        let servlet = NamedServlet::new("probe");
        let request = StandardRequest::new(Some("localhost"), "/shop");
        let mut response = StandardResponse::new();
        let mut exchange = Exchange::new(&request, &mut response);
        let _ = FilterChain::new(filters, &servlet).do_filter(&mut exchange);
        journal.events()[before..].iter().map(|event| event.trim_start_matches("filter:").to_string()).collect()
    }

    #[test]
    fn test_url_maps_precede_servlet_maps() -> Result<(), Box<dyn Error>> {
        let journal = FilterJournal::new();
        let context = context_with_filters(&journal, &["audit", "gzip", "auth"])?;
        context.add_filter_map(FilterMap::for_servlet("audit", "images"))?;
        context.add_filter_map(FilterMap::for_url("gzip", "*.png"))?;
        context.add_filter_map(FilterMap::for_url("auth", "/images/*"))?;
        let filters = matching_filters(&context, "images", Some("/images/logo.png"))?;
        assert_eq!(vec!["gzip", "auth", "audit"], labels(&filters, &journal), "Incorrect chain order");
        Ok(())
    }

    #[test]
    fn test_filter_selected_twice_runs_once() -> Result<(), Box<dyn Error>> {
        let journal = FilterJournal::new();
        let context = context_with_filters(&journal, &["audit"])?;
        context.add_filter_map(FilterMap::for_url("audit", "/*"))?;
        context.add_filter_map(FilterMap::for_servlet("audit", "*"))?;
        let filters = matching_filters(&context, "cart", Some("/cart"))?;
        assert_eq!(1, filters.len(), "Interceptor selected twice");
        Ok(())
    }

    #[test]
    fn test_unmatched_request_has_empty_chain() -> Result<(), Box<dyn Error>> {
        let journal = FilterJournal::new();
        let context = context_with_filters(&journal, &["gzip"])?;
        context.add_filter_map(FilterMap::for_url("gzip", "*.png"))?;
        assert!(matching_filters(&context, "cart", Some("/cart"))?.is_empty(), "Unrelated interceptor selected");
        assert!(matching_filters(&context, "cart", None)?.is_empty(), "URL map matched without a path");
        Ok(())
    }
}

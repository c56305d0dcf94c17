use crate::core::exchange::Exchange;
use crate::interface::filter::{Filter, Servlet,};
use crate::schema::dispatch::error::DispatchError;

use std::sync::Arc;


/// The interceptors still to run for one dispatch, ending in the handler.
///
/// Each interceptor receives the rest of the chain by value, so it can run it
/// at most once or drop it to complete the dispatch itself.
pub struct FilterChain<'c> {
    filters: &'c [Arc<dyn Filter>],
    servlet: &'c dyn Servlet,
}

impl<'c> FilterChain<'c> {
    pub fn new(filters: &'c [Arc<dyn Filter>], servlet: &'c dyn Servlet) -> FilterChain<'c> {
        FilterChain { filters, servlet }
    }

    pub fn do_filter(self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        match self.filters.split_first() {
            Some((filter, rest)) => filter.do_filter(exchange, FilterChain::new(rest, self.servlet)),
            None => self.servlet.service(exchange),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::filter::test_utils::{FilterJournal, NamedServlet, RecordingFilter,};
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::response::StandardResponse;

    use std::sync::atomic::Ordering;

    fn run(filters: &[Arc<dyn Filter>], servlet: &NamedServlet) -> Result<StandardResponse, DispatchError> {
        let request = StandardRequest::new(Some("localhost"), "/shop/cart");
        let mut response = StandardResponse::new();
        {
            let mut exchange = Exchange::new(&request, &mut response);
            FilterChain::new(filters, servlet).do_filter(&mut exchange)?;
        }
        Ok(response)
    }

    #[test]
    fn test_filters_run_in_order_before_handler() -> Result<(), DispatchError> {
        let journal = FilterJournal::new();
        let filters: Vec<Arc<dyn Filter>> = vec![
            Arc::new(RecordingFilter::new("first", &journal)),
            Arc::new(RecordingFilter::new("second", &journal)),
        ];
        let servlet = NamedServlet::new("cart");
        let response = run(&filters, &servlet)?;
        assert_eq!(vec!["filter:first", "filter:second"], journal.events(), "Interceptors ran out of order");
        assert_eq!("cart", response.body_as_str(), "Handler did not run");
        Ok(())
    }

    #[test]
    fn test_blocking_filter_skips_handler() -> Result<(), DispatchError> {
        let journal = FilterJournal::new();
        let mut blocking = RecordingFilter::new("guard", &journal);
        blocking.block = true;
        let filters: Vec<Arc<dyn Filter>> = vec![
            Arc::new(blocking),
            Arc::new(RecordingFilter::new("after", &journal)),
        ];
        let servlet = NamedServlet::new("cart");
        let response = run(&filters, &servlet)?;
        assert_eq!(vec!["filter:guard"], journal.events(), "Chain continued past a blocking interceptor");
        assert_eq!(0, servlet.calls.load(Ordering::SeqCst), "Handler ran despite blocking interceptor");
        assert_eq!("blocked", response.body_as_str(), "Blocking interceptor output lost");
        Ok(())
    }

    #[test]
    fn test_empty_chain_calls_handler() -> Result<(), DispatchError> {
        let servlet = NamedServlet::new("cart");
        run(&[], &servlet)?;
        assert_eq!(1, servlet.calls.load(Ordering::SeqCst), "Handler not called exactly once");
        Ok(())
    }
}

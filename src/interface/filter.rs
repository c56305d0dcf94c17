use crate::core::exchange::Exchange;
use crate::implement::filter::chain::FilterChain;
use crate::implement::filter::config::FilterConfigView;
use crate::schema::dispatch::error::DispatchError;
use crate::schema::filter::error::FilterError;


/// A request-scoped interceptor wrapped around a handler invocation.
pub trait Filter: Send + Sync {
    fn init(&self, _config: &FilterConfigView<'_>) -> Result<(), FilterError> {
        Ok(())
    }

    /// Processes the exchange; continuing means calling `chain.do_filter`.
    fn do_filter(&self, exchange: &mut Exchange<'_>, chain: FilterChain<'_>) -> Result<(), DispatchError>;

    fn destroy(&self) -> () {}
}

/// The leaf unit of work selected for a request.
pub trait Servlet: Send + Sync {
    fn service(&self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError>;

    fn destroy(&self) -> () {}
}

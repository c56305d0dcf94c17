use crate::core::exchange::Exchange;
use crate::core::pipeline::ValveContext;
use crate::schema::dispatch::error::DispatchError;


/// One stage of a container's pipeline.
///
/// A valve that wants later stages to run calls `next.invoke_next`; returning
/// without doing so completes the dispatch at this stage.
pub trait Valve: Send + Sync {
    fn name(&self) -> &str;

    fn invoke(&self, exchange: &mut Exchange<'_>, next: ValveContext<'_>) -> Result<(), DispatchError>;
}

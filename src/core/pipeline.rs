use crate::core::exchange::Exchange;
use crate::interface::valve::Valve;
use crate::schema::dispatch::error::DispatchError;

use parking_lot::RwLock;

use std::sync::Arc;


/// The remainder of a pipeline from the point of view of the running valve.
pub struct ValveContext<'p> {
    remaining: &'p [Arc<dyn Valve>],
    basic: Option<&'p dyn Valve>,
}

impl<'p> ValveContext<'p> {
    pub fn new(valves: &'p [Arc<dyn Valve>], basic: &'p dyn Valve) -> ValveContext<'p> {
        ValveContext {
            remaining: valves,
            basic: Some(basic),
        }
    }

    /// A context with nothing left to run.
    pub fn terminal() -> ValveContext<'static> {
        ValveContext {
            remaining: &[],
            basic: None,
        }
    }

    pub fn invoke_next(self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        match self.remaining.split_first() {
            Some((valve, rest)) => {
                let next = ValveContext {
                    remaining: rest,
                    basic: self.basic,
                };
                valve.invoke(exchange, next)
            },
            None => match self.basic {
                Some(basic) => basic.invoke(exchange, ValveContext::terminal()),
                None => Ok(()),
            },
        }
    }
}

/// An ordered chain of valves ending in the container's basic valve.
///
/// Both the custom valves and the basic valve are held as snapshots, so a
/// dispatch keeps the chain it started with even if the pipeline is modified
/// concurrently.
pub struct Pipeline {
    valves: RwLock<Arc<Vec<Arc<dyn Valve>>>>,
    basic: RwLock<Arc<dyn Valve>>,
}

impl Pipeline {
    pub fn new(basic: Arc<dyn Valve>) -> Pipeline {
        Pipeline {
            valves: RwLock::new(Arc::new(Vec::new())),
            basic: RwLock::new(basic),
        }
    }

    pub fn basic(&self) -> Arc<dyn Valve> {
        self.basic.read().clone()
    }

    /// Replaces the basic valve and returns the previous one.
    pub fn set_basic(&self, basic: Arc<dyn Valve>) -> Arc<dyn Valve> {
        let mut current = self.basic.write();
        std::mem::replace(&mut *current, basic)
    }

    pub fn add_valve(&self, valve: Arc<dyn Valve>) -> () {
        let mut current = self.valves.write();
        let mut valves = (**current).clone();
        valves.push(valve);
        *current = Arc::new(valves);
    }

    pub fn remove_valve(&self, name: &str) -> Option<Arc<dyn Valve>> {
        let mut current = self.valves.write();
        let position = current.iter().position(|valve| valve.name() == name)?;
        let mut valves = (**current).clone();
        let removed = valves.remove(position);
        *current = Arc::new(valves);
        Some(removed)
    }

    /// Custom valves in invocation order, without the basic valve.
    pub fn valves(&self) -> Vec<Arc<dyn Valve>> {
        (**self.valves.read()).clone()
    }

    pub fn invoke(&self, exchange: &mut Exchange<'_>) -> Result<(), DispatchError> {
        let valves = self.valves.read().clone();
        let basic = self.basic();
        ValveContext::new(valves.as_slice(), basic.as_ref()).invoke_next(exchange)
    }
}


#[cfg(test)]
pub mod test_utils {
    use super::*;

    use parking_lot::Mutex;


    /// Appends its name to a shared trace and optionally stops the chain.
    pub struct TraceValve {
        pub label: String,
        pub trace: Arc<Mutex<Vec<String>>>,
        pub stop: bool,
    }

    impl TraceValve {
        pub fn new(label: &str, trace: &Arc<Mutex<Vec<String>>>) -> TraceValve {
            TraceValve {
                label: label.to_string(),
                trace: trace.clone(),
                stop: false,
            }
        }

        pub fn stopping(label: &str, trace: &Arc<Mutex<Vec<String>>>) -> TraceValve {
            TraceValve {
                stop: true,
                ..TraceValve::new(label, trace)
            }
        }
    }

    impl Valve for TraceValve {
        fn name(&self) -> &str {
            self.label.as_str()
        }

        fn invoke(&self, exchange: &mut Exchange<'_>, next: ValveContext<'_>) -> Result<(), DispatchError> {
            self.trace.lock().push(self.label.clone());
            if self.stop {
                exchange.response.write(self.label.as_bytes())?;
                return Ok(());
            }
            next.invoke_next(exchange)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_utils::TraceValve;
    use crate::schema::http::request::StandardRequest;
    use crate::schema::http::response::StandardResponse;

    use parking_lot::Mutex;

    fn run(pipeline: &Pipeline) -> Result<StandardResponse, DispatchError> {
        let request = StandardRequest::new(Some("localhost"), "/");
        let mut response = StandardResponse::new();
        {
            let mut exchange = Exchange::new(&request, &mut response);
            pipeline.invoke(&mut exchange)?;
        }
        Ok(response)
    }

    #[test]
    fn test_valves_run_in_order_before_basic() -> Result<(), DispatchError> {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(Arc::new(TraceValve::new("basic", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::new("first", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::new("second", &trace)));
        run(&pipeline)?;
        assert_eq!(vec!["first", "second", "basic"], *trace.lock(), "Incorrect invocation order");
        Ok(())
    }

    #[test]
    fn test_stopping_valve_skips_basic() -> Result<(), DispatchError> {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(Arc::new(TraceValve::new("basic", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::stopping("guard", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::new("after", &trace)));
        let response = run(&pipeline)?;
        assert_eq!(vec!["guard"], *trace.lock(), "Chain continued past a stopping valve");
        assert_eq!("guard", response.body_as_str(), "Stopping valve did not complete the response");
        Ok(())
    }

    #[test]
    fn test_replacing_basic_keeps_custom_valves() -> Result<(), DispatchError> {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(Arc::new(TraceValve::new("old-basic", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::new("custom", &trace)));
        let previous = pipeline.set_basic(Arc::new(TraceValve::new("new-basic", &trace)));
        assert_eq!("old-basic", previous.name(), "Previous basic valve not returned");
        run(&pipeline)?;
        assert_eq!(vec!["custom", "new-basic"], *trace.lock(), "Custom valve lost or old basic still used");
        assert_eq!(1, pipeline.valves().len(), "Basic valve leaked into custom valves");
        Ok(())
    }

    #[test]
    fn test_remove_valve_by_name() -> Result<(), DispatchError> {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(Arc::new(TraceValve::new("basic", &trace)));
        pipeline.add_valve(Arc::new(TraceValve::new("audit", &trace)));
        assert!(pipeline.remove_valve("audit").is_some(), "Valve was not removed");
        assert!(pipeline.remove_valve("audit").is_none(), "Valve was removed twice");
        run(&pipeline)?;
        assert_eq!(vec!["basic"], *trace.lock(), "Removed valve still ran");
        Ok(())
    }
}

use std::sync::Arc;


/// Anything that can name the log target its messages should go to.
///
/// Containers log under their own target (e.g. `container_dispatch::context[/shop]`)
/// so that an application's output can be routed separately from the engine's.
pub trait LogTarget {
    fn log_target(&self) -> &str;
}

impl LogTarget for str {
    fn log_target(&self) -> &str {
        self
    }
}

impl LogTarget for String {
    fn log_target(&self) -> &str {
        self.as_str()
    }
}

impl<T: LogTarget + ?Sized> LogTarget for Arc<T> {
    fn log_target(&self) -> &str {
        (**self).log_target()
    }
}

impl<T: LogTarget + ?Sized> LogTarget for &T {
    fn log_target(&self) -> &str {
        (**self).log_target()
    }
}

pub const CRATE_TARGET: &str = "container_dispatch";

pub fn container_target(kind: &str, name: &str) -> String {
    format!("{}::{}[{}]", CRATE_TARGET, kind, name)
}

macro_rules! error {
    ($target_expr:expr, $($arg:tt)+) => (
        _log!(log::Level::Error, $target_expr, $($arg)+)
    );
}

macro_rules! warn {
    ($target_expr:expr, $($arg:tt)+) => (
        _log!(log::Level::Warn, $target_expr, $($arg)+)
    );
}

macro_rules! info {
    ($target_expr:expr, $($arg:tt)+) => (
        _log!(log::Level::Info, $target_expr, $($arg)+)
    );
}

macro_rules! debug {
    ($target_expr:expr, $($arg:tt)+) => (
        _log!(log::Level::Debug, $target_expr, $($arg)+)
    );
}

macro_rules! trace {
    ($target_expr:expr, $($arg:tt)+) => (
        _log!(log::Level::Trace, $target_expr, $($arg)+)
    );
}

macro_rules! _log {
    ($level:expr, $target_expr:expr, $($arg:tt)+) => (
        log::log!(
            target: crate::framework::logger::LogTarget::log_target(&$target_expr),
            $level,
            $($arg)+
        )
    );
}

#[cfg(test)]
#[ctor::ctor]
fn mod_test_setup() {
    test_utils::install();
}


#[cfg(test)]
pub mod test_utils {
    use log::{LevelFilter, Log, Metadata, Record,};
    use parking_lot::Mutex;

    static RECORDED: Mutex<Vec<(String, String)>> = parking_lot::const_mutex(Vec::new());

    /// Keeps every record for inspection and passes it on to `env_logger`.
    struct RecordingLogger {
        console: env_logger::Logger,
    }

    impl Log for RecordingLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            RECORDED.lock().push((record.target().to_string(), record.args().to_string()));
            if self.console.enabled(record.metadata()) {
                self.console.log(record);
            }
        }

        fn flush(&self) {
            self.console.flush();
        }
    }

    pub fn install() -> () {
        let console = env_logger::builder().is_test(true).build();
        let logger: &'static RecordingLogger = Box::leak(Box::new(RecordingLogger { console }));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    }

    /// Messages logged so far under exactly this target, oldest first.
    pub fn logged_messages(target: &str) -> Vec<String> {
        RECORDED.lock()
            .iter()
            .filter(|(recorded, _)| recorded == target)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

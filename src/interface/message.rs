use enum_iterator::IntoEnumIterator;


/// Identifies every user-visible message the dispatch valves can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoEnumIterator)]
pub enum MessageKey {
    NoHostHeader,
    NoHost,
    NoContext,
    NoWrapper,
    ProtectedPath,
    ContextUnavailable,
    WrapperUnavailable,
    HandlerFailed,
}

/// Formats the messages sent with error responses.
///
/// Passed to the valves that need it rather than looked up globally, so an
/// embedding can localise them and tests can substitute fixed strings.
pub trait MessageSource: Send + Sync {
    fn message(&self, key: MessageKey, detail: &str) -> String;
}

use enum_iterator::IntoEnumIterator;

use std::fmt;


/// The four levels of the dispatch hierarchy, outermost first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoEnumIterator)]
pub enum ContainerKind {
    Engine,
    Host,
    Context,
    Wrapper,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Engine => "engine",
            ContainerKind::Host => "host",
            ContainerKind::Context => "context",
            ContainerKind::Wrapper => "wrapper",
        }
    }

    pub fn child_kind(&self) -> Option<ContainerKind> {
        match self {
            ContainerKind::Engine => Some(ContainerKind::Host),
            ContainerKind::Host => Some(ContainerKind::Context),
            ContainerKind::Context => Some(ContainerKind::Wrapper),
            ContainerKind::Wrapper => None,
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

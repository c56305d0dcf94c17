use crate::schema::container::kind::ContainerKind;

use thiserror::Error;


#[derive(Error, Debug, PartialEq)]
pub enum ContainerError {
    #[error("An engine is the root container and cannot be given a parent")]
    EngineParent,
    #[error("A {parent} container cannot own a {child} container")]
    InvalidParent {
        child: ContainerKind,
        parent: ContainerKind,
    },
    #[error("Container {name} already has a parent")]
    ParentAlreadySet {
        name: String,
    },
    #[error("A {kind} named {name} is already registered")]
    DuplicateChild {
        kind: ContainerKind,
        name: String,
    },
    #[error("A mapper for {expected} containers cannot be bound to a {actual} container")]
    MapperMismatch {
        expected: ContainerKind,
        actual: ContainerKind,
    },
    #[error("Mapper is already bound to a container")]
    MapperAlreadyBound,
    #[error("URL pattern {0:?} is not a valid handler mapping")]
    InvalidPattern(String),
    #[error("No handler named {0} is registered")]
    UnknownWrapper(String),
}

use thiserror::Error;


#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Implementation {class_name} is not known to loader {loader}")]
    ClassNotFound {
        class_name: String,
        loader: String,
    },
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Interceptor configuration has no definition")]
    Unconfigured,
    #[error("Interceptor implementation could not be loaded")]
    Load(#[from] LoadError),
    #[error("Interceptor {name} failed to initialise: {reason}")]
    Init {
        name: String,
        reason: String,
    },
    #[error("Application context owning interceptor {0} has been released")]
    ContextReleased(String),
    #[error("No interceptor named {0} is configured")]
    Unknown(String),
}

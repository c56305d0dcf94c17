#[macro_use]
mod framework {
    #[macro_use]
    pub mod logger;
    pub mod config;
    pub mod deploy;
}
pub mod schema {
    pub mod config {
        pub mod descriptor;
        pub mod engine;
    }
    pub mod container {
        pub mod error;
        pub mod kind;
    }
    pub mod dispatch {
        pub mod attribute;
        pub mod error;
        pub mod mapping;
    }
    pub mod filter {
        pub mod definition;
        pub mod error;
        pub mod map;
    }
    pub mod http {
        pub mod request;
        pub mod response;
    }
}
pub mod interface {
    pub mod container;
    pub mod filter;
    pub mod loader;
    pub mod message;
    pub mod request;
    pub mod response;
    pub mod session;
    pub mod valve;
}
pub mod core {
    pub mod children;
    pub mod exchange;
    pub mod pipeline;
}
pub mod implement {
    pub mod container {
        pub mod base;
        pub mod context;
        pub mod engine;
        pub mod host;
        pub mod wrapper;
    }
    pub mod dispatch {
        pub mod dispatcher;
        pub mod request;
        pub mod response;
    }
    pub mod filter {
        pub mod chain;
        pub mod config;
        pub mod factory;
    }
    pub mod loader {
        pub mod registry;
    }
    pub mod mapper {
        pub mod binding;
        pub mod context;
        pub mod engine;
        pub mod host;
    }
    pub mod message {
        pub mod standard;
    }
    pub mod valve {
        pub mod context;
        pub mod engine;
        pub mod host;
        pub mod wrapper;
    }
}
pub mod dispatch_core;


pub use crate::dispatch_core::{DispatchCore, HandleRequestError,};
pub use crate::framework::config::{Loadable, ParseError,};
pub use crate::framework::deploy::{DeployError, Deployer,};
pub use crate::framework::logger::LogTarget;

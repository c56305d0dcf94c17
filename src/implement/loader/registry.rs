use crate::interface::filter::{Filter, Servlet,};
use crate::interface::loader::ClassLoader;
use crate::schema::filter::error::LoadError;

use parking_lot::RwLock;

use std::collections::HashMap;
use std::sync::Arc;


type FilterFactory = Box<dyn Fn() -> Box<dyn Filter> + Send + Sync>;
type ServletFactory = Box<dyn Fn() -> Arc<dyn Servlet> + Send + Sync>;

/// A loader backed by a table of factories registered up front.
pub struct RegistryClassLoader {
    name: String,
    filters: RwLock<HashMap<String, FilterFactory>>,
    servlets: RwLock<HashMap<String, ServletFactory>>,
}

impl RegistryClassLoader {
    pub fn new(name: &str) -> RegistryClassLoader {
        RegistryClassLoader {
            name: name.to_string(),
            filters: RwLock::new(HashMap::new()),
            servlets: RwLock::new(HashMap::new()),
        }
    }

    pub fn register_filter<F>(&self, class_name: &str, factory: F) -> ()
    where
        F: Fn() -> Box<dyn Filter> + Send + Sync + 'static,
    {
        self.filters.write().insert(class_name.to_string(), Box::new(factory));
    }

    pub fn register_servlet<F>(&self, class_name: &str, factory: F) -> ()
    where
        F: Fn() -> Arc<dyn Servlet> + Send + Sync + 'static,
    {
        self.servlets.write().insert(class_name.to_string(), Box::new(factory));
    }

    fn not_found(&self, class_name: &str) -> LoadError {
        LoadError::ClassNotFound {
            class_name: class_name.to_string(),
            loader: self.name.clone(),
        }
    }
}

impl ClassLoader for RegistryClassLoader {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn load_filter(&self, class_name: &str) -> Result<Box<dyn Filter>, LoadError> {
        let filters = self.filters.read();
        let factory = filters.get(class_name).ok_or_else(|| self.not_found(class_name))?;
        Ok(factory())
    }

    fn load_servlet(&self, class_name: &str) -> Result<Arc<dyn Servlet>, LoadError> {
        let servlets = self.servlets.read();
        let factory = servlets.get(class_name).ok_or_else(|| self.not_found(class_name))?;
        Ok(factory())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::filter::test_utils::NamedServlet;

    #[test]
    fn test_registered_servlet_loads() -> Result<(), LoadError> {
        let loader = RegistryClassLoader::new("application");
        loader.register_servlet("shop::Cart", || Arc::new(NamedServlet::new("cart")));
        loader.load_servlet("shop::Cart")?;
        Ok(())
    }

    #[test]
    fn test_unknown_class_names_loader() {
        let loader = RegistryClassLoader::new("application");
        match loader.load_filter("shop::Missing") {
            Err(LoadError::ClassNotFound { class_name, loader }) => {
                assert_eq!("shop::Missing", class_name, "Incorrect class name");
                assert_eq!("application", loader, "Incorrect loader name");
            },
            Err(other) => panic!("Unexpected error {}", other),
            Ok(_) => panic!("Unknown class loaded"),
        }
    }
}

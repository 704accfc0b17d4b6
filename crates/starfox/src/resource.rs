//! Package collaborator used by `resource` and `resource-url` attributes.

use std::rc::Rc;

/// A module resolved out of a [`Package`].
pub trait Resource {
    /// Object-URL factory. Resources that cannot be addressed by URL return
    /// `None`, which makes `resource-url` coercion fail.
    fn object_url(&self) -> Option<String> {
        None
    }
}

/// The package an app was loaded from.
pub trait Package {
    /// Human readable identity, e.g. `cc.starfox.0.1.0`.
    fn full_name(&self) -> String;

    /// Resolve a package-relative module path.
    fn require(&self, path: &str) -> Option<Rc<dyn Resource>>;
}

//! Control registry: tag name → [`ControlDefinition`].

use std::borrow::Cow;
use std::collections::HashMap;

use log::debug;

use crate::definition::ControlDefinition;
use crate::error::{Error, Result};

/// Registered control definitions, keyed by type tag.
///
/// Keys are lower-cased unless the registry is case-sensitive; lookups apply
/// the same rule, as does every other tag comparison the renderer makes
/// (container names, parent types) through [`normalize`](Self::normalize).
#[derive(Debug, Default)]
pub struct ControlRegistry {
    controls: HashMap<String, ControlDefinition>,
    case_sensitive: bool,
}

impl ControlRegistry {
    pub fn new(case_sensitive: bool) -> Self {
        Self { controls: HashMap::new(), case_sensitive }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Apply the registry's case rule to a tag name.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_lowercase())
        }
    }

    /// Store `definition` under its (normalized) name.
    pub fn register(&mut self, definition: ControlDefinition) -> Result<()> {
        let key = self.normalize(&definition.name).into_owned();
        if self.controls.contains_key(&key) {
            return Err(Error::DuplicateControl(definition.name));
        }
        debug!("registered control type '{key}'");
        self.controls.insert(key, definition);
        Ok(())
    }

    pub fn resolve(&self, tag: &str) -> Option<&ControlDefinition> {
        self.controls.get(&*self.normalize(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.resolve(tag).is_some()
    }

    /// Registered keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.controls.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.controls.clear();
    }
}

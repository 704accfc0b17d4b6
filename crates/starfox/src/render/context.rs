use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::group::Group;

/// State that lives for exactly one render: auto-name counters and the
/// group table.
#[derive(Default)]
pub(crate) struct RenderContext {
    name_counters: HashMap<String, usize>,
    groups: Vec<Group>,
}

impl RenderContext {
    /// `lower(tag) + N`, N counting from 0 per lower-cased tag.
    pub(crate) fn next_name(&mut self, tag: &str) -> String {
        let key = tag.to_lowercase();
        let counter = self.name_counters.entry(key.clone()).or_insert(0);
        let name = format!("{key}{counter}");
        *counter += 1;
        name
    }

    pub(crate) fn declare_group(&mut self, name: &str) -> Result<Group> {
        if self.group(name).is_some() {
            return Err(Error::UnableToRender(format!(
                "Control group '{name}' is defined multiple times."
            )));
        }
        let group = Group::new(name);
        self.groups.push(group.clone());
        Ok(group)
    }

    pub(crate) fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub(crate) fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

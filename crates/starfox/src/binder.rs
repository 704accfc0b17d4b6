//! Publishing rendered controls and groups onto the controller.

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::object::{lower_camel, MemberError, ObjectRef};
use crate::value::Value;

/// Assigns named values onto the active controller, if there is one.
#[derive(Clone, Default)]
pub struct ControllerBinder {
    controller: Option<ObjectRef>,
}

impl ControllerBinder {
    pub fn new(controller: Option<ObjectRef>) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> Option<&ObjectRef> {
        self.controller.as_ref()
    }

    /// Assign `value` onto the controller as `lower_camel(name)`.
    /// No-op without a controller.
    pub fn publish(&self, name: &str, value: Value) -> Result<()> {
        match &self.controller {
            Some(controller) => publish_to(controller, &lower_camel(name), value),
            None => Ok(()),
        }
    }
}

/// Assign `value` onto `target` under exactly `key`.
///
/// Targets without a matching property are left alone: a controller only
/// declares the members it cares about.
pub fn publish_to(target: &ObjectRef, key: &str, value: Value) -> Result<()> {
    let mut target = target.try_borrow_mut().map_err(|_| {
        Error::UnableToRender(format!("Could not publish '{key}'. The target object is already in use."))
    })?;
    match target.set_property(key, value) {
        Ok(()) => {
            debug!("published '{key}'");
            Ok(())
        }
        Err(MemberError::Missing) => {
            trace!("target has no property '{key}', skipped");
            Ok(())
        }
        Err(MemberError::NotCallable) => Ok(()),
        Err(MemberError::Failed(msg)) => Err(Error::UnableToRender(format!(
            "Could not publish '{key}': {msg}"
        ))),
    }
}

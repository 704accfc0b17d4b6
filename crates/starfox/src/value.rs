use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::group::Group;
use crate::object::{call_path, ControlRef, MemberError, Object};
use crate::resource::Resource;

// ── Value ─────────────────────────────────────────────────────────────────

/// Everything the engine assigns onto controls and controllers.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// `int` and `float` attributes; NaN when the text was not numeric.
    Number(f64),
    Str(String),
    Resource(Rc<dyn Resource>),
    Control(ControlRef),
    /// A group's live member collection.
    Group(Group),
    Callback(Callback),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&Rc<dyn Resource>> {
        match self {
            Value::Resource(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_control(&self) -> Option<&ControlRef> {
        match self {
            Value::Control(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Resource(_) => f.write_str("Resource(..)"),
            Value::Control(c) => match c.try_borrow() {
                Ok(c) => write!(f, "Control({:?}: {})", c.name(), c.control_type()),
                Err(_) => f.write_str("Control(<borrowed>)"),
            },
            Value::Group(g) => write!(f, "Group({:?}, {} members)", g.name(), g.len()),
            Value::Callback(cb) => write!(f, "Callback({:?})", cb.handler()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ControlRef> for Value {
    fn from(c: ControlRef) -> Self {
        Value::Control(c)
    }
}

// ── Callback ──────────────────────────────────────────────────────────────

/// An event handler bound from an `on<Event>` attribute.
///
/// Holds the handler name and a weak reference to the object that owns it
/// (the controller, or the custom owner of a fragment). The handler is looked
/// up when the callback fires, not when it is bound, so a missing handler
/// only surfaces on invocation.
#[derive(Clone)]
pub struct Callback {
    handler: String,
    owner: Option<Weak<RefCell<dyn Object>>>,
    /// Controller name from the `ui` node, for error messages.
    controller: Option<String>,
}

impl Callback {
    pub(crate) fn new(
        handler: impl Into<String>,
        owner: Option<Weak<RefCell<dyn Object>>>,
        controller: Option<String>,
    ) -> Self {
        Self { handler: handler.into(), owner, controller }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Fire the event: call the handler on its owner with `(sender, args)`.
    pub fn invoke(&self, sender: Value, args: Value) -> Result<()> {
        let owner = self
            .owner
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| self.missing())?;
        let mut owner = owner.try_borrow_mut().map_err(|_| {
            Error::UnableToRender(format!(
                "Could not execute callback '{}'. Its owner is already in use.",
                self.handler
            ))
        })?;

        match call_path(&mut *owner, &self.handler, &[sender, args]) {
            Ok(()) => Ok(()),
            Err(MemberError::Missing | MemberError::NotCallable) => Err(self.missing()),
            Err(MemberError::Failed(msg)) => Err(Error::UnableToRender(format!(
                "Callback '{}' failed: {msg}",
                self.handler
            ))),
        }
    }

    fn missing(&self) -> Error {
        Error::UnableToRender(format!(
            "Could not execute callback. Controller '{}' is missing function '{}'.",
            self.controller.as_deref().unwrap_or("<none>"),
            self.handler
        ))
    }
}

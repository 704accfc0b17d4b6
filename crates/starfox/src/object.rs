//! Capability traits the engine uses to talk to controls and controllers.
//!
//! The renderer never knows concrete types. It assigns properties, calls
//! methods and walks nested objects by name through [`Object`], and reads
//! the few engine-visible facts about a control through [`Control`].

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

// ── References ────────────────────────────────────────────────────────────

/// Shared handle to a rendered control.
pub type ControlRef = Rc<RefCell<dyn Control>>;

/// Shared handle to a controller or any other host object.
pub type ObjectRef = Rc<RefCell<dyn Object>>;

/// Wrap a control in a [`ControlRef`].
pub fn control_ref<C: Control>(control: C) -> ControlRef {
    Rc::new(RefCell::new(control))
}

/// Wrap a host object in an [`ObjectRef`].
pub fn object_ref<O: Object>(object: O) -> ObjectRef {
    Rc::new(RefCell::new(object))
}

// ── MemberError ───────────────────────────────────────────────────────────

/// Why a property assignment or method call did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    /// No member with that name.
    Missing,
    /// The member exists but is not a method.
    NotCallable,
    /// The member ran and rejected its input.
    Failed(String),
}

// ── Object ────────────────────────────────────────────────────────────────

/// Anything the engine can assign properties on and call methods of.
///
/// ```rust
/// use starfox::{MemberError, Object, Value};
///
/// #[derive(Default)]
/// struct Counter { clicks: u32, label: String }
///
/// impl Object for Counter {
///     fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
///         match (name, value) {
///             ("label", Value::Str(s)) => { self.label = s; Ok(()) }
///             ("label", _) => Err(MemberError::Failed("label expects text".into())),
///             _ => Err(MemberError::Missing),
///         }
///     }
///
///     fn call(&mut self, name: &str, _args: &[Value]) -> Result<(), MemberError> {
///         match name {
///             "clicked" => { self.clicks += 1; Ok(()) }
///             "label" => Err(MemberError::NotCallable),
///             _ => Err(MemberError::Missing),
///         }
///     }
/// }
/// ```
pub trait Object: 'static {
    /// Assign `value` to the property `name`.
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError>;

    /// Call the method `name`.
    fn call(&mut self, _name: &str, _args: &[Value]) -> Result<(), MemberError> {
        Err(MemberError::Missing)
    }

    /// Borrow the nested object stored in property `name`.
    ///
    /// Dotted member paths (`items.add`) walk through here one segment at a
    /// time before the last segment is assigned or called.
    fn nested(&mut self, _name: &str) -> Option<&mut dyn Object> {
        None
    }
}

// ── Control ───────────────────────────────────────────────────────────────

/// A control instance created from a registered definition.
pub trait Control: Object {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// The control's own type name, used in error messages.
    fn control_type(&self) -> &str;

    /// The only parent control type this control may be nested in, if any.
    fn parent_type(&self) -> Option<&str> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

// ── Path resolution ───────────────────────────────────────────────────────

/// Assign `value` at a possibly dotted property `path` below `root`.
pub fn set_path<O: Object + ?Sized>(root: &mut O, path: &str, value: Value) -> Result<(), MemberError> {
    match path.split_once('.') {
        None => root.set_property(path, value),
        Some((head, rest)) => match root.nested(head) {
            Some(inner) => set_path(inner, rest, value),
            None => Err(MemberError::Missing),
        },
    }
}

/// Call the method at a possibly dotted `path` below `root`.
pub fn call_path<O: Object + ?Sized>(root: &mut O, path: &str, args: &[Value]) -> Result<(), MemberError> {
    match path.split_once('.') {
        None => root.call(path, args),
        Some((head, rest)) => match root.nested(head) {
            Some(inner) => call_path(inner, rest, args),
            None => Err(MemberError::Missing),
        },
    }
}

/// `Name` → `name`: first character lower-cased, the rest untouched.
pub fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Control schemas supplied by control implementations at registration time.

use std::fmt;

use crate::coerce::ValueType;
use crate::object::{control_ref, Control, ControlRef};

// ── Attributes & events ───────────────────────────────────────────────────

/// Markup attribute `name` is coerced to `value_type` and assigned to `property`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDefinition {
    pub name: String,
    /// Target property path on the instance; may be dotted.
    pub property: String,
    pub value_type: ValueType,
}

/// `on<name>` in markup binds a callback into `property`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDefinition {
    pub name: String,
    pub property: String,
}

// ── ContainerDefinition ───────────────────────────────────────────────────

/// A named slot child controls are added into.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDefinition {
    /// Tag of the wrapper element in markup.
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
    /// Method path on the owning instance called once per child.
    /// A dotted path (`toolbar.add`) calls the method of a nested object.
    pub add_function: String,
}

impl ContainerDefinition {
    pub fn new(name: impl Into<String>, add_function: impl Into<String>) -> Self {
        Self { name: name.into(), attributes: Vec::new(), add_function: add_function.into() }
    }

    pub fn attribute(
        mut self,
        name: impl Into<String>,
        property: impl Into<String>,
        value_type: impl Into<ValueType>,
    ) -> Self {
        self.attributes.push(AttributeDefinition {
            name: name.into(),
            property: property.into(),
            value_type: value_type.into(),
        });
        self
    }
}

// ── ControlDefinition ─────────────────────────────────────────────────────

pub type ControlFactory = Box<dyn Fn() -> ControlRef>;

/// Everything the renderer needs to know about one control type.
///
/// ```rust,ignore
/// let tabs = ControlDefinition::of::<Tabs>("tabs")
///     .attribute("selected", "selectedIndex", "int")
///     .event("change", "onChange")
///     .container(ContainerDefinition::new("pages", "addPage"))
///     .container(ContainerDefinition::new("toolbar", "toolbar.add"));
/// ```
pub struct ControlDefinition {
    /// Type tag; the registry key.
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
    pub events: Vec<EventDefinition>,
    pub containers: Vec<ContainerDefinition>,
    factory: ControlFactory,
}

impl ControlDefinition {
    pub fn new(name: impl Into<String>, factory: impl Fn() -> ControlRef + 'static) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            events: Vec::new(),
            containers: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// Definition whose instances are `C::default()`.
    pub fn of<C: Control + Default>(name: impl Into<String>) -> Self {
        Self::new(name, || control_ref(C::default()))
    }

    pub fn attribute(
        mut self,
        name: impl Into<String>,
        property: impl Into<String>,
        value_type: impl Into<ValueType>,
    ) -> Self {
        self.attributes.push(AttributeDefinition {
            name: name.into(),
            property: property.into(),
            value_type: value_type.into(),
        });
        self
    }

    pub fn event(mut self, name: impl Into<String>, property: impl Into<String>) -> Self {
        self.events.push(EventDefinition { name: name.into(), property: property.into() });
        self
    }

    pub fn container(mut self, container: ContainerDefinition) -> Self {
        self.containers.push(container);
        self
    }

    /// Create a fresh, unnamed instance.
    pub fn instantiate(&self) -> ControlRef {
        (self.factory)()
    }
}

impl fmt::Debug for ControlDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlDefinition")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("events", &self.events)
            .field("containers", &self.containers)
            .finish_non_exhaustive()
    }
}

//! The markup → control graph renderer.
//!
//! One [`Renderer`] lives for one pass over one document:
//!
//! ```text
//! ui node
//!   ├─ group nodes        → traverse::declare_group   (always first)
//!   └─ control nodes      → instantiate::create_control
//!                              ├─ attributes / events / group membership
//!                              ├─ container::parse_container ─┐
//!                              │        (recursion) ◄─────────┘
//!                              └─ onload
//! ```
//!
//! Everything is synchronous and depth-first. The renderer owns the
//! render-local state (name counters, groups) and drops it with the pass.

mod container;
mod context;
mod instantiate;
mod traverse;

use std::rc::Rc;

use starfox_uixml::Element;

use crate::binder::{publish_to, ControllerBinder};
use crate::error::{Error, Result};
use crate::group::Group;
use crate::object::{ControlRef, ObjectRef};
use crate::registry::ControlRegistry;
use crate::resource::Package;
use crate::value::Value;

use context::RenderContext;

pub(crate) const UI_TAG: &str = "ui";
pub(crate) const GROUP_TAG: &str = "group";

pub(crate) const NAME_ATTR: &str = "name";
pub(crate) const GROUP_ATTR: &str = "group";
pub(crate) const ONLOAD_ATTR: &str = "onload";
pub(crate) const EVENT_PREFIX: &str = "on";

// ── Renderer ──────────────────────────────────────────────────────────────

pub(crate) struct Renderer<'e> {
    registry: &'e ControlRegistry,
    ctx: RenderContext,
    binder: ControllerBinder,
    package: Option<Rc<dyn Package>>,
    /// Controller name from the `ui` node, for error messages.
    controller_name: Option<String>,
    rendered: Vec<ControlRef>,
}

impl<'e> Renderer<'e> {
    pub(crate) fn new(
        registry: &'e ControlRegistry,
        controller: Option<ObjectRef>,
        package: Option<Rc<dyn Package>>,
        controller_name: Option<String>,
    ) -> Self {
        Self {
            registry,
            ctx: RenderContext::default(),
            binder: ControllerBinder::new(controller),
            package,
            controller_name,
            rendered: Vec::new(),
        }
    }

    /// Hand back the groups and every created control.
    pub(crate) fn finish(self) -> (Vec<Group>, Vec<ControlRef>) {
        (self.ctx.into_groups(), self.rendered)
    }

    /// Publish onto the custom owner under the raw name, or onto the
    /// controller through the binder.
    fn publish(&self, owner: Option<&ObjectRef>, name: &str, value: Value) -> Result<()> {
        match owner {
            Some(owner) => publish_to(owner, name, value),
            None => self.binder.publish(name, value),
        }
    }

    /// The object event and onload handlers are resolved on.
    fn handler_owner(&self, owner: Option<&ObjectRef>) -> Option<ObjectRef> {
        owner.or(self.binder.controller()).cloned()
    }
}

/// Value of a mandatory attribute.
pub(crate) fn required_attr<'a>(node: &'a Element, name: &str) -> Result<&'a str> {
    node.attr(name).ok_or_else(|| {
        Error::UnableToRender(format!(
            "Node '{}' is missing the mandatory '{name}' attribute.",
            node.tag
        ))
    })
}

#[cfg(test)]
mod tests;

use log::{debug, warn};
use starfox_uixml::Element;

use super::{required_attr, Renderer, GROUP_TAG, NAME_ATTR};
use crate::error::Result;
use crate::object::{ControlRef, ObjectRef};
use crate::value::Value;

impl<'e> Renderer<'e> {
    /// Render the children of the `ui` node: groups first, then every other
    /// element in document order. Returns the top-level controls.
    pub(crate) fn render_root(&mut self, ui: &Element) -> Result<Vec<ControlRef>> {
        self.render_children(ui, None)
    }

    /// Render the children of an arbitrary fragment root on behalf of
    /// `owner`: handlers resolve on it and every control is published onto
    /// it under its raw name.
    pub(crate) fn render_owned(&mut self, root: &Element, owner: &ObjectRef) -> Result<Vec<ControlRef>> {
        self.render_children(root, Some(owner))
    }

    fn render_children(&mut self, root: &Element, owner: Option<&ObjectRef>) -> Result<Vec<ControlRef>> {
        let (groups, others): (Vec<&Element>, Vec<&Element>) =
            root.elements().partition(|e| e.tag == GROUP_TAG);

        for node in groups {
            self.declare_group(node, owner)?;
        }

        let mut controls = Vec::with_capacity(others.len());
        for node in others {
            let control = self.create_control(node, owner)?;
            let name = control.borrow().name().to_string();
            self.publish(owner, &name, Value::Control(control.clone()))?;
            controls.push(control);
        }
        Ok(controls)
    }

    fn declare_group(&mut self, node: &Element, owner: Option<&ObjectRef>) -> Result<()> {
        let name = required_attr(node, NAME_ATTR)?;
        if name.is_empty() {
            warn!("line {}: group without a name ignored", node.line);
            return Ok(());
        }
        let group = self.ctx.declare_group(name)?;
        debug!("declared group '{name}'");
        self.publish(owner, name, Value::Group(group))
    }
}

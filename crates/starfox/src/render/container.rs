use log::debug;
use starfox_uixml::Element;

use super::Renderer;
use crate::definition::{ContainerDefinition, ControlDefinition};
use crate::error::{Error, Result};
use crate::object::{call_path, ControlRef, MemberError, ObjectRef};
use crate::value::Value;

impl<'e> Renderer<'e> {
    /// Render every element child of `node` into `container` of `instance`.
    ///
    /// `node` is either the container's wrapper element or, for the implicit
    /// single container, the control's own element.
    pub(super) fn parse_container(
        &mut self,
        container: &ContainerDefinition,
        instance: &ControlRef,
        node: &Element,
        parent: &ControlDefinition,
        owner: Option<&ObjectRef>,
    ) -> Result<()> {
        self.apply_attributes(instance, &parent.name, &container.attributes, node)?;

        for child_node in node.elements() {
            let child = self.create_control(child_node, owner)?;
            let (child_name, child_type, required_parent) = {
                let c = child.borrow();
                (
                    c.name().to_string(),
                    c.control_type().to_string(),
                    c.parent_type().filter(|p| !p.is_empty()).map(str::to_string),
                )
            };

            if let Some(required) = required_parent {
                if self.registry.normalize(&required) != self.registry.normalize(&parent.name) {
                    return Err(Error::UnableToRender(format!(
                        "Control type '{child_type}' can not be used as a child of control type '{}', \
                         only as a child of control type '{required}'.",
                        parent.name
                    )));
                }
            }

            self.publish(owner, &child_name, Value::Control(child.clone()))?;

            let mut parent_instance = instance.borrow_mut();
            match call_path(&mut *parent_instance, &container.add_function, &[Value::Control(child.clone())]) {
                Ok(()) => {
                    debug!("added '{child_name}' to '{}' via {}", parent_instance.name(), container.add_function);
                }
                Err(MemberError::Missing | MemberError::NotCallable) => {
                    return Err(Error::InvalidControl(format!(
                        "Can't add child control '{child_name}'. Control type '{}' is missing function '{}'.",
                        parent.name, container.add_function
                    )));
                }
                Err(MemberError::Failed(msg)) => {
                    return Err(Error::UnableToRender(format!(
                        "Could not add child control '{child_name}' to '{}': {msg}",
                        parent_instance.name()
                    )));
                }
            }
        }
        Ok(())
    }
}

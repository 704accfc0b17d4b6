use std::rc::Rc;

use log::{debug, trace};
use starfox_uixml::{Element, Node};

use super::{Renderer, EVENT_PREFIX, GROUP_ATTR, NAME_ATTR, ONLOAD_ATTR};
use crate::coerce::coerce;
use crate::definition::{AttributeDefinition, ControlDefinition};
use crate::error::{Error, Result};
use crate::object::{call_path, set_path, ControlRef, MemberError, ObjectRef};
use crate::value::{Callback, Value};

impl<'e> Renderer<'e> {
    /// Create one fully populated control from `node`, children included.
    pub(crate) fn create_control(&mut self, node: &Element, owner: Option<&ObjectRef>) -> Result<ControlRef> {
        let registry = self.registry;
        let explicit_name = node.attr(NAME_ATTR).filter(|n| !n.is_empty());

        let Some(definition) = registry.resolve(&node.tag) else {
            return Err(Error::UnableToRender(format!(
                "Could not render control{}. Control type '{}' could not be found. \
                 Make sure the control type is loaded and registered.",
                explicit_name.map(|n| format!(" '{n}'")).unwrap_or_default(),
                node.tag
            )));
        };

        let instance = definition.instantiate();
        let name = match explicit_name {
            Some(n) => n.to_string(),
            None => self.ctx.next_name(&node.tag),
        };
        instance.borrow_mut().set_name(name.clone());
        debug!("line {}: <{}> → '{name}'", node.line, node.tag);

        if let Some(group_name) = node.attr(GROUP_ATTR).filter(|g| !g.is_empty()) {
            let group = self.ctx.group(group_name).ok_or_else(|| {
                Error::UnableToRender(format!(
                    "Could not render control '{name}'. Control group '{group_name}' is not defined in the UIXML."
                ))
            })?;
            group.push(instance.clone());
        }

        self.apply_attributes(&instance, &definition.name, &definition.attributes, node)?;
        self.bind_events(&instance, definition, node, owner)?;
        self.parse_containers(&instance, definition, node, owner)?;

        if let Some(onload) = node.attr(ONLOAD_ATTR) {
            self.fire_onload(&instance, &name, onload, owner)?;
        }

        self.rendered.push(instance.clone());
        Ok(instance)
    }

    /// Coerce and assign every declared attribute present on `node`.
    pub(super) fn apply_attributes(
        &self,
        instance: &ControlRef,
        control_type: &str,
        attributes: &[AttributeDefinition],
        node: &Element,
    ) -> Result<()> {
        for attr in attributes {
            let Some(raw) = node.attr(&attr.name) else { continue };
            let value = coerce(raw, &attr.value_type, self.package.as_deref())?;
            trace!("{}.{} = {value:?}", node.tag, attr.property);

            let mut control = instance.borrow_mut();
            set_path(&mut *control, &attr.property, value).map_err(|e| match e {
                MemberError::Missing | MemberError::NotCallable => Error::InvalidControl(format!(
                    "Control type '{control_type}' has no property '{}' for attribute '{}'.",
                    attr.property, attr.name
                )),
                MemberError::Failed(msg) => Error::UnableToRender(format!(
                    "Could not render control '{}'. Attribute '{}' was rejected: {msg}",
                    control.name(),
                    attr.name
                )),
            })?;
        }
        Ok(())
    }

    fn bind_events(
        &self,
        instance: &ControlRef,
        definition: &ControlDefinition,
        node: &Element,
        owner: Option<&ObjectRef>,
    ) -> Result<()> {
        for event in &definition.events {
            let attr = format!("{EVENT_PREFIX}{}", event.name);
            let Some(handler) = node.attr(&attr) else { continue };

            let target = self.handler_owner(owner).map(|o| Rc::downgrade(&o));
            let callback = Callback::new(handler, target, self.controller_name.clone());

            let mut control = instance.borrow_mut();
            set_path(&mut *control, &event.property, Value::Callback(callback)).map_err(|e| {
                Error::InvalidControl(format!(
                    "Control type '{}' cannot bind event '{}' to '{}': {e:?}",
                    definition.name, event.name, event.property
                ))
            })?;
            debug!("bound {attr} → '{handler}'");
        }
        Ok(())
    }

    /// Match `node`'s children against the definition's containers.
    fn parse_containers(
        &mut self,
        instance: &ControlRef,
        definition: &ControlDefinition,
        node: &Element,
        owner: Option<&ObjectRef>,
    ) -> Result<()> {
        let registry = self.registry;
        let instance_name = || instance.borrow().name().to_string();

        match definition.containers.as_slice() {
            [] => {
                if node.has_children() {
                    return Err(Error::UnableToRender(format!(
                        "Could not render control '{}'. Control type '{}' does not support child controls.",
                        instance_name(),
                        definition.name
                    )));
                }
                Ok(())
            }
            [only] => {
                // The wrapper element may be omitted. It is honoured only when
                // every element child is one and its tag is not a control type.
                let wrapper = registry.normalize(&only.name);
                let mut elements = node.elements().peekable();
                let wrapped = elements.peek().is_some()
                    && elements.all(|e| registry.normalize(&e.tag) == wrapper && !registry.contains(&e.tag));

                if wrapped {
                    for el in node.elements() {
                        self.parse_container(only, instance, el, definition, owner)?;
                    }
                    Ok(())
                } else {
                    self.parse_container(only, instance, node, definition, owner)
                }
            }
            containers => {
                for child in &node.children {
                    let el = match child {
                        Node::Element(el) => el,
                        Node::Text(_) => continue,
                    };
                    let tag = registry.normalize(&el.tag);
                    let Some(container) = containers.iter().find(|c| registry.normalize(&c.name) == tag) else {
                        let expected = containers
                            .iter()
                            .map(|c| registry.normalize(&c.name).into_owned())
                            .collect::<Vec<_>>()
                            .join(", ");
                        return Err(Error::UnableToRender(format!(
                            "Could not render control '{}'. Invalid child node '{}'. \
                             Expects one of the container nodes: '{expected}'.",
                            instance_name(),
                            el.tag
                        )));
                    };
                    self.parse_container(container, instance, el, definition, owner)?;
                }
                Ok(())
            }
        }
    }

    fn fire_onload(&self, instance: &ControlRef, name: &str, onload: &str, owner: Option<&ObjectRef>) -> Result<()> {
        let missing = || {
            Error::UnableToRender(format!(
                "Could not render control '{name}'. It is missing function '{onload}' for the onLoad event."
            ))
        };
        let target = self.handler_owner(owner).ok_or_else(missing)?;
        let mut target = target.try_borrow_mut().map_err(|_| {
            Error::UnableToRender(format!(
                "Could not render control '{name}'. The onLoad owner is already in use."
            ))
        })?;

        match call_path(&mut *target, onload, &[Value::Control(instance.clone())]) {
            Ok(()) => Ok(()),
            Err(MemberError::Missing | MemberError::NotCallable) => Err(missing()),
            Err(MemberError::Failed(msg)) => Err(Error::UnableToRender(format!(
                "Could not render control '{name}'. onLoad function '{onload}' failed: {msg}"
            ))),
        }
    }
}

//! A small demo control set and controller for previewing documents.

use std::any::Any;
use std::collections::BTreeMap;

use log::info;
use starfox::{
    control_ref, Control, ContainerDefinition, ControlDefinition, ControlRef, Engine, MemberError, Object, Value,
};

// ── DemoControl ───────────────────────────────────────────────────────────

/// One struct for every demo type; it stores whatever it is given.
pub struct DemoControl {
    name: String,
    kind: &'static str,
    pub props: BTreeMap<String, Value>,
    /// Children with the container they were added through.
    pub children: Vec<(&'static str, ControlRef)>,
    pub toolbar: Toolbar,
}

impl DemoControl {
    fn new(kind: &'static str) -> Self {
        Self { name: String::new(), kind, props: BTreeMap::new(), children: Vec::new(), toolbar: Toolbar::default() }
    }

    fn definition(kind: &'static str) -> ControlDefinition {
        ControlDefinition::new(kind, move || control_ref(DemoControl::new(kind)))
    }

    /// Every child in display order: own children, then the toolbar.
    pub fn all_children(&self) -> impl Iterator<Item = (&'static str, &ControlRef)> {
        self.children
            .iter()
            .map(|(slot, c)| (*slot, c))
            .chain(self.toolbar.items.iter().map(|c| ("toolbar", c)))
    }
}

fn child_arg(args: &[Value]) -> Result<ControlRef, MemberError> {
    args.first()
        .and_then(Value::as_control)
        .cloned()
        .ok_or_else(|| MemberError::Failed("expected a child control".into()))
}

impl Object for DemoControl {
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
        self.props.insert(name.to_string(), value);
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<(), MemberError> {
        let slot = match name {
            "add" => "content",
            "addPage" => "pages",
            _ => return Err(MemberError::Missing),
        };
        self.children.push((slot, child_arg(args)?));
        Ok(())
    }

    fn nested(&mut self, name: &str) -> Option<&mut dyn Object> {
        match name {
            "toolbar" => Some(&mut self.toolbar),
            _ => None,
        }
    }
}

impl Control for DemoControl {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn control_type(&self) -> &str {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
pub struct Toolbar {
    pub items: Vec<ControlRef>,
}

impl Object for Toolbar {
    fn set_property(&mut self, _name: &str, _value: Value) -> Result<(), MemberError> {
        Err(MemberError::Missing)
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<(), MemberError> {
        match name {
            "add" => {
                self.items.push(child_arg(args)?);
                Ok(())
            }
            _ => Err(MemberError::Missing),
        }
    }
}

/// Register the demo control types and the preview controller.
pub fn register(engine: &mut Engine) -> starfox::Result<()> {
    engine.register_control(
        DemoControl::definition("window")
            .attribute("title", "title", "string")
            .container(ContainerDefinition::new("content", "add")),
    )?;
    engine.register_control(
        DemoControl::definition("tabs")
            .attribute("selected", "selectedIndex", "int")
            .event("change", "onChange")
            .container(ContainerDefinition::new("pages", "addPage"))
            .container(ContainerDefinition::new("toolbar", "toolbar.add")),
    )?;
    engine.register_control(
        DemoControl::definition("button")
            .attribute("text", "text", "string")
            .attribute("enabled", "enabled", "boolean")
            .attribute("width", "width", "int")
            .event("click", "onClick"),
    )?;
    engine.register_control(DemoControl::definition("label").attribute("text", "text", "string"))?;
    engine.register_control(DemoControl::definition("image").attribute("url", "source", "url"))?;

    engine.register_controller("PreviewController", || starfox::object_ref(PreviewController::default()));
    Ok(())
}

// ── PreviewController ─────────────────────────────────────────────────────

/// Logs every publication and handler call it receives.
#[derive(Default)]
pub struct PreviewController {
    pub published: BTreeMap<String, Value>,
    pub calls: Vec<String>,
}

impl Object for PreviewController {
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
        info!("controller.{name} = {value:?}");
        self.published.insert(name.to_string(), value);
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<(), MemberError> {
        if self.published.contains_key(name) {
            return Err(MemberError::NotCallable);
        }
        info!("controller.{name}() with {} args", args.len());
        self.calls.push(name.to_string());
        Ok(())
    }
}

/// Fire `onClick` of every button, the way a host would on user input.
pub fn click_all<'a>(controls: impl IntoIterator<Item = &'a ControlRef>) -> starfox::Result<usize> {
    let mut clicked = 0;
    for control in controls {
        let callback = {
            let c = control.borrow();
            match c.as_any().downcast_ref::<DemoControl>() {
                Some(demo) => demo.props.get("onClick").and_then(Value::as_callback).cloned(),
                None => None,
            }
        };
        if let Some(callback) = callback {
            callback.invoke(Value::Control(control.clone()), Value::Null)?;
            clicked += 1;
        }
    }
    Ok(clicked)
}

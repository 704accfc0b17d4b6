use std::fmt;
use std::rc::Rc;

use starfox_uixml::Element;

use crate::error::Result;
use crate::group::Group;
use crate::object::{lower_camel, ControlRef, ObjectRef};
use crate::render::required_attr;
use crate::resource::Package;

// ── App ───────────────────────────────────────────────────────────────────

/// Document-level metadata and the controls one render produced.
pub struct App {
    pub name: String,
    pub icon: Option<String>,
    /// Controller name from `ui@controller`.
    pub controller: Option<String>,
    /// Name of the main control, from `ui@main`.
    pub main: Option<String>,
    /// Controller function called once the whole document has rendered.
    pub on_load: Option<String>,
    /// Top-level controls in document order.
    pub controls: Vec<ControlRef>,
    /// The controller instance controls were published onto.
    pub instance: Option<ObjectRef>,
    pub package: Option<Rc<dyn Package>>,
    pub(crate) groups: Vec<Group>,
    /// Every control created, nested ones included, in creation order.
    pub(crate) rendered: Vec<ControlRef>,
}

impl App {
    /// Read the app attributes off the `ui` node.
    pub(crate) fn from_ui_node(ui: &Element) -> Result<Self> {
        let attr = |name: &str| ui.attr(name).map(str::to_string);
        Ok(Self {
            name: required_attr(ui, "name")?.to_string(),
            icon: attr("icon"),
            controller: attr("controller"),
            main: attr("main"),
            on_load: attr("onload"),
            controls: Vec::new(),
            instance: None,
            package: None,
            groups: Vec::new(),
            rendered: Vec::new(),
        })
    }

    /// Any rendered control called `name`, nested controls included.
    pub fn control(&self, name: &str) -> Option<&ControlRef> {
        self.rendered.iter().find(|c| c.borrow().name() == name)
    }

    /// The control named by `ui@main`.
    ///
    /// `main` may use the name as written on the control or the lower-camel
    /// name it is published under on the controller.
    pub fn main_control(&self) -> Option<&ControlRef> {
        let main = self.main.as_deref()?;
        self.control(main).or_else(|| {
            self.rendered
                .iter()
                .find(|c| lower_camel(c.borrow().name()) == main)
        })
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Every control created, nested ones included, in creation order.
    ///
    /// Children finish before their parent, so a container follows its
    /// contents.
    pub fn all_controls(&self) -> impl Iterator<Item = &ControlRef> {
        self.rendered.iter()
    }

    /// Number of controls created, nested ones included.
    pub fn control_count(&self) -> usize {
        self.rendered.len()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("controller", &self.controller)
            .field("main", &self.main)
            .field("on_load", &self.on_load)
            .field("controls", &self.controls.len())
            .field("groups", &self.groups.len())
            .finish_non_exhaustive()
    }
}

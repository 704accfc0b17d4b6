//! Test doubles shared by the unit tests: a recording control, a recording
//! controller, an in-memory package and an opener whose reads fail.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::rc::Rc;

use crate::definition::ControlDefinition;
use crate::load::{MarkupStream, UriOpener};
use crate::object::{control_ref, Control, ControlRef, MemberError, Object, ObjectRef};
use crate::resource::{Package, Resource};
use crate::value::Value;

/// Property name `TestControl` reports as missing.
pub const MISSING_PROPERTY: &str = "missingProperty";
/// Property name `TestControl` rejects with a failure.
pub const READ_ONLY_PROPERTY: &str = "readOnly";

// ── TestControl ───────────────────────────────────────────────────────────

/// Records every property it is given and every child it is handed.
///
/// Methods: `add` → `children`, `addHeader` → `header`, nested
/// `toolbar.add` → `toolbar.items`. `notAFunction` exists but is not callable.
pub struct TestControl {
    name: String,
    kind: String,
    parent: Option<String>,
    pub props: HashMap<String, Value>,
    pub children: Vec<ControlRef>,
    pub header: Vec<ControlRef>,
    pub toolbar: ChildList,
}

impl TestControl {
    pub fn new(kind: &str) -> Self {
        Self {
            name: String::new(),
            kind: kind.to_string(),
            parent: None,
            props: HashMap::new(),
            children: Vec::new(),
            header: Vec::new(),
            toolbar: ChildList::default(),
        }
    }

    /// Definition with no attributes, events or containers.
    pub fn definition(kind: &str) -> ControlDefinition {
        let kind = kind.to_string();
        ControlDefinition::new(kind.clone(), move || control_ref(TestControl::new(&kind)))
    }

    /// Definition whose instances may only live inside `parent`.
    pub fn child_of(kind: &str, parent: &str) -> ControlDefinition {
        let (k, p) = (kind.to_string(), parent.to_string());
        ControlDefinition::new(kind, move || {
            let mut c = TestControl::new(&k);
            c.parent = Some(p.clone());
            control_ref(c)
        })
    }

    /// Run `f` against the `TestControl` behind `control`.
    pub fn inspect<R>(control: &ControlRef, f: impl FnOnce(&TestControl) -> R) -> R {
        let c = control.borrow();
        let c = c.as_any().downcast_ref::<TestControl>().expect("not a TestControl");
        f(c)
    }

    pub fn prop(control: &ControlRef, name: &str) -> Option<Value> {
        Self::inspect(control, |c| c.props.get(name).cloned())
    }

    pub fn child_names(list: &[ControlRef]) -> Vec<String> {
        list.iter().map(|c| c.borrow().name().to_string()).collect()
    }
}

fn child_arg(args: &[Value]) -> Result<ControlRef, MemberError> {
    args.first()
        .and_then(Value::as_control)
        .cloned()
        .ok_or_else(|| MemberError::Failed("expected a control".into()))
}

impl Object for TestControl {
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
        match name {
            MISSING_PROPERTY => Err(MemberError::Missing),
            READ_ONLY_PROPERTY => Err(MemberError::Failed("property is read-only".into())),
            _ => {
                self.props.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<(), MemberError> {
        match name {
            "add" => {
                self.children.push(child_arg(args)?);
                Ok(())
            }
            "addHeader" => {
                self.header.push(child_arg(args)?);
                Ok(())
            }
            "notAFunction" => Err(MemberError::NotCallable),
            _ => Err(MemberError::Missing),
        }
    }

    fn nested(&mut self, name: &str) -> Option<&mut dyn Object> {
        match name {
            "toolbar" => Some(&mut self.toolbar),
            _ => None,
        }
    }
}

impl Control for TestControl {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn control_type(&self) -> &str {
        &self.kind
    }

    fn parent_type(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Default)]
pub struct ChildList {
    pub items: Vec<ControlRef>,
}

impl Object for ChildList {
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

// ── TestController ────────────────────────────────────────────────────────

/// Accepts any published property and records calls to its declared methods.
#[derive(Default)]
pub struct TestController {
    props: HashMap<String, Value>,
    methods: HashSet<String>,
    rejected: HashSet<String>,
    pub calls: Vec<(String, Vec<Value>)>,
}

impl TestController {
    pub fn with_methods(methods: &[&str]) -> Self {
        Self { methods: methods.iter().map(|m| m.to_string()).collect(), ..Self::default() }
    }

    pub fn shared() -> (Rc<RefCell<TestController>>, ObjectRef) {
        Self::shared_with(&[])
    }

    pub fn shared_with(methods: &[&str]) -> (Rc<RefCell<TestController>>, ObjectRef) {
        let controller = Rc::new(RefCell::new(Self::with_methods(methods)));
        let object: ObjectRef = controller.clone();
        (controller, object)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.props.get(name).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.props.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn reject(&mut self, name: &str) {
        self.rejected.insert(name.to_string());
    }

    pub fn calls_to(&self, method: &str) -> Vec<Vec<Value>> {
        self.calls
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, args)| args.clone())
            .collect()
    }
}

impl Object for TestController {
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), MemberError> {
        if self.rejected.contains(name) {
            return Err(MemberError::Failed(format!("'{name}' is rejected")));
        }
        self.props.insert(name.to_string(), value);
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Value]) -> Result<(), MemberError> {
        if self.methods.contains(name) {
            self.calls.push((name.to_string(), args.to_vec()));
            Ok(())
        } else if self.props.contains_key(name) {
            Err(MemberError::NotCallable)
        } else {
            Err(MemberError::Missing)
        }
    }
}

// ── Package ───────────────────────────────────────────────────────────────

pub struct TestResource {
    url: Option<String>,
}

impl TestResource {
    pub fn with_url(url: &str) -> Self {
        Self { url: Some(url.to_string()) }
    }

    pub fn plain() -> Self {
        Self { url: None }
    }
}

impl Resource for TestResource {
    fn object_url(&self) -> Option<String> {
        self.url.clone()
    }
}

pub struct MemoryPackage {
    name: String,
    modules: HashMap<String, Rc<dyn Resource>>,
}

impl MemoryPackage {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), modules: HashMap::new() }
    }

    pub fn with(mut self, path: &str, resource: TestResource) -> Self {
        self.modules.insert(path.to_string(), Rc::new(resource));
        self
    }
}

impl Package for MemoryPackage {
    fn full_name(&self) -> String {
        self.name.clone()
    }

    fn require(&self, path: &str) -> Option<Rc<dyn Resource>> {
        self.modules.get(path).cloned()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────

/// Opens every URI, then fails the read.
pub struct UnreadableOpener;

pub struct UnreadableStream;

impl MarkupStream for UnreadableStream {
    async fn read_as_string(self) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "stream is not valid UTF-8"))
    }
}

impl UriOpener for UnreadableOpener {
    type Stream = UnreadableStream;

    async fn open(&self, _uri: &str) -> io::Result<UnreadableStream> {
        Ok(UnreadableStream)
    }
}

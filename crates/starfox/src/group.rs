use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::object::ControlRef;

/// A named, render-scoped collection of controls, independent of the
/// containment tree.
///
/// Clones share the member list: the copy published onto the controller when
/// the group is declared sees every control that joins it afterwards.
#[derive(Clone)]
pub struct Group {
    name: Rc<str>,
    members: Rc<RefCell<Vec<ControlRef>>>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self { name: Rc::from(name), members: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&self, control: ControlRef) {
        self.members.borrow_mut().push(control);
    }

    pub fn members(&self) -> Ref<'_, Vec<ControlRef>> {
        self.members.borrow()
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    /// Whether `control` is a member (by identity).
    pub fn contains(&self, control: &ControlRef) -> bool {
        self.members.borrow().iter().any(|m| Rc::ptr_eq(m, control))
    }

    /// Whether both handles share the same member list.
    pub fn same_as(&self, other: &Group) -> bool {
        Rc::ptr_eq(&self.members, &other.members)
    }
}

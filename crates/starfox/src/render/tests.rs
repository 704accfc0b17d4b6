use std::rc::Rc;

use crate::definition::ContainerDefinition;
use crate::engine::{Engine, RenderOptions};
use crate::error::Error;
use crate::object::ObjectRef;
use crate::testing::{MemoryPackage, TestControl, TestController, TestResource, MISSING_PROPERTY, READ_ONLY_PROPERTY};
use crate::value::Value;
use crate::{App, EngineConfig};

fn engine_with(config: EngineConfig) -> Engine {
    let mut engine = Engine::new(config);
    let defs = [
        TestControl::definition("label").attribute("text", "text", "string"),
        TestControl::definition("button")
            .attribute("text", "text", "string")
            .attribute("enabled", "enabled", "boolean")
            .attribute("width", "width", "int")
            .attribute("ratio", "ratio", "float")
            .attribute("icon", "icon", "url")
            .event("click", "onClick"),
        TestControl::definition("panel").container(
            ContainerDefinition::new("items", "add").attribute("spacing", "spacing", "int"),
        ),
        TestControl::definition("tabs")
            .container(ContainerDefinition::new("header", "addHeader"))
            .container(ContainerDefinition::new("toolbar", "toolbar.add")),
        TestControl::definition("broken").container(ContainerDefinition::new("items", "missingAdd")),
        TestControl::definition("strict").container(ContainerDefinition::new("items", "notAFunction")),
        TestControl::child_of("tab", "tabs"),
        TestControl::definition("list").container(ContainerDefinition::new("item", "add")),
        TestControl::definition("item"),
        TestControl::definition("odd")
            .attribute("gone", MISSING_PROPERTY, "string")
            .attribute("locked", READ_ONLY_PROPERTY, "string"),
    ];
    for def in defs {
        engine.register_control(def).unwrap();
    }
    engine
}

fn engine() -> Engine {
    engine_with(EngineConfig::default())
}

fn render(markup: &str) -> Result<App, Error> {
    engine().render(markup, RenderOptions::new())
}

fn render_with(markup: &str, controller: ObjectRef) -> Result<App, Error> {
    engine().render(markup, RenderOptions::new().controller(controller))
}

fn unable(err: &Error) -> &str {
    match err {
        Error::UnableToRender(msg) => msg,
        other => panic!("expected UnableToRender, got {other:?}"),
    }
}

// ── Document shape ────────────────────────────────────────────────────────

#[test]
fn missing_ui_node_is_invalid_markup() {
    let err = render("<app><button/></app>").unwrap_err();
    assert!(matches!(err, Error::InvalidMarkup(ref m) if m.contains("'ui'")), "{err:?}");
}

#[test]
fn unknown_control_type_names_tag_and_name() {
    let err = render(r#"<ui name="A"><slider name="volume"/></ui>"#).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'slider'"), "{msg}");
    assert!(msg.contains("'volume'"), "{msg}");
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut engine = engine();
    let err = engine.register_control(TestControl::definition("Button")).unwrap_err();
    assert!(matches!(err, Error::DuplicateControl(ref n) if n == "Button"), "{err:?}");
}

#[test]
fn tags_match_case_insensitively_by_default() {
    let app = render(r#"<ui name="A"><Button name="ok"/><LABEL/></ui>"#).unwrap();
    assert_eq!(TestControl::child_names(&app.controls), vec!["ok", "label0"]);
}

#[test]
fn case_sensitive_mode_rejects_other_casing() {
    let engine = engine_with(EngineConfig::new().case_sensitive(true));
    let err = engine
        .render(r#"<ui name="A"><Button/></ui>"#, RenderOptions::new())
        .unwrap_err();
    assert!(unable(&err).contains("'Button'"));
}

// ── Naming ────────────────────────────────────────────────────────────────

#[test]
fn unnamed_controls_get_per_type_counters() {
    let app = render(r#"<ui name="A"><button/><label/><button/><Button name=""/></ui>"#).unwrap();
    assert_eq!(
        TestControl::child_names(&app.controls),
        vec!["button0", "label0", "button1", "button2"]
    );
}

#[test]
fn counters_restart_for_each_render() {
    let engine = engine();
    for _ in 0..2 {
        let app = engine
            .render(r#"<ui name="A"><label/></ui>"#, RenderOptions::new())
            .unwrap();
        assert_eq!(TestControl::child_names(&app.controls), vec!["label0"]);
    }
}

#[test]
fn controls_are_published_in_lower_camel_case() {
    let (shared, controller) = TestController::shared();
    render_with(r#"<ui name="A"><button name="SaveButton"/><label/></ui>"#, controller).unwrap();
    assert_eq!(shared.borrow().keys(), vec!["label0", "saveButton"]);
}

#[test]
fn rejected_publication_fails_the_render() {
    let (shared, controller) = TestController::shared();
    shared.borrow_mut().reject("ok");
    let err = render_with(r#"<ui name="A"><button name="ok"/></ui>"#, controller).unwrap_err();
    assert!(matches!(err, Error::UnableToRender(_)), "{err:?}");
}

// ── Attributes ────────────────────────────────────────────────────────────

#[test]
fn attributes_are_coerced_by_declared_type() {
    let app = render(
        r#"<ui name="A"><button text="Save" enabled="True" width="0x10" ratio="2.5em" icon="img/a.png"/></ui>"#,
    )
    .unwrap();
    let b = &app.controls[0];
    assert_eq!(TestControl::prop(b, "text").unwrap().as_str(), Some("Save"));
    assert_eq!(TestControl::prop(b, "enabled").unwrap().as_bool(), Some(true));
    assert_eq!(TestControl::prop(b, "width").unwrap().as_number(), Some(16.0));
    assert_eq!(TestControl::prop(b, "ratio").unwrap().as_number(), Some(2.5));
    assert_eq!(TestControl::prop(b, "icon").unwrap().as_str(), Some("img/a.png"));
}

#[test]
fn boolean_attribute_is_false_unless_true_or_one() {
    let app = render(r#"<ui name="A"><button enabled="TRUE"/><button enabled=" 1 "/></ui>"#).unwrap();
    assert_eq!(TestControl::prop(&app.controls[0], "enabled").unwrap().as_bool(), Some(false));
    assert_eq!(TestControl::prop(&app.controls[1], "enabled").unwrap().as_bool(), Some(true));
}

#[test]
fn undeclared_attributes_are_ignored() {
    let app = render(r#"<ui name="A"><label text="hi" colour="red"/></ui>"#).unwrap();
    TestControl::inspect(&app.controls[0], |c| {
        assert_eq!(c.props.len(), 1);
        assert!(c.props.contains_key("text"));
    });
}

#[test]
fn package_url_resolves_through_package() {
    let package = MemoryPackage::new("demo").with("img/a.png", TestResource::with_url("blob:a"));
    let app = engine()
        .render(
            r#"<ui name="A"><button icon="pkx:///img/a.png"/></ui>"#,
            RenderOptions::new().package(Rc::new(package)),
        )
        .unwrap();
    assert_eq!(TestControl::prop(&app.controls[0], "icon").unwrap().as_str(), Some("blob:a"));
}

#[test]
fn missing_property_is_invalid_control() {
    let err = render(r#"<ui name="A"><odd gone="x"/></ui>"#).unwrap_err();
    assert!(matches!(err, Error::InvalidControl(ref m) if m.contains(MISSING_PROPERTY)), "{err:?}");
}

#[test]
fn rejected_property_is_unable_to_render() {
    let err = render(r#"<ui name="A"><odd locked="x"/></ui>"#).unwrap_err();
    assert!(unable(&err).contains("'locked'"));
}

// ── Groups ────────────────────────────────────────────────────────────────

#[test]
fn groups_are_declared_before_controls() {
    let (shared, controller) = TestController::shared();
    let app = render_with(
        r#"<ui name="A"><button name="b1" group="g1"/><group name="g1"/></ui>"#,
        controller,
    )
    .unwrap();

    let group = app.group("g1").unwrap();
    assert_eq!(group.len(), 1);
    assert!(group.contains(app.control("b1").unwrap()));
    assert_eq!(app.controls.len(), 1);

    let published = shared.borrow().get("g1").unwrap();
    assert!(published.as_group().unwrap().same_as(group));
    assert!(shared.borrow().get("b1").is_some());
}

#[test]
fn nested_controls_can_join_groups() {
    let app = render(
        r#"<ui name="A"><group name="all"/><panel><button group="all"/><label group="all"/></panel></ui>"#,
    )
    .unwrap();
    let group = app.group("all").unwrap();
    assert_eq!(TestControl::child_names(&group.members()), vec!["button0", "label0"]);
}

#[test]
fn undeclared_group_fails() {
    let err = render(r#"<ui name="A"><button name="b" group="ghost"/></ui>"#).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'b'") && msg.contains("'ghost'"), "{msg}");
}

#[test]
fn duplicate_group_fails() {
    let err = render(r#"<ui name="A"><group name="g"/><group name="g"/></ui>"#).unwrap_err();
    assert!(unable(&err).contains("multiple times"));
}

#[test]
fn group_requires_name() {
    let err = render(r#"<ui name="A"><group/></ui>"#).unwrap_err();
    assert!(unable(&err).contains("'name'"));
}

// ── Containers ────────────────────────────────────────────────────────────

#[test]
fn single_container_accepts_children_directly() {
    let app = render(r#"<ui name="A"><panel><button/><label/></panel></ui>"#).unwrap();
    let panel = &app.controls[0];
    TestControl::inspect(panel, |p| {
        assert_eq!(TestControl::child_names(&p.children), vec!["button0", "label0"]);
    });
    assert_eq!(app.control_count(), 3);
    assert_eq!(app.controls.len(), 1);
}

#[test]
fn single_container_accepts_wrapper_element() {
    let app = render(r#"<ui name="A"><panel><items spacing="4"><button/></items></panel></ui>"#).unwrap();
    let panel = &app.controls[0];
    TestControl::inspect(panel, |p| {
        assert_eq!(TestControl::child_names(&p.children), vec!["button0"]);
    });
    assert_eq!(TestControl::prop(panel, "spacing").unwrap().as_number(), Some(4.0));
}

#[test]
fn container_named_like_a_control_type_takes_children_directly() {
    let app = render(r#"<ui name="A"><list><item name="a"/><item name="b"/></list></ui>"#).unwrap();
    assert_eq!(app.control_count(), 3);
    TestControl::inspect(&app.controls[0], |l| {
        assert_eq!(TestControl::child_names(&l.children), vec!["a", "b"]);
    });
    assert!(app.control("a").is_some());
}

#[test]
fn nested_children_are_published_to_controller() {
    let (shared, controller) = TestController::shared();
    render_with(r#"<ui name="A"><panel name="Main"><label name="Inner"/></panel></ui>"#, controller).unwrap();
    assert_eq!(shared.borrow().keys(), vec!["inner", "main"]);
}

#[test]
fn multiple_containers_route_by_wrapper() {
    let app = render(
        r#"<ui name="A"><tabs><header><tab/><tab/></header><toolbar><button/></toolbar></tabs></ui>"#,
    )
    .unwrap();
    TestControl::inspect(&app.controls[0], |t| {
        assert_eq!(TestControl::child_names(&t.header), vec!["tab0", "tab1"]);
        assert_eq!(TestControl::child_names(&t.toolbar.items), vec!["button0"]);
        assert!(t.children.is_empty());
    });
}

#[test]
fn multiple_containers_reject_bare_children() {
    let err = render(r#"<ui name="A"><tabs name="t"><header/><button/></tabs></ui>"#).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'button'"), "{msg}");
    assert!(msg.contains("'header, toolbar'"), "{msg}");
}

#[test]
fn control_without_containers_rejects_children() {
    let err = render(r#"<ui name="A"><label name="l"><button/></label></ui>"#).unwrap_err();
    assert!(unable(&err).contains("does not support child controls"));
}

#[test]
fn control_without_containers_rejects_text_children() {
    let err = render(r#"<ui name="A"><label>hello</label></ui>"#).unwrap_err();
    assert!(unable(&err).contains("'label0'"));
}

#[test]
fn parent_type_is_enforced() {
    let err = render(r#"<ui name="A"><panel><tab/></panel></ui>"#).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'tab'") && msg.contains("'panel'") && msg.contains("'tabs'"), "{msg}");
}

#[test]
fn top_level_controls_skip_parent_check() {
    let app = render(r#"<ui name="A"><tab/></ui>"#).unwrap();
    assert_eq!(TestControl::child_names(&app.controls), vec!["tab0"]);
}

#[test]
fn missing_add_function_is_invalid_control() {
    let err = render(r#"<ui name="A"><broken><label name="x"/></broken></ui>"#).unwrap_err();
    assert!(
        matches!(err, Error::InvalidControl(ref m) if m.contains("'x'") && m.contains("'missingAdd'")),
        "{err:?}"
    );
}

#[test]
fn non_callable_add_function_is_invalid_control() {
    let err = render(r#"<ui name="A"><strict><label/></strict></ui>"#).unwrap_err();
    assert!(matches!(err, Error::InvalidControl(_)), "{err:?}");
}

// ── Events ────────────────────────────────────────────────────────────────

#[test]
fn event_callback_calls_controller_handler() {
    let (shared, controller) = TestController::shared_with(&["save"]);
    let app = render_with(r#"<ui name="A" controller="Main"><button name="ok" onclick="save"/></ui>"#, controller)
        .unwrap();
    let button = app.control("ok").unwrap().clone();

    let callback = TestControl::prop(&button, "onClick").unwrap();
    let callback = callback.as_callback().unwrap();
    assert_eq!(callback.handler(), "save");
    callback.invoke(Value::Control(button.clone()), Value::from(3.0)).unwrap();

    let calls = shared.borrow().calls_to("save");
    assert_eq!(calls.len(), 1);
    assert!(Rc::ptr_eq(calls[0][0].as_control().unwrap(), &button));
    assert_eq!(calls[0][1].as_number(), Some(3.0));
}

#[test]
fn missing_handler_surfaces_on_invoke() {
    let (_shared, controller) = TestController::shared();
    let app = render_with(r#"<ui name="A" controller="Main"><button onclick="nope"/></ui>"#, controller).unwrap();

    let callback = TestControl::prop(&app.controls[0], "onClick").unwrap();
    let err = callback.as_callback().unwrap().invoke(Value::Null, Value::Null).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'Main'") && msg.contains("'nope'"), "{msg}");
}

#[test]
fn callback_outliving_controller_fails() {
    let (shared, controller) = TestController::shared_with(&["save"]);
    let app = render_with(r#"<ui name="A"><button onclick="save"/></ui>"#, controller).unwrap();
    let callback = TestControl::prop(&app.controls[0], "onClick").unwrap();
    drop(app);
    drop(shared);

    let err = callback.as_callback().unwrap().invoke(Value::Null, Value::Null).unwrap_err();
    assert!(matches!(err, Error::UnableToRender(_)));
}

// ── onload ────────────────────────────────────────────────────────────────

#[test]
fn control_onload_receives_the_control() {
    let (shared, controller) = TestController::shared_with(&["initList"]);
    let app = render_with(r#"<ui name="A"><panel name="list" onload="initList"/></ui>"#, controller).unwrap();

    let calls = shared.borrow().calls_to("initList");
    assert_eq!(calls.len(), 1);
    assert!(Rc::ptr_eq(calls[0][0].as_control().unwrap(), &app.controls[0]));
}

#[test]
fn control_onload_missing_handler_fails() {
    let (_shared, controller) = TestController::shared();
    let err = render_with(r#"<ui name="A"><label name="l" onload="init"/></ui>"#, controller).unwrap_err();
    let msg = unable(&err);
    assert!(msg.contains("'l'") && msg.contains("'init'"), "{msg}");
}

#[test]
fn control_onload_non_callable_member_fails() {
    let (_shared, controller) = TestController::shared();
    // `first` is published before `second` fires its onload.
    let err = render_with(
        r#"<ui name="A"><label name="first"/><label name="second" onload="first"/></ui>"#,
        controller,
    )
    .unwrap_err();
    assert!(unable(&err).contains("'first'"));
}

#[test]
fn control_onload_without_controller_fails() {
    let err = render(r#"<ui name="A"><label onload="init"/></ui>"#).unwrap_err();
    assert!(unable(&err).contains("'init'"));
}

// ── End to end ────────────────────────────────────────────────────────────

#[test]
fn renders_grouped_button_example() {
    let (shared, controller) = TestController::shared();
    let app = render_with(
        r#"<ui name="A"><button name="b1" group="g1" enabled="true"/><group name="g1"/></ui>"#,
        controller,
    )
    .unwrap();

    let b1 = app.control("b1").unwrap();
    assert_eq!(TestControl::prop(b1, "enabled").unwrap().as_bool(), Some(true));
    assert!(app.group("g1").unwrap().contains(b1));

    let controller = shared.borrow();
    assert!(Rc::ptr_eq(controller.get("b1").unwrap().as_control().unwrap(), b1));
    assert!(controller.get("g1").unwrap().as_group().is_some());
}

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use log::{info, warn};
use starfox_uixml::{Document, ParseError};

use crate::app::App;
use crate::config::EngineConfig;
use crate::definition::ControlDefinition;
use crate::error::{Error, Result};
use crate::load::{MarkupStream, UriOpener};
use crate::object::{call_path, ControlRef, MemberError, ObjectRef};
use crate::registry::ControlRegistry;
use crate::render::{Renderer, UI_TAG};
use crate::resource::Package;

// ── MarkupParser ──────────────────────────────────────────────────────────

/// The XML parsing capability the engine renders from.
pub trait MarkupParser {
    fn parse(&self, markup: &str) -> Result<Document, ParseError>;
}

/// quick-xml backed parser from `starfox-uixml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UixmlParser;

impl MarkupParser for UixmlParser {
    fn parse(&self, markup: &str) -> Result<Document, ParseError> {
        starfox_uixml::parse_str(markup)
    }
}

// ── RenderOptions ─────────────────────────────────────────────────────────

pub type ControllerFactory = Box<dyn Fn() -> ObjectRef>;

/// Per-render inputs.
#[derive(Default)]
pub struct RenderOptions {
    /// Controller to publish onto. Takes precedence over `ui@controller`.
    pub controller: Option<ObjectRef>,
    /// Package `resource` attributes resolve against.
    pub package: Option<Rc<dyn Package>>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(mut self, controller: ObjectRef) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn package(mut self, package: Rc<dyn Package>) -> Self {
        self.package = Some(package);
        self
    }
}

// ── Engine ────────────────────────────────────────────────────────────────

/// Owns the control registry and renders UIXML documents against it.
///
/// Register every control type (and controller) first, then render. The
/// registry is only mutable through `&mut Engine`, so nothing can register
/// while a render holds `&Engine`.
///
/// ```rust
/// use starfox::{Engine, EngineConfig, RenderOptions, UixmlParser};
///
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.set_parser(UixmlParser);
/// let app = engine.render(r#"<ui name="Empty"/>"#, RenderOptions::new()).unwrap();
/// assert_eq!(app.name, "Empty");
/// assert!(app.controls.is_empty());
/// ```
pub struct Engine {
    config: EngineConfig,
    registry: ControlRegistry,
    controllers: HashMap<String, ControllerFactory>,
    parser: Option<Box<dyn MarkupParser>>,
}

impl Engine {
    /// A new engine; with the `builtin-parser` feature the UIXML parser is
    /// installed already.
    pub fn new(config: EngineConfig) -> Self {
        let parser: Option<Box<dyn MarkupParser>> = if cfg!(feature = "builtin-parser") {
            Some(Box::new(UixmlParser))
        } else {
            None
        };
        Self {
            registry: ControlRegistry::new(config.case_sensitive),
            config,
            controllers: HashMap::new(),
            parser,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn set_parser(&mut self, parser: impl MarkupParser + 'static) {
        self.parser = Some(Box::new(parser));
    }

    pub fn clear_parser(&mut self) {
        self.parser = None;
    }

    pub fn register_control(&mut self, definition: ControlDefinition) -> Result<()> {
        self.registry.register(definition)
    }

    /// Make `name` usable as `ui@controller`. Re-registering replaces.
    pub fn register_controller(&mut self, name: impl Into<String>, factory: impl Fn() -> ObjectRef + 'static) {
        self.controllers.insert(name.into(), Box::new(factory));
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    fn parse(&self, markup: &str) -> Result<Document> {
        let parser = self.parser.as_deref().ok_or(Error::UnsupportedRuntime)?;
        Ok(parser.parse(markup)?)
    }

    /// Render a UIXML document into an [`App`].
    pub fn render(&self, markup: &str, options: RenderOptions) -> Result<App> {
        let doc = self.parse(markup)?;
        let ui = doc.find_first(UI_TAG).ok_or_else(|| {
            Error::InvalidMarkup("The specified xml does not have a 'ui' node.".into())
        })?;

        let mut app = App::from_ui_node(ui)?;
        app.package = options.package;
        app.instance = match options.controller {
            Some(controller) => Some(controller),
            None => self.instantiate_controller(app.controller.as_deref())?,
        };

        let mut renderer = Renderer::new(
            &self.registry,
            app.instance.clone(),
            app.package.clone(),
            app.controller.clone(),
        );
        app.controls = renderer.render_root(ui)?;
        let (groups, rendered) = renderer.finish();
        app.groups = groups;
        app.rendered = rendered;

        if let Some(main) = app.main.as_deref() {
            if app.main_control().is_none() {
                return Err(Error::UnableToRender(format!(
                    "App '{}' names main control '{main}', which is not defined in the UIXML.",
                    app.name
                )));
            }
        }
        if let Some(hook) = app.on_load.as_deref() {
            run_app_hook(&app, hook)?;
        }

        info!(
            "rendered app '{}': {} controls ({} top-level), {} groups",
            app.name,
            app.rendered.len(),
            app.controls.len(),
            app.groups.len()
        );
        Ok(app)
    }

    /// Render the element children of a fragment's root element on behalf
    /// of `owner`.
    ///
    /// Event and onload handlers resolve on `owner`, and each control is
    /// assigned onto it under its name as written. The fragment root's own
    /// tag is not interpreted.
    pub fn render_fragment(&self, markup: &str, owner: ObjectRef, options: RenderOptions) -> Result<Vec<ControlRef>> {
        let doc = self.parse(markup)?;
        let mut renderer = Renderer::new(&self.registry, options.controller, options.package, None);
        renderer.render_owned(&doc.root, &owner)
    }

    /// Open `uri`, read it as text and render it.
    ///
    /// Open and read failures surface as [`Error::Io`] through the same
    /// result as render failures.
    pub async fn load<O: UriOpener>(&self, opener: &O, uri: &str, options: RenderOptions) -> Result<App> {
        let text = async {
            let stream = opener.open(uri).await?;
            stream.read_as_string().await
        }
        .await
        .inspect_err(|e| warn!("failed to load '{uri}': {e}"))?;

        self.render(&text, options)
            .inspect_err(|e| warn!("failed to render '{uri}': {e}"))
    }

    fn instantiate_controller(&self, name: Option<&str>) -> Result<Option<ObjectRef>> {
        let Some(name) = name else { return Ok(None) };
        let factory = self.controllers.get(name).ok_or_else(|| {
            Error::UnableToRender(format!("Controller '{name}' is not registered."))
        })?;
        Ok(Some(factory()))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("registry", &self.registry.names())
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

/// Call the app-level `onload` function on the controller.
fn run_app_hook(app: &App, hook: &str) -> Result<()> {
    let missing = || {
        Error::UnableToRender(format!(
            "App '{}' is missing controller function '{hook}' for the onLoad event.",
            app.name
        ))
    };
    let controller = app.instance.as_ref().ok_or_else(missing)?;
    let mut controller = controller.try_borrow_mut().map_err(|_| {
        Error::UnableToRender(format!("App '{}': the controller is already in use.", app.name))
    })?;
    match call_path(&mut *controller, hook, &[]) {
        Ok(()) => Ok(()),
        Err(MemberError::Missing | MemberError::NotCallable) => Err(missing()),
        Err(MemberError::Failed(msg)) => Err(Error::UnableToRender(format!(
            "App '{}': onLoad function '{hook}' failed: {msg}",
            app.name
        ))),
    }
}

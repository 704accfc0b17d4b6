mod controls;

use anyhow::{Context, Result};
use starfox::{
    init_logging, ControlRef, Engine, EngineConfig, FileOpener, LoggingConfig, MemoryOpener, RenderOptions,
};

use controls::DemoControl;

const DEMO_URI: &str = "demo.xml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log {
        logging = logging.with_filter(filter.as_str());
    }
    init_logging(logging);

    let mut engine = Engine::new(EngineConfig::from_env());
    controls::register(&mut engine).context("registering demo controls")?;

    // No argument: preview the bundled demo document.
    let app = match args.path {
        Some(path) => engine
            .load(&FileOpener::new(), &path, RenderOptions::new())
            .await
            .with_context(|| format!("rendering {path}"))?,
        None => {
            let opener = MemoryOpener::new().with(DEMO_URI, include_str!("../ui/demo.xml"));
            engine
                .load(&opener, DEMO_URI, RenderOptions::new())
                .await
                .context("rendering bundled demo")?
        }
    };

    println!();
    println!("  app      {}", app.name);
    if let Some(icon) = &app.icon {
        println!("  icon     {icon}");
    }
    if let Some(controller) = &app.controller {
        println!("  control  {controller}");
    }
    println!();
    for control in &app.controls {
        print_tree(control, "", 1);
    }
    for group in app.groups() {
        let members: Vec<String> = group.members().iter().map(|c| c.borrow().name().to_string()).collect();
        println!("  group {} [{}]", group.name(), members.join(", "));
    }
    println!();

    let clicked = controls::click_all(app.all_controls()).context("firing click events")?;
    log::info!("fired {clicked} click handlers");
    Ok(())
}

/// `starfox-preview [--log <filter>] [path]`
#[derive(Debug, Default, PartialEq)]
struct Args {
    log: Option<String>,
    path: Option<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--log" {
                parsed.log = Some(args.next().context("--log needs a filter")?);
            } else if parsed.path.is_none() {
                parsed.path = Some(arg);
            } else {
                anyhow::bail!("unexpected argument '{arg}'");
            }
        }
        Ok(parsed)
    }
}

fn print_tree(control: &ControlRef, slot: &str, depth: usize) {
    let c = control.borrow();
    let indent = "  ".repeat(depth);
    let slot = if slot.is_empty() { String::new() } else { format!("{slot}: ") };
    println!("{indent}{slot}<{}> {}", c.control_type(), c.name());

    let Some(demo) = c.as_any().downcast_ref::<DemoControl>() else { return };
    for (name, value) in &demo.props {
        println!("{indent}    .{name} = {value:?}");
    }
    for (slot, child) in demo.all_children() {
        print_tree(child, slot, depth + 1);
    }
}

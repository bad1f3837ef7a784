//! Slidekit playground
//!
//! Builds a page with tabs and panels, attaches a component and replays a
//! list of actions, printing one JSON snapshot per action.
//!
//! ```text
//! slidekit-playground -n 7 --actions next,next,scroll:420 slider --loop
//! slidekit-playground --viewport 300 --actions resize:1300 group
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slidekit_animation::Scheduler;
use slidekit_core::{set_global_config, Config, Document, ElementId, SharedDocument};
use slidekit_tabs::{Host, PlainTabs, Slider, SliderGroup, TabPanels, TabsEvent, ACTIVATED};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Longest a single action may take to settle
const SETTLE_LIMIT_MS: f64 = 5_000.0;

#[derive(Parser)]
#[command(name = "slidekit-playground")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Drive slidekit components against a generated page", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file (reduce_motion, font_size_multiplier)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of tabs and panels
    #[arg(short = 'n', long, default_value = "5", global = true)]
    count: usize,

    /// Viewport width in px
    #[arg(long, default_value = "1024", global = true)]
    viewport: f32,

    /// Track width in px
    #[arg(long, default_value = "100", global = true)]
    track_width: f32,

    /// Actions: next, prev, home, end, click:N, scroll:PX, resize:WIDTH
    #[arg(short, long, value_delimiter = ',', global = true)]
    actions: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plain tabs
    Tabs,

    /// Scroll-synchronized slider
    Slider {
        /// Panel layout
        #[arg(short, long, value_enum, default_value = "single")]
        layout: Layout,

        /// Endless loop mode
        #[arg(long = "loop")]
        looped: bool,

        /// Breakpoint widths (group layout)
        #[arg(long, default_value = "0,600,900,1200")]
        breakpoints: String,

        /// Items per panel for each breakpoint (group layout)
        #[arg(long, default_value = "1,2,3,4")]
        visible: String,
    },

    /// Breakpoint-grouped slider
    Group {
        /// Breakpoint widths
        #[arg(long, default_value = "0,600,900,1200")]
        breakpoints: String,

        /// Items per panel for each breakpoint
        #[arg(long, default_value = "1,2,3,4")]
        visible: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    Single,
    Group,
    Flex,
}

impl Layout {
    fn as_str(&self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::Group => "group",
            Layout::Flex => "flex",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Action {
    Next,
    Prev,
    Home,
    End,
    Click(usize),
    Scroll(f32),
    Resize(f32),
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        let text = text.trim();
        let (name, arg) = match text.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (text, None),
        };
        let action = match (name, arg) {
            ("next", None) => Action::Next,
            ("prev", None) => Action::Prev,
            ("home", None) => Action::Home,
            ("end", None) => Action::End,
            ("click", Some(arg)) => Action::Click(arg.parse().context("click index")?),
            ("scroll", Some(arg)) => Action::Scroll(arg.parse().context("scroll offset")?),
            ("resize", Some(arg)) => Action::Resize(arg.parse().context("viewport width")?),
            _ => bail!("Unknown action '{}'", text),
        };
        Ok(action)
    }
}

/// State after one action
#[derive(Serialize)]
struct Snapshot<'a> {
    action: &'a str,
    handled: bool,
    current_index: usize,
    panel_index: usize,
    end_index: usize,
    scroll_left: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    loop_copy: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotations: Option<usize>,
}

enum Component {
    Tabs(PlainTabs),
    Slider(Slider),
    Group(SliderGroup),
}

impl Component {
    fn handle_key(&self, key: &str) -> bool {
        match self {
            Component::Tabs(c) => c.handle_key(key),
            Component::Slider(c) => c.handle_key(key),
            Component::Group(c) => c.handle_key(key),
        }
    }

    fn handle_click(&self, target: ElementId) -> bool {
        match self {
            Component::Tabs(c) => c.handle_click(target),
            Component::Slider(c) => c.handle_click(target),
            Component::Group(c) => c.handle_click(target),
        }
    }

    fn handle_scroll(&self) -> bool {
        match self {
            Component::Tabs(_) => false,
            Component::Slider(c) => c.handle_scroll(),
            Component::Group(c) => c.handle_scroll(),
        }
    }

    fn handle_resize(&self) -> bool {
        match self {
            Component::Tabs(_) => false,
            Component::Slider(c) => c.handle_resize(),
            Component::Group(c) => c.handle_resize(),
        }
    }

    fn snapshot<'a>(&self, action: &'a str, handled: bool, scroll_left: f32) -> Snapshot<'a> {
        let (current_index, panel_index, end_index) = match self {
            Component::Tabs(c) => (c.current_index(), c.panel_index(), c.end_index()),
            Component::Slider(c) => (c.current_index(), c.panel_index(), c.end_index()),
            Component::Group(c) => (c.current_index(), c.panel_index(), c.end_index()),
        };
        let (loop_copy, rotations) = match self {
            Component::Slider(c) if c.loop_init_length() > 0 => {
                (Some(c.loop_current_index()), Some(c.rotations()))
            }
            _ => (None, None),
        };
        Snapshot {
            action,
            handled,
            current_index,
            panel_index,
            end_index,
            scroll_left,
            loop_copy,
            rotations,
        }
    }
}

/// Generated page: root > (tablist > tab*) + (track > panel* > item)
struct Page {
    doc: SharedDocument,
    root: ElementId,
    tabs: Vec<ElementId>,
    track: ElementId,
}

fn build_page(cli: &Cli, attributes: &[(&str, &str)], flex: bool) -> Page {
    let mut doc = Document::new();
    doc.set_viewport_width(cli.viewport);

    let root = doc.append_new(doc.body(), "div");
    for (name, value) in attributes {
        doc.set_attribute(root, name, *value);
    }
    let tablist = doc.append_new(root, "div");
    doc.set_attribute(tablist, "role", "tablist");
    let track = doc.append_new(root, "div");
    doc.set_attribute(track, "data-track", "");
    doc.set_style(track, "scroll-snap-type", "x mandatory");
    doc.set_width(track, cli.track_width);

    let mut tabs = Vec::with_capacity(cli.count);
    for i in 0..cli.count {
        let tab = doc.append_new(tablist, "a");
        doc.set_attribute(tab, "role", "tab");
        doc.set_attribute(tab, "href", format!("#slide-{i}"));
        tabs.push(tab);

        let panel = doc.append_new(track, "section");
        doc.set_attribute(panel, "role", "tabpanel");
        doc.set_attribute(panel, "id", format!("slide-{i}"));
        let item = doc.append_new(panel, "article");
        if flex {
            doc.set_width(item, cli.track_width * (1.0 + (i % 3) as f32 * 0.5));
        } else {
            doc.set_width(item, cli.track_width);
        }
        let link = doc.append_new(item, "a");
        doc.set_attribute(link, "href", format!("#item-{i}"));
    }

    Page {
        doc: doc.into_shared(),
        root,
        tabs,
        track,
    }
}

/// Root attributes and whether items get varied widths
fn page_attributes(command: &Commands) -> (Vec<(&str, &str)>, bool) {
    match command {
        Commands::Tabs => (Vec::new(), false),
        Commands::Slider {
            layout,
            looped,
            breakpoints,
            visible,
        } => {
            let mut attributes = vec![("type", layout.as_str())];
            if *looped {
                attributes.push(("loop", ""));
            }
            if *layout == Layout::Group {
                attributes.push(("breakpoints", breakpoints.as_str()));
                attributes.push(("visible", visible.as_str()));
            }
            (attributes, *layout == Layout::Flex)
        }
        Commands::Group {
            breakpoints,
            visible,
        } => (
            vec![("breakpoints", breakpoints.as_str()), ("visible", visible.as_str())],
            false,
        ),
    }
}

fn attach(cli: &Cli, config: Option<Config>) -> Result<(Component, Page, Scheduler)> {
    let (attributes, flex) = page_attributes(&cli.command);
    let page = build_page(cli, &attributes, flex);

    let scheduler = Scheduler::new();
    let host = match config {
        Some(config) => Host::with_config(page.doc.clone(), scheduler.clone(), config),
        None => Host::new(page.doc.clone(), scheduler.clone()),
    };
    let component = match &cli.command {
        Commands::Tabs => Component::Tabs(PlainTabs::attach(&host, page.root, TabPanels)?),
        Commands::Slider { .. } => Component::Slider(Slider::attach(&host, page.root)?),
        Commands::Group { .. } => Component::Group(SliderGroup::attach(&host, page.root)?),
    };
    Ok((component, page, scheduler))
}

fn load_config(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = Config::from_toml_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.count == 0 {
        bail!("--count must be at least 1");
    }
    let actions = cli
        .actions
        .iter()
        .map(|text| text.parse::<Action>())
        .collect::<Result<Vec<_>>>()?;

    if let Some(path) = &cli.config {
        let config = load_config(path)?;
        info!(
            "Loaded config: reduce_motion={}, font_size_multiplier={}",
            config.reduce_motion, config.font_size_multiplier
        );
        set_global_config(config);
    }

    let (component, page, scheduler) =
        attach(&cli, None).context("Failed to attach component")?;
    let listener = |event: &TabsEvent| {
        info!(
            "Settled on tab {} (panel {}, source {})",
            event.indexes.current_index, event.indexes.panel_index, event.source
        );
    };
    let _listener = match &component {
        Component::Tabs(c) => c.subscribe(ACTIVATED, listener),
        Component::Slider(c) => c.subscribe(ACTIVATED, listener),
        Component::Group(c) => c.subscribe(ACTIVATED, listener),
    };

    let scroll_left = || page.doc.borrow().scroll_left(page.track);
    println!(
        "{}",
        serde_json::to_string(&component.snapshot("attach", true, scroll_left()))?
    );

    for (text, action) in cli.actions.iter().zip(actions) {
        debug!(?action, "replaying");
        let handled = match action {
            Action::Next => component.handle_key("ArrowRight"),
            Action::Prev => component.handle_key("ArrowLeft"),
            Action::Home => component.handle_key("Home"),
            Action::End => component.handle_key("End"),
            Action::Click(index) => match page.tabs.get(index) {
                Some(&tab) => component.handle_click(tab),
                None => bail!("No tab at index {} (count is {})", index, page.tabs.len()),
            },
            Action::Scroll(offset) => {
                page.doc.borrow_mut().set_scroll_left(page.track, offset);
                component.handle_scroll()
            }
            Action::Resize(width) => {
                page.doc.borrow_mut().set_viewport_width(width);
                component.handle_resize()
            }
        };
        if !scheduler.run_until_idle(SETTLE_LIMIT_MS) {
            bail!("Action '{}' did not settle within {}ms", text, SETTLE_LIMIT_MS);
        }
        println!(
            "{}",
            serde_json::to_string(&component.snapshot(text, handled, scroll_left()))?
        );
    }

    Ok(())
}

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use crate::cli::commands::{Cli, SectionLayoutArg, StackLayoutArg, TaskLayoutArg, parse_layout};
use crate::io::backend::{Backend, BackendError, DATA_ENV};
use crate::io::config_io::{self, Cascade};
use crate::io::csv_source::{CsvLoad, load_csv};
use crate::io::data_store::{self, DataError, StoreState};
use crate::model::{ConfigMap, TaskRecord, TouchedSet, split_list};
use crate::ops::{FieldError, Grouping, SectionOrder, StackSort, validate_fields};
use crate::render::console;
use crate::render::{
    Body, Fragment, ListEnds, RenderContext, SectionLayout, Sectioner, StackLayout, Stacker, Tasker,
};
use crate::style::{StyleResolver, ThemeRegistry, UnknownTheme};

/// Configuration sources, merged in this order
pub const CONFIG_NAMES: &[&str] = &["taskrc", "twdrc"];

/// Order of status sections unless configured otherwise
pub const STATUS_ORDER: &[&str] = &["pending", "started", "completed"];

/// Order of priority sections unless configured otherwise
pub const PRIORITY_ORDER: &[&str] = &["H", "M", "L"];

/// Errors that end a run, each with its own exit code
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Fields(#[from] FieldError),
    #[error(transparent)]
    Theme(#[from] UnknownTheme),
    #[error("invalid value '{value}' for {key}")]
    InvalidSetting { key: String, value: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Backend(e) => e.exit_code().unwrap_or(1),
            AppError::Data(DataError::NotFound) => 2,
            AppError::Data(DataError::CannotInitialize { .. }) => 3,
            AppError::Data(DataError::Unreadable { .. }) => 5,
            AppError::Fields(_) => 4,
            AppError::Theme(_) | AppError::InvalidSetting { .. } | AppError::Io(_) => 1,
        }
    }
}

/// Layout defaults, merged under every configuration file
pub fn layout_defaults() -> ConfigMap {
    [
        ("layout.task", "raw"),
        ("layout.stack", "raw-table"),
        ("layout.sections", "horizontal"),
        ("layout.subsections", "vertical"),
        ("layout.show", "id,description,tags"),
        ("layout.sections.group", "status"),
        ("layout.stack.sort.reverse", "no"),
        ("layout.card.wrap", "25"),
        ("layout.list.ends", "[]"),
        ("layout.filtered", "no"),
        ("dateformat", "%Y-%m-%d"),
        ("backend.program", "task"),
        ("csv.lists", "tags"),
    ]
    .into_iter()
    .collect()
}

/// Seed from the theme and layout defaults, then merge each cascade.
pub fn load_config(theme: &str, themes: &ThemeRegistry, cascade: &Cascade) -> Result<ConfigMap, AppError> {
    let mut seed = layout_defaults();
    seed.extend(themes.get(theme)?);
    Ok(CONFIG_NAMES
        .iter()
        .fold(seed, |map, name| config_io::load(name, map, cascade)))
}

/// Every rendering choice, after CLI flags have overridden configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub show: Vec<String>,
    pub task_layout: TaskLayoutArg,
    pub stack_layout: StackLayout,
    pub section_layout: SectionLayout,
    pub subsection_layout: SectionLayout,
    pub group: String,
    pub order: SectionOrder,
    pub subgroup: Option<String>,
    pub suborder: SectionOrder,
    pub sort: StackSort,
    pub card_wrap: usize,
    pub ends: ListEnds,
    pub filtered: bool,
    pub date_format: String,
    pub program: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &ConfigMap) -> Result<Settings, AppError> {
        let sep = cli.list_separator;
        let show = match &cli.show {
            Some(s) => split_list(s, sep),
            None => config.get_list("layout.show", ',').unwrap_or_default(),
        };

        let task_layout = match cli.layout_task {
            Some(l) => l,
            None => layout_setting::<TaskLayoutArg>(config, "layout.task")?,
        };
        let stack_layout = match cli.layout_stack {
            Some(l) => l,
            None => layout_setting::<StackLayoutArg>(config, "layout.stack")?,
        };
        let section_layout = match cli.layout_sections {
            Some(l) => l,
            None => layout_setting::<SectionLayoutArg>(config, "layout.sections")?,
        };
        let subsection_layout = layout_setting::<SectionLayoutArg>(config, "layout.subsections")?;

        let group = cli
            .group
            .clone()
            .or_else(|| config.get("layout.sections.group").map(str::to_string))
            .unwrap_or_else(|| "status".to_string());
        let order = section_order(
            cli.order.as_deref().map(|o| split_list(o, sep)),
            cli.group.is_some(),
            config.get_list("layout.sections.order", ','),
            &group,
        );

        let subgroup = cli
            .subgroup
            .clone()
            .or_else(|| config.get("layout.subsections.group").map(str::to_string))
            .filter(|g| !g.is_empty());
        let suborder = match &subgroup {
            Some(field) => section_order(
                cli.suborder.as_deref().map(|o| split_list(o, sep)),
                cli.subgroup.is_some(),
                config.get_list("layout.subsections.order", ','),
                field,
            ),
            None => SectionOrder::AsGrouped,
        };

        let reverse = cli.reverse || bool_setting(config, "layout.stack.sort.reverse")?;
        let sort = cli
            .sort
            .clone()
            .or_else(|| config.get("layout.stack.sort").map(str::to_string))
            .filter(|f| !f.is_empty())
            .map_or(StackSort::None, |field| StackSort::by(&field, reverse));

        let card_wrap = match cli.card_wrap {
            Some(w) => w,
            None => usize_setting(config, "layout.card.wrap")?,
        };

        Ok(Settings {
            show,
            task_layout,
            stack_layout: stack_layout.into(),
            section_layout: section_layout.into(),
            subsection_layout: subsection_layout.into(),
            group,
            order,
            subgroup,
            suborder,
            sort,
            card_wrap,
            ends: ListEnds::parse(config.get("layout.list.ends").unwrap_or_default()),
            filtered: cli.filtered || bool_setting(config, "layout.filtered")?,
            date_format: config.get("dateformat").unwrap_or("%Y-%m-%d").to_string(),
            program: config.get("backend.program").unwrap_or("task").to_string(),
        })
    }

    /// Build the renderer tree: tasker inside stacker inside sectioner(s).
    pub fn sectioner(&self) -> Sectioner {
        let tasker = match self.task_layout {
            TaskLayoutArg::Raw => Tasker::raw(self.show.clone()),
            TaskLayoutArg::Card => Tasker::Card {
                fields: self.show.clone(),
                wrap: self.card_wrap,
                ends: self.ends.clone(),
            },
        };
        let stacker = Stacker::new(self.stack_layout, tasker).sorted(self.sort.clone());
        let body: Body = match &self.subgroup {
            Some(field) => Sectioner::new(
                self.subsection_layout,
                Grouping::by(field),
                self.suborder.clone(),
                stacker,
            )
            .into(),
            None => stacker.into(),
        };
        Sectioner::new(
            self.section_layout,
            Grouping::by(&self.group),
            self.order.clone(),
            body,
        )
    }
}

/// An explicit order wins. A config order only applies to the configured
/// grouping field, so it is ignored when the field was overridden.
fn section_order(
    explicit: Option<Vec<String>>,
    group_overridden: bool,
    configured: Option<Vec<String>>,
    field: &str,
) -> SectionOrder {
    let values = explicit
        .or(if group_overridden { None } else { configured })
        .filter(|v| !v.is_empty())
        .or_else(|| default_order(field));
    values.map_or(SectionOrder::AsGrouped, SectionOrder::OnValues)
}

fn default_order(field: &str) -> Option<Vec<String>> {
    let values = match field {
        "status" => STATUS_ORDER,
        "priority" => PRIORITY_ORDER,
        _ => return None,
    };
    Some(values.iter().map(|s| s.to_string()).collect())
}

fn invalid(config: &ConfigMap, key: &str) -> AppError {
    AppError::InvalidSetting {
        key: key.to_string(),
        value: config.get(key).unwrap_or_default().to_string(),
    }
}

fn layout_setting<T: clap::ValueEnum>(config: &ConfigMap, key: &str) -> Result<T, AppError> {
    config
        .get(key)
        .and_then(parse_layout::<T>)
        .ok_or_else(|| invalid(config, key))
}

fn bool_setting(config: &ConfigMap, key: &str) -> Result<bool, AppError> {
    match config.get(key) {
        None => Ok(false),
        Some(_) => config.get_bool(key).ok_or_else(|| invalid(config, key)),
    }
}

fn usize_setting(config: &ConfigMap, key: &str) -> Result<usize, AppError> {
    config.get_usize(key).ok_or_else(|| invalid(config, key))
}

/// Tasks to render and the ids the user's command touched.
pub fn fetch(cli: &Cli, config: &ConfigMap, settings: &Settings) -> Result<(Vec<TaskRecord>, TouchedSet), AppError> {
    if let Some(path) = &cli.csv {
        let lists = config.get_list("csv.lists", ',').unwrap_or_default();
        return match load_csv(path, &lists)? {
            CsvLoad::Loaded(tasks) => Ok((tasks, TouchedSet::new())),
            CsvLoad::InitializedEmpty => {
                tracing::info!(path = %path.display(), "initialized empty task file");
                Ok((Vec::new(), TouchedSet::new()))
            }
        };
    }

    let cwd = std::env::current_dir()?;
    let env = std::env::var_os(DATA_ENV).map(PathBuf::from);
    let dir = data_store::locate(cli.data.as_deref(), env, &cwd)?;
    let state = data_store::open_store(&dir)?;
    if state == StoreState::InitializedEmpty {
        tracing::info!(path = %dir.display(), "initialized empty data store");
        if cli.cmd.is_empty() {
            return Ok((Vec::new(), TouchedSet::new()));
        }
    }

    let backend = Backend::new(settings.program.clone(), dir);
    let touched = if cli.cmd.is_empty() {
        TouchedSet::new()
    } else {
        let out = backend.pass_through(&cli.cmd)?;
        let message = out.stdout.trim();
        if !out.is_report() && !message.is_empty() {
            println!("{message}");
        }
        out.touched
    };

    let filter: &[String] = if settings.filtered { &cli.cmd } else { &[] };
    let tasks = backend.export(filter)?;
    tracing::debug!(count = tasks.len(), touched = touched.len(), "loaded tasks");
    Ok((tasks, touched))
}

/// The whole run: config, data, validation, rendering, output.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let themes = ThemeRegistry::default();
    let cascade = Cascade::from_env()?;
    let config = load_config(&cli.theme, &themes, &cascade)?;
    let settings = Settings::resolve(&cli, &config)?;

    // Fields the backend can never produce are rejected before the command
    // reaches it.
    if cli.csv.is_none() && !cli.cmd.is_empty() {
        validate_fields(&settings.show, &[], &config)?;
    }
    let (tasks, touched) = fetch(&cli, &config, &settings)?;
    validate_fields(&settings.show, &tasks, &config)?;

    let styles = StyleResolver::new(&config);
    let ctx = RenderContext {
        styles: &styles,
        touched: &touched,
        date_format: &settings.date_format,
    };
    let refs: Vec<&TaskRecord> = tasks.iter().collect();
    let root = settings.sectioner().render(&refs, &ctx);
    emit(&root, &cli)
}

fn emit(root: &Fragment, cli: &Cli) -> Result<(), AppError> {
    let width = console::terminal_width(cli.width);
    let buf = console::render_to_buffer(root, width);
    let stdout = io::stdout();
    let color = console::color_enabled(cli.no_color) && stdout.is_terminal();
    let mut out = stdout.lock();
    if color {
        console::write_ansi(&buf, &mut out)?;
    } else {
        console::write_plain(&buf, &mut out)?;
    }
    Ok(())
}

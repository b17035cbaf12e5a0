use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::render::{SectionLayout, StackLayout};

#[derive(Parser, Debug)]
#[command(
    name = "twd",
    about = concat!("twd v", env!("CARGO_PKG_VERSION"), " - your task list, sectioned and styled"),
    version
)]
pub struct Cli {
    /// Ordered list of fields to show
    #[arg(short = 's', long, value_name = "FIELDS")]
    pub show: Option<String>,

    /// Separator used by list-valued options
    #[arg(long, value_name = "CHAR", default_value_t = ',')]
    pub list_separator: char,

    /// Backend data directory (default: TASKDATA, then the nearest .task/)
    #[arg(short = 'd', long = "data", value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Read tasks from a CSV file instead of calling the backend
    #[arg(long, value_name = "FILE", conflicts_with = "data")]
    pub csv: Option<PathBuf>,

    /// How each task is drawn
    #[arg(short = 't', long = "layout-task", value_enum, ignore_case = true)]
    pub layout_task: Option<TaskLayoutArg>,

    /// How the tasks of a section are arranged
    #[arg(short = 'k', long = "layout-stack", value_enum, ignore_case = true)]
    pub layout_stack: Option<StackLayoutArg>,

    /// How sections are arranged
    #[arg(short = 'c', long = "layout-sections", value_enum, ignore_case = true)]
    pub layout_sections: Option<SectionLayoutArg>,

    /// Field to group sections by
    #[arg(short = 'g', long, value_name = "FIELD")]
    pub group: Option<String>,

    /// Section keys to show, in order
    #[arg(long, value_name = "KEYS")]
    pub order: Option<String>,

    /// Field to group sub-sections by
    #[arg(long, value_name = "FIELD")]
    pub subgroup: Option<String>,

    /// Sub-section keys to show, in order
    #[arg(long, value_name = "KEYS")]
    pub suborder: Option<String>,

    /// Field to sort each stack by
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Reverse the stack sort
    #[arg(long)]
    pub reverse: bool,

    /// Color theme
    #[arg(short = 'T', long, value_name = "NAME", default_value = "none")]
    pub theme: String,

    /// Width at which card descriptions wrap
    #[arg(long, value_name = "NB")]
    pub card_wrap: Option<usize>,

    /// Show only the tasks matched by the command's filter
    #[arg(short = 'f', long)]
    pub filtered: bool,

    /// Output width (default: terminal width, else 80)
    #[arg(short = 'w', long, value_name = "COLS")]
    pub width: Option<u16>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Command forwarded verbatim to the backend
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CMD")]
    pub cmd: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskLayoutArg {
    Raw,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StackLayoutArg {
    #[value(alias = "rawtable", alias = "table")]
    RawTable,
    Vertical,
    #[value(alias = "flow")]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SectionLayoutArg {
    Vertical,
    Horizontal,
}

impl From<StackLayoutArg> for StackLayout {
    fn from(arg: StackLayoutArg) -> Self {
        match arg {
            StackLayoutArg::RawTable => StackLayout::RawTable,
            StackLayoutArg::Vertical => StackLayout::Vertical,
            StackLayoutArg::Flat => StackLayout::Flat,
        }
    }
}

impl From<SectionLayoutArg> for SectionLayout {
    fn from(arg: SectionLayoutArg) -> Self {
        match arg {
            SectionLayoutArg::Vertical => SectionLayout::Vertical,
            SectionLayoutArg::Horizontal => SectionLayout::Horizontal,
        }
    }
}

/// Parse a layout name from configuration, case-insensitively.
pub fn parse_layout<T: ValueEnum>(value: &str) -> Option<T> {
    T::from_str(value.trim(), true).ok()
}

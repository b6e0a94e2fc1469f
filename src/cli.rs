use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::table::CycleGuard;

pub const DEFAULT_BASE_URL: &str = "http://dicom.nema.org/medical/dicom/current/output/html/";

#[derive(Parser, Debug)]
#[command(
    name = "dicom-standard",
    version,
    about = "Rebuild DICOM PS3.3 tables into structured JSON"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every table of one chapter.
    Inventory(InventoryArgs),
    /// Extract composite IOD module tables.
    Ciods(ExtractArgs),
    /// Extract module attribute tables with macros expanded.
    Modules(ExtractArgs),
    NormalizeCiods(NormalizeArgs),
    CiodModules(NormalizeArgs),
    ModuleAttributes(NormalizeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long)]
    pub standard: PathBuf,

    #[arg(long, default_value = "chapter_A")]
    pub chapter: String,

    /// Written to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub standard: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    /// Overrides the chapter the table family normally lives in.
    #[arg(long)]
    pub chapter: Option<String>,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "part03.html")]
    pub part_page: String,

    #[arg(long)]
    pub report_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CycleGuardMode::Ancestors)]
    pub cycle_guard: CycleGuardMode,
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Output of the matching extraction command.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CycleGuardMode {
    Ancestors,
    Caller,
}

impl CycleGuardMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ancestors => "ancestors",
            Self::Caller => "caller",
        }
    }
}

impl From<CycleGuardMode> for CycleGuard {
    fn from(mode: CycleGuardMode) -> Self {
        match mode {
            CycleGuardMode::Ancestors => Self::Ancestors,
            CycleGuardMode::Caller => Self::Caller,
        }
    }
}

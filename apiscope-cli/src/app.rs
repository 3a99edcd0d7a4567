use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// apiscope - compare the public API of .NET assemblies
#[derive(Debug, Parser)]
#[command(name = "apiscope", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Output language of a change report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Html,
}

/// Change filters of the report command.
#[derive(Debug, Args)]
pub struct ReportFilters {
    /// Only report breaking changes.
    #[arg(long)]
    pub ignore_nonbreaking: bool,

    /// Do not report renamed parameters.
    #[arg(long)]
    pub ignore_parameter_names: bool,

    /// Do not report methods that became virtual.
    #[arg(long)]
    pub ignore_virtual: bool,

    /// Do not report setters added to existing properties.
    #[arg(long)]
    pub ignore_added_setters: bool,

    /// Drop additions whose description matches REGEX (repeatable).
    #[arg(long, value_name = "REGEX")]
    pub ignore_added: Vec<String>,

    /// Drop removals whose description matches REGEX (repeatable).
    #[arg(long, value_name = "REGEX")]
    pub ignore_removed: Vec<String>,

    /// Drop new types and namespaces whose name matches REGEX (repeatable).
    #[arg(long, value_name = "REGEX")]
    pub ignore_new: Vec<String>,

    /// Shorthand for --ignore-added, --ignore-removed and --ignore-new with the same REGEX.
    #[arg(long, value_name = "REGEX")]
    pub ignore: Vec<String>,
}

/// Extraction switches of the extract command.
#[derive(Debug, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractOptions {
    /// Extract the serialization surface: instance fields only.
    #[arg(long)]
    pub abi: bool,

    /// Extract forwarded types in place instead of listing the forwarders.
    #[arg(long)]
    pub follow_forwarders: bool,

    /// Merge inherited properties and methods into each type.
    #[arg(long)]
    pub full_api_set: bool,

    /// Omit forwarded types whose destination cannot be resolved.
    #[arg(long)]
    pub ignore_resolution_errors: bool,

    /// Only list interfaces a type implements directly.
    #[arg(long)]
    pub ignore_inherited_interfaces: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the public API of an assembly into an API document.
    #[command(alias = "info")]
    Extract {
        /// Assembly file (.dll or .exe).
        #[arg(value_name = "ASSEMBLY")]
        input: PathBuf,

        /// Write the API document to FILE instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory searched (recursively) for assemblies used to resolve base types and
        /// forwarders (repeatable).
        #[arg(short = 'd', long = "search-dir", value_name = "DIR")]
        search_dirs: Vec<PathBuf>,

        #[command(flatten)]
        options: ExtractOptions,
    },

    /// Compare two API documents (or assemblies) and write the annotated diff document.
    Diff {
        /// API document or assembly of the baseline.
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// API document or assembly validated against the baseline.
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Write the diff document to FILE instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render a human-readable change report between two API documents.
    Report {
        /// API document or assembly of the old version.
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// API document or assembly of the new version.
        #[arg(value_name = "TARGET")]
        target: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: ReportFormat,

        #[command(flatten)]
        filters: ReportFilters,
    },

    /// Show per-namespace completeness of TARGET against REFERENCE.
    Stats {
        /// API document or assembly of the baseline.
        #[arg(value_name = "REFERENCE")]
        reference: PathBuf,

        /// API document or assembly validated against the baseline.
        #[arg(value_name = "TARGET")]
        target: PathBuf,
    },
}

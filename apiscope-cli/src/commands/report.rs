use std::path::Path;

use apiscope::{
    report::{render, Formatter, HtmlFormatter, MarkdownFormatter},
    ReportConfig,
};

use crate::{
    app::{ReportFilters, ReportFormat},
    commands::common::load_diff,
};

/// Build the report filters from the command line.
fn report_config(filters: &ReportFilters) -> anyhow::Result<ReportConfig> {
    let with_shared = |specific: &[String]| {
        let all: Vec<&String> = specific.iter().chain(&filters.ignore).collect();
        ReportConfig::patterns(&all)
    };

    let mut config = ReportConfig {
        ignore_added: with_shared(&filters.ignore_added)?,
        ignore_removed: with_shared(&filters.ignore_removed)?,
        ignore_new: with_shared(&filters.ignore_new)?,
        ignore_nonbreaking: filters.ignore_nonbreaking,
        ignore_parameter_names: filters.ignore_parameter_names,
        ignore_virtual: filters.ignore_virtual,
        ignore_added_setters: filters.ignore_added_setters,
    };
    if config.ignore_nonbreaking {
        let breaking = ReportConfig::breaking_only();
        config.ignore_parameter_names = breaking.ignore_parameter_names;
        config.ignore_virtual = breaking.ignore_virtual;
        config.ignore_added_setters = breaking.ignore_added_setters;
    }
    Ok(config)
}

pub fn run(reference: &Path, target: &Path, format: ReportFormat, filters: &ReportFilters) -> anyhow::Result<()> {
    let config = report_config(filters)?;
    let diff = load_diff(reference, target)?;

    let formatter: &dyn Formatter = match format {
        ReportFormat::Markdown => &MarkdownFormatter,
        ReportFormat::Html => &HtmlFormatter,
    };
    let text = render(&diff, &config, formatter);
    if text.is_empty() {
        log::info!("no API changes between {} and {}", reference.display(), target.display());
    } else {
        print!("{text}");
    }
    Ok(())
}

use std::path::Path;

use anyhow::Context;
use apiscope::compare::xml::to_xml;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_diff},
    output::{percent, print_output},
};

#[derive(Debug, Serialize)]
pub struct DiffSummary {
    pub assembly: String,
    pub version: String,
    pub present: u32,
    pub missing: u32,
    pub extra: u32,
    pub todo: u32,
    pub warnings: u32,
    pub complete: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

pub fn run(reference: &Path, target: &Path, output: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let diff = load_diff(reference, target)?;
    let document = to_xml(&diff)?;

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write diff document: {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None if !opts.json => {
            println!("{document}");
            return Ok(());
        }
        None => {}
    }

    let counters = diff.counters();
    let summary = DiffSummary {
        assembly: diff.name().to_string(),
        version: diff.version.clone(),
        present: counters.present_total,
        missing: counters.missing_total,
        extra: counters.extra_total,
        todo: counters.todo_total,
        warnings: counters.warning_total,
        complete: counters.complete_total(),
        output: output.map(file_display_name),
    };

    print_output(&summary, opts, |s| {
        println!(
            "{} {}: {} present, {} missing, {} extra, {} todo, {} warnings ({} complete)",
            s.assembly,
            s.version,
            s.present,
            s.missing,
            s.extra,
            s.todo,
            s.warnings,
            percent(s.complete)
        );
    })
}

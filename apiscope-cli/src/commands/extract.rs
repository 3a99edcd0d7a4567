use std::path::{Path, PathBuf};

use anyhow::Context;
use apiscope::{tree::xml::to_xml, ExtractorConfig};
use serde::Serialize;

use crate::{
    app::{ExtractOptions, GlobalOptions},
    commands::common::{extract_tree, file_display_name},
    output::print_output,
};

#[derive(Debug, Serialize)]
pub struct ExtractSummary {
    pub assembly: String,
    pub version: String,
    pub namespaces: usize,
    pub types: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// The extraction switches selected on the command line.
fn config(options: &ExtractOptions) -> ExtractorConfig {
    let mut config = if options.abi {
        ExtractorConfig::abi()
    } else {
        ExtractorConfig::default()
    };
    config.follow_forwarders |= options.follow_forwarders;
    config.full_api_set |= options.full_api_set;
    config.ignore_resolution_errors |= options.ignore_resolution_errors;
    config.ignore_inherited_interfaces |= options.ignore_inherited_interfaces;
    config
}

pub fn run(
    input: &Path,
    output: Option<&Path>,
    search_dirs: &[PathBuf],
    options: &ExtractOptions,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let tree = extract_tree(input, search_dirs, &config(options))?;
    let document = to_xml(&tree)?;

    match output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("failed to write API document: {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None if !opts.json => {
            println!("{document}");
            return Ok(());
        }
        None => {}
    }

    let summary = ExtractSummary {
        assembly: tree.name.clone(),
        version: tree.version.clone(),
        namespaces: tree.namespaces.len(),
        types: tree.type_count(),
        output: output.map(file_display_name),
    };

    print_output(&summary, opts, |s| {
        println!(
            "{} {}: {} types in {} namespaces",
            s.assembly, s.version, s.types, s.namespaces
        );
    })
}

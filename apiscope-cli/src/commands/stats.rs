use std::path::Path;

use apiscope::compare::{Counters, DiffNode, DiffTree, NodeKind, Presence};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_diff,
    output::{percent, print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
pub struct NamespaceStats {
    pub namespace: String,
    pub presence: String,
    pub present: u32,
    pub missing: u32,
    pub extra: u32,
    pub todo: u32,
    pub warnings: u32,
    pub complete: u32,
}

impl NamespaceStats {
    /// A row over the partial counts of `counters`.
    fn from_partials(namespace: String, presence: String, counters: &Counters) -> Self {
        Self {
            namespace,
            presence,
            present: counters.present,
            missing: counters.missing,
            extra: counters.extra,
            todo: counters.todo,
            warnings: counters.warning,
            complete: counters.complete(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Stats {
    pub assembly: String,
    pub version: String,
    pub namespaces: Vec<NamespaceStats>,
    pub total: NamespaceStats,
}

/// Counts of one namespace: its own classification plus everything below it.
fn namespace_counters(namespace: &DiffNode) -> Counters {
    let mut row = Counters::default();
    match namespace.presence {
        Presence::Matched => row.present += 1,
        Presence::Missing => row.missing += 1,
        Presence::Extra => row.extra += 1,
    }
    if namespace.todo {
        row.todo += 1;
    }
    row.add_total_to_partial(&namespace.counters);
    row
}

/// One row per namespace of `diff`, and the sum of all rows.
fn namespace_rows(diff: &DiffTree) -> (Vec<NamespaceStats>, NamespaceStats) {
    let mut total = Counters::default();
    let mut rows = Vec::new();
    for namespace in diff.assembly.children(NodeKind::Namespace) {
        let row = namespace_counters(namespace);
        total.add_partial_to_partial(&row);
        rows.push(NamespaceStats::from_partials(
            namespace.name.clone(),
            namespace.presence.to_string(),
            &row,
        ));
    }
    let total = NamespaceStats::from_partials("(total)".to_string(), String::new(), &total);
    (rows, total)
}

pub fn run(reference: &Path, target: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let diff = load_diff(reference, target)?;
    let (namespaces, total) = namespace_rows(&diff);

    let stats = Stats {
        assembly: diff.name().to_string(),
        version: diff.version.clone(),
        namespaces,
        total,
    };

    print_output(&stats, opts, |s| {
        println!("{} {}", s.assembly, s.version);
        println!();
        let mut table = TabWriter::new(&[
            ("Namespace", Align::Left),
            ("Presence", Align::Left),
            ("Present", Align::Right),
            ("Missing", Align::Right),
            ("Extra", Align::Right),
            ("Todo", Align::Right),
            ("Warnings", Align::Right),
            ("Complete", Align::Right),
        ]);
        for row in s.namespaces.iter().chain(std::iter::once(&s.total)) {
            table.row(vec![
                row.namespace.clone(),
                row.presence.clone(),
                row.present.to_string(),
                row.missing.to_string(),
                row.extra.to_string(),
                row.todo.to_string(),
                row.warnings.to_string(),
                percent(row.complete),
            ]);
        }
        table.print();
    })
}

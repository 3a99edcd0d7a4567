use std::path::{Path, PathBuf};

use anyhow::Context;
use apiscope::{
    compare::{compare, DiffTree},
    extract::Extractor,
    metadata::{definitions::AssemblyDefinition, reader::load_assembly, resolver::AssemblySet},
    tree::{xml::from_xml, AssemblyTree},
    CompareConfig, ExtractorConfig,
};

/// Load an API tree: assemblies are extracted with the default switches, anything else is
/// read as an API document.
pub fn load_tree(path: &Path) -> anyhow::Result<AssemblyTree> {
    if is_assembly_file(path) {
        return extract_tree(path, &[], &ExtractorConfig::default());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read API document: {}", path.display()))?;
    from_xml(&text).with_context(|| format!("failed to parse API document: {}", path.display()))
}

/// Read an assembly and extract its API tree.
///
/// Assemblies found below `search_dirs` only serve cross-assembly resolution.
pub fn extract_tree(path: &Path, search_dirs: &[PathBuf], config: &ExtractorConfig) -> anyhow::Result<AssemblyTree> {
    let assembly = read_assembly_file(path)?;

    let mut resolver = AssemblySet::new();
    resolver.add(&assembly);
    for dir in search_dirs {
        for file in collect_assemblies(dir)? {
            if file == path {
                continue;
            }
            // Unreadable neighbours only cost resolution.
            match read_assembly_file(&file) {
                Ok(reference) => resolver.add(&reference),
                Err(error) => log::debug!("skipping {}: {error:#}", file.display()),
            }
        }
    }
    log::debug!("{} types available for resolution", resolver.len());

    Extractor::new(config, &resolver)
        .extract(&assembly)
        .with_context(|| format!("failed to extract API of {}", path.display()))
}

fn read_assembly_file(path: &Path) -> anyhow::Result<AssemblyDefinition> {
    load_assembly(path).with_context(|| format!("failed to load assembly: {}", path.display()))
}

/// Load both sides and compare them with the default attribute policy.
pub fn load_diff(reference: &Path, target: &Path) -> anyhow::Result<DiffTree> {
    let reference = load_tree(reference)?;
    let target = load_tree(target)?;
    log::debug!(
        "comparing {} {} ({} types) against {} {} ({} types)",
        target.name,
        target.version,
        target.type_count(),
        reference.name,
        reference.version,
        reference.type_count()
    );
    Ok(compare(&reference, &target, &CompareConfig::default()))
}

/// Collect all `.exe` and `.dll` files recursively from a directory.
pub fn collect_assemblies(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_assemblies_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_assemblies_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_assemblies_recursive(&path, files)?;
        } else if is_assembly_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns true if the path has an `.exe` or `.dll` extension.
pub fn is_assembly_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("exe") || e.eq_ignore_ascii_case("dll"))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_extensions() {
        assert!(is_assembly_file(Path::new("lib/mscorlib.dll")));
        assert!(is_assembly_file(Path::new("Tool.EXE")));
        assert!(!is_assembly_file(Path::new("mscorlib.xml")));
        assert!(!is_assembly_file(Path::new("dll")));
    }

    #[test]
    fn documents_are_parsed_not_extracted() {
        let path = std::env::temp_dir().join(format!("apiscope-cli-{}.xml", std::process::id()));
        std::fs::write(
            &path,
            r#"<assemblies><assembly name="Lib" version="1.0.0.0"><namespaces /></assembly></assemblies>"#,
        )
        .unwrap();
        let tree = load_tree(&path);
        let _ = std::fs::remove_file(&path);
        let tree = tree.unwrap();
        assert_eq!(tree.name, "Lib");
        assert_eq!(tree.version, "1.0.0.0");
    }

    #[test]
    fn unreadable_assembly_is_reported() {
        let path = std::env::temp_dir().join(format!("apiscope-cli-{}.dll", std::process::id()));
        std::fs::write(&path, b"MZ but nothing else").unwrap();
        let result = load_tree(&path);
        let _ = std::fs::remove_file(&path);
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed to load assembly"), "{message}");
    }
}

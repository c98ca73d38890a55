use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::TopologyError;

/// File extensions of topology files: full topologies and include files.
pub const TOPOLOGY_EXTENSIONS: [&str; 2] = ["top", "itp"];

/// Recursively collects `.top` and `.itp` files under `root`.
///
/// The list is sorted so batch checks run in a deterministic order. A file
/// given as the root is returned as is, whatever its extension.
pub fn discover_topology_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, TopologyError> {
    let root = root.as_ref();
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| TopologyError::Discovery {
            path: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_topology_file(path) {
            continue;
        }

        files.push(path.to_path_buf());
    }
    files.sort();
    Ok(files)
}

/// Returns true if the path has a topology extension.
pub fn is_topology_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TOPOLOGY_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("topchem-discovery-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("ff/sub")).unwrap();
        dir
    }

    #[test]
    fn test_collects_sorted_topology_files() {
        let dir = scratch_dir("sorted");
        for name in ["topol.top", "ff/b.itp", "ff/a.itp", "ff/sub/c.itp", "notes.txt", "ff/d.mdp"] {
            std::fs::write(dir.join(name), "\n").unwrap();
        }
        let files = discover_topology_files(&dir).unwrap();
        let relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(&dir).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            [
                PathBuf::from("ff/a.itp"),
                PathBuf::from("ff/b.itp"),
                PathBuf::from("ff/sub/c.itp"),
                PathBuf::from("topol.top"),
            ]
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_root_is_returned_as_is() {
        let dir = scratch_dir("file");
        let file = dir.join("molecule.txt");
        std::fs::write(&file, "\n").unwrap();
        assert_eq!(discover_topology_files(&file).unwrap(), [file.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_root_is_a_discovery_error() {
        let err = discover_topology_files("/nonexistent/topchem/ff").unwrap_err();
        assert!(matches!(err, TopologyError::Discovery { .. }));
    }

    #[test]
    fn test_extension_check() {
        assert!(is_topology_file(Path::new("a/b.itp")));
        assert!(!is_topology_file(Path::new("a/b.ITP.bak")));
        assert!(!is_topology_file(Path::new("itp")));
    }
}

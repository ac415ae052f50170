//! Lookup of installed Python distributions.
//!
//! Installed packages are found the way Python's `importlib.metadata`
//! finds them: by reading the `*.dist-info/METADATA` and
//! `*.egg-info/PKG-INFO` files in each site-packages directory on the
//! interpreter's search path, first match wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use walkdir::WalkDir;

use crate::error::{PinError, PinResult};

/// Prints the interpreter's `sys.path` as a JSON array.
const SYS_PATH_SCRIPT: &str = "import json, sys; print(json.dumps(sys.path))";

/// Source of installed package versions.
pub trait InstalledPackages {
    /// Version of the installed distribution called `name`, if any.
    ///
    /// A trailing extras list (`[...]`) and differences in case or
    /// separator (`-`, `_`, `.`) are ignored when matching. Anything else,
    /// such as an environment marker, is part of the name and will not
    /// match an installed distribution.
    fn version(&self, name: &str) -> Option<String>;
}

impl InstalledPackages for HashMap<String, String> {
    fn version(&self, name: &str) -> Option<String> {
        let wanted = canonical_name(lookup_name(name));
        if wanted.is_empty() {
            return None;
        }
        self.iter()
            .find(|(installed, _)| canonical_name(installed) == wanted)
            .map(|(_, version)| version.clone())
    }
}

/// Normalize a distribution name for comparison: lowercase, with every run
/// of `-`, `_` and `.` collapsed to a single `-`.
pub fn canonical_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                canonical.push('-');
            }
            in_separator = true;
        } else {
            canonical.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    canonical
}

/// Drop a trailing extras list (`[...]`) from a declared name. Names with
/// anything after the extras, like an environment marker, are returned
/// as-is so they fail the lookup and the line is kept unchanged.
fn lookup_name(name: &str) -> &str {
    let name = name.trim();
    match name.find('[') {
        Some(start) if name.ends_with(']') => name[..start].trim(),
        _ => name,
    }
}

/// Distributions found in a set of site-packages directories.
#[derive(Debug, Default, Clone)]
pub struct SitePackages {
    versions: HashMap<String, String>,
    searched: Vec<PathBuf>,
}

impl SitePackages {
    /// Index the distributions installed in `dirs`.
    ///
    /// Directories are searched in order and the first distribution found
    /// for a name wins. Entries that are not directories (zip files, the
    /// empty `sys.path` entry) are skipped.
    pub fn scan<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut packages = Self::default();

        for dir in dirs.iter().map(AsRef::as_ref) {
            if !dir.is_dir() {
                continue;
            }
            log::debug!("Scanning site-packages: {}", dir.display());
            packages.searched.push(dir.to_path_buf());

            for entry in WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                let Some(metadata_path) = metadata_file(entry.path()) else {
                    continue;
                };
                let contents = match std::fs::read_to_string(&metadata_path) {
                    Ok(contents) => contents,
                    Err(e) => {
                        log::debug!("Skipping {}: {}", metadata_path.display(), e);
                        continue;
                    }
                };
                if let Some((name, version)) = parse_metadata(&contents) {
                    packages
                        .versions
                        .entry(canonical_name(&name))
                        .or_insert(version);
                }
            }
        }

        log::debug!(
            "Found {} installed distributions in {} directories",
            packages.versions.len(),
            packages.searched.len()
        );
        packages
    }

    /// Index the configured directories, or the interpreter's `sys.path`
    /// when none are configured.
    pub fn discover(python: &str, configured: &[PathBuf]) -> PinResult<Self> {
        if !configured.is_empty() {
            return Ok(Self::scan(configured));
        }
        let search_path = interpreter_sys_path(python)?;
        Ok(Self::scan(&search_path))
    }

    /// Directories that were actually searched.
    pub fn searched(&self) -> &[PathBuf] {
        &self.searched
    }

    /// Number of distinct installed distributions found.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl InstalledPackages for SitePackages {
    fn version(&self, name: &str) -> Option<String> {
        self.versions
            .get(&canonical_name(lookup_name(name)))
            .cloned()
    }
}

/// Ask `python` for its module search path.
fn interpreter_sys_path(python: &str) -> PinResult<Vec<PathBuf>> {
    let output = Command::new(python)
        .args(["-c", SYS_PATH_SCRIPT])
        .output()
        .map_err(|source| PinError::Interpreter {
            python: python.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(PinError::InterpreterFailed {
            python: python.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let entries: Vec<String> = serde_json::from_slice(&output.stdout)?;
    Ok(entries.into_iter().map(PathBuf::from).collect())
}

/// Metadata file describing the distribution at `path`, if it is one.
fn metadata_file(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.ends_with(".dist-info") && path.is_dir() {
        Some(path.join("METADATA"))
    } else if file_name.ends_with(".egg-info") {
        if path.is_dir() {
            Some(path.join("PKG-INFO"))
        } else {
            Some(path.to_path_buf())
        }
    } else {
        None
    }
}

/// Read `Name` and `Version` from the header block of a core metadata file.
fn parse_metadata(contents: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut version = None;

    for line in contents.lines() {
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if key.eq_ignore_ascii_case("name") && name.is_none() {
            name = Some(value.to_string());
        } else if key.eq_ignore_ascii_case("version") && version.is_none() {
            version = Some(value.to_string());
        }
    }

    match (name, version) {
        (Some(name), Some(version)) if !name.is_empty() && !version.is_empty() => {
            Some((name, version))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_dist_info(site: &Path, dir_name: &str, name: &str, version: &str) {
        let dist = site.join(dir_name);
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::write(
            dist.join("METADATA"),
            format!(
                "Metadata-Version: 2.1\nName: {}\nVersion: {}\nSummary: test\n\nVersion: 0.0.0\n",
                name, version
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("Pillow"), "pillow");
        assert_eq!(canonical_name("typing_extensions"), "typing-extensions");
        assert_eq!(canonical_name("zope.interface"), "zope-interface");
        assert_eq!(canonical_name("a-_.b"), "a-b");
        assert_eq!(canonical_name(""), "");
    }

    #[test]
    fn test_lookup_name_strips_trailing_extras_only() {
        assert_eq!(lookup_name("uvicorn[standard]"), "uvicorn");
        assert_eq!(lookup_name("requests"), "requests");
        assert_eq!(lookup_name("pywin32; sys_platform"), "pywin32; sys_platform");
        assert_eq!(
            lookup_name("uvicorn[standard]; python_version"),
            "uvicorn[standard]; python_version"
        );
    }

    #[test]
    fn test_parse_metadata_reads_headers_only() {
        let parsed = parse_metadata("Name: requests\nVersion: 2.31.0\n\nVersion: 9\n");
        assert_eq!(
            parsed,
            Some((String::from("requests"), String::from("2.31.0")))
        );
        assert_eq!(parse_metadata("Name: broken\n"), None);
    }

    #[test]
    fn test_scan_finds_dist_info_and_egg_info() {
        let site = TempDir::new().unwrap();
        write_dist_info(site.path(), "requests-2.31.0.dist-info", "requests", "2.31.0");
        write_dist_info(site.path(), "Pillow-10.3.0.dist-info", "Pillow", "10.3.0");
        std::fs::write(
            site.path().join("legacy-1.0.egg-info"),
            "Metadata-Version: 1.0\nName: legacy\nVersion: 1.0\n",
        )
        .unwrap();
        std::fs::create_dir_all(site.path().join("requests")).unwrap();

        let packages = SitePackages::scan(&[site.path()]);

        assert_eq!(packages.len(), 3);
        assert_eq!(packages.version("requests").as_deref(), Some("2.31.0"));
        assert_eq!(packages.version("pillow").as_deref(), Some("10.3.0"));
        assert_eq!(packages.version("legacy").as_deref(), Some("1.0"));
        assert_eq!(packages.version("nonexistentpkg"), None);
    }

    #[test]
    fn test_scan_first_directory_wins() {
        let venv = TempDir::new().unwrap();
        let system = TempDir::new().unwrap();
        write_dist_info(venv.path(), "numpy-1.26.4.dist-info", "numpy", "1.26.4");
        write_dist_info(system.path(), "numpy-1.21.0.dist-info", "numpy", "1.21.0");

        let packages = SitePackages::scan(&[venv.path(), system.path()]);

        assert_eq!(packages.version("numpy").as_deref(), Some("1.26.4"));
        assert_eq!(packages.searched().len(), 2);
    }

    #[test]
    fn test_scan_skips_missing_directories() {
        let packages = SitePackages::scan(&[PathBuf::from("/definitely/not/here")]);
        assert!(packages.is_empty());
        assert!(packages.searched().is_empty());
    }

    #[test]
    fn test_discover_prefers_configured_dirs() {
        let site = TempDir::new().unwrap();
        write_dist_info(site.path(), "qdrant_client-1.9.0.dist-info", "qdrant-client", "1.9.0");

        let packages =
            SitePackages::discover("no-such-python", &[site.path().to_path_buf()]).unwrap();

        assert_eq!(packages.version("qdrant_client").as_deref(), Some("1.9.0"));
    }

    #[test]
    fn test_discover_reports_missing_interpreter() {
        let result = SitePackages::discover("/no/such/python3", &[]);
        assert!(matches!(result, Err(PinError::Interpreter { .. })));
    }

    #[test]
    fn test_hash_map_lookup_is_normalized() {
        let installed: HashMap<String, String> =
            [(String::from("Typing_Extensions"), String::from("4.11.0"))]
                .into_iter()
                .collect();
        assert_eq!(
            installed.version("typing-extensions").as_deref(),
            Some("4.11.0")
        );
        assert_eq!(installed.version(""), None);
    }
}

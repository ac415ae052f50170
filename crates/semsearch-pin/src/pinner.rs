//! Rewriting a manifest with exact pins.

use std::fmt;
use std::path::Path;

use crate::error::{PinError, PinResult};
use crate::manifest::ManifestLine;
use crate::registry::InstalledPackages;

/// What happened to a single manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank line or directive, written back unchanged.
    Preserved(String),
    /// Declaration rewritten to `name==version`.
    Pinned { name: String, version: String },
    /// Declaration whose package is not installed; the original line is
    /// kept.
    Unresolved { name: String, line: String },
}

impl fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preserved(line) | Self::Unresolved { line, .. } => f.write_str(line),
            Self::Pinned { name, version } => write!(f, "{}=={}", name, version),
        }
    }
}

/// Result of pinning a whole manifest, one outcome per input line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinReport {
    outcomes: Vec<LineOutcome>,
}

impl PinReport {
    /// Outcomes in manifest order.
    pub fn outcomes(&self) -> &[LineOutcome] {
        &self.outcomes
    }

    /// `(name, version)` for every pinned declaration.
    pub fn pinned(&self) -> Vec<(&str, &str)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                LineOutcome::Pinned { name, version } => Some((name.as_str(), version.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Names of declarations whose package is not installed.
    pub fn unresolved(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                LineOutcome::Unresolved { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The rewritten manifest: lines joined with `\n`, plus a trailing
    /// newline.
    pub fn render(&self) -> String {
        let mut rendered = self
            .outcomes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        rendered.push('\n');
        rendered
    }
}

/// Pin every declaration in `manifest` against `installed`.
///
/// Blank lines and directives are kept verbatim. Declarations whose
/// package is not installed are kept verbatim and logged.
pub fn pin_manifest<R>(manifest: &str, installed: &R) -> PinReport
where
    R: InstalledPackages + ?Sized,
{
    let outcomes = manifest
        .lines()
        .map(|raw| match ManifestLine::parse(raw) {
            ManifestLine::Blank => LineOutcome::Preserved(String::new()),
            ManifestLine::Directive(line) => LineOutcome::Preserved(line.to_string()),
            ManifestLine::Requirement { name, line } => match installed.version(name) {
                Some(version) => LineOutcome::Pinned {
                    name: name.to_string(),
                    version,
                },
                None => {
                    log::warn!("{} not installed, skipping.", name);
                    LineOutcome::Unresolved {
                        name: name.to_string(),
                        line: line.to_string(),
                    }
                }
            },
        })
        .collect();

    PinReport { outcomes }
}

/// Rewrite the manifest at `path` in place with the installed versions.
///
/// The file is overwritten without a backup.
pub fn update_requirements_file<R>(path: &Path, installed: &R) -> PinResult<PinReport>
where
    R: InstalledPackages + ?Sized,
{
    let manifest = std::fs::read_to_string(path).map_err(|source| PinError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let report = pin_manifest(&manifest, installed);

    std::fs::write(path, report.render()).map_err(|source| PinError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "{} updated successfully with installed versions ({} pinned, {} skipped)",
        path.display(),
        report.pinned().len(),
        report.unresolved().len()
    );

    Ok(report)
}

//! Line-level parsing of requirements manifests.

/// Characters that end the package name in a declaration.
pub const COMPARATORS: [char; 4] = ['=', '<', '>', '!'];

/// Prefixes of lines that are passed through untouched: editable
/// installs and option flags.
const DIRECTIVE_PREFIXES: [&str; 2] = ["-e", "--"];

/// One line of a manifest, classified.
///
/// Lines are trimmed before classification; the borrowed slices point at
/// the trimmed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLine<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Editable install (`-e ...`) or option (`--index-url ...`).
    Directive(&'a str),
    /// Anything else, treated as a package declaration.
    Requirement {
        /// Text before the first comparator character.
        name: &'a str,
        /// The whole trimmed line.
        line: &'a str,
    },
}

impl<'a> ManifestLine<'a> {
    /// Classify a raw manifest line.
    pub fn parse(raw: &'a str) -> Self {
        let line = raw.trim();
        if line.is_empty() {
            return Self::Blank;
        }
        match normalize_package_name(line) {
            Some(name) => Self::Requirement { name, line },
            None => Self::Directive(line),
        }
    }

    /// The trimmed text of the line, as it is written back when left
    /// unchanged.
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Blank => "",
            Self::Directive(line) | Self::Requirement { line, .. } => line,
        }
    }
}

/// Returns `true` for lines that must never be rewritten.
pub fn is_directive(line: &str) -> bool {
    DIRECTIVE_PREFIXES.iter().any(|prefix| line.starts_with(prefix))
}

/// Extract the bare package name from a declaration.
///
/// The name is everything before the first comparator character, trimmed.
/// Directives yield `None`. A line without any comparator is its own name,
/// and a line starting with a comparator yields an empty name.
pub fn normalize_package_name(line: &str) -> Option<&str> {
    let line = line.trim();
    if is_directive(line) {
        return None;
    }
    let end = line.find(COMPARATORS).unwrap_or(line.len());
    Some(line[..end].trim())
}

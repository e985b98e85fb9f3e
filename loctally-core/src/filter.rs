use std::path::Path;

/// Patterns counted when no override is given. Entries are suffixes of the
/// full path, so both `.rs` and whole names like `Makefile` work.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".cs", ".c", ".cpp", ".cc", ".h", ".hpp", ".ixx", ".inc", ".asm", ".txt", ".log", ".js",
    ".jsx", ".ts", ".tsx", ".csproj", ".sln", "CMakeLists.txt", "Makefile", ".sh", ".bash", ".py",
    ".html", ".css", ".scss", ".less", ".vue", ".json", ".yaml", ".yml", ".xml", ".xaml",
    ".axaml", ".md", ".htm", ".asp", ".php", ".gitignore", ".java", ".kt", ".kts", ".gradle",
    ".bat", ".cmd", ".ps1", ".swift", ".m", ".lua", ".mk", ".csv", ".vbs", ".vba", ".vb", ".sql",
    ".rs", ".shader", ".rb", ".cshtml", ".razor", ".pug", ".jade", ".properties", ".cfg",
    ".conf", ".pl", ".php4", ".php5", ".mm", ".markdown", ".dart", ".go", ".groovy", ".vsh",
    ".jsp", ".aspx", ".ini",
];

/// Ordered list of path-suffix patterns deciding which files are counted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    patterns: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `"rs, go,Makefile"`.
    /// Items are trimmed and empty items dropped.
    pub fn parse_list(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty()),
        )
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Return the first pattern the path ends with, if any
    pub fn matches(&self, path: &Path) -> Option<&str> {
        let path_str = path.to_string_lossy();
        self.patterns
            .iter()
            .find(|pattern| path_str.ends_with(pattern.as_str()))
            .map(String::as_str)
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_contains_common_suffixes() {
        let filter = ExtensionFilter::default();
        assert_eq!(filter.patterns().len(), DEFAULT_EXTENSIONS.len());
        assert_eq!(filter.matches(Path::new("src/main.rs")), Some(".rs"));
        assert_eq!(filter.matches(Path::new("notes/b.txt")), Some(".txt"));
        assert_eq!(filter.matches(Path::new("proj/Makefile")), Some("Makefile"));
        assert_eq!(filter.matches(Path::new("image.png")), None);
    }

    #[test]
    fn test_first_match_wins() {
        // CMakeLists.txt comes after .txt in the default order
        let filter = ExtensionFilter::default();
        assert_eq!(filter.matches(Path::new("CMakeLists.txt")), Some(".txt"));

        let filter = ExtensionFilter::new(["CMakeLists.txt", ".txt"]);
        assert_eq!(filter.matches(Path::new("CMakeLists.txt")), Some("CMakeLists.txt"));
    }

    #[test]
    fn test_suffix_is_matched_against_whole_path() {
        let filter = ExtensionFilter::new([".c"]);
        assert_eq!(filter.matches(&PathBuf::from("a/b/x.c")), Some(".c"));
        // .cc does not end with .c
        assert_eq!(filter.matches(&PathBuf::from("a/b/x.cc")), None);
    }

    #[test]
    fn test_parse_list() {
        let filter = ExtensionFilter::parse_list(" .rs, .go,,Makefile ,");
        assert_eq!(filter.patterns(), &[".rs", ".go", "Makefile"]);
        assert!(ExtensionFilter::parse_list(" , ").is_empty());
    }
}

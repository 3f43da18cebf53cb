/// Path exclusion for the indexer.
///
/// Patterns use glob syntax and are compiled once per index build. An invalid
/// pattern is a configuration error rather than something to skip silently,
/// since a typo would otherwise index paths the user meant to exclude.
use glob::Pattern;
use std::path::Path;

use crate::errors::{ScoutError, ScoutResult};

/// Compiled set of ignore patterns
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    patterns: Vec<Pattern>,
}

impl PathFilter {
    /// Compiles glob patterns such as `"**/node_modules/**"` or `"*.tmp"`
    pub fn new(patterns: &[String]) -> ScoutResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    ScoutError::config_error(format!("invalid ignore pattern '{}': {}", p, e))
                })
            })
            .collect::<ScoutResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Checks if a path should be left out of the index
    pub fn should_ignore(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        // Windows separators are normalized so one pattern set works everywhere
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.patterns.iter().any(|p| p.matches(&normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_ignore() {
        let filter = PathFilter::new(&[
            "**/test_[0-4].txt".to_string(),
            "target/**/*.rs".to_string(),
            ".git/*".to_string(),
            "**/*.tmp".to_string(),
        ])
        .unwrap();

        // Should ignore
        assert!(filter.should_ignore(Path::new("test_0.txt")));
        assert!(filter.should_ignore(Path::new("dir/test_2.txt")));
        assert!(filter.should_ignore(Path::new("target/debug/main.rs")));
        assert!(filter.should_ignore(Path::new(".git/config")));
        assert!(filter.should_ignore(Path::new("src/temp.tmp")));

        // Should not ignore
        assert!(!filter.should_ignore(Path::new("test_5.txt")));
        assert!(!filter.should_ignore(Path::new("src/main.rs")));
        assert!(!filter.should_ignore(Path::new(".git2/config")));
        assert!(!filter.should_ignore(Path::new(".gitignore")));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = PathFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.should_ignore(Path::new("target/debug/main.rs")));
        assert!(!filter.should_ignore(Path::new(".git/HEAD")));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = PathFilter::new(&["[unclosed".to_string()]).unwrap_err();
        assert!(matches!(err, ScoutError::ConfigError(_)));
    }
}

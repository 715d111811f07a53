//! Regex-based import extraction.
//!
//! Two independent passes over the text: ES-module `import ... from '<m>'`
//! first, then CommonJS `require('<m>')`. Results are concatenated in pass
//! order, so `imports` is not a source-order listing when both styles occur.
//! Duplicates are kept. Imports spanning several lines are not matched.

use once_cell::sync::Lazy;
use regex::Regex;

static ES_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"];?"#).expect("ES import pattern is valid")
});

static COMMONJS_REQUIRE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"require\(['"]([^'"]+)['"]\)"#).expect("require pattern is valid")
});

/// Extract module references from source text.
#[must_use]
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut imports = es_imports(content);
    imports.extend(commonjs_requires(content));
    imports
}

/// Module references from `import ... from '<module>'` statements.
#[must_use]
pub fn es_imports(content: &str) -> Vec<String> {
    captures(&ES_IMPORT, content)
}

/// Module references from `require('<module>')` calls.
#[must_use]
pub fn commonjs_requires(content: &str) -> Vec<String> {
    captures(&COMMONJS_REQUIRE, content)
}

fn captures(pattern: &Regex, content: &str) -> Vec<String> {
    pattern
        .captures_iter(content)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

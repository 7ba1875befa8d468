//! Normalization and matching of ignore patterns against relative paths.
//!
//! Patterns are user input and arrive in whatever shape the user typed them:
//! back-slashes, leading `./`, trailing slashes. They are normalized on every
//! match, never at storage time, so the list shown in the UI is exactly what
//! the user entered.

use globset::GlobBuilder;

/// Canonicalizes a raw pattern string for matching.
///
/// Folds `\` to `/`, strips a single leading `./` and a single trailing `/`
/// (unless that would leave the pattern empty). Whitespace-only input
/// normalizes to the empty string, which the matcher treats as "no pattern".
pub fn normalize_pattern(raw: &str) -> String {
    let mut s = raw.trim().replace('\\', "/");
    if let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    if s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}

/// Returns `true` if the slash-normalized relative path is covered by any of
/// the given raw patterns.
///
/// Each pattern is normalized first and matches on one of three rules, checked
/// in order with short-circuit on the first hit:
/// 1. exact string equality,
/// 2. shell-glob equality (`*`, `?`, `[...]`; case-sensitive; `*` crosses
///    `/` segments only when the pattern itself contains no `/`),
/// 3. single-segment directory containment: a pattern without `/` covers every
///    path below a directory of that name at the root.
pub fn matches_any<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    let path = path.replace('\\', "/");
    for raw in patterns {
        let pat = normalize_pattern(raw.as_ref());
        if pat.is_empty() {
            continue;
        }
        if path == pat {
            return true;
        }
        if glob_matches(&pat, &path) {
            return true;
        }
        if !pat.contains('/') && path.starts_with(&format!("{pat}/")) {
            return true;
        }
    }
    false
}

// A bare pattern like `*.png` applies anywhere in the tree, so its `*` may
// cross segments. A path-bearing pattern like `src/*.ts` pins each wildcard
// to a single segment. An unparsable glob (e.g. an unclosed bracket) simply
// never matches by the glob rule; the exact and directory rules have their
// own say.
fn glob_matches(pattern: &str, path: &str) -> bool {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(pattern.contains('/'))
        .build();
    match glob {
        Ok(glob) => glob.compile_matcher().is_match(path),
        Err(e) => {
            tracing::debug!("Ignoring unparsable glob pattern {:?}: {}", pattern, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_affixes() {
        assert_eq!(normalize_pattern("./src/lib.rs"), "src/lib.rs");
        assert_eq!(normalize_pattern("src\\sub\\"), "src/sub");
        assert_eq!(normalize_pattern("node_modules/"), "node_modules");
        assert_eq!(normalize_pattern("  *.png  "), "*.png");
        assert_eq!(normalize_pattern("   "), "");
        // A lone slash must not normalize to the empty string.
        assert_eq!(normalize_pattern("/"), "/");
    }

    #[test]
    fn exact_match_is_literal() {
        assert!(matches_any("Cargo.toml", &["Cargo.toml"]));
        assert!(!matches_any("Cargo.toml", &["cargo.toml"]));
        assert!(!matches_any("Cargo.toml", &["Cargo.tom"]));
    }

    #[test]
    fn directory_name_covers_all_descendants() {
        let pats = ["node_modules"];
        assert!(matches_any("node_modules", &pats));
        assert!(matches_any("node_modules/x/y.js", &pats));
        assert!(!matches_any("my_node_modules/x", &pats));
    }

    #[test]
    fn bare_glob_star_crosses_segments() {
        assert!(matches_any("a/b/c.png", &["*.png"]));
        assert!(matches_any("c.png", &["*.png"]));
    }

    #[test]
    fn path_bearing_glob_star_stays_in_segment() {
        assert!(matches_any("src/a.ts", &["src/*.ts"]));
        assert!(!matches_any("src/sub/a.ts", &["src/*.ts"]));
    }

    #[test]
    fn question_mark_and_class() {
        assert!(matches_any("a.py", &["?.py"]));
        assert!(matches_any("v1.txt", &["v[0-9].txt"]));
        assert!(!matches_any("va.txt", &["v[0-9].txt"]));
    }

    #[test]
    fn empty_and_unparsable_patterns_never_match() {
        assert!(!matches_any("anything", &[""]));
        assert!(!matches_any("anything", &["   "]));
        let no_patterns: [&str; 0] = [];
        assert!(!matches_any("anything", &no_patterns));
        // Unclosed bracket still matches exactly, but not as a glob.
        assert!(matches_any("a[1", &["a[1"]));
        assert!(!matches_any("a1", &["a[1"]));
    }

    #[test]
    fn backslash_paths_are_folded_before_matching() {
        assert!(matches_any("src\\main.rs", &["src/main.rs"]));
        assert!(matches_any("src/main.rs", &["src\\main.rs"]));
    }

    #[test]
    fn duplicate_patterns_are_tolerated() {
        assert!(matches_any("dist/app.js", &["dist", "dist", "dist"]));
    }
}

//! Synthesis of the repomix argument vector and its shell-quoted preview.
//!
//! Synthesis is pure and total: the same inputs always produce byte-identical
//! argv and preview, with flags emitted in their fixed declaration order no
//! matter in which order the user toggled them.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The external executable this whole application wraps.
pub const PROGRAM: &str = "repomix";

pub const DEFAULT_OUTPUT_NAME: &str = "repomix_output.md";
pub const DEFAULT_OUTPUT_STEM: &str = "repomix_output";

/// Output document format requested from repomix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    #[default]
    Markdown,
    Plain,
    Xml,
}

impl OutputStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputStyle::Markdown => "markdown",
            OutputStyle::Plain => "plain",
            OutputStyle::Xml => "xml",
        }
    }

    /// The file extension conventionally paired with the style.
    pub fn extension(self) -> &'static str {
        match self {
            OutputStyle::Markdown => ".md",
            OutputStyle::Plain => ".txt",
            OutputStyle::Xml => ".xml",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "markdown" => Some(OutputStyle::Markdown),
            "plain" => Some(OutputStyle::Plain),
            "xml" => Some(OutputStyle::Xml),
            _ => None,
        }
    }
}

/// The thirteen boolean repomix switches, in argv declaration order.
///
/// Field names double as the persisted JSON keys. `remove_empty` is the one
/// switch that defaults to on, including when the key is absent from a
/// persisted state file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagSet {
    pub parsable: bool,
    pub compress: bool,
    pub line_numbers: bool,
    pub no_file_summary: bool,
    pub no_directory_structure: bool,
    pub no_files: bool,
    pub remove_comments: bool,
    pub remove_empty: bool,
    pub truncate_b64: bool,
    pub include_empty_dirs: bool,
    pub no_git_sort: bool,
    pub include_diffs: bool,
    pub include_logs: bool,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self {
            parsable: false,
            compress: false,
            line_numbers: false,
            no_file_summary: false,
            no_directory_structure: false,
            no_files: false,
            remove_comments: false,
            remove_empty: true,
            truncate_b64: false,
            include_empty_dirs: false,
            no_git_sort: false,
            include_diffs: false,
            include_logs: false,
        }
    }
}

impl FlagSet {
    /// `(key, command-line token, value)` triples in declaration order.
    pub fn entries(&self) -> [(&'static str, &'static str, bool); 13] {
        [
            ("parsable", "--parsable-style", self.parsable),
            ("compress", "--compress", self.compress),
            ("line_numbers", "--output-show-line-numbers", self.line_numbers),
            ("no_file_summary", "--no-file-summary", self.no_file_summary),
            (
                "no_directory_structure",
                "--no-directory-structure",
                self.no_directory_structure,
            ),
            ("no_files", "--no-files", self.no_files),
            ("remove_comments", "--remove-comments", self.remove_comments),
            ("remove_empty", "--remove-empty-lines", self.remove_empty),
            ("truncate_b64", "--truncate-base64", self.truncate_b64),
            (
                "include_empty_dirs",
                "--include-empty-directories",
                self.include_empty_dirs,
            ),
            ("no_git_sort", "--no-git-sort-by-changes", self.no_git_sort),
            ("include_diffs", "--include-diffs", self.include_diffs),
            ("include_logs", "--include-logs", self.include_logs),
        ]
    }

    /// Sets a flag by its persisted key. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: bool) -> bool {
        let slot = match key {
            "parsable" => &mut self.parsable,
            "compress" => &mut self.compress,
            "line_numbers" => &mut self.line_numbers,
            "no_file_summary" => &mut self.no_file_summary,
            "no_directory_structure" => &mut self.no_directory_structure,
            "no_files" => &mut self.no_files,
            "remove_comments" => &mut self.remove_comments,
            "remove_empty" => &mut self.remove_empty,
            "truncate_b64" => &mut self.truncate_b64,
            "include_empty_dirs" => &mut self.include_empty_dirs,
            "no_git_sort" => &mut self.no_git_sort,
            "include_diffs" => &mut self.include_diffs,
            "include_logs" => &mut self.include_logs,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Everything command synthesis reads; borrowed from the app state.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub output_name: &'a str,
    pub style: OutputStyle,
    pub flags: &'a FlagSet,
    pub header_text: &'a str,
    pub instruction_file_path: &'a str,
    pub ignore_patterns: &'a [String],
    pub excluded_files: &'a BTreeSet<String>,
}

/// Builds the full argument vector, program name first, in fixed order:
/// `-o`, `--style`, enabled flags, `--header-text`,
/// `--instruction-file-path`, `--ignore` (patterns then sorted exact
/// exclusions, comma-joined, omitted when both are empty).
pub fn build_args(ctx: &CommandContext) -> Vec<String> {
    let mut args = vec![PROGRAM.to_string()];

    let output_name = ctx.output_name.trim();
    if !output_name.is_empty() {
        args.push("-o".to_string());
        args.push(output_name.to_string());
    }

    args.push("--style".to_string());
    args.push(ctx.style.as_str().to_string());

    for (_, token, enabled) in ctx.flags.entries() {
        if enabled {
            args.push(token.to_string());
        }
    }

    let header = ctx.header_text.trim();
    if !header.is_empty() {
        args.push("--header-text".to_string());
        args.push(header.to_string());
    }

    let instruction = ctx.instruction_file_path.trim();
    if !instruction.is_empty() {
        args.push("--instruction-file-path".to_string());
        args.push(instruction.to_string());
    }

    let mut ignore_items: Vec<&str> = ctx.ignore_patterns.iter().map(String::as_str).collect();
    ignore_items.extend(ctx.excluded_files.iter().map(String::as_str));
    if !ignore_items.is_empty() {
        args.push("--ignore".to_string());
        args.push(ignore_items.join(","));
    }

    args
}

/// Space-joined, shell-quoted rendering of an argument vector for display.
pub fn preview(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wraps a token in double quotes (escaping embedded ones) when it is empty
/// or contains whitespace or a shell metacharacter.
pub fn shell_quote(token: &str) -> String {
    const METACHARACTERS: &str = " \t\"'*$&()[]{};|<>`";
    if token.is_empty() || token.chars().any(|c| METACHARACTERS.contains(c)) {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// A fully resolved invocation: program, arguments and working directory.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl RunRequest {
    /// Splits a synthesized argv into program and arguments.
    pub fn from_argv(mut argv: Vec<String>, cwd: PathBuf) -> Self {
        let program = if argv.is_empty() {
            PROGRAM.to_string()
        } else {
            argv.remove(0)
        };
        Self {
            program,
            args: argv,
            cwd,
        }
    }
}

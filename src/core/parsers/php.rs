//! PHP declaration scanner.
//!
//! This is not a PHP parser. It recognizes exactly what the coverage rule
//! needs from a test file:
//!
//! - `namespace` declarations
//! - top-level `use` imports (including group uses and aliases)
//! - class headers (`final`/`abstract`/`readonly` modifiers allowed)
//! - `#[...]` attribute groups directly preceding a class header
//!
//! Comments and string contents are first blanked out of a copy of the source
//! (byte offsets preserved), so the regexes below never match inside them.

use std::{collections::HashMap, ops::Range, sync::LazyLock};

use anyhow::{Result, bail};
use regex::Regex;

use crate::core::{
    declaration::{AnnotationArg, AnnotationGroup, AnnotationUse, ClassDeclaration},
    names::QualifiedName,
};

static NAMESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*namespace[ \t]+([A-Za-z_\\][A-Za-z0-9_\\]*)\s*[;{]").unwrap()
});

static USE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*use\s+(?:(function|const)\s+)?([^;]+);").unwrap()
});

static CLASS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:(?:final|abstract|readonly)\s+)*)class\s+([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
});

static CLASS_CONSTANT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\\?[A-Za-z_][A-Za-z0-9_]*(?:\\[A-Za-z_][A-Za-z0-9_]*)*)\s*::\s*class$").unwrap()
});

static ATTRIBUTE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\?[A-Za-z_][A-Za-z0-9_]*(?:\\[A-Za-z_][A-Za-z0-9_]*)*").unwrap());

static NAMED_ARG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\s*:([^:]|$)").unwrap());

/// Class imports of a file: alias -> fully qualified name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Imports {
    /// Keyed by lowercase alias; PHP class names are case-insensitive.
    aliases: HashMap<String, (String, QualifiedName)>,
}

impl Imports {
    pub fn insert(&mut self, alias: &str, name: QualifiedName) {
        self.aliases
            .insert(alias.to_lowercase(), (alias.to_string(), name));
    }

    pub fn get(&self, alias: &str) -> Option<&QualifiedName> {
        self.aliases.get(&alias.to_lowercase()).map(|(_, name)| name)
    }

    /// The alias under which `name` is imported, if any.
    pub fn alias_for(&self, name: &QualifiedName) -> Option<&str> {
        self.aliases
            .values()
            .filter(|(_, imported)| imported == name)
            .map(|(alias, _)| alias.as_str())
            .min()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Resolve a class name as written in source, following PHP rules:
    /// fully qualified names are taken as-is, `namespace\X` is relative to the
    /// current namespace, an imported first segment is expanded, anything else
    /// is relative to the current namespace.
    pub fn resolve(&self, raw: &str, namespace: &QualifiedName) -> QualifiedName {
        let raw = raw.trim();
        if raw.starts_with('\\') {
            return QualifiedName::parse(raw);
        }

        let written = QualifiedName::parse(raw);
        let Some(first) = written.segments().first() else {
            return namespace.clone();
        };

        if first.eq_ignore_ascii_case("namespace") && written.len() > 1 {
            return namespace.concat(&QualifiedName::from_segments(
                written.segments()[1..].iter().cloned(),
            ));
        }

        match self.get(first) {
            Some(imported) => imported.concat(&QualifiedName::from_segments(
                written.segments()[1..].iter().cloned(),
            )),
            None => namespace.concat(&written),
        }
    }
}

/// A class header found in a PHP file, with the spans needed to rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
    pub declaration: ClassDeclaration,
    /// Byte span of each attribute group, parallel to `declaration.annotation_groups`.
    pub group_spans: Vec<Range<usize>>,
    /// Byte offset of the class keyword (or its first modifier).
    pub header_start: usize,
    /// Byte offset of the start of the line holding the class header.
    pub header_line_start: usize,
    /// Leading whitespace of the class header line.
    pub indent: String,
    /// 1-indexed line of the class keyword (or its first modifier).
    pub line: usize,
    /// 1-indexed column of the class keyword (or its first modifier).
    pub col: usize,
    /// Source line of the class header, for display.
    pub source_line: String,
}

impl ParsedClass {
    pub fn name(&self) -> &str {
        self.declaration.simple_name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedPhpFile {
    pub file_path: String,
    pub source: String,
    pub imports: Imports,
    pub classes: Vec<ParsedClass>,
}

/// Parse PHP source text into class declarations.
pub fn parse_php_source(source: String, file_path: &str) -> Result<ParsedPhpFile> {
    let masked = mask_source(&source, file_path)?;
    let groups = find_attribute_groups(&source, &masked, file_path)?;
    let namespaces = find_namespaces(&masked);

    let class_headers = find_class_headers(&masked);
    let imports_end = class_headers
        .first()
        .map(|header| header.start)
        .unwrap_or(masked.len());
    let imports = find_imports(&masked[..imports_end]);

    let mut classes = Vec::with_capacity(class_headers.len());
    for header in class_headers {
        let namespace = namespaces
            .iter()
            .rev()
            .find(|(offset, _)| *offset <= header.start)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(QualifiedName::root);

        let attached = attached_groups(&masked, &groups, header.start);
        let annotation_groups = attached
            .iter()
            .map(|span| parse_attribute_group(&source, &masked, span, &imports, &namespace))
            .collect();

        let header_line_start = masked[..header.start]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let line_text = line_at(&source, header_line_start);
        let indent: String = line_text
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let (line, col) = line_col(&source, header.start);

        classes.push(ParsedClass {
            declaration: ClassDeclaration::new(header.name, namespace, annotation_groups),
            group_spans: attached,
            header_start: header.start,
            header_line_start,
            indent,
            line,
            col,
            source_line: line_text.to_string(),
        });
    }

    Ok(ParsedPhpFile {
        file_path: file_path.to_string(),
        source,
        imports,
        classes,
    })
}

// ============================================================
// Masking
// ============================================================

/// Blank out comments and string contents, keeping byte offsets and newlines.
///
/// Quotes stay in place so string arguments remain delimited. `#[` starts an
/// attribute, any other `#` starts a line comment.
fn mask_source(source: &str, file_path: &str) -> Result<String> {
    let bytes = source.as_bytes();
    let mut masked = bytes.to_vec();
    let mut i = 0;

    let blank = |masked: &mut Vec<u8>, range: Range<usize>| {
        for b in &mut masked[range] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    };

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = line_end(bytes, i);
                blank(&mut masked, i..end);
                i = end;
            }
            b'#' if bytes.get(i + 1) != Some(&b'[') => {
                let end = line_end(bytes, i);
                blank(&mut masked, i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let Some(close) = find_from(bytes, i + 2, b"*/") else {
                    bail!(
                        "{}:{}: unterminated comment",
                        file_path,
                        line_col(source, i).0
                    );
                };
                let end = close + 2;
                blank(&mut masked, i..end);
                i = end;
            }
            quote @ (b'\'' | b'"') => {
                let Some(close) = closing_quote(bytes, i + 1, quote) else {
                    bail!(
                        "{}:{}: unterminated string literal",
                        file_path,
                        line_col(source, i).0
                    );
                };
                blank(&mut masked, i + 1..close);
                i = close + 1;
            }
            b'<' if bytes[i..].starts_with(b"<<<") => {
                let end = heredoc_end(bytes, i + 3).ok_or_else(|| {
                    anyhow::anyhow!(
                        "{}:{}: unterminated heredoc",
                        file_path,
                        line_col(source, i).0
                    )
                })?;
                blank(&mut masked, i..end);
                i = end;
            }
            _ => i += 1,
        }
    }

    // One space per non-ASCII byte keeps offsets aligned with the source.
    Ok(masked
        .into_iter()
        .map(|b| if b.is_ascii() { b as char } else { ' ' })
        .collect::<String>())
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| *b == b'\n')
        .map(|p| from + p)
        .unwrap_or(bytes.len())
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn closing_quote(bytes: &[u8], from: usize, quote: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// `from` points just past `<<<`. Returns the offset after the closing label.
fn heredoc_end(bytes: &[u8], from: usize) -> Option<usize> {
    let header_end = line_end(bytes, from);
    let label: Vec<u8> = bytes[from..header_end]
        .iter()
        .copied()
        .filter(|b| !matches!(b, b' ' | b'\t' | b'\'' | b'"' | b'\r'))
        .collect();
    if label.is_empty() {
        return None;
    }

    let mut line_start = header_end + 1;
    while line_start < bytes.len() {
        let end = line_end(bytes, line_start);
        let content = &bytes[line_start..end];
        let indent = content
            .iter()
            .take_while(|b| matches!(b, b' ' | b'\t'))
            .count();
        let rest = &content[indent..];
        if rest.starts_with(&label)
            && !rest
                .get(label.len())
                .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_')
        {
            return Some(line_start + indent + label.len());
        }
        line_start = end + 1;
    }
    None
}

// ============================================================
// Structure
// ============================================================

fn find_namespaces(masked: &str) -> Vec<(usize, QualifiedName)> {
    NAMESPACE_REGEX
        .captures_iter(masked)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let name = cap.get(1)?;
            Some((whole.start(), QualifiedName::parse(name.as_str())))
        })
        .collect()
}

fn find_imports(masked_prefix: &str) -> Imports {
    let mut imports = Imports::default();

    for cap in USE_REGEX.captures_iter(masked_prefix) {
        if cap.get(1).is_some() {
            // `use function` / `use const` never name classes.
            continue;
        }
        let Some(clause) = cap.get(2) else {
            continue;
        };
        let clause = clause.as_str();

        match (clause.find('{'), clause.rfind('}')) {
            (Some(open), Some(close)) if open < close => {
                let prefix = QualifiedName::parse(&clause[..open]);
                for item in clause[open + 1..close].split(',') {
                    add_import(&mut imports, item, Some(&prefix));
                }
            }
            _ => {
                for item in clause.split(',') {
                    add_import(&mut imports, item, None);
                }
            }
        }
    }

    imports
}

fn add_import(imports: &mut Imports, item: &str, prefix: Option<&QualifiedName>) {
    let words: Vec<&str> = item.split_whitespace().collect();
    let (path, alias) = match words.as_slice() {
        [path] => (*path, None),
        [path, kw, alias] if kw.eq_ignore_ascii_case("as") => (*path, Some(*alias)),
        _ => return,
    };

    let written = QualifiedName::parse(path);
    let name = match prefix {
        Some(prefix) => prefix.concat(&written),
        None => written,
    };
    let Some(alias) = alias.or_else(|| name.last()).map(str::to_string) else {
        return;
    };
    imports.insert(&alias, name);
}

struct ClassHeader {
    /// Offset of the first modifier, or of `class` when there is none.
    start: usize,
    name: String,
}

fn find_class_headers(masked: &str) -> Vec<ClassHeader> {
    CLASS_REGEX
        .captures_iter(masked)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let name = cap.get(2)?;
            is_declaration_position(&masked[..whole.start()]).then(|| ClassHeader {
                start: whole.start(),
                name: name.as_str().to_string(),
            })
        })
        .collect()
}

/// A class keyword starts a declaration only at statement level: not after
/// `new`, `::`, `->` or inside an expression.
fn is_declaration_position(before: &str) -> bool {
    let before = before.trim_end();
    before.is_empty()
        || before.ends_with("<?php")
        || before.ends_with([';', '{', '}', ']'])
}

/// Find every `#[ ... ]` group, matching nested brackets.
fn find_attribute_groups(source: &str, masked: &str, file_path: &str) -> Result<Vec<Range<usize>>> {
    let bytes = masked.as_bytes();
    let mut groups = Vec::new();
    let mut i = 0;

    while let Some(start) = find_from(bytes, i, b"#[") {
        let mut depth = 0usize;
        let mut end = None;
        for (offset, b) in bytes[start + 1..].iter().enumerate() {
            match b {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(start + 1 + offset + 1);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            bail!(
                "{}:{}: unterminated attribute group",
                file_path,
                line_col(source, start).0
            );
        };
        groups.push(start..end);
        i = end;
    }

    Ok(groups)
}

/// Groups that directly precede `header_start`, separated only by whitespace
/// (comments are already blanked).
fn attached_groups(masked: &str, groups: &[Range<usize>], header_start: usize) -> Vec<Range<usize>> {
    let mut attached = Vec::new();
    let mut pos = header_start;

    loop {
        let trimmed_end = masked[..pos].trim_end().len();
        match groups.iter().find(|span| span.end == trimmed_end) {
            Some(span) => {
                attached.push(span.clone());
                pos = span.start;
            }
            None => break,
        }
    }

    attached.reverse();
    attached
}

// ============================================================
// Attribute contents
// ============================================================

fn parse_attribute_group(
    source: &str,
    masked: &str,
    span: &Range<usize>,
    imports: &Imports,
    namespace: &QualifiedName,
) -> AnnotationGroup {
    // Strip `#[` and `]`.
    let inner = span.start + 2..span.end - 1;
    let annotations = split_top_level(masked, inner)
        .into_iter()
        .filter_map(|range| parse_attribute(source, masked, range, imports, namespace))
        .collect();
    AnnotationGroup::new(annotations)
}

fn parse_attribute(
    source: &str,
    masked: &str,
    range: Range<usize>,
    imports: &Imports,
    namespace: &QualifiedName,
) -> Option<AnnotationUse> {
    let range = trim_range(source, range);
    let text = &source[range.clone()];
    let name = ATTRIBUTE_NAME_REGEX.find(text)?;
    let kind = imports.resolve(name.as_str(), namespace);

    let rest_start = range.start + name.end();
    let rest = &source[rest_start..range.end];
    let args = match (rest.find('('), rest.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let args_range = rest_start + open + 1..rest_start + close;
            split_top_level(masked, args_range)
                .into_iter()
                .map(|arg| parse_argument(&source[trim_range(source, arg)], imports, namespace))
                .collect()
        }
        _ => Vec::new(),
    };

    Some(AnnotationUse::new(kind, args))
}

fn parse_argument(text: &str, imports: &Imports, namespace: &QualifiedName) -> AnnotationArg {
    let value = match NAMED_ARG_REGEX.find(text) {
        // Keep the character after `:` that the regex consumed.
        Some(m) => text[text[..m.end()].rfind(':').map(|i| i + 1).unwrap_or(0)..].trim(),
        None => text,
    };

    if let Some(cap) = CLASS_CONSTANT_REGEX.captures(value)
        && let Some(name) = cap.get(1)
    {
        return AnnotationArg::ClassRef(imports.resolve(name.as_str(), namespace));
    }

    if let Some(unquoted) = unquote(value) {
        return AnnotationArg::Str(unquoted);
    }

    AnnotationArg::Other(value.to_string())
}

fn unquote(value: &str) -> Option<String> {
    let quote = value.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = value.strip_prefix(quote)?.strip_suffix(quote)?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == quote || next == '\\' => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

/// Split `range` of `masked` on commas at bracket depth zero.
fn split_top_level(masked: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let bytes = masked.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut part_start = range.start;

    for i in range.clone() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(part_start..i);
                part_start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(part_start..range.end);

    parts
        .into_iter()
        .filter(|part| !masked[part.clone()].trim().is_empty())
        .collect()
}

fn trim_range(source: &str, range: Range<usize>) -> Range<usize> {
    let text = &source[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    let end = range.start + text.trim_end().len();
    start..end.max(start)
}

// ============================================================
// Positions
// ============================================================

/// 1-indexed (line, column) of a byte offset. Columns count characters.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

fn line_at(source: &str, line_start: usize) -> &str {
    let rest = &source[line_start..];
    let end = rest.find('\n').unwrap_or(rest.len());
    rest[..end].trim_end_matches('\r')
}

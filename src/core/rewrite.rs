//! Applying rewrite decisions to PHP source text.
//!
//! Only attribute text is touched. Groups that are unchanged keep their
//! original formatting; changed groups are rendered fresh.

use std::ops::Range;

use super::{
    declaration::{AnnotationArg, AnnotationGroup, AnnotationUse},
    names::QualifiedName,
    parsers::php::{Imports, ParsedClass},
};

/// A byte-range replacement in a source file. Inserts use an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            replacement: text.into(),
        }
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }
}

/// Renders names the way the file would write them: by import alias when one
/// exists, fully qualified otherwise.
pub struct NameRenderer<'a> {
    imports: &'a Imports,
}

impl<'a> NameRenderer<'a> {
    pub fn new(imports: &'a Imports) -> Self {
        Self { imports }
    }

    pub fn name(&self, name: &QualifiedName) -> String {
        match self.imports.alias_for(name) {
            Some(alias) => alias.to_string(),
            None => name.to_string(),
        }
    }

    pub fn group(&self, group: &AnnotationGroup) -> String {
        let annotations: Vec<String> = group
            .annotations
            .iter()
            .map(|annotation| self.annotation(annotation))
            .collect();
        format!("#[{}]", annotations.join(", "))
    }

    pub fn annotation(&self, annotation: &AnnotationUse) -> String {
        let kind = self.name(&annotation.kind);
        if annotation.args.is_empty() {
            return kind;
        }
        let args: Vec<String> = annotation.args.iter().map(|arg| self.arg(arg)).collect();
        format!("{}({})", kind, args.join(", "))
    }

    fn arg(&self, arg: &AnnotationArg) -> String {
        match arg {
            AnnotationArg::ClassRef(name) => format!("{}::class", self.name(name)),
            AnnotationArg::Str(value) => {
                format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            AnnotationArg::Other(raw) => raw.clone(),
        }
    }
}

/// Turn the new group list for `class` into text edits.
///
/// Groups are compared position by position with the existing ones: equal
/// groups are kept, differing ones replaced in place, surplus new groups are
/// added after the last existing group (or directly before the class header
/// when there is none), and surplus old groups are removed.
pub fn plan_edits(class: &ParsedClass, groups: &[AnnotationGroup], imports: &Imports) -> Vec<TextEdit> {
    let renderer = NameRenderer::new(imports);
    let existing = &class.declaration.annotation_groups;
    let mut edits = Vec::new();

    for (i, group) in groups.iter().enumerate().take(existing.len()) {
        if &existing[i] != group {
            edits.push(TextEdit::replace(
                class.group_spans[i].clone(),
                renderer.group(group),
            ));
        }
    }

    let added: Vec<String> = groups
        .iter()
        .skip(existing.len())
        .map(|group| renderer.group(group))
        .collect();
    if !added.is_empty() {
        match class.group_spans.last() {
            Some(last) => {
                let text: String = added
                    .iter()
                    .map(|group| format!("\n{}{}", class.indent, group))
                    .collect();
                edits.push(TextEdit::insert(last.end, text));
            }
            None if class.header_start == class.header_line_start + class.indent.len() => {
                let text: String = added
                    .iter()
                    .map(|group| format!("{}{}\n", class.indent, group))
                    .collect();
                edits.push(TextEdit::insert(class.header_line_start, text));
            }
            // Other code precedes the header on its line, so the groups go
            // directly before the header and it moves to a line of its own.
            None => {
                let text: String = added
                    .iter()
                    .map(|group| format!("{}\n{}", group, class.indent))
                    .collect();
                edits.push(TextEdit::insert(class.header_start, text));
            }
        }
    }

    // Removing group i takes the whitespace between it and group i - 1 with it.
    for i in groups.len().max(1)..existing.len() {
        let start = class.group_spans[i - 1].end;
        edits.push(TextEdit::delete(start..class.group_spans[i].end));
    }

    edits
}

/// Apply edits to `source`. Edits must not overlap.
///
/// Edits sharing a start offset are applied in the order given.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    // Back to front so earlier offsets stay valid. The sort is stable.
    sorted.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut output = source.to_string();
    let mut same_start: Vec<&TextEdit> = Vec::new();

    for edit in sorted {
        if same_start
            .first()
            .is_some_and(|first| first.range.start != edit.range.start)
        {
            flush(&mut output, &mut same_start);
        }
        same_start.push(edit);
    }
    flush(&mut output, &mut same_start);

    output
}

fn flush(output: &mut String, same_start: &mut Vec<&TextEdit>) {
    let Some(first) = same_start.first() else {
        return;
    };
    let start = first.range.start;
    let end = same_start
        .iter()
        .map(|edit| edit.range.end)
        .max()
        .unwrap_or(start);
    let replacement: String = same_start
        .iter()
        .map(|edit| edit.replacement.as_str())
        .collect();
    output.replace_range(start..end, &replacement);
    same_start.clear();
}

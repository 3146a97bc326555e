//! Low-level file operations produced by actions.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::{
    SourceContext,
    rewrite::{TextEdit, apply_edits},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace the attribute groups above a class header.
    RewriteAttributes {
        context: SourceContext,
        edits: Vec<TextEdit>,
        before: Vec<String>,
        after: Vec<String>,
    },
}

impl Operation {
    pub fn file_path(&self) -> &str {
        match self {
            Operation::RewriteAttributes { context, .. } => context.file_path(),
        }
    }

    /// Print what this operation would change.
    pub fn preview(&self) {
        self.preview_to(&mut io::stdout().lock());
    }

    pub fn preview_to<W: Write>(&self, writer: &mut W) {
        match self {
            Operation::RewriteAttributes {
                context,
                before,
                after,
                ..
            } => {
                let _ = writeln!(
                    writer,
                    "  {} {}:{}:{}",
                    "-->".blue(),
                    context.file_path(),
                    context.line(),
                    context.col()
                );
                for line in before {
                    let _ = writeln!(writer, "  {} {}", "-".red(), line.red());
                }
                for line in after {
                    let _ = writeln!(writer, "  {} {}", "+".green(), line.green());
                }
                let _ = writeln!(writer, "    {}", context.source_line.dimmed());
                let _ = writeln!(writer);
            }
        }
    }

    /// Apply all operations, one read/write per file.
    ///
    /// Returns the number of operations that changed a file and the number of
    /// files written.
    pub fn apply_all(ops: &[Operation]) -> Result<(usize, usize)> {
        let mut by_file: BTreeMap<&str, Vec<&TextEdit>> = BTreeMap::new();
        let mut applied = 0;

        for op in ops {
            match op {
                Operation::RewriteAttributes { context, edits, .. } => {
                    if edits.is_empty() {
                        continue;
                    }
                    applied += 1;
                    by_file
                        .entry(context.file_path())
                        .or_default()
                        .extend(edits.iter());
                }
            }
        }

        let mut files_written = 0;
        for (file_path, edits) in by_file {
            let source = fs::read_to_string(file_path)
                .with_context(|| format!("Failed to read file: {}", file_path))?;
            let edits: Vec<TextEdit> = edits.into_iter().cloned().collect();
            let updated = apply_edits(&source, &edits);
            if updated != source {
                fs::write(file_path, updated)
                    .with_context(|| format!("Failed to write file: {}", file_path))?;
                files_written += 1;
            }
        }

        Ok((applied, files_written))
    }
}

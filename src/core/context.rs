use std::{
    cell::OnceCell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{CONFIG_FILE_NAME, Config, load_config},
    core::{
        file_scanner::scan_files,
        parsers::php::{ParsedPhpFile, parse_php_source},
        resolver::CoverageAnnotationResolver,
    },
    issues::ParseErrorIssue,
    rules::RuleSet,
};

/// Everything a command needs to look at a project.
///
/// Files are discovered eagerly; parsing happens on first access to
/// [`CheckContext::parsed_files`].
pub struct CheckContext {
    pub config: Config,

    /// Directory the scan (and config lookup) starts from.
    pub root_dir: PathBuf,

    /// PHP files to check.
    pub files: HashSet<String>,

    pub verbose: bool,

    resolver: CoverageAnnotationResolver,

    rules: RuleSet,

    parsed_files: OnceCell<HashMap<String, ParsedPhpFile>>,

    parsed_files_errors: OnceCell<Vec<ParseErrorIssue>>,
}

impl CheckContext {
    pub fn new(common_args: &CommonArgs) -> Result<Self> {
        let verbose = common_args.verbose;
        let target = &common_args.path;

        if !target.exists() {
            return Err(anyhow!("Path does not exist: {}", target.display()));
        }

        // A single file is checked on its own; config is looked up from its directory.
        let single_file = target.is_file();
        let root_dir = if single_file {
            match target.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        } else {
            target.clone()
        };

        let path = root_dir
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", root_dir))?;

        let config_result = load_config(Path::new(path))?;
        if verbose && !config_result.from_file() {
            eprintln!(
                "Note: No {} found, using default configuration",
                CONFIG_FILE_NAME
            );
        }
        let config = config_result.config;

        let files = if single_file {
            HashSet::from([target.to_string_lossy().into_owned()])
        } else {
            let scan_result = scan_files(path, &config.includes, &config.ignores, verbose);
            if scan_result.skipped_count > 0 {
                eprintln!(
                    "Warning: {} path(s) skipped due to access errors{}",
                    scan_result.skipped_count,
                    if verbose { "" } else { " (use -v for details)" }
                );
            }
            scan_result.files
        };

        let resolver = CoverageAnnotationResolver::new(config.resolver_options());
        let rules = RuleSet::from_resolver(&resolver);

        Ok(Self {
            config,
            root_dir,
            files,
            verbose,
            resolver,
            rules,
            parsed_files: OnceCell::new(),
            parsed_files_errors: OnceCell::new(),
        })
    }

    pub fn resolver(&self) -> &CoverageAnnotationResolver {
        &self.resolver
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn parsed_files(&self) -> &HashMap<String, ParsedPhpFile> {
        self.parsed_files.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let parse_result = std::fs::read_to_string(file_path)
                        .map_err(|e| anyhow!("Failed to read file: {}", e))
                        .and_then(|code| parse_php_source(code, file_path));
                    (file_path.clone(), parse_result)
                })
                .collect();

            let mut parsed = HashMap::new();
            let mut errors = Vec::new();

            for (file_path, result) in parse_results {
                match result {
                    Ok(p) => {
                        parsed.insert(file_path, p);
                    }
                    Err(e) => {
                        if self.verbose {
                            eprintln!("Warning: {} - {}", file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            file_path,
                            error: e.to_string(),
                        });
                    }
                }
            }

            errors.sort_by(|a, b| a.file_path.cmp(&b.file_path));
            let _ = self.parsed_files_errors.set(errors);
            parsed
        })
    }

    pub fn parsed_files_errors(&self) -> &Vec<ParseErrorIssue> {
        self.parsed_files();
        self.parsed_files_errors.get_or_init(Vec::new)
    }
}

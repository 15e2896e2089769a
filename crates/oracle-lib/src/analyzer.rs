//! Analysis driver.
//!
//! One run owns a [`Table`], a [`Diagnostics`] sink and a [`SourceMap`]:
//! 1. Each root file is loaded, parsed and collected; its imports follow
//!    depth first, each import path at most once.
//! 2. References are resolved, inheritance validated and recursive structs
//!    flagged over the whole table.
//!
//! Problems with one file never stop its siblings. Any error discards the table.

use rowan::TextRange;
use serde::Deserialize;
use tracing::{debug, trace, warn};

use oracle_core::{SourceId, Table};

use crate::analyze::{
    FileContext, collect_file, detect_recursive_types, resolve_type_refs, validate_inheritance,
};
use crate::cancel::Cancellation;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::loader::{FileLoader, LoadError, SCHEMA_EXTENSION, derive_namespace};
use crate::parser::{
    DEFAULT_PARSE_FUEL, DEFAULT_PARSE_MAX_DEPTH, ParseResult, ast, parse_with_limits,
};
use crate::source_map::SourceMap;
use crate::{Error, Result};

/// Limits and conventions for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Parser fuel per file.
    pub parse_fuel: u32,
    /// Nesting limit for type references, per file.
    pub parse_max_depth: u32,
    /// Stripped from import paths before deduplication and namespace derivation.
    pub extension: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            parse_fuel: DEFAULT_PARSE_FUEL,
            parse_max_depth: DEFAULT_PARSE_MAX_DEPTH,
            extension: SCHEMA_EXTENSION.to_owned(),
        }
    }
}

pub struct Analyzer<'l> {
    loader: &'l dyn FileLoader,
    config: AnalyzerConfig,
    cancellation: Cancellation,
}

impl<'l> Analyzer<'l> {
    pub fn new(loader: &'l dyn FileLoader) -> Self {
        Self {
            loader,
            config: AnalyzerConfig::default(),
            cancellation: Cancellation::new(),
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_parse_fuel(mut self, fuel: u32) -> Self {
        self.config.parse_fuel = fuel;
        self
    }

    pub fn with_parse_recursion_limit(mut self, limit: u32) -> Self {
        self.config.parse_max_depth = limit;
        self
    }

    /// Checked before every file load.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze schema files named by import path.
    ///
    /// Fails only when the run is cancelled or a parser limit is hit. Files that
    /// cannot be loaded are reported and skipped; their siblings still run.
    pub fn analyze<S: AsRef<str>>(&self, files: &[S]) -> Result<Analysis> {
        let mut session = Session::new(self);
        for file in files {
            session.root_file(file.as_ref())?;
        }
        Ok(session.finish())
    }

    /// Analyze one inline source. Its imports still go through the loader.
    pub fn analyze_source(&self, source: &str, namespace: &str) -> Result<Analysis> {
        let mut session = Session::new(self);
        session.inline_namespace = Some(namespace.to_owned());
        let id = session.source_map.add_inline(namespace, source);
        let parsed = session.parse(source, id)?;
        session.diag.extend(parsed.diagnostics);
        session.collect(&parsed.root, id, namespace, None)?;
        Ok(session.finish())
    }
}

/// Analyze schema files with default settings.
pub fn analyze<S: AsRef<str>>(files: &[S], loader: &dyn FileLoader) -> Result<Analysis> {
    Analyzer::new(loader).analyze(files)
}

/// Analyze an inline source with default settings.
pub fn analyze_source(source: &str, namespace: &str, loader: &dyn FileLoader) -> Result<Analysis> {
    Analyzer::new(loader).analyze_source(source, namespace)
}

/// Outcome of an analysis run.
///
/// The table is present only when no diagnostic is an error. Warnings (such as
/// unresolved references) leave it in place.
#[derive(Debug)]
pub struct Analysis {
    table: Option<Table>,
    diagnostics: Diagnostics,
    source_map: SourceMap,
    fuel_consumed: u32,
}

impl Analysis {
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    pub fn is_ok(&self) -> bool {
        self.table.is_some()
    }

    /// Parser fuel used across all files.
    pub fn fuel_consumed(&self) -> u32 {
        self.fuel_consumed
    }

    /// Diagnostics rendered against their sources.
    pub fn render_diagnostics(&self, colored: bool) -> String {
        self.diagnostics.render_colored(&self.source_map, colored)
    }

    pub fn into_table(self) -> Option<Table> {
        self.table
    }

    /// The table, or the diagnostics that prevented it.
    pub fn into_result(self) -> Result<Table> {
        match self.table {
            Some(table) => Ok(table),
            None => Err(Error::AnalysisFailed(self.diagnostics)),
        }
    }
}

struct Session<'a, 'l> {
    analyzer: &'a Analyzer<'l>,
    table: Table,
    diag: Diagnostics,
    source_map: SourceMap,
    fuel_consumed: u32,
    /// Namespace of the inline root, which has no import path to dedup on.
    inline_namespace: Option<String>,
}

impl<'a, 'l> Session<'a, 'l> {
    fn new(analyzer: &'a Analyzer<'l>) -> Self {
        Self {
            analyzer,
            table: Table::new(),
            diag: Diagnostics::new(),
            source_map: SourceMap::new(),
            fuel_consumed: 0,
            inline_namespace: None,
        }
    }

    fn root_file(&mut self, path: &str) -> Result<()> {
        let key = self.import_key(path).to_owned();
        if !self.table.mark_imported(&key) {
            trace!(path, "root file already imported");
            return Ok(());
        }
        self.check_cancelled()?;

        let namespace = derive_namespace(&key).to_owned();
        let loaded = match self.analyzer.loader.load(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                // Empty entry, so the diagnostic still names the file.
                let id = self.source_map.add_file(path, &namespace, "");
                self.report_load_failure(id, TextRange::default(), path, err);
                return Ok(());
            }
        };
        debug!(path, file = %loaded.path, "loaded root file");

        let id = self
            .source_map
            .add_file(&loaded.path, &namespace, &loaded.source);
        let parsed = self.parse(&loaded.source, id)?;
        self.diag.extend(parsed.diagnostics);
        self.collect(&parsed.root, id, &namespace, Some(&loaded.path))
    }

    /// Collect a parsed file, then follow its imports.
    fn collect(
        &mut self,
        root: &ast::Root,
        id: SourceId,
        namespace: &str,
        file_path: Option<&str>,
    ) -> Result<()> {
        let ctx = FileContext {
            source: id,
            namespace,
            file_path,
        };
        collect_file(root, ctx, &mut self.table, &mut self.diag);

        for import in root.imports() {
            self.import(id, &import)?;
        }
        Ok(())
    }

    fn import(&mut self, site: SourceId, import: &ast::Import) -> Result<()> {
        // Missing paths were reported by the parser.
        let Some(path) = import.path() else {
            return Ok(());
        };
        let range = import.text_range();
        let key = self.import_key(&path).to_owned();
        if self.inline_namespace.as_deref() == Some(derive_namespace(&key)) {
            trace!(import = %path, "import of the inline source");
            return Ok(());
        }
        if !self.table.mark_imported(&key) {
            trace!(import = %path, "already imported");
            return Ok(());
        }
        self.check_cancelled()?;

        let loaded = match self.analyzer.loader.load(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.report_load_failure(site, range, &path, err);
                return Ok(());
            }
        };
        debug!(import = %path, file = %loaded.path, "loaded import");

        let namespace = derive_namespace(&key).to_owned();
        let id = self
            .source_map
            .add_file(&loaded.path, &namespace, &loaded.source);
        let parsed = self.parse(&loaded.source, id)?;
        if parsed.diagnostics.errors().any(|d| d.kind().is_syntax_error()) {
            self.diag.extend(parsed.diagnostics);
            self.diag
                .report(site, DiagnosticKind::ImportFailed, range)
                .message(format!("`{}` has syntax errors", path))
                .emit();
            return Ok(());
        }
        self.diag.extend(parsed.diagnostics);
        self.collect(&parsed.root, id, &namespace, Some(&loaded.path))
    }

    fn report_load_failure(
        &mut self,
        site: SourceId,
        range: TextRange,
        path: &str,
        err: LoadError,
    ) {
        debug!(path, error = %err, "load failed");
        match err {
            LoadError::NotFound(_) => self
                .diag
                .report(site, DiagnosticKind::ImportNotFound, range)
                .message(path)
                .emit(),
            err => self
                .diag
                .report(site, DiagnosticKind::ImportFailed, range)
                .message(err.to_string())
                .emit(),
        }
    }

    fn parse(&mut self, source: &str, id: SourceId) -> Result<ParseResult> {
        let config = &self.analyzer.config;
        let parsed = parse_with_limits(source, id, config.parse_fuel, config.parse_max_depth)?;
        self.fuel_consumed = self.fuel_consumed.saturating_add(parsed.fuel_consumed);
        Ok(parsed)
    }

    fn import_key<'p>(&self, path: &'p str) -> &'p str {
        path.strip_suffix(self.analyzer.config.extension.as_str())
            .unwrap_or(path)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.analyzer.cancellation.is_cancelled() {
            warn!(files = self.source_map.len(), "analysis cancelled");
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    fn finish(mut self) -> Analysis {
        resolve_type_refs(&mut self.table, &mut self.diag);
        validate_inheritance(&self.table, &mut self.diag);
        detect_recursive_types(&mut self.table);

        debug!(
            files = self.source_map.len(),
            types = self.table.len(),
            errors = self.diag.error_count(),
            warnings = self.diag.warning_count(),
            "analysis finished"
        );

        let table = if self.diag.has_errors() {
            None
        } else {
            Some(self.table)
        };
        Analysis {
            table,
            diagnostics: self.diag,
            source_map: self.source_map,
            fuel_consumed: self.fuel_consumed,
        }
    }
}

//! CLI Tooling
//!
//! Command-line interface over a class loader bootstrapped from an application's
//! configuration. Every command runs against a fresh loader, so `resolve` and
//! `model` report what a cold request would see.

use crate::bootstrap::loader_from_config;
use crate::catalog::{UnitCatalog, ValidationReport};
use crate::config::{ConfigLoader, SpaarkConfig};
use crate::error::ApiError;
use crate::loader::{ClassLoader, ResolutionAttempt};
use crate::logging::LoggingConfig;
use crate::reflection::UnitReflector;
use crate::registry::Origin;
use crate::types::{parent_unit_file_path, SymbolName};
use crate::unit::{MethodDecl, UnitDescriptor, UnitKind, Visibility};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Spaark loader CLI - namespace resolution and unit loading
#[derive(Parser, Debug)]
#[command(name = "spaark-loader")]
#[command(about = "Resolve, inspect and validate Spaark units")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Application root directory
    #[arg(long, default_value = ".")]
    pub app_root: PathBuf,

    /// Configuration file path (overrides <app-root>/spaark.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve and load a unit by its symbolic name
    Resolve {
        name: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Resolve a bare model name through the model namespaces
    Model {
        name: String,
        /// Namespace tried before the registered model namespaces
        #[arg(long)]
        scope: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the unit file paths a name maps to, without loading anything
    Path { name: String },
    /// Show registered namespace roots and model namespaces
    Registry {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load a unit and show its declaration
    Inspect {
        name: String,
        /// Show a single method, searching ancestors too
        #[arg(long)]
        method: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load every unit file under the registered roots
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

impl Cli {
    /// Logging section with the CLI flags folded in
    pub fn logging_config(&self, base: &LoggingConfig) -> Result<LoggingConfig, ApiError> {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            logging.format = format.parse()?;
        }
        if let Some(output) = &self.log_output {
            logging.output = output.parse()?;
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        Ok(logging)
    }
}

/// Load configuration for `app_root`, from `config_path` when given
pub fn load_config(app_root: &Path, config_path: Option<&Path>) -> Result<SpaarkConfig, ApiError> {
    let config = match config_path {
        Some(path) => ConfigLoader::load_from_file(app_root, path)?,
        None => ConfigLoader::load(app_root)?,
    };
    Ok(config)
}

/// CLI context for running commands
pub struct CliContext {
    config: SpaarkConfig,
    loader: ClassLoader,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(app_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = load_config(&app_root, config_path.as_deref())?;
        Self::from_config(config)
    }

    /// Create a context from already loaded configuration
    pub fn from_config(config: SpaarkConfig) -> Result<Self, ApiError> {
        let loader = loader_from_config(&config)?;
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &SpaarkConfig {
        &self.config
    }

    pub fn loader(&self) -> &ClassLoader {
        &self.loader
    }

    /// Execute a CLI command
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command_name(command), "Executing command");
        match command {
            Commands::Resolve { name, format } => self.handle_resolve(name, format),
            Commands::Model {
                name,
                scope,
                format,
            } => self.handle_model(name, scope.as_deref(), format),
            Commands::Path { name } => self.handle_path(name),
            Commands::Registry { format } => self.handle_registry(format),
            Commands::Inspect {
                name,
                method,
                format,
            } => self.handle_inspect(name, method.as_deref(), format),
            Commands::Validate { format } => self.handle_validate(format),
        }
    }

    fn handle_resolve(&mut self, name: &str, format: &str) -> Result<String, ApiError> {
        if !self.loader.load(name)? {
            return Err(ApiError::UnitNotFound(name.to_string()));
        }
        let unit = self
            .loader
            .unit(name)
            .ok_or_else(|| ApiError::UnitNotFound(name.to_string()))?;
        let attempts = self.loader.last_attempts();

        if format == "json" {
            let value = json!({
                "name": unit.name.to_string(),
                "kind": unit.kind,
                "source": unit.source,
                "attempts": attempts,
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut out = format!("Loaded {} from {}\n", unit.name, unit.source.display());
        if !attempts.is_empty() {
            out.push('\n');
            out.push_str(&format_attempts(attempts));
        }
        Ok(out)
    }

    fn handle_model(
        &mut self,
        name: &str,
        scope: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        let resolved = self
            .loader
            .load_model(name, scope)?
            .ok_or_else(|| ApiError::UnitNotFound(name.to_string()))?;

        if format == "json" {
            let value = json!({
                "model": name,
                "resolved": resolved.to_string(),
                "attempts": self.loader.last_attempts(),
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }
        Ok(resolved.to_string())
    }

    fn handle_path(&self, name: &str) -> Result<String, ApiError> {
        let symbol = SymbolName::parse(name)?;
        let path = self.loader.candidate_path(&symbol);
        let mut out = format!("unit file:   {}\n", path.display());
        if let Some(holder) = parent_unit_file_path(&path, self.loader.file_suffix()) {
            out.push_str(&format!("holder file: {}\n", holder.display()));
        }
        Ok(out)
    }

    fn handle_registry(&self, format: &str) -> Result<String, ApiError> {
        let registry = self.loader.registry();

        if format == "json" {
            let value = json!({
                "default_root": registry.default_root(),
                "priority": registry.priority(),
                "roots": registry.entries().collect::<Vec<_>>(),
                "model_namespaces": registry.model_namespaces(),
            });
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut out = String::from("Namespace roots\n\n");
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Prefix", "Root", "Origin"]);
        for entry in registry.entries() {
            table.add_row(vec![
                entry.prefix.clone(),
                entry.filesystem_root.display().to_string(),
                origin_label(entry.origin).to_string(),
            ]);
        }
        table.add_row(vec![
            "*".to_string(),
            registry.default_root().display().to_string(),
            "default".to_string(),
        ]);
        out.push_str(&format!("{}\n\n", table));

        out.push_str("Model namespaces (search order)\n\n");
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["#", "Namespace", "Origin"]);
        for (index, model) in registry.model_namespaces().iter().enumerate() {
            table.add_row(vec![
                (index + 1).to_string(),
                model.namespace.to_string(),
                origin_label(model.origin).to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        Ok(out)
    }

    fn handle_inspect(
        &mut self,
        name: &str,
        method: Option<&str>,
        format: &str,
    ) -> Result<String, ApiError> {
        if !self.loader.load(name)? {
            return Err(ApiError::UnitNotFound(name.to_string()));
        }
        let reflector = UnitReflector::of(&self.loader, name)
            .ok_or_else(|| ApiError::UnitNotFound(name.to_string()))?;

        if let Some(method) = method {
            let decl = reflector.method(method).ok_or_else(|| {
                ApiError::UnitNotFound(format!("{}::{}", reflector.name(), method))
            })?;
            if format == "json" {
                return Ok(serde_json::to_string_pretty(decl)?);
            }
            return Ok(format_method(decl));
        }

        let unit = reflector.descriptor();
        if format == "json" {
            return Ok(serde_json::to_string_pretty(unit)?);
        }
        Ok(format_unit(unit))
    }

    fn handle_validate(&mut self, format: &str) -> Result<String, ApiError> {
        let catalog = UnitCatalog::scan(self.loader.registry(), self.loader.file_suffix());
        let report = catalog.validate(&mut self.loader);
        info!(
            units = report.entries.len(),
            failures = report.failures().count(),
            "Validated unit files"
        );

        if format == "json" {
            return Ok(serde_json::to_string_pretty(&report)?);
        }
        Ok(format_validation(&report))
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Resolve { .. } => "resolve",
        Commands::Model { .. } => "model",
        Commands::Path { .. } => "path",
        Commands::Registry { .. } => "registry",
        Commands::Inspect { .. } => "inspect",
        Commands::Validate { .. } => "validate",
    }
}

fn origin_label(origin: Origin) -> &'static str {
    match origin {
        Origin::Framework => "framework",
        Origin::Application => "application",
    }
}

fn visibility_label(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Protected => "protected",
        Visibility::Private => "private",
    }
}

fn format_attempts(attempts: &[ResolutionAttempt]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Path", "Outcome"]);
    for attempt in attempts {
        table.add_row(vec![
            attempt.name.clone(),
            attempt.path.display().to_string(),
            format!("{:?}", attempt.outcome),
        ]);
    }
    format!("{}\n", table)
}

fn format_method(method: &MethodDecl) -> String {
    format!(
        "{} {}{}\n",
        visibility_label(method.visibility),
        if method.is_static { "static " } else { "" },
        method.name
    )
}

fn format_unit(unit: &UnitDescriptor) -> String {
    let kind = match unit.kind {
        UnitKind::Class => "class",
        UnitKind::Interface => "interface",
    };
    let mut out = format!("{} {}\n", kind, unit.name);
    if let Some(parent) = &unit.parent {
        out.push_str(&format!("  extends:    {}\n", parent));
    }
    if !unit.interfaces.is_empty() {
        let interfaces: Vec<String> = unit.interfaces.iter().map(|i| i.to_string()).collect();
        out.push_str(&format!("  implements: {}\n", interfaces.join(", ")));
    }
    out.push_str(&format!("  source:     {}\n", unit.source.display()));
    if unit.is_marked_deprecated() {
        out.push_str("  deprecated: yes\n");
    }

    if !unit.methods.is_empty() {
        out.push('\n');
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Method", "Visibility", "Static"]);
        for method in &unit.methods {
            table.add_row(vec![
                method.name.clone(),
                visibility_label(method.visibility).to_string(),
                if method.is_static { "yes" } else { "no" }.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

fn format_validation(report: &ValidationReport) -> String {
    if report.entries.is_empty() {
        return "No unit files found.\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Unit", "Path", "Status"]);
    for entry in &report.entries {
        table.add_row(vec![
            entry.name.clone(),
            entry.path.display().to_string(),
            entry.status.label().to_string(),
        ]);
    }
    let mut out = format!("{}\n\n", table);

    for path in &report.skipped {
        out.push_str(&format!("Skipped (not a valid unit name): {}\n", path.display()));
    }
    let failures = report.failures().count();
    if failures == 0 {
        out.push_str(&format!("All {} units loaded.\n", report.entries.len()));
    } else {
        out.push_str(&format!(
            "{} of {} units failed to load.\n",
            failures,
            report.entries.len()
        ));
    }
    out
}

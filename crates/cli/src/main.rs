//! tagtint: find and paint embedded-language tagged templates.
//!
//! The terminal host of the decoration pipeline. `scan` lists spans, `paint`
//! renders a file once with each template body styled by the theme, `watch`
//! keeps repainting as the file or the config changes, and `tags` prints the
//! active tag table.

mod cli;
mod paint;
mod scan;
mod watch;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command, SourceArgs};
use scan::ScanFormat;
use tagtint_config::{Config, TagSource, default_config_path};
use tagtint_decoration::{DecorationSession, RefreshOutcome};
use tagtint_language::{Dialect, SourceDocument};
use tagtint_primitives::SurfaceId;

use crate::paint::TerminalSink;
use crate::watch::WatchHost;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	if let Some(path) = &cli.config
		&& !path.exists()
	{
		bail!("config file {} does not exist", path.display());
	}
	let config_path = cli.config.clone().or_else(default_config_path);
	let config = load_config(config_path.as_deref())?;

	match cli.command {
		Command::Scan { source, json, files } => {
			let format = if json { ScanFormat::Json } else { ScanFormat::Text };
			run_scan(&config, source, format, &files)
		}
		Command::Paint { source, file } => run_paint(&config, SourceFile::new(file, source.language)),
		Command::Watch { source, file } => WatchHost::new(SourceFile::new(file, source.language), config_path, config).run(),
		Command::Tags => run_tags(&config),
	}
}

fn setup_tracing(verbose: u8) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("TAGTINT_LOG")
		.or_else(|_| EnvFilter::try_from_default_env())
		.unwrap_or_else(|_| match verbose {
			0 => EnvFilter::new("warn"),
			1 => EnvFilter::new("tagtint=debug,info"),
			_ => EnvFilter::new("tagtint=trace,debug"),
		});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(true)
		.init();
}

/// Loads the config at `path`; a missing file or no path means defaults.
pub(crate) fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
	let Some(path) = path else {
		return Ok(Config::default());
	};
	Config::load_or_default(path).with_context(|| format!("loading config {}", path.display()))
}

/// A file on disk plus the dialect override from `--language`.
#[derive(Debug, Clone)]
pub(crate) struct SourceFile {
	pub path: PathBuf,
	pub language: Option<Dialect>,
}

impl SourceFile {
	pub fn new(path: PathBuf, language: Option<Dialect>) -> Self {
		Self { path, language }
	}

	pub fn read(&self) -> anyhow::Result<String> {
		std::fs::read_to_string(&self.path).with_context(|| format!("reading {}", self.path.display()))
	}

	/// The document to decorate, or `None` when the file is not JS/TS.
	pub fn document(&self, text: &str) -> Option<SourceDocument> {
		match self.language {
			Some(dialect) => Some(SourceDocument::new(text, dialect)),
			None => SourceDocument::for_path(&self.path, text),
		}
	}
}

fn run_scan(config: &Config, source: SourceArgs, format: ScanFormat, files: &[PathBuf]) -> anyhow::Result<()> {
	let policy = config.policy();
	if !policy.is_enabled() {
		tracing::info!("scan.disabled");
		return Ok(());
	}
	let allow = policy.resolve_allow_list();

	let mut out = io::stdout().lock();
	for path in files {
		let file = SourceFile::new(path.clone(), source.language);
		let text = file.read()?;
		let Some(document) = file.document(&text) else {
			tracing::warn!(path = %path.display(), "scan.unsupported");
			continue;
		};
		let count = scan::write_spans(&mut out, path, &document, &allow, &policy, format)?;
		tracing::debug!(path = %path.display(), count, "scan.file");
	}
	out.flush()?;
	Ok(())
}

fn run_paint(config: &Config, file: SourceFile) -> anyhow::Result<()> {
	const SURFACE: SurfaceId = SurfaceId(0);

	let text = file.read()?;
	let document = file.document(&text);
	let mut session = DecorationSession::new(TerminalSink::new(config.theme_or_builtin()));

	let outcome = session.refresh(SURFACE, document.as_ref(), &config.policy());
	if outcome == RefreshOutcome::Unsupported {
		tracing::warn!(path = %file.path.display(), "paint.unsupported");
	}

	session.sink().paint(SURFACE, &text, &mut io::stdout().lock())?;
	session.teardown();
	Ok(())
}

fn run_tags(config: &Config) -> anyhow::Result<()> {
	let policy = config.policy();
	let source = match policy.source() {
		TagSource::Builtin => "built-in",
		TagSource::User => "user",
	};

	let mut out = io::stdout().lock();
	writeln!(out, "# {source} tags, {}", if policy.is_enabled() { "enabled" } else { "disabled" })?;
	let width = policy.tags().map(|(tag, _)| tag.len()).max().unwrap_or(0);
	for (tag, key) in policy.tags() {
		writeln!(out, "{tag:<width$}  {key}")?;
	}
	out.flush()?;
	Ok(())
}

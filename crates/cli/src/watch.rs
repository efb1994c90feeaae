//! `tagtint watch`: repaint a file as it and the config change.

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use notify::{EventKind, RecursiveMode, Watcher};
use tagtint_config::{Config, TagPolicy};
use tagtint_decoration::{DecorationSession, RefreshAction, RefreshScheduler, Trigger};
use tagtint_primitives::SurfaceId;

use crate::paint::TerminalSink;
use crate::{SourceFile, load_config};

const SURFACE: SurfaceId = SurfaceId(0);

/// Upper bound on one blocking wait while nothing is pending.
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// What a filesystem event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Touched {
	Document,
	Config,
}

/// Watch-mode state: the decorated file, the active config, and the session
/// painting into the terminal.
pub struct WatchHost {
	source: SourceFile,
	config_path: Option<PathBuf>,
	config: Config,
	policy: TagPolicy,
	session: DecorationSession<TerminalSink>,
	scheduler: RefreshScheduler,
}

impl WatchHost {
	pub fn new(source: SourceFile, config_path: Option<PathBuf>, config: Config) -> Self {
		let policy = config.policy();
		let sink = TerminalSink::new(config.theme_or_builtin());
		Self {
			source,
			config_path,
			config,
			policy,
			session: DecorationSession::new(sink),
			scheduler: RefreshScheduler::default(),
		}
	}

	/// Runs until the watcher disconnects.
	pub fn run(mut self) -> anyhow::Result<()> {
		let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
		let mut watcher = notify::recommended_watcher(tx).context("creating file watcher")?;

		let dirs: BTreeSet<PathBuf> = self.watched_paths().iter().map(|path| watch_dir(path)).collect();
		for dir in dirs {
			watcher
				.watch(&dir, RecursiveMode::NonRecursive)
				.with_context(|| format!("watching {}", dir.display()))?;
			tracing::debug!(dir = %dir.display(), "watch.added");
		}

		let mut out = io::stdout().lock();
		if let Some(action) = self.scheduler.on_trigger(Trigger::FocusChanged, Instant::now()) {
			self.perform(action, &mut out)?;
		}

		loop {
			let timeout = self
				.scheduler
				.next_deadline()
				.map_or(IDLE_WAIT, |deadline| deadline.saturating_duration_since(Instant::now()));

			match rx.recv_timeout(timeout) {
				Ok(Ok(event)) => {
					for touched in self.touched_by(&event) {
						let trigger = match touched {
							Touched::Document => Trigger::DocumentEdited,
							Touched::Config => Trigger::ConfigChanged,
						};
						if let Some(action) = self.scheduler.on_trigger(trigger, Instant::now()) {
							self.perform(action, &mut out)?;
						}
					}
				}
				Ok(Err(error)) => tracing::warn!(%error, "watch.error"),
				Err(mpsc::RecvTimeoutError::Timeout) => {}
				Err(mpsc::RecvTimeoutError::Disconnected) => break,
			}

			if let Some(action) = self.scheduler.poll(Instant::now()) {
				self.perform(action, &mut out)?;
			}
		}

		self.session.teardown();
		Ok(())
	}

	fn watched_paths(&self) -> Vec<PathBuf> {
		let mut paths = vec![self.source.path.clone()];
		paths.extend(self.config_path.clone());
		paths
	}

	/// What `event` touched. Reads and opens touch nothing.
	fn touched_by(&self, event: &notify::Event) -> Vec<Touched> {
		if matches!(event.kind, EventKind::Access(_)) {
			return Vec::new();
		}
		event.paths.iter().filter_map(|path| self.classify(path)).collect()
	}

	fn classify(&self, path: &Path) -> Option<Touched> {
		if same_file_name(path, &self.source.path) {
			return Some(Touched::Document);
		}
		match &self.config_path {
			Some(config) if same_file_name(path, config) => Some(Touched::Config),
			_ => None,
		}
	}

	/// Runs a scheduled action and repaints.
	fn perform(&mut self, mut action: RefreshAction, out: &mut impl Write) -> anyhow::Result<()> {
		if self.reload_config()
			&& let Some(restyle) = self.scheduler.on_trigger(Trigger::ThemeChanged, Instant::now())
		{
			action = restyle;
		}
		if action == RefreshAction::Restyle {
			self.session.restyle();
		}
		self.repaint(out)
	}

	/// Re-reads the config file. Returns true when the theme changed.
	///
	/// A config that fails to load keeps the previous one in effect.
	fn reload_config(&mut self) -> bool {
		let config = match load_config(self.config_path.as_deref()) {
			Ok(config) => config,
			Err(error) => {
				tracing::warn!(error = %format!("{error:#}"), "watch.config_rejected");
				return false;
			}
		};
		if config == self.config {
			return false;
		}

		let theme_changed = config.theme != self.config.theme;
		self.policy = config.policy();
		if theme_changed {
			self.session.sink_mut().set_theme(config.theme_or_builtin());
		}
		self.config = config;
		tracing::info!(theme_changed, enabled = self.policy.is_enabled(), "watch.config_reloaded");
		theme_changed
	}

	fn repaint(&mut self, out: &mut impl Write) -> anyhow::Result<()> {
		let text = match self.source.read() {
			Ok(text) => text,
			Err(error) => {
				tracing::warn!(error = %format!("{error:#}"), "watch.read_failed");
				return Ok(());
			}
		};
		let document = self.source.document(&text);
		let outcome = self.session.refresh(SURFACE, document.as_ref(), &self.policy);
		tracing::debug!(?outcome, "watch.repaint");

		queue!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
		self.session.sink().paint(SURFACE, &text, out)?;
		Ok(())
	}
}

/// Directory to watch for `path`. Editors often save by replacing the file,
/// which a watch on the file itself would miss.
fn watch_dir(path: &Path) -> PathBuf {
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
		_ => PathBuf::from("."),
	};
	dir.canonicalize().unwrap_or(dir)
}

fn same_file_name(event_path: &Path, watched: &Path) -> bool {
	event_path.file_name().is_some() && event_path.file_name() == watched.file_name()
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("/tmp/x/app.ts", "app.ts", true)]
	#[case("/tmp/x/app.ts", "src/app.ts", true)]
	#[case("/tmp/x/app.tsx", "app.ts", false)]
	#[case("/", "app.ts", false)]
	fn matches_by_file_name(#[case] event: &str, #[case] watched: &str, #[case] expected: bool) {
		assert_eq!(same_file_name(Path::new(event), Path::new(watched)), expected);
	}

	#[test]
	fn bare_file_name_watches_current_dir() {
		let dir = watch_dir(Path::new("app.ts"));
		assert_eq!(dir, PathBuf::from(".").canonicalize().unwrap());
	}

	#[test]
	fn classify_routes_document_and_config() {
		let host = WatchHost::new(
			SourceFile::new(PathBuf::from("src/app.ts"), None),
			Some(PathBuf::from("/home/u/.config/tagtint/config.kdl")),
			Config::default(),
		);
		assert_eq!(host.classify(Path::new("/abs/src/app.ts")), Some(Touched::Document));
		assert_eq!(host.classify(Path::new("/home/u/.config/tagtint/config.kdl")), Some(Touched::Config));
		assert_eq!(host.classify(Path::new("/abs/src/other.ts")), None);
	}

	#[test]
	fn access_events_touch_nothing() {
		use notify::event::{AccessKind, DataChange, ModifyKind};

		let host = WatchHost::new(SourceFile::new(PathBuf::from("app.ts"), None), None, Config::default());
		let read = notify::Event::new(EventKind::Access(AccessKind::Any)).add_path(PathBuf::from("/w/app.ts"));
		assert_eq!(host.touched_by(&read), vec![]);

		let write = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
			.add_path(PathBuf::from("/w/app.ts"))
			.add_path(PathBuf::from("/w/other.ts"));
		assert_eq!(host.touched_by(&write), vec![Touched::Document]);
	}

	#[test]
	fn access_event_still_fires_pending_refresh() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("q.js");
		std::fs::write(&file, "sql`x`").unwrap();

		let mut host = WatchHost::new(SourceFile::new(file.clone(), None), None, Config::default());
		let start = Instant::now();
		assert_eq!(host.scheduler.on_trigger(Trigger::DocumentEdited, start), None);

		let read = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any)).add_path(file);
		assert!(host.touched_by(&read).is_empty());
		let action = host.scheduler.poll(start + Duration::from_secs(1)).expect("debounced refresh is due");
		host.perform(action, &mut Vec::new()).unwrap();
		assert_eq!(host.session.sink().frame(SURFACE).len(), 1);
	}

	#[test]
	fn repaint_and_config_reload() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("q.js");
		let config_path = dir.path().join("config.kdl");
		std::fs::write(&file, "sql`x`").unwrap();
		std::fs::write(&config_path, "").unwrap();

		let mut host = WatchHost::new(SourceFile::new(file, None), Some(config_path.clone()), Config::default());
		let mut out = Vec::new();
		host.perform(RefreshAction::Repaint, &mut out).unwrap();
		assert_eq!(host.session.sink().frame(SURFACE).len(), 1);

		std::fs::write(&config_path, "tagged-templates { enabled #false }").unwrap();
		assert!(!host.reload_config());
		assert!(!host.policy.is_enabled());
		host.repaint(&mut out).unwrap();
		assert!(host.session.sink().frame(SURFACE).is_empty());

		std::fs::write(&config_path, r##"theme { styles { sql bg="#010203" } }"##).unwrap();
		assert!(host.reload_config());
		assert!(host.policy.is_enabled());
	}
}

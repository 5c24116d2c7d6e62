//! Interactive workspace session.
//!
//! Reads one command per line from stdin and applies it to a
//! [`WorkspaceSession`]. Between commands the store is polled so that
//! layouts, color groups and selections written by another process show up
//! in this one. Mirror outcomes of earlier saves are reported as they arrive
//! and never hold up the next command.

use std::process::ExitCode;
use std::time::Duration;

use gridboard::config::schema::Config;
use gridboard::drag::slot_id;
use gridboard::persistence::MirrorOutcome;
use gridboard::widgets::{
    CommandLauncher, DetachError, WindowSize, POPUP_BLOCKED_WARNING,
};
use gridboard::{
    ColorId, ConfigurationError, DragEvent, DragOutcome, ExternalChange, LayoutCatalog,
    LayoutGridEngine, LayoutPicker, LoadError, PersistenceGateway, WidgetKind, WorkspaceSession,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::MissedTickBehavior;

const HELP: &str = "\
Commands:
  show                    draw the grid and list every slot
  add <slot> <kind>       place a widget (chart, table, details, depth)
  remove <slot>           remove a widget with its color group and symbol
  drag <from> <to>        move a widget; swaps with an occupied target
  drag <from> -           start a drag and cancel it
  color <slot> <color>    join a color group (1-5 or red, green, blue, yellow, purple)
  uncolor <slot>          leave the color group
  select <slot> <symbol>  select a symbol (as typed) for the widget's color group
  detach <slot>           open the widget in its own view
  save                    save the layout
  load                    restore the saved layout
  reset                   close the workspace and return to the layout picker
  layouts                 list layouts
  pick <n|id>             open a layout
  help                    show this help
  quit                    leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Help,
    Show,
    Layouts,
    Pick(String),
    Add { slot: usize, kind: WidgetKind },
    Remove(usize),
    Drag { from: usize, to: Option<usize> },
    Color { slot: usize, color: ColorId },
    Uncolor(usize),
    Select { slot: usize, symbol: String },
    Detach(usize),
    Save,
    Load,
    Reset,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub(crate) fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let arity = |count: usize, usage: &str| {
        if args.len() == count {
            Ok(())
        } else {
            Err(format!("Usage: {usage}"))
        }
    };

    let command = match name.as_str() {
        "help" | "?" => SessionCommand::Help,
        "show" => SessionCommand::Show,
        "layouts" => SessionCommand::Layouts,
        "pick" => {
            arity(1, "pick <n|id>")?;
            SessionCommand::Pick(args[0].to_string())
        }
        "add" => {
            arity(2, "add <slot> <kind>")?;
            SessionCommand::Add {
                slot: parse_slot(args[0])?,
                kind: args[1].parse()?,
            }
        }
        "remove" => {
            arity(1, "remove <slot>")?;
            SessionCommand::Remove(parse_slot(args[0])?)
        }
        "drag" => {
            arity(2, "drag <from> <to|->")?;
            let to = match args[1] {
                "-" => None,
                target => Some(parse_slot(target)?),
            };
            SessionCommand::Drag {
                from: parse_slot(args[0])?,
                to,
            }
        }
        "color" => {
            arity(2, "color <slot> <color>")?;
            SessionCommand::Color {
                slot: parse_slot(args[0])?,
                color: args[1].parse().map_err(|e| format!("{e}"))?,
            }
        }
        "uncolor" => {
            arity(1, "uncolor <slot>")?;
            SessionCommand::Uncolor(parse_slot(args[0])?)
        }
        "select" => {
            arity(2, "select <slot> <symbol>")?;
            SessionCommand::Select {
                slot: parse_slot(args[0])?,
                symbol: args[1].to_string(),
            }
        }
        "detach" => {
            arity(1, "detach <slot>")?;
            SessionCommand::Detach(parse_slot(args[0])?)
        }
        "save" => SessionCommand::Save,
        "load" => SessionCommand::Load,
        "reset" => SessionCommand::Reset,
        "quit" | "exit" => SessionCommand::Quit,
        other => return Err(format!("Unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

fn parse_slot(s: &str) -> Result<usize, String> {
    s.parse().map_err(|_| format!("Invalid slot '{s}'"))
}

/// Whether the input loop continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

/// Session state driven by parsed commands.
pub(crate) struct SessionRunner {
    picker: LayoutPicker,
    session: Option<WorkspaceSession>,
    idle_gateway: Option<PersistenceGateway>,
    launcher: CommandLauncher,
    base_url: String,
    window: WindowSize,
    /// Latest save still waiting for its mirror outcome, and whether its
    /// local write succeeded.
    pending_mirror: Option<(u64, bool)>,
}

impl SessionRunner {
    pub(crate) fn new(
        gateway: PersistenceGateway,
        launcher: CommandLauncher,
        base_url: &str,
        window: WindowSize,
    ) -> Self {
        Self {
            picker: LayoutPicker::new(LayoutCatalog::builtin()),
            session: None,
            idle_gateway: Some(gateway),
            launcher,
            base_url: base_url.to_string(),
            window,
            pending_mirror: None,
        }
    }

    /// Runner configured from `config`.
    fn from_config(config: &Config, gateway: PersistenceGateway) -> Self {
        Self::new(
            gateway,
            CommandLauncher::new(config.detach.opener.clone()),
            &config.detach.base_url,
            config.detach.window_size(),
        )
    }

    pub(crate) fn session(&self) -> Option<&WorkspaceSession> {
        self.session.as_ref()
    }

    /// Opens the layout named by a catalog id or 1-based number, closing
    /// any open workspace first.
    pub(crate) fn pick(&mut self, choice: &str) -> Result<(), ConfigurationError> {
        let selected = match choice.parse::<u8>() {
            Ok(n) => self.picker.select_by_index(n),
            Err(_) => self.picker.select_by_id(choice).is_ok(),
        };
        let template = match self.picker.active() {
            Some(template) if selected => template.clone(),
            _ => return Err(ConfigurationError::UnknownLayout(choice.to_string())),
        };

        let workspace = WorkspaceSession::open(template)?;
        self.close();
        let workspace = match self.idle_gateway.take() {
            Some(gateway) => workspace.with_persistence(gateway),
            None => workspace,
        };
        println!(
            "Opened {} ({})",
            workspace.template().display_name(),
            workspace.signature()
        );
        let restored = workspace.slots().occupied();
        if restored > 0 {
            println!("Restored saved layout ({restored} widget(s))");
        }
        self.session = Some(workspace);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            if let Some(gateway) = session.reset() {
                self.idle_gateway = Some(gateway);
            }
        }
    }

    /// Applies one command.
    pub(crate) fn execute(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => return Flow::Quit,
            SessionCommand::Layouts => self.print_layouts(),
            SessionCommand::Pick(choice) => {
                if let Err(e) = self.pick(&choice) {
                    eprintln!("Error: {e}");
                }
            }
            SessionCommand::Reset => {
                self.close();
                self.picker.clear();
                println!("Workspace closed. Pick a layout:");
                self.print_layouts();
            }
            SessionCommand::Save => self.save(),
            command => {
                let Some(session) = self.session.as_mut() else {
                    eprintln!("No layout open; use 'pick <n|id>'");
                    return Flow::Continue;
                };
                apply(session, command, &self.launcher, &self.base_url, self.window);
            }
        }
        Flow::Continue
    }

    /// Saves locally and reports at once; the mirror outcome follows later
    /// through [`SessionRunner::report_mirror_outcome`].
    fn save(&mut self) {
        let Some(session) = self.session.as_ref() else {
            eprintln!("No layout open; use 'pick <n|id>'");
            return;
        };
        let result = session.save();
        // A failed local save still went to the mirror.
        let sequence = session.persistence().map(PersistenceGateway::last_sequence);
        match &result {
            Ok(_) => println!("Layout saved locally."),
            Err(e) => eprintln!("Error: layout not saved locally: {e}"),
        }
        self.pending_mirror = sequence
            .filter(|sequence| *sequence > 0)
            .map(|sequence| (sequence, result.is_ok()));
    }

    /// Save still waiting for its mirror outcome.
    pub(crate) fn pending_mirror(&self) -> Option<u64> {
        self.pending_mirror.map(|(sequence, _)| sequence)
    }

    /// Reports the mirror outcome of the latest save; outcomes of older
    /// saves are ignored.
    pub(crate) fn report_mirror_outcome(&mut self, outcome: &MirrorOutcome) {
        let Some((sequence, saved_locally)) = self.pending_mirror else {
            return;
        };
        if outcome.sequence() != sequence {
            tracing::debug!(sequence = outcome.sequence(), latest = sequence, "stale mirror outcome");
            return;
        }
        self.pending_mirror = None;
        match outcome {
            MirrorOutcome::Mirrored { endpoint, .. } if saved_locally => {
                println!("Layout saved successfully! (mirrored to {endpoint})")
            }
            MirrorOutcome::Mirrored { endpoint, .. } => println!("Layout mirrored to {endpoint}."),
            MirrorOutcome::SoftFailure {
                endpoint, reason, ..
            } => tracing::warn!(sequence, %endpoint, %reason, "layout not mirrored"),
            MirrorOutcome::Skipped { .. } => {}
        }
    }

    /// Applies changes other processes made to the store.
    pub(crate) fn apply_external_changes(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for change in session.poll_external_changes() {
            match change {
                ExternalChange::Snapshot => println!("Layout reloaded (changed elsewhere)"),
                ExternalChange::Colors => println!("Color groups reloaded (changed elsewhere)"),
                ExternalChange::Selections => println!("Selections reloaded (changed elsewhere)"),
                ExternalChange::Other(_) => {}
            }
        }
    }

    fn print_layouts(&self) {
        for (n, template) in self.picker.catalog().templates().iter().enumerate() {
            let marker = if self.picker.active_index() == Some((n + 1) as u8) {
                '*'
            } else {
                ' '
            };
            println!(
                "{marker}{:>2}  {:<16} {}",
                n + 1,
                template.id.as_deref().unwrap_or("-"),
                template.display_name()
            );
        }
    }
}

fn apply(
    session: &mut WorkspaceSession,
    command: SessionCommand,
    launcher: &CommandLauncher,
    base_url: &str,
    window: WindowSize,
) {
    match command {
        SessionCommand::Show => show(session),
        SessionCommand::Add { slot, kind } => match session.add_widget(slot, kind) {
            Ok(id) => println!("Added {id} to slot {slot}"),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Remove(slot) => match session.remove_widget(slot) {
            Ok(widget) => println!("Removed {} from slot {slot}", widget.id),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Drag { from, to } => drag(session, from, to),
        SessionCommand::Color { slot, color } => match session.assign_color(slot, color) {
            Ok(_) => println!(
                "Slot {slot} joined the {} group",
                color.swatch().display_name
            ),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Uncolor(slot) => match session.clear_color(slot) {
            Ok(Some(color)) => println!(
                "Slot {slot} left the {} group",
                color.swatch().display_name
            ),
            Ok(None) => println!("Slot {slot} is not in a color group"),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Select { slot, symbol } => match session.select_symbol(slot, &symbol) {
            Ok(0) => println!("Slot {slot} is not in a color group; nothing to sync"),
            Ok(n) => println!("{symbol} selected for {n} widget(s)"),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Detach(slot) => match session.detach(slot, launcher, base_url, window) {
            Ok(url) => println!("Opened {url}"),
            Err(DetachError::Blocked { url, reason }) => {
                tracing::debug!(%url, %reason, "opener failed");
                eprintln!("{POPUP_BLOCKED_WARNING}");
            }
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Load => match session.restore() {
            Ok(occupied) => println!("Restored saved layout ({occupied} widget(s))"),
            Err(LoadError::NotFound) => println!("No saved layout"),
            Err(e @ LoadError::ShapeMismatch { .. }) => println!("Not restored: {e}"),
            Err(e) => eprintln!("Error: {e}"),
        },
        SessionCommand::Help
        | SessionCommand::Quit
        | SessionCommand::Layouts
        | SessionCommand::Pick(_)
        | SessionCommand::Reset
        | SessionCommand::Save => {}
    }
}

fn drag(session: &mut WorkspaceSession, from: usize, to: Option<usize>) {
    if session.drag(DragEvent::Start { slot: slot_id(from) }) == DragOutcome::Rejected {
        eprintln!("Slot {from} has no widget to drag");
        return;
    }
    let Some(to) = to else {
        session.drag(DragEvent::Cancel);
        println!("Drag cancelled");
        return;
    };
    let over = Some(slot_id(to));
    session.drag(DragEvent::Move { over: over.clone() });
    match session.drag(DragEvent::End { over }) {
        DragOutcome::Dropped { swapped: true, .. } => println!("Moved slot {from} to slot {to}"),
        _ => println!("Nothing moved"),
    }
}

fn show(session: &WorkspaceSession) {
    println!(
        "{} ({})",
        session.template().display_name(),
        session.signature()
    );
    if let Ok(rows) = LayoutGridEngine::preview(session.template()) {
        for row in rows {
            println!("  {row}");
        }
    }
    for slot in 0..session.slots().len() {
        match session.render_slot(slot, 60) {
            Some(line) => {
                let group = session
                    .slots()
                    .get(slot)
                    .and_then(|w| session.sync().color_of(&w.id))
                    .map(|c| format!("  ({})", c.swatch().display_name))
                    .unwrap_or_default();
                println!("  {slot}: {line}{group}");
            }
            None => println!("  {slot}: (empty)"),
        }
    }
}

/// Runs `gbd session`.
pub(crate) fn run_session_command(config: &Config, layout: Option<&str>) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run_session(config, layout))
}

async fn run_session(config: &Config, layout: Option<&str>) -> ExitCode {
    let setup = super::build_gateway(config).and_then(|gateway| {
        let mirror_wait = config.mirror.timeout()? + Duration::from_millis(500);
        Ok((gateway, mirror_wait, config.storage.poll_interval()?))
    });
    let (gateway, mirror_wait, poll_interval) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut outcomes = gateway.mirror_outcomes();
    let mut runner = SessionRunner::from_config(config, gateway);

    let choice = layout.unwrap_or(&config.workspace.default_layout);
    if let Err(e) = runner.pick(choice) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut mirror_open = true;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_command(&line) {
                    Ok(Some(command)) => {
                        if runner.execute(command) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                },
                Ok(None) => break,
                Err(e) => {
                    eprintln!("Error: cannot read input: {e}");
                    return ExitCode::FAILURE;
                }
            },
            outcome = outcomes.recv(), if mirror_open => match outcome {
                Ok(outcome) => runner.report_mirror_outcome(&outcome),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "mirror outcomes lagged");
                }
                Err(RecvError::Closed) => mirror_open = false,
            },
            _ = ticker.tick() => runner.apply_external_changes(),
            _ = &mut ctrl_c => break,
        }
    }

    // Input is done; give an in-flight mirror write a chance to land.
    if let Some(sequence) = runner.pending_mirror() {
        if let Some(outcome) = wait_for_outcome(&mut outcomes, sequence, mirror_wait).await {
            runner.report_mirror_outcome(&outcome);
        }
    }
    runner.close();
    ExitCode::SUCCESS
}

/// Waits up to `wait` for the outcome of save `sequence`, skipping older ones.
async fn wait_for_outcome(
    outcomes: &mut broadcast::Receiver<MirrorOutcome>,
    sequence: u64,
    wait: Duration,
) -> Option<MirrorOutcome> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        match tokio::time::timeout_at(deadline, outcomes.recv()).await {
            Ok(Ok(outcome)) if outcome.sequence() == sequence => return Some(outcome),
            Ok(Ok(outcome)) if outcome.sequence() > sequence => return None,
            Ok(Ok(_)) | Ok(Err(RecvError::Lagged(_))) => continue,
            Ok(Err(RecvError::Closed)) | Err(_) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard::persistence::{DisabledMirror, RemoteMirror, SNAPSHOT_KEY};
    use kv_store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn runner(store: &Arc<MemoryStore>) -> SessionRunner {
        let gateway = PersistenceGateway::new(store.clone(), Box::new(DisabledMirror::new()));
        runner_with(gateway)
    }

    fn runner_with(gateway: PersistenceGateway) -> SessionRunner {
        SessionRunner::new(
            gateway,
            CommandLauncher::new("true"),
            "http://localhost:3000",
            WindowSize::default(),
        )
    }

    /// Mirror whose outcomes never arrive on their own.
    struct SilentMirror {
        tx: broadcast::Sender<MirrorOutcome>,
    }

    impl RemoteMirror for SilentMirror {
        fn replicate(&self, _sequence: u64, _body: String) {}

        fn subscribe(&self) -> broadcast::Receiver<MirrorOutcome> {
            self.tx.subscribe()
        }
    }

    fn command(line: &str) -> SessionCommand {
        parse_command(line)
            .expect("valid command")
            .expect("not blank")
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            command("add 0 chart"),
            SessionCommand::Add {
                slot: 0,
                kind: WidgetKind::Chart
            }
        );
        assert_eq!(command("  DRAG 1 3 "), SessionCommand::Drag { from: 1, to: Some(3) });
        assert_eq!(command("drag 1 -"), SessionCommand::Drag { from: 1, to: None });
        assert_eq!(
            command("color 2 purple"),
            SessionCommand::Color {
                slot: 2,
                color: ColorId::new(5).expect("valid")
            }
        );
        assert_eq!(command("pick 2col-span-left"), SessionCommand::Pick("2col-span-left".to_string()));
        assert_eq!(command("exit"), SessionCommand::Quit);
    }

    #[test]
    fn test_parse_select_keeps_symbol_as_typed() {
        assert_eq!(
            command("select 0 msft"),
            SessionCommand::Select {
                slot: 0,
                symbol: "msft".to_string()
            }
        );
        assert_eq!(
            command("select 1 BRK.b"),
            SessionCommand::Select {
                slot: 1,
                symbol: "BRK.b".to_string()
            }
        );
    }

    #[test]
    fn test_parse_blank_and_comment_lines() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("# setup"), Ok(None));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("add 0").is_err());
        assert!(parse_command("add x chart").is_err());
        assert!(parse_command("add 0 heatmap").is_err());
        assert!(parse_command("color 0 9").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_pick_by_number_and_id() {
        let store = Arc::new(MemoryStore::new());
        let mut runner = runner(&store);
        runner.pick("4").expect("2x2 is fourth");
        assert_eq!(
            runner.session().map(|s| s.slots().len()),
            Some(4)
        );
        runner.pick("3x3-complex").expect("known id");
        assert_eq!(
            runner.session().map(|s| s.slots().len()),
            Some(6)
        );
        assert!(runner.pick("13").is_err());
        assert!(runner.pick("nope").is_err());
        assert_eq!(
            runner.session().and_then(|s| s.template().id.clone()).as_deref(),
            Some("3x3-complex")
        );
    }

    #[test]
    fn test_commands_without_layout_are_refused() {
        let store = Arc::new(MemoryStore::new());
        let mut runner = runner(&store);
        assert_eq!(runner.execute(command("add 0 chart")), Flow::Continue);
        assert!(runner.session().is_none());
        assert_eq!(runner.execute(command("quit")), Flow::Quit);
    }

    #[test]
    fn test_pick_restores_saved_layout() {
        let store = Arc::new(MemoryStore::new());
        let mut runner = runner(&store);
        runner.pick("1x2").expect("known id");
        runner.execute(command("add 1 depth"));
        runner.execute(command("save"));
        assert!(store.get(SNAPSHOT_KEY).expect("read").is_some());

        runner.execute(command("reset"));
        assert!(runner.session().is_none());
        runner.pick("1x2").expect("known id");
        assert_eq!(
            runner.session().and_then(|s| s.slots().position_of("depth-1")),
            Some(1)
        );

        runner.execute(command("remove 1"));
        runner.execute(command("load"));
        assert_eq!(runner.session().map(|s| s.slots().occupied()), Some(1));

        runner.pick("2x2").expect("known id");
        assert_eq!(runner.session().map(|s| s.slots().occupied()), Some(0));
    }

    #[test]
    fn test_save_returns_before_mirror_outcome() {
        let store = Arc::new(MemoryStore::new());
        let (tx, _rx) = broadcast::channel(4);
        let gateway = PersistenceGateway::new(store.clone(), Box::new(SilentMirror { tx }));
        let mut runner = runner_with(gateway);
        runner.pick("1x1").expect("known id");

        assert_eq!(runner.execute(command("save")), Flow::Continue);
        assert_eq!(runner.pending_mirror(), Some(1));
        assert_eq!(runner.execute(command("add 0 chart")), Flow::Continue);
        assert_eq!(runner.execute(command("save")), Flow::Continue);
        assert_eq!(runner.pending_mirror(), Some(2));

        // The first save's outcome is superseded.
        runner.report_mirror_outcome(&MirrorOutcome::Mirrored {
            sequence: 1,
            endpoint: "http://mirror.test".to_string(),
        });
        assert_eq!(runner.pending_mirror(), Some(2));
        runner.report_mirror_outcome(&MirrorOutcome::SoftFailure {
            sequence: 2,
            endpoint: "http://mirror.test".to_string(),
            reason: "timed out".to_string(),
        });
        assert_eq!(runner.pending_mirror(), None);
    }

    #[tokio::test]
    async fn test_skipped_mirror_outcome_is_found() {
        let store = Arc::new(MemoryStore::new());
        let gateway = PersistenceGateway::new(store.clone(), Box::new(DisabledMirror::new()));
        let mut outcomes = gateway.mirror_outcomes();
        let mut runner = runner_with(gateway);
        runner.pick("1x1").expect("known id");
        runner.execute(command("save"));
        let sequence = runner.pending_mirror().expect("save pending");

        let outcome = wait_for_outcome(&mut outcomes, sequence, Duration::from_millis(100)).await;
        assert_eq!(outcome, Some(MirrorOutcome::Skipped { sequence }));
        runner.report_mirror_outcome(&MirrorOutcome::Skipped { sequence });
        assert_eq!(runner.pending_mirror(), None);
    }

    #[tokio::test]
    async fn test_wait_for_outcome_times_out() {
        let (tx, mut outcomes) = broadcast::channel::<MirrorOutcome>(4);
        let waited = wait_for_outcome(&mut outcomes, 1, Duration::from_millis(20)).await;
        assert_eq!(waited, None);
        drop(tx);
    }

    #[test]
    fn test_drag_and_group_commands() {
        let store = Arc::new(MemoryStore::new());
        let mut runner = runner(&store);
        runner.pick("2x2").expect("known id");
        for line in [
            "add 0 chart",
            "add 1 table",
            "drag 0 3",
            "color 1 2",
            "color 3 green",
            "select 3 AMD",
        ] {
            runner.execute(command(line));
        }
        let session = runner.session().expect("open");
        assert_eq!(session.slots().position_of("chart-0"), Some(3));
        assert_eq!(session.sync().selection_of("table-1"), Some("AMD"));
        assert_eq!(session.sync().selection_of("chart-0"), Some("AMD"));
    }
}

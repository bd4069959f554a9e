use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, DisableMouseCapture, EnableMouseCapture,
    Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use kode::{app::Editor, config::Config, services::tracing_setup};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::Duration,
};

/// A terminal text editor with split panes and tab drag and drop
#[derive(Parser, Debug)]
#[command(name = "kode")]
#[command(about = "A terminal text editor with split panes and tab drag and drop", long_about = None)]
#[command(version)]
struct Args {
    /// Files to open, each in its own tab
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Directory holding config.json (default: <user config dir>/kode)
    #[arg(short = 'c', long, value_name = "CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Path to log file for editor diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(tracing_setup::default_log_path);
    tracing_setup::init_global(&log_file)?;
    tracing::info!("Editor starting");

    let config = match args.config_dir.clone().or_else(Config::default_config_dir) {
        Some(dir) => Config::load(&dir),
        None => Config::default(),
    };

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        original_hook(panic);
    }));

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    let size = terminal.size()?;

    let result = Editor::new(config, size.width, size.height).and_then(|mut editor| {
        for path in &args.files {
            if let Err(e) = editor.open_file(path) {
                tracing::error!("{}", e);
            }
        }
        run_event_loop(&mut editor, &mut terminal)
    });

    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!("Editor exited with error: {:#}", e);
    } else {
        tracing::info!("Editor exiting");
    }
    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

fn run_event_loop(
    editor: &mut Editor,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    use std::time::Instant;

    const FRAME_DURATION: Duration = Duration::from_millis(16); // 60fps
    let mut last_render = Instant::now();
    let mut needs_render = true;
    let mut pending_event: Option<CrosstermEvent> = None;

    loop {
        // Debounced highlight refreshes that are due
        if editor.check_highlight_timers() {
            needs_render = true;
        }

        // Results from the highlight worker, edits made through other views
        if editor.poll_view_updates() {
            needs_render = true;
        }

        if editor.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| editor.render(frame))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let event = if let Some(e) = pending_event.take() {
            Some(e)
        } else {
            let timeout = if needs_render {
                FRAME_DURATION.saturating_sub(last_render.elapsed())
            } else {
                Duration::from_millis(50)
            };

            if event_poll(timeout)? {
                Some(event_read()?)
            } else {
                None
            }
        };

        let Some(event) = event else { continue };

        let (event, next) = coalesce_mouse_moves(event)?;
        pending_event = next;

        match event {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    handle_key_event(editor, key_event)?;
                    needs_render = true;
                }
            }
            CrosstermEvent::Mouse(mouse_event) => {
                if handle_mouse_event(editor, mouse_event)? {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(w, h) => {
                editor.resize(w, h);
                needs_render = true;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Handle a keyboard event
fn handle_key_event(editor: &mut Editor, key_event: KeyEvent) -> AnyhowResult<()> {
    tracing::trace!(
        "Key event received: code={:?}, modifiers={:?}, kind={:?}",
        key_event.code,
        key_event.modifiers,
        key_event.kind
    );
    editor.handle_key(key_event.code, key_event.modifiers)
}

/// Handle a mouse event
/// Returns true if a re-render is needed
fn handle_mouse_event(editor: &mut Editor, mouse_event: MouseEvent) -> AnyhowResult<bool> {
    editor
        .handle_mouse(mouse_event)
        .context("Failed to handle mouse event")
}

/// Skip stale mouse move/drag events, return the latest one.
/// If we read a different event while draining, return it as pending.
fn coalesce_mouse_moves(
    event: CrosstermEvent,
) -> AnyhowResult<(CrosstermEvent, Option<CrosstermEvent>)> {
    use crossterm::event::MouseEventKind;

    let is_motion = |e: &CrosstermEvent| {
        matches!(e, CrosstermEvent::Mouse(m)
            if matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)))
    };
    if !is_motion(&event) {
        return Ok((event, None));
    }

    let mut latest = event;
    while event_poll(Duration::ZERO)? {
        let next = event_read()?;
        let same_kind = match (&latest, &next) {
            (CrosstermEvent::Mouse(a), CrosstermEvent::Mouse(b)) => a.kind == b.kind,
            _ => false,
        };
        if same_kind {
            latest = next; // Newer position, skip the old one
        } else {
            return Ok((latest, Some(next))); // Hit a click/key, save it
        }
    }
    Ok((latest, None))
}

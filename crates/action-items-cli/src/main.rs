use action_items_config::Config;
use action_items_engine::io::{self, IoError};
use action_items_engine::{
    CollectOutcome, Dispatched, Editor, HostEvent, SyncSettings, Synchronizer, TextBuffer,
};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "Usage: action-items-cli [--collect] [document-path]";

struct App {
    path: PathBuf,
    buffer: TextBuffer,
    sync: Synchronizer,
    saved_version: u64,
    status: String,
    confirm_quit: bool,
}

impl App {
    fn open(path: PathBuf, settings: SyncSettings) -> Result<Self> {
        let (buffer, status) = match io::read_document(&path) {
            Ok(content) => (TextBuffer::from_text(&content), String::new()),
            Err(IoError::NotFound(_)) => (TextBuffer::new(), "New file".to_string()),
            Err(e) => return Err(e.into()),
        };

        let mut app = Self {
            path,
            buffer,
            sync: Synchronizer::new(settings),
            saved_version: 0,
            status,
            confirm_quit: false,
        };
        app.sync.dispatch(HostEvent::Activate, Some(&mut app.buffer));
        Ok(app)
    }

    fn is_dirty(&self) -> bool {
        self.buffer.version() != self.saved_version
    }

    /// Returns false when the app should exit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let quit = key.code == KeyCode::Esc || ctrl && key.code == KeyCode::Char('q');
        if quit {
            if self.is_dirty() && !self.confirm_quit {
                self.confirm_quit = true;
                self.status = "Unsaved changes, press again to quit".to_string();
                return true;
            }
            return false;
        }
        self.confirm_quit = false;

        match key.code {
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::Char('k') if ctrl => self.collect(),
            KeyCode::Char(ch) if !ctrl => {
                self.buffer.insert_char(ch);
                self.notify_edit();
            }
            KeyCode::Enter => {
                self.buffer.insert_newline();
                self.notify_edit();
            }
            KeyCode::Backspace => {
                if self.buffer.backspace() {
                    self.notify_edit();
                }
            }
            KeyCode::Delete => {
                if self.buffer.delete_forward() {
                    self.notify_edit();
                }
            }
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Home => self.buffer.move_line_start(),
            KeyCode::End => self.buffer.move_line_end(),
            _ => {}
        }
        true
    }

    fn notify_edit(&mut self) {
        let outcome = self.sync.dispatch(HostEvent::Edit, Some(&mut self.buffer));
        log::debug!("Edit handled: {outcome:?}");
    }

    /// The "Collect Action Items" command
    fn collect(&mut self) {
        self.status = match self.sync.dispatch(HostEvent::Command, Some(&mut self.buffer)) {
            Dispatched::Collected(CollectOutcome::Failed) => "Collect failed, see log".to_string(),
            Dispatched::Collected(outcome) => format!("Collected: {outcome:?}"),
            other => format!("{other:?}"),
        };
    }

    /// Write the buffer out. A failure is shown in the status line and the
    /// buffer stays dirty so the user can retry or quit deliberately.
    fn save(&mut self) {
        match io::write_document(&self.path, &self.buffer.text()) {
            Ok(()) => {
                self.saved_version = self.buffer.version();
                self.status = format!("Saved {}", self.path.display());
            }
            Err(e) => {
                log::error!("Failed to save {}: {e}", self.path.display());
                self.status = format!("Save failed: {e}");
            }
        }
    }

    /// Adjust the stored scroll offset so the caret stays inside a
    /// `height` x `width` viewport
    fn scroll_into_view(&mut self, height: usize, width: usize) {
        let cursor = self.buffer.cursor();
        let mut scroll = self.buffer.scroll();

        if cursor.line < scroll.top {
            scroll.top = cursor.line;
        } else if height > 0 && cursor.line >= scroll.top + height {
            scroll.top = cursor.line + 1 - height;
        }

        if cursor.column < scroll.left {
            scroll.left = cursor.column;
        } else if width > 0 && cursor.column >= scroll.left + width {
            scroll.left = cursor.column + 1 - width;
        }

        self.buffer.set_scroll(scroll);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let mut collect_only = false;
    let mut document_arg = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--collect" => collect_only = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if document_arg.is_none() => document_arg = Some(PathBuf::from(other)),
            _ => {
                eprintln!("{USAGE}");
                process::exit(1);
            }
        }
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let Some(path) = document_arg.or(config.document_path) else {
        eprintln!("Error: No document path provided and none configured");
        eprintln!("{USAGE}");
        eprintln!(
            "Or set document_path in {}",
            Config::config_path().display()
        );
        process::exit(1);
    };

    if collect_only {
        return run_collect(&path, config.sync);
    }

    let mut app = App::open(path, config.sync)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Run the collect command once and write the document back if it changed
fn run_collect(path: &Path, settings: SyncSettings) -> Result<()> {
    let content = io::read_document(path)?;
    let mut buffer = TextBuffer::from_text(&content);
    let sync = Synchronizer::new(settings);

    let outcome = sync.dispatch(HostEvent::Command, Some(&mut buffer));
    if outcome == Dispatched::Collected(CollectOutcome::Failed) {
        eprintln!("Error: Failed to collect action items in {}", path.display());
        process::exit(1);
    }

    if buffer.text() != content {
        io::write_document(path, &buffer.text())?;
    }
    println!("{}: {outcome:?}", path.display());
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && !app.handle_key(key)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(f.area());
    let editor_area = chunks[0];

    app.scroll_into_view(
        usize::from(editor_area.height.saturating_sub(2)),
        usize::from(editor_area.width.saturating_sub(2)),
    );
    let scroll = app.buffer.scroll();
    let cursor = app.buffer.cursor();

    let title = format!(
        " {}{} ",
        app.path.display(),
        if app.is_dirty() { " [+]" } else { "" }
    );
    let content: Vec<Line> = app.buffer.lines().into_iter().map(Line::from).collect();
    let editor = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((to_u16(scroll.top), to_u16(scroll.left)));
    f.render_widget(editor, editor_area);

    f.set_cursor_position((
        editor_area.x + 1 + to_u16(cursor.column - scroll.left),
        editor_area.y + 1 + to_u16(cursor.line - scroll.top),
    ));

    let status = Line::from(vec![
        Span::raw(format!("{} ", app.status)),
        Span::styled(
            "Ctrl-K: Collect Action Items | Ctrl-S: Save | Esc: Quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(vec![status]), chunks[1]);
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_save_writes_document_and_clears_dirty_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        let mut app = App::open(path.clone(), SyncSettings::default()).unwrap();

        assert!(app.handle_key(press(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(app.is_dirty());
        assert!(app.handle_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)));

        assert!(!app.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x");
    }

    #[test]
    fn test_failed_save_keeps_editor_open_and_dirty() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let mut app = App::open(blocker.join("notes.md"), SyncSettings::default()).unwrap();

        assert!(app.handle_key(press(KeyCode::Char('x'), KeyModifiers::NONE)));
        let running = app.handle_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(running);
        assert!(app.is_dirty());
        assert!(app.status.starts_with("Save failed"));
        assert_eq!(app.buffer.text(), "x");
    }
}

use std::path::PathBuf;
use std::time::Instant;

use backdrop_config::Config;
use backdrop_core::{
    BackgroundKind, CELL_HEIGHT_PX, CELL_WIDTH_PX, Point, SettingSpec, SettingValue, Viewport,
};
use backdrop_engine::{BackgroundManager, Engine, ListenerKind, PointerEvent, RefreshLoop};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};

/// Logical pixels scrolled per wheel notch.
const SCROLL_STEP_PX: f32 = 48.0;
const ACCENT: Color = Color::Cyan;

/// Logical position of the center of terminal cell `(column, row)`.
fn cell_center(column: u16, row: u16) -> Point {
    Point::new(
        (f32::from(column) + 0.5) * CELL_WIDTH_PX,
        (f32::from(row) + 0.5) * CELL_HEIGHT_PX,
    )
}

/// Translate a terminal mouse event into pointer events.
///
/// Releasing the left button is both a release and a click.
pub fn pointer_events(mouse: &MouseEvent) -> Vec<PointerEvent> {
    let at = cell_center(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => vec![PointerEvent::Move(at)],
        MouseEventKind::Down(MouseButton::Left) => vec![PointerEvent::Press(at)],
        MouseEventKind::Up(MouseButton::Left) => {
            vec![PointerEvent::Release(at), PointerEvent::Click(at)]
        }
        MouseEventKind::ScrollDown => vec![PointerEvent::Scroll(SCROLL_STEP_PX)],
        MouseEventKind::ScrollUp => vec![PointerEvent::Scroll(-SCROLL_STEP_PX)],
        _ => Vec::new(),
    }
}

/// The terminal front-end: one mounted background plus a status line.
#[derive(Debug)]
pub struct App {
    running: bool,
    manager: BackgroundManager,
    host: RefreshLoop,
    config: Config,
    /// Where `s` saves the config. `None` when no config directory exists.
    config_path: Option<PathBuf>,
    kind: BackgroundKind,
    /// Index into the current background's settings schema.
    selected: usize,
    status: Option<String>,
    viewport: Viewport,
    started: Instant,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let kind = config.background.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "unknown background in config, using default");
            BackgroundKind::default()
        });
        Self {
            running: false,
            manager: BackgroundManager::with_builtins(),
            host: RefreshLoop::new(),
            config,
            config_path,
            kind,
            selected: 0,
            status: None,
            viewport: Viewport::default(),
            started: Instant::now(),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.viewport = Viewport::from_cells(size.width, size.height);
        self.switch_to(self.kind);

        let interval = self.config.frame_interval();
        let mut next_frame = Instant::now();
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                self.handle_event(event::read()?);
            }
            let now = Instant::now();
            if now >= next_frame {
                self.fire_frames();
                next_frame = (next_frame + interval).max(now);
            }
        }
        self.manager.destroy(&mut self.host);
        Ok(())
    }

    /// Run every frame the engine asked for since the last refresh.
    fn fire_frames(&mut self) {
        let now_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let Some(engine) = self.manager.current_mut() else {
            return;
        };
        for handle in self.host.take_due() {
            engine.run_frame(handle, now_ms, &mut self.host);
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(surface) = self.manager.current().and_then(Engine::surface) {
            frame.render_widget(surface, area);
        }
        let [_, status] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        frame.render_widget(self.status_line(), status);
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![format!(" {} ", self.kind.label()).bold().fg(ACCENT)];
        if let Some(spec) = self.selected_spec() {
            let value = spec.current(&self.config.settings_for(self.kind.key()));
            spans.push(format!(" {}: {value} ", spec.label).white());
        }
        if let Some(status) = &self.status {
            spans.push(format!(" {status} ").dark_gray());
        }
        spans.extend([
            " q".bold().fg(ACCENT),
            " quit ".dark_gray(),
            "n/p".bold().fg(ACCENT),
            " background ".dark_gray(),
            "tab".bold().fg(ACCENT),
            " setting ".dark_gray(),
            "+/-".bold().fg(ACCENT),
            " adjust ".dark_gray(),
            "s".bold().fg(ACCENT),
            " save".dark_gray(),
        ]);
        Line::from(spans).on_black()
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(&mouse),
            Event::Resize(cols, rows) => self.on_resize(cols, rows),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: &MouseEvent) {
        let Some(engine) = self.manager.current_mut() else {
            return;
        };
        for pointer in pointer_events(mouse) {
            if self.host.is_listening(pointer.listener()) {
                engine.handle_pointer(&pointer);
            }
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::from_cells(cols, rows);
        if self.host.is_listening(ListenerKind::Resize)
            && let Some(engine) = self.manager.current_mut()
        {
            engine.resize(self.viewport);
        }
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('n') | KeyCode::Right) => self.switch_to(self.kind.next()),
            (_, KeyCode::Char('p') | KeyCode::Left) => self.switch_to(self.kind.prev()),
            (_, KeyCode::Char('r')) => self.switch_to(self.kind),
            (_, KeyCode::Tab) => self.select_setting(1),
            (_, KeyCode::BackTab) => self.select_setting(-1),
            (_, KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up) => self.nudge_setting(1),
            (_, KeyCode::Char('-') | KeyCode::Down) => self.nudge_setting(-1),
            (_, KeyCode::Char('s')) => self.save_config(),
            _ => {}
        }
    }

    /// Tear down the current background and mount `kind`.
    fn switch_to(&mut self, kind: BackgroundKind) {
        let settings = self.config.settings_for(kind.key());
        if self
            .manager
            .switch(kind.key(), &settings, &mut self.host, self.viewport)
        {
            self.kind = kind;
            self.selected = 0;
            self.status = None;
            self.config.background = kind.key().to_string();
        }
    }

    fn selected_spec(&self) -> Option<&'static SettingSpec> {
        let schema = self.manager.current()?.background().schema();
        schema.get(self.selected)
    }

    fn select_setting(&mut self, step: isize) {
        let Some(engine) = self.manager.current() else {
            return;
        };
        let len = engine.background().schema().len();
        if len > 0 {
            self.selected = (self.selected as isize + step).rem_euclid(len as isize) as usize;
        }
    }

    fn nudge_setting(&mut self, steps: i32) {
        let Some(spec) = self.selected_spec() else {
            self.status = Some("no adjustable settings".to_string());
            return;
        };
        let key = self.kind.key();
        let value = spec.nudge(spec.current(&self.config.settings_for(key)), steps);
        self.config.set_setting(key, spec.key, value);
        if let Some(engine) = self.manager.current_mut() {
            engine.update_setting(spec.key, &SettingValue::Number(value));
        }
        self.status = None;
    }

    fn save_config(&mut self) {
        let Some(path) = &self.config_path else {
            self.status = Some("no config directory".to_string());
            return;
        };
        self.status = Some(match self.config.save(path) {
            Ok(()) => format!("saved {}", path.display()),
            Err(err) => {
                tracing::error!(%err, "saving config failed");
                "save failed, see log".to_string()
            }
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mounted_app(background: &str) -> App {
        let config = Config {
            background: background.to_string(),
            ..Config::default()
        };
        let mut app = App::new(config, None);
        app.viewport = Viewport::from_cells(80, 24);
        app.switch_to(app.kind);
        app
    }

    #[test]
    fn test_pointer_events_from_mouse() {
        let at = Point::new(84.0, 40.0);
        assert_eq!(
            pointer_events(&mouse(MouseEventKind::Moved, 10, 2)),
            vec![PointerEvent::Move(at)]
        );
        assert_eq!(
            pointer_events(&mouse(MouseEventKind::Drag(MouseButton::Left), 10, 2)),
            vec![PointerEvent::Move(at)]
        );
        assert_eq!(
            pointer_events(&mouse(MouseEventKind::Up(MouseButton::Left), 10, 2)),
            vec![PointerEvent::Release(at), PointerEvent::Click(at)]
        );
        assert_eq!(
            pointer_events(&mouse(MouseEventKind::ScrollUp, 0, 0)),
            vec![PointerEvent::Scroll(-48.0)]
        );
        assert!(pointer_events(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)).is_empty());
    }

    #[test]
    fn test_switching_backgrounds_keeps_one_engine() {
        let mut app = mounted_app("snow");
        assert_eq!(app.kind, BackgroundKind::Snow);
        app.on_key_event(key(KeyCode::Char('n')));
        assert_eq!(app.kind, BackgroundKind::Snow.next());
        assert_eq!(app.config.background, app.kind.key());
        assert_eq!(app.host.pending_frames(), 1);
    }

    #[test]
    fn test_unknown_configured_background_falls_back() {
        let app = mounted_app("plasma");
        assert_eq!(app.kind, BackgroundKind::default());
        assert!(app.manager.current().is_some());
    }

    #[test]
    fn test_nudge_updates_config_and_engine() {
        let mut app = mounted_app("crackinjection");
        let spec = app.selected_spec().copied().unwrap();
        let before = spec.current(&app.config.settings_for("crackinjection"));
        app.on_key_event(key(KeyCode::Char('+')));
        let after = app
            .config
            .settings_for("crackinjection")
            .get(spec.key)
            .and_then(SettingValue::as_number)
            .unwrap();
        assert_eq!(after, spec.nudge(before, 1));
    }

    #[test]
    fn test_frames_fire_and_resize_reaches_engine() {
        let mut app = mounted_app("dots");
        app.fire_frames();
        let engine = app.manager.current().unwrap();
        assert_eq!(engine.frames(), 1);
        assert_eq!(app.host.pending_frames(), 1);

        app.on_resize(100, 30);
        assert_eq!(
            app.manager.current().unwrap().viewport(),
            Viewport::from_cells(100, 30)
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut app = mounted_app("ripple");
        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}

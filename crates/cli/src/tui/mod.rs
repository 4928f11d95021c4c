mod draw;

use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};

use enginetune_core::{
    BoundsCheck, CatalogError, Setting, SettingsPreset, SettingsStore, SystemDescriptor,
};
use enginetune_engine::{
    apply_preset, performance_score, performance_tier, recommended_preset, snapshot_current,
    Applied, ApplyReport, Catalog, PerformanceTier, PresetStore,
};
use enginetune_io::{export_engine_ini, import_engine_ini};

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Menu,
    Settings,
    Presets,
    Recommended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MenuItem {
    Settings,
    Presets,
    Recommended,
    Export,
    Import,
    ResetDefaults,
    Quit,
}

impl MenuItem {
    pub(crate) const ALL: [MenuItem; 7] = [
        MenuItem::Settings,
        MenuItem::Presets,
        MenuItem::Recommended,
        MenuItem::Export,
        MenuItem::Import,
        MenuItem::ResetDefaults,
        MenuItem::Quit,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MenuItem::Settings => "Browse and edit settings",
            MenuItem::Presets => "Manage presets",
            MenuItem::Recommended => "Recommended settings for this system",
            MenuItem::Export => "Export Engine.ini",
            MenuItem::Import => "Import Engine.ini",
            MenuItem::ResetDefaults => "Reset all settings to defaults",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Text entry overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Prompt {
    EditValue { key: String },
    NewPresetName,
}

/// Destructive action waiting for `y`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Confirm {
    DeletePreset(SettingsPreset),
    OverwritePreset(SettingsPreset),
    ResetDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Status {
    pub text: String,
    pub is_error: bool,
}

pub(crate) struct TuiApp<S: SettingsStore> {
    store: S,
    system: SystemDescriptor,
    tier: PerformanceTier,
    engine_ini_path: PathBuf,
    backup_existing: bool,

    screen: Screen,
    menu_cursor: usize,
    settings: Vec<Setting>,
    settings_cursor: usize,
    settings_scroll: usize,
    presets: Vec<SettingsPreset>,
    preset_cursor: usize,
    preset_scroll: usize,
    entries_scroll: usize,
    recommended: Option<SettingsPreset>,
    recommended_scroll: usize,

    prompt: Option<(Prompt, String)>,
    confirm: Option<Confirm>,
    status: Option<Status>,
    show_help: bool,
    should_quit: bool,
}

impl<S: SettingsStore> TuiApp<S> {
    pub(crate) fn new(
        store: S,
        system: SystemDescriptor,
        engine_ini_path: PathBuf,
        backup_existing: bool,
    ) -> Self {
        let tier = performance_tier(&system);
        Self {
            store,
            system,
            tier,
            engine_ini_path,
            backup_existing,
            screen: Screen::Menu,
            menu_cursor: 0,
            settings: Vec::new(),
            settings_cursor: 0,
            settings_scroll: 0,
            presets: Vec::new(),
            preset_cursor: 0,
            preset_scroll: 0,
            entries_scroll: 0,
            recommended: None,
            recommended_scroll: 0,
            prompt: None,
            confirm: None,
            status: None,
            show_help: false,
            should_quit: false,
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("{text}");
        self.status = Some(Status { text, is_error: false });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::error!("{text}");
        self.status = Some(Status { text, is_error: true });
    }

    fn report_status(&mut self, what: &str, report: &ApplyReport) {
        let mut text = format!("{what}: {}", report.summary());
        if let Some(first) = report.rejected.first() {
            text.push_str(&format!(" ({first})"));
        }
        if report.is_clean() {
            self.set_status(text);
        } else {
            self.set_error(text);
        }
    }

    // ------------------------------------------------------------------------
    // Data refresh
    // ------------------------------------------------------------------------

    fn reload_settings(&mut self) {
        let result = Catalog::new(&mut self.store).list_all();
        match result {
            Ok(settings) => {
                self.settings = settings;
                self.settings_cursor = self.settings_cursor.min(self.settings.len().saturating_sub(1));
            }
            Err(e) => self.set_error(format!("Failed to load settings: {e}")),
        }
    }

    fn reload_presets(&mut self) {
        let result = PresetStore::new(&mut self.store).list();
        match result {
            Ok(presets) => {
                self.presets = presets;
                self.preset_cursor = self.preset_cursor.min(self.presets.len().saturating_sub(1));
            }
            Err(e) => self.set_error(format!("Failed to load presets: {e}")),
        }
    }

    fn selected_setting(&self) -> Option<&Setting> {
        self.settings.get(self.settings_cursor)
    }

    fn selected_preset(&self) -> Option<&SettingsPreset> {
        self.presets.get(self.preset_cursor)
    }

    // ------------------------------------------------------------------------
    // Keys
    // ------------------------------------------------------------------------

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if let Some(confirm) = self.confirm.take() {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.run_confirmed(confirm);
            } else {
                self.set_status("Cancelled");
            }
            return;
        }
        if key.code == KeyCode::Char('?') {
            self.show_help = true;
            return;
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Settings => self.handle_settings_key(key),
            Screen::Presets => self.handle_presets_key(key),
            Screen::Recommended => self.handle_recommended_key(key),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some((prompt, mut buffer)) = self.prompt.take() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.set_status("Cancelled"),
            KeyCode::Enter => self.submit_prompt(prompt, buffer),
            KeyCode::Backspace => {
                buffer.pop();
                self.prompt = Some((prompt, buffer));
            }
            KeyCode::Char(c) => {
                buffer.push(c);
                self.prompt = Some((prompt, buffer));
            }
            _ => self.prompt = Some((prompt, buffer)),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_cursor = (self.menu_cursor + 1).min(MenuItem::ALL.len() - 1);
            }
            KeyCode::Enter => self.activate(MenuItem::ALL[self.menu_cursor]),
            _ => {}
        }
    }

    fn activate(&mut self, item: MenuItem) {
        match item {
            MenuItem::Settings => {
                self.reload_settings();
                self.screen = Screen::Settings;
            }
            MenuItem::Presets => {
                self.reload_presets();
                self.screen = Screen::Presets;
            }
            MenuItem::Recommended => {
                self.reload_settings();
                self.recommended = Some(recommended_preset(&self.system, &self.store));
                self.recommended_scroll = 0;
                self.screen = Screen::Recommended;
            }
            MenuItem::Export => self.export(),
            MenuItem::Import => self.import(),
            MenuItem::ResetDefaults => self.confirm = Some(Confirm::ResetDefaults),
            MenuItem::Quit => self.should_quit = true,
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let last = self.settings.len().saturating_sub(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_cursor = self.settings_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.settings_cursor = (self.settings_cursor + 1).min(last);
            }
            KeyCode::PageUp => self.settings_cursor = self.settings_cursor.saturating_sub(10),
            KeyCode::PageDown => self.settings_cursor = (self.settings_cursor + 10).min(last),
            KeyCode::Home | KeyCode::Char('g') => self.settings_cursor = 0,
            KeyCode::End | KeyCode::Char('G') => self.settings_cursor = last,
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(setting) = self.selected_setting() {
                    let prompt = Prompt::EditValue { key: setting.qualified_key() };
                    self.prompt = Some((prompt, setting.current_value.clone()));
                }
            }
            KeyCode::Char('d') => {
                if let Some(setting) = self.selected_setting() {
                    let (key, value) = (setting.qualified_key(), setting.default_value.clone());
                    self.write_value(&key, &value);
                }
            }
            _ => {}
        }
    }

    fn handle_presets_key(&mut self, key: KeyEvent) {
        let entries = self.selected_preset().map_or(0, |p| p.settings.len());
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Up | KeyCode::Char('k') => {
                self.preset_cursor = self.preset_cursor.saturating_sub(1);
                self.entries_scroll = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.preset_cursor = (self.preset_cursor + 1).min(self.presets.len().saturating_sub(1));
                self.entries_scroll = 0;
            }
            KeyCode::PageUp => self.entries_scroll = self.entries_scroll.saturating_sub(10),
            KeyCode::PageDown => {
                self.entries_scroll = (self.entries_scroll + 10).min(entries.saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if let Some(preset) = self.selected_preset().cloned() {
                    self.apply(&preset);
                }
            }
            KeyCode::Char('n') => self.prompt = Some((Prompt::NewPresetName, String::new())),
            KeyCode::Char('o') => {
                if let Some(preset) = self.selected_preset().cloned() {
                    self.confirm = Some(Confirm::OverwritePreset(preset));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(preset) = self.selected_preset().cloned() {
                    self.confirm = Some(Confirm::DeletePreset(preset));
                }
            }
            _ => {}
        }
    }

    fn handle_recommended_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.screen = Screen::Menu,
            KeyCode::Up | KeyCode::Char('k') => {
                self.recommended_scroll = self.recommended_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.recommended.as_ref().map_or(0, |p| p.settings.len());
                self.recommended_scroll = (self.recommended_scroll + 1).min(len.saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if let Some(preset) = self.recommended.clone() {
                    self.apply(&preset);
                }
            }
            KeyCode::Char('x') => {
                if let Some(preset) = self.recommended.clone() {
                    if self.apply(&preset) {
                        self.export();
                    }
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn submit_prompt(&mut self, prompt: Prompt, buffer: String) {
        match prompt {
            Prompt::EditValue { key } => {
                let value = buffer.trim().to_string();
                if !self.write_value(&key, &value) {
                    // Keep the editor open so the value can be corrected.
                    self.prompt = Some((Prompt::EditValue { key }, buffer));
                }
            }
            Prompt::NewPresetName => {
                let name = buffer.trim();
                if name.is_empty() {
                    self.set_error("Preset name cannot be empty");
                    self.prompt = Some((Prompt::NewPresetName, buffer));
                    return;
                }
                let snapshot = snapshot_current(&Catalog::new(&mut self.store), name, "Saved from current settings");
                let result = snapshot
                    .map_err(|e| e.to_string())
                    .and_then(|mut preset| {
                        PresetStore::new(&mut self.store)
                            .save(&mut preset)
                            .map(|id| (id, preset))
                            .map_err(|e| e.to_string())
                    });
                match result {
                    Ok((id, preset)) => {
                        self.reload_presets();
                        if let Some(pos) = self.presets.iter().position(|p| p.id == Some(id)) {
                            self.preset_cursor = pos;
                        }
                        self.set_status(format!("Saved preset '{}'", preset.name));
                    }
                    Err(e) => self.set_error(format!("Failed to save preset: {e}")),
                }
            }
        }
    }

    /// Write one setting. Returns false when the value was rejected.
    fn write_value(&mut self, key: &str, value: &str) -> bool {
        let mut catalog = Catalog::new(&mut self.store);
        let bounds = catalog.check_bounds(key, value).ok().flatten();
        match catalog.apply_qualified_value(key, value) {
            Ok(Applied::Updated { .. }) => {
                match bounds {
                    Some(BoundsCheck::BelowMin) => {
                        self.set_status(format!("{key} = {value} (below recommended minimum)"))
                    }
                    Some(BoundsCheck::AboveMax) => {
                        self.set_status(format!("{key} = {value} (above recommended maximum)"))
                    }
                    _ => self.set_status(format!("{key} = {value}")),
                }
                self.reload_settings();
                true
            }
            Ok(Applied::Ignored) => {
                self.set_error(format!("Unknown setting {key}"));
                true
            }
            Err(CatalogError::Validation(failure)) => {
                self.set_error(failure.to_string());
                false
            }
            Err(e) => {
                self.set_error(format!("Failed to save {key}: {e}"));
                true
            }
        }
    }

    /// Apply a preset. Returns true when it was written without store errors.
    fn apply(&mut self, preset: &SettingsPreset) -> bool {
        let result = apply_preset(&mut Catalog::new(&mut self.store), preset);
        match result {
            Ok(report) => {
                self.report_status(&format!("Applied '{}'", preset.name), &report);
                self.reload_settings();
                true
            }
            Err(e) => {
                self.set_error(format!("Failed to apply '{}': {e}", preset.name));
                false
            }
        }
    }

    fn export(&mut self) {
        let path = self.engine_ini_path.clone();
        let result = export_engine_ini(&Catalog::new(&mut self.store), &path, self.backup_existing);
        match result {
            Ok(summary) => {
                let backup = summary
                    .backup
                    .map(|b| format!(", previous file saved as {}", b.display()))
                    .unwrap_or_default();
                self.set_status(format!(
                    "Wrote {} settings to {}{backup}",
                    summary.settings,
                    path.display()
                ));
            }
            Err(e) => self.set_error(format!("Export failed: {e}")),
        }
    }

    fn import(&mut self) {
        let path = self.engine_ini_path.clone();
        let result = import_engine_ini(&mut Catalog::new(&mut self.store), &path);
        match result {
            Ok(report) => {
                self.report_status(&format!("Imported {}", path.display()), &report);
                self.reload_settings();
            }
            Err(e) => self.set_error(format!("Import failed: {e}")),
        }
    }

    fn run_confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::DeletePreset(preset) => {
                let Some(id) = preset.id else { return };
                let result = PresetStore::new(&mut self.store).delete(id);
                match result {
                    Ok(()) => self.set_status(format!("Deleted preset '{}'", preset.name)),
                    Err(e) => self.set_error(format!("Failed to delete '{}': {e}", preset.name)),
                }
                self.reload_presets();
            }
            Confirm::OverwritePreset(preset) => {
                let current = Catalog::new(&mut self.store).to_qualified_map();
                let result = current
                    .map_err(|e| e.to_string())
                    .and_then(|current| {
                        let mut updated = preset.clone().with_settings(current);
                        PresetStore::new(&mut self.store)
                            .save(&mut updated)
                            .map_err(|e| e.to_string())
                    });
                match result {
                    Ok(_) => self.set_status(format!("Updated preset '{}' from current settings", preset.name)),
                    Err(e) => self.set_error(format!("Failed to update '{}': {e}", preset.name)),
                }
                self.reload_presets();
            }
            Confirm::ResetDefaults => {
                let result = Catalog::new(&mut self.store).reset_to_defaults();
                match result {
                    Ok(n) => {
                        self.set_status(format!("Restored {n} settings to their defaults"));
                        self.reload_settings();
                    }
                    Err(e) => self.set_error(format!("Reset failed: {e}")),
                }
            }
        }
    }

    /// Keep list cursors inside the visible window.
    fn ensure_visible(&mut self, settings_rows: usize, preset_rows: usize) {
        self.settings_scroll = scroll_to_cursor(self.settings_cursor, self.settings_scroll, settings_rows);
        self.preset_scroll = scroll_to_cursor(self.preset_cursor, self.preset_scroll, preset_rows);
    }

    fn score(&self) -> u32 {
        performance_score(&self.system)
    }
}

/// Scroll offset that shows `cursor` in a window of `rows`, moving `scroll`
/// as little as possible.
fn scroll_to_cursor(cursor: usize, scroll: usize, rows: usize) -> usize {
    if cursor < scroll {
        cursor
    } else if rows > 0 && cursor >= scroll + rows {
        cursor - rows + 1
    } else {
        scroll
    }
}

// ============================================================================
// Terminal loop
// ============================================================================

/// Run the interactive settings manager until the user quits.
pub(crate) fn run<S: SettingsStore>(app: TuiApp<S>) -> Result<(), String> {
    run_app(app)
}

fn run_app<S: SettingsStore>(mut app: TuiApp<S>) -> Result<(), String> {
    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        let height = terminal.size().map(|s| s.height).unwrap_or_default();
        app.ensure_visible(draw::list_rows(height), draw::preset_rows(height));

        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| format!("event poll error: {}", e))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("event read error: {}", e))? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use enginetune_core::SettingsStore;
use enginetune_engine::{meets_minimum_requirements, meets_recommended_requirements};

use super::{Confirm, MenuItem, Prompt, Screen, TuiApp};
use crate::util::pad_right;

/// Title, status and key-hint bars, list borders, header row and the
/// description panel of the settings screen.
const SETTINGS_CHROME: u16 = 10;

/// Title, status and key-hint bars plus the presets list borders.
const PRESETS_CHROME: u16 = 5;

/// Rows available to the settings list for a terminal `height`.
pub(super) fn list_rows(height: u16) -> usize {
    height.saturating_sub(SETTINGS_CHROME) as usize
}

pub(super) fn preset_rows(height: u16) -> usize {
    height.saturating_sub(PRESETS_CHROME) as usize
}

fn title_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {title} "))
        .title_style(header_style())
}

fn badge(ok: bool, label: &str) -> Span<'static> {
    let (mark, color) = if ok { ("yes", Color::Green) } else { ("no", Color::Red) };
    Span::styled(format!("{label}: {mark}"), Style::default().fg(color))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.width.saturating_sub(width) / 2;
    let y = area.height.saturating_sub(height) / 2;
    Rect::new(area.x + x, area.y + y, width.min(area.width), height.min(area.height))
}

impl<S: SettingsStore> TuiApp<S> {
    pub(super) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        match self.screen {
            Screen::Menu => self.draw_menu(frame, chunks[1]),
            Screen::Settings => self.draw_settings(frame, chunks[1]),
            Screen::Presets => self.draw_presets(frame, chunks[1]),
            Screen::Recommended => self.draw_recommended(frame, chunks[1]),
        }
        self.draw_status(frame, chunks[2]);
        self.draw_key_hints(frame, chunks[3]);

        if let Some((prompt, buffer)) = &self.prompt {
            self.draw_prompt(frame, area, prompt, buffer);
        } else if let Some(confirm) = &self.confirm {
            self.draw_confirm(frame, area, confirm);
        }
        if self.show_help {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let screen = match self.screen {
            Screen::Menu => "Main menu",
            Screen::Settings => "Settings",
            Screen::Presets => "Presets",
            Screen::Recommended => "Recommended",
        };
        let title = format!(" enginetune | {screen} | {} tier ", self.tier);
        let para = Paragraph::new(Line::from(Span::styled(title, title_style())))
            .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Length(8), Constraint::Min(3)]).split(area);

        let info = &self.system;
        let system_lines = vec![
            Line::from(format!(" CPU:  {} ({} cores)", info.cpu_name, info.cpu_cores)),
            Line::from(format!(" RAM:  {} GB", info.ram_gb)),
            Line::from(format!(" GPU:  {} ({} MB VRAM)", info.gpu_name, info.gpu_vram_mb)),
            Line::from(""),
            Line::from(vec![
                Span::raw(format!(" Score {}/100, ", self.score())),
                Span::styled(format!("{} tier", self.tier), header_style()),
                Span::raw("   "),
                badge(meets_minimum_requirements(info), "minimum"),
                Span::raw("   "),
                badge(meets_recommended_requirements(info), "recommended"),
            ]),
        ];
        frame.render_widget(Paragraph::new(system_lines).block(bordered("System")), chunks[0]);

        let lines: Vec<Line> = MenuItem::ALL
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let text = format!(" {} {}", if i == self.menu_cursor { ">" } else { " " }, item.label());
                if i == self.menu_cursor {
                    Line::from(Span::styled(text, cursor_style()))
                } else {
                    Line::from(text)
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(bordered("Menu")), chunks[1]);
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(4)]).split(area);
        let list_area = chunks[0];

        let inner_width = list_area.width.saturating_sub(2) as usize;
        let section_w = 24.min(inner_width / 4);
        let value_w = 14;
        let default_w = 14;
        let name_w = inner_width.saturating_sub(section_w + value_w + default_w + 4).max(8);

        let mut lines = vec![Line::from(Span::styled(
            format!(
                "{} {} {} {}",
                pad_right("Section", section_w),
                pad_right("Setting", name_w),
                pad_right("Value", value_w),
                pad_right("Default", default_w)
            ),
            header_style(),
        ))];

        let visible = list_area.height.saturating_sub(3) as usize;
        let end = (self.settings_scroll + visible).min(self.settings.len());
        let mut previous_section = self
            .settings_scroll
            .checked_sub(1)
            .and_then(|i| self.settings.get(i))
            .map(|s| s.section.as_str());

        for i in self.settings_scroll..end {
            let setting = &self.settings[i];
            let section = if previous_section == Some(setting.section.as_str()) {
                ""
            } else {
                setting.section.as_str()
            };
            previous_section = Some(setting.section.as_str());

            let text = format!(
                "{} {} {} {}",
                pad_right(section, section_w),
                pad_right(&setting.name, name_w),
                pad_right(&setting.current_value, value_w),
                pad_right(&setting.default_value, default_w)
            );
            let style = if i == self.settings_cursor {
                cursor_style()
            } else if setting.is_default() {
                Style::default().fg(Color::Gray)
            } else {
                Style::default().fg(Color::Yellow)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        let title = format!("Settings ({})", self.settings.len());
        frame.render_widget(Paragraph::new(lines).block(bordered(&title)), list_area);

        let detail = match self.selected_setting() {
            Some(s) => {
                let mut rule = s.value_type.rule();
                match (&s.min_value, &s.max_value) {
                    (Some(min), Some(max)) => rule.push_str(&format!(", {min}..{max}")),
                    (Some(min), None) => rule.push_str(&format!(", >= {min}")),
                    (None, Some(max)) => rule.push_str(&format!(", <= {max}")),
                    (None, None) => {}
                }
                vec![
                    Line::from(format!(" {}", s.description)),
                    Line::from(Span::styled(
                        format!(" {} | {} | {}", s.qualified_key(), rule, s.impact),
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            }
            None => vec![Line::from(" (no settings)")],
        };
        frame.render_widget(
            Paragraph::new(detail).wrap(Wrap { trim: true }).block(bordered("Details")),
            chunks[1],
        );
    }

    fn draw_presets(&self, frame: &mut Frame, area: Rect) {
        let chunks =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);

        let name_w = (chunks[0].width.saturating_sub(4) as usize).saturating_sub(12);
        let lines: Vec<Line> = if self.presets.is_empty() {
            vec![Line::from(Span::styled(" (no presets)", Style::default().fg(Color::DarkGray)))]
        } else {
            self.presets
                .iter()
                .enumerate()
                .skip(self.preset_scroll)
                .map(|(i, p)| {
                    let created = p.created_at.get(..10).unwrap_or(p.created_at.as_str());
                    let text = format!(" {} {}", pad_right(&p.name, name_w), created);
                    if i == self.preset_cursor {
                        Line::from(Span::styled(text, cursor_style()))
                    } else {
                        Line::from(text)
                    }
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).block(bordered("Presets")), chunks[0]);

        let detail: Vec<Line> = match self.selected_preset() {
            Some(p) => {
                let mut lines = vec![
                    Line::from(Span::styled(format!(" {}", p.description), header_style())),
                    Line::from(""),
                ];
                lines.extend(
                    p.settings
                        .iter()
                        .skip(self.entries_scroll)
                        .map(|(k, v)| Line::from(format!(" {k} = {v}"))),
                );
                lines
            }
            None => Vec::new(),
        };
        let entries = self.selected_preset().map_or(0, |p| p.settings.len());
        let title = if self.entries_scroll > 0 {
            format!("Entries ({}-{entries})", self.entries_scroll + 1)
        } else {
            format!("Entries ({entries})")
        };
        frame.render_widget(Paragraph::new(detail).block(bordered(&title)), chunks[1]);
    }

    fn draw_recommended(&self, frame: &mut Frame, area: Rect) {
        let Some(preset) = &self.recommended else {
            return;
        };
        let mut lines = vec![
            Line::from(Span::styled(format!(" {}", preset.description), header_style())),
            Line::from(format!(
                " Score {}/100 -> {} tier{}",
                self.score(),
                self.tier,
                if preset.is_saved() { "" } else { " (built-in recommendation)" }
            )),
            Line::from(""),
        ];
        for (key, value) in preset.settings.iter().skip(self.recommended_scroll) {
            let current = self
                .settings
                .iter()
                .find(|s| s.qualified_key() == *key)
                .map(|s| s.current_value.as_str());
            let line = match current {
                Some(cur) if cur == value.as_str() => {
                    Line::from(Span::styled(format!(" {key} = {value}"), Style::default().fg(Color::Gray)))
                }
                Some(cur) => Line::from(vec![
                    Span::raw(format!(" {key} = ")),
                    Span::styled(cur.to_string(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" -> "),
                    Span::styled(value.clone(), Style::default().fg(Color::Yellow)),
                ]),
                None => Line::from(Span::styled(
                    format!(" {key} = {value} (not in catalog)"),
                    Style::default().fg(Color::DarkGray),
                )),
            };
            lines.push(line);
        }
        frame.render_widget(Paragraph::new(lines).block(bordered("Recommended preset")), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match &self.status {
            Some(status) if status.is_error => (
                format!(" {}", status.text),
                Style::default().fg(Color::White).bg(Color::Red),
            ),
            Some(status) => (format!(" {}", status.text), Style::default().fg(Color::Black).bg(Color::Green)),
            None => (
                format!(" Engine.ini: {}", self.engine_ini_path.display()),
                Style::default().fg(Color::Black).bg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(Line::from(Span::styled(text, style))).style(style), area);
    }

    fn draw_key_hints(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.screen {
            Screen::Menu => "j/k move  Enter select  q quit  ? help",
            Screen::Settings => "j/k move  Enter edit  d default  Esc back  ? help",
            Screen::Presets => "Enter apply  n new  o overwrite  d delete  PgUp/PgDn entries  Esc back",
            Screen::Recommended => "Enter apply  x apply + export  Esc back",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {hints}"), Style::default().fg(Color::DarkGray))),
            area,
        );
    }

    fn draw_prompt(&self, frame: &mut Frame, area: Rect, prompt: &Prompt, buffer: &str) {
        let title = match prompt {
            Prompt::EditValue { key } => format!("Edit {key}"),
            Prompt::NewPresetName => "New preset name".to_string(),
        };
        let hint = match prompt {
            Prompt::EditValue { key } => self
                .settings
                .iter()
                .find(|s| s.qualified_key() == *key)
                .map(|s| format!(" expected {}", s.value_type.rule()))
                .unwrap_or_default(),
            Prompt::NewPresetName => " saves the current values".to_string(),
        };
        let popup = centered(area, 60, 5);
        let lines = vec![
            Line::from(vec![
                Span::raw(format!(" {buffer}")),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ]),
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(" Enter save  Esc cancel", Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(bordered(&title).style(Style::default().bg(Color::Black))),
            popup,
        );
    }

    fn draw_confirm(&self, frame: &mut Frame, area: Rect, confirm: &Confirm) {
        let question = match confirm {
            Confirm::DeletePreset(p) => format!("Delete preset '{}'?", p.name),
            Confirm::OverwritePreset(p) => format!("Replace '{}' with the current values?", p.name),
            Confirm::ResetDefaults => "Reset every setting to its default?".to_string(),
        };
        let popup = centered(area, 60, 4);
        let lines = vec![
            Line::from(format!(" {question}")),
            Line::from(Span::styled(" y confirm  any other key cancels", Style::default().fg(Color::DarkGray))),
        ];
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(bordered("Confirm").style(Style::default().bg(Color::Black))),
            popup,
        );
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Navigation",
            "  ----------",
            "  arrows / jk       Move",
            "  PgUp / PgDn       Page (settings)",
            "  Home / g, End / G First / last",
            "  Enter             Select / edit / apply",
            "  Esc / q           Back (quit on menu)",
            "",
            "  Settings",
            "  --------",
            "  e                 Edit value",
            "  d                 Restore default",
            "",
            "  Presets",
            "  -------",
            "  a                 Apply",
            "  n                 Save current as new",
            "  o                 Overwrite with current",
            "  d                 Delete",
            "  PgUp / PgDn       Scroll entries",
            "",
            "  Recommended",
            "  -----------",
            "  x                 Apply and export",
            "",
        ];
        let popup = centered(area, 44, help_lines.len() as u16 + 2);
        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(header_style())
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

//! Terminal frontend: renders frame descriptions and screen chrome with
//! ratatui, and forwards key codes back through the input source. Nothing
//! in here makes gameplay decisions.

use std::io::{self, Stdout};

use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::combat::{CombatAction, Encounter};
use crate::input::{is_cancel, InputSource, Key};
use crate::player::Player;
use crate::render::{Emphasis, FrameDescription, FrameSink};

/// Maps core emphasis intent to terminal styling. The ASCII toggle only
/// changes character choices (meters), never colors or layout decisions.
fn style_for(emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Normal => Style::default(),
        Emphasis::Dim => Style::default().fg(Color::DarkGray),
        Emphasis::Bold => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        Emphasis::Accent => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Emphasis::Alert => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        Emphasis::Good => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    }
}

pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    ascii: bool,
}

impl TerminalUi {
    pub fn new(terminal: Terminal<CrosstermBackend<Stdout>>, ascii: bool) -> Self {
        Self { terminal, ascii }
    }

    fn meter_chars(&self) -> (&'static str, &'static str) {
        if self.ascii {
            ("#", ".")
        } else {
            ("\u{2588}", "\u{2591}")
        }
    }

    /// Renders a text meter like `Focus [####......] 8/20`.
    fn meter_line(&self, gauge: &crate::render::Gauge) -> Line<'static> {
        let (full, empty) = self.meter_chars();
        let width = 14usize;
        let ratio = if gauge.max > 0 {
            (gauge.value as f64 / gauge.max as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = (width as f64 * ratio).round() as usize;
        Line::from(vec![
            Span::styled(
                format!("{:<8}", gauge.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "[{}{}] {}/{}",
                full.repeat(filled),
                empty.repeat(width - filled),
                gauge.value,
                gauge.max
            )),
        ])
    }

    fn draw_screen<F>(&mut self, draw: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(draw)?;
        Ok(())
    }

    /// Blocking menu loop. Returns the chosen index, or None on cancel.
    pub fn menu<I: InputSource>(
        &mut self,
        input: &mut I,
        title: &str,
        subtitle: &str,
        options: &[String],
        status: Option<&str>,
    ) -> io::Result<Option<usize>> {
        let mut selected = 0usize;
        loop {
            let title = title.to_string();
            let subtitle = subtitle.to_string();
            let status = status.map(str::to_string);
            let options = options.to_vec();
            self.draw_screen(|frame| {
                let area = frame.size();
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", title));
                let inner = block.inner(area);
                frame.render_widget(block, area);

                let mut lines = vec![
                    Line::from(Span::styled(
                        subtitle.clone(),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(""),
                ];
                for (index, option) in options.iter().enumerate() {
                    let line = if index == selected {
                        Line::from(Span::styled(
                            format!("> {}", option),
                            Style::default()
                                .fg(Color::Yellow)
                                .add_modifier(Modifier::BOLD),
                        ))
                    } else {
                        Line::from(format!("  {}", option))
                    };
                    lines.push(line);
                }
                if let Some(status) = &status {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        status.clone(),
                        Style::default().fg(Color::Cyan),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Up/Down select, Enter confirm, Q back",
                    Style::default().fg(Color::DarkGray),
                )));
                frame.render_widget(Paragraph::new(lines), inner);
            })?;

            let key = input.wait()?;
            if is_cancel(key) {
                return Ok(None);
            }
            match key {
                Key::Up | Key::Char('w') | Key::Char('W') => {
                    selected = selected.checked_sub(1).unwrap_or(options.len() - 1);
                }
                Key::Down | Key::Char('s') | Key::Char('S') => {
                    selected = (selected + 1) % options.len();
                }
                Key::Enter => return Ok(Some(selected)),
                _ => {}
            }
        }
    }

    /// One-line message screen dismissed by any key.
    pub fn toast<I: InputSource>(&mut self, input: &mut I, message: &str) -> io::Result<()> {
        let message = message.to_string();
        self.draw_screen(|frame| {
            let area = frame.size();
            let block = Block::default().borders(Borders::ALL);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    message.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(
                Paragraph::new(lines).alignment(Alignment::Center),
                inner,
            );
        })?;
        input.wait()?;
        Ok(())
    }

    /// Name entry with a bounded length. Returns None on cancel.
    pub fn name_entry<I: InputSource>(&mut self, input: &mut I) -> io::Result<Option<String>> {
        let mut name = String::new();
        loop {
            let shown = name.clone();
            self.draw_screen(|frame| {
                let area = frame.size();
                let block = Block::default()
                    .borders(Borders::ALL)
                    .title(" NAME YOUR HERO ");
                let inner = block.inner(area);
                frame.render_widget(block, area);
                let lines = vec![
                    Line::from(""),
                    Line::from(format!("Name: {}_", shown)),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Type a name, Enter to confirm, Esc to cancel.",
                        Style::default().fg(Color::DarkGray),
                    )),
                ];
                frame.render_widget(Paragraph::new(lines), inner);
            })?;

            match input.wait()? {
                Key::Esc => return Ok(None),
                Key::Enter => {
                    let trimmed = name.trim();
                    if !trimmed.is_empty() {
                        return Ok(Some(trimmed.to_string()));
                    }
                }
                Key::Backspace => {
                    name.pop();
                }
                Key::Char(c) if name.len() < 16 && (c.is_alphanumeric() || c == ' ') => {
                    name.push(c);
                }
                Key::Space if name.len() < 16 => name.push(' '),
                _ => {}
            }
        }
    }

    /// Stat block screen.
    pub fn status_screen<I: InputSource>(
        &mut self,
        input: &mut I,
        player: &Player,
    ) -> io::Result<()> {
        let lines: Vec<Line> = player
            .stats_block()
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        self.draw_screen(|frame| {
            let area = frame.size();
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" CHARACTER STATUS ");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new(lines), inner);
        })?;
        input.wait()?;
        Ok(())
    }

    /// Combat screen: monster meter, battle log, action menu.
    pub fn draw_combat(
        &mut self,
        encounter: &Encounter,
        player: &Player,
        log: &[String],
        selected: usize,
    ) -> io::Result<()> {
        let monster_name = encounter.monster.name.clone();
        let monster_hp = encounter.monster.hp.max(0);
        let log: Vec<String> = log.iter().rev().take(8).rev().cloned().collect();
        let player_line = format!(
            "{}  HP {}/{}  MP {}/{}  Potions {}",
            player.name, player.hp, player.max_hp, player.mp, player.max_mp, player.potions
        );
        self.draw_screen(|frame| {
            let area = frame.size();
            let block = Block::default().borders(Borders::ALL).title(" COMBAT ");
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(2),
                    Constraint::Min(4),
                    Constraint::Length(6),
                ])
                .split(inner);

            let header = vec![
                Line::from(Span::styled(
                    format!("{}  HP {}", monster_name, monster_hp),
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(player_line.clone(), Style::default().fg(Color::Cyan))),
            ];
            frame.render_widget(Paragraph::new(header), chunks[0]);

            let log_lines: Vec<Line> = log
                .iter()
                .map(|entry| Line::from(format!("> {}", entry)))
                .collect();
            frame.render_widget(
                Paragraph::new(log_lines).block(Block::default().borders(Borders::TOP)),
                chunks[1],
            );

            let mut menu_lines = Vec::new();
            for (index, action) in CombatAction::ALL.iter().enumerate() {
                let line = if index == selected {
                    Line::from(Span::styled(
                        format!("> {}", action.label()),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", action.label()))
                };
                menu_lines.push(line);
            }
            menu_lines.push(Line::from(Span::styled(
                "Up/Down select, Enter act",
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(
                Paragraph::new(menu_lines).block(Block::default().borders(Borders::TOP)),
                chunks[2],
            );
        })
    }
}

impl FrameSink for TerminalUi {
    /// Renders a core frame description: title block, meters, arena glyphs,
    /// status lines, footer hint.
    fn present(&mut self, description: &FrameDescription) -> io::Result<()> {
        let meter_lines: Vec<Line> = description
            .gauges
            .iter()
            .map(|gauge| self.meter_line(gauge))
            .collect();
        let arena_lines: Vec<Line> = description
            .rows()
            .map(|row| {
                Line::from(
                    row.iter()
                        .map(|cell| {
                            Span::styled(cell.glyph.to_string(), style_for(cell.emphasis))
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        let status_lines: Vec<Line> = description
            .status
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let footer = Line::from(Span::styled(
            description.footer.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        let title = format!(" {} ", description.title);
        let arena_height = description.height() as u16;

        self.terminal.draw(move |frame| {
            let area = frame.size();
            let block = Block::default().borders(Borders::ALL).title(title);
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(meter_lines.len().max(1) as u16),
                    Constraint::Length(status_lines.len() as u16),
                    Constraint::Length(arena_height.saturating_add(2)),
                    Constraint::Min(1),
                ])
                .split(inner);

            frame.render_widget(Paragraph::new(meter_lines), chunks[0]);
            frame.render_widget(Paragraph::new(status_lines), chunks[1]);
            frame.render_widget(
                Paragraph::new(arena_lines).block(Block::default().borders(Borders::ALL)),
                chunks[2],
            );
            frame.render_widget(Paragraph::new(footer), chunks[3]);
        })?;
        Ok(())
    }
}


//! The full-screen `showcase` view.
//!
//! Three animations share one scheduler: the header cycles through sample
//! commands, the output panel periodically catches up with whichever
//! command the header is on, and the demo panel reveals a transcript once
//! per tab selection.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Tabs},
    DefaultTerminal, Frame,
};

use crate::animator::{AnimationHandle, TextAnimator};
use crate::config::{AnimationConfig, RevealConfig};
use crate::error::AppError;
use crate::render;
use crate::scheduler::{lock, Scheduler};
use crate::showcase::{self, DemoTab};
use crate::sink::TextPanel;

/// Redraw interval; also the longest a key press waits to be handled.
const FRAME: Duration = Duration::from_millis(33);

/// State for the help/shortcuts modal overlay.
struct HelpState {
    /// Scroll offset within the help modal content.
    scroll_offset: usize,
}

/// A single keyboard shortcut entry.
struct ShortcutEntry {
    key: &'static str,
    description: &'static str,
}

/// A group of related shortcuts.
struct ShortcutCategory {
    name: &'static str,
    entries: Vec<ShortcutEntry>,
}

/// Build the complete list of shortcut categories.
fn shortcut_categories() -> Vec<ShortcutCategory> {
    vec![
        ShortcutCategory {
            name: "Demo",
            entries: vec![
                ShortcutEntry {
                    key: "Tab / \u{2192} / l",
                    description: "Next demo",
                },
                ShortcutEntry {
                    key: "S-Tab / \u{2190} / h",
                    description: "Previous demo",
                },
                ShortcutEntry {
                    key: "1 / 2 / 3",
                    description: "Jump to git / todo / projects",
                },
                ShortcutEntry {
                    key: "r",
                    description: "Replay current demo",
                },
            ],
        },
        ShortcutCategory {
            name: "General",
            entries: vec![
                ShortcutEntry {
                    key: "?",
                    description: "Toggle this help",
                },
                ShortcutEntry {
                    key: "q / Esc",
                    description: "Quit",
                },
            ],
        },
    ]
}

struct Showcase<Sc> {
    animator: TextAnimator<Sc>,
    header: Arc<Mutex<TextPanel>>,
    header_animation: AnimationHandle,
    /// Output of the command last seen in the header.
    output: &'static str,
    output_refreshed: Instant,
    demo: Arc<Mutex<TextPanel>>,
    demo_animation: AnimationHandle,
    tab: DemoTab,
    help: Option<HelpState>,
}

impl<Sc: Scheduler> Showcase<Sc> {
    fn new(animator: TextAnimator<Sc>) -> Result<Self, AppError> {
        let header = Arc::new(Mutex::new(TextPanel::new()));
        let header_animation = animator.start(
            showcase::COMMANDS,
            &header,
            &AnimationConfig {
                typing_delay_ms: showcase::HEADER_TYPING_MS,
                deleting_delay_ms: showcase::HEADER_DELETING_MS,
                pause_after_typed_ms: showcase::HEADER_PAUSE_MS,
                start_delay_ms: showcase::HEADER_START_DELAY_MS,
                cycles: None,
            },
        )?;

        let demo = Arc::new(Mutex::new(TextPanel::new()));
        let tab = DemoTab::Git;
        let demo_animation = animator.reveal(
            tab.transcript(),
            &demo,
            &RevealConfig {
                delay_ms: showcase::INITIAL_DEMO_DELAY_MS,
                start_delay_ms: showcase::INITIAL_DEMO_START_MS,
            },
        )?;

        Ok(Self {
            animator,
            header,
            header_animation,
            output: showcase::command_output(0).unwrap_or_default(),
            output_refreshed: Instant::now(),
            demo,
            demo_animation,
            tab,
            help: None,
        })
    }

    /// Stop the current demo and reveal `tab` from scratch.
    fn select_tab(&mut self, tab: DemoTab) -> Result<(), AppError> {
        self.demo_animation.stop();
        lock(&self.demo).replace("");
        self.tab = tab;
        self.demo_animation = self.animator.reveal(
            tab.transcript(),
            &self.demo,
            &RevealConfig {
                delay_ms: showcase::TAB_DEMO_DELAY_MS,
                start_delay_ms: 0,
            },
        )?;
        tracing::debug!(tab = tab.title(), "demo tab selected");
        Ok(())
    }

    fn refresh_output(&mut self) {
        if self.output_refreshed.elapsed() < Duration::from_millis(showcase::OUTPUT_REFRESH_MS) {
            return;
        }
        let index = self.header_animation.snapshot().sequence_index;
        if let Some(output) = showcase::command_output(index) {
            self.output = output;
        }
        self.output_refreshed = Instant::now();
    }

    fn shutdown(&self) {
        self.header_animation.stop();
        self.demo_animation.stop();
        lock(&self.header).detach();
        lock(&self.demo).detach();
    }

    fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<(), AppError> {
        loop {
            self.refresh_output();
            terminal.draw(|frame| self.ui(frame))?;

            if !event::poll(FRAME)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(ref mut help) = self.help {
                // Help modal is open: only its own keys apply
                match key.code {
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => self.help = None,
                    KeyCode::Down | KeyCode::Char('j') => {
                        help.scroll_offset = help.scroll_offset.saturating_add(1);
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        help.scroll_offset = help.scroll_offset.saturating_sub(1);
                    }
                    _ => {}
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.shutdown();
                    return Ok(());
                }
                KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                    self.select_tab(self.tab.next())?;
                }
                KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                    self.select_tab(self.tab.previous())?;
                }
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    if let Some(tab) = DemoTab::from_index(index) {
                        self.select_tab(tab)?;
                    }
                }
                KeyCode::Char('r') => self.select_tab(self.tab)?,
                KeyCode::Char('?') => self.help = Some(HelpState { scroll_offset: 0 }),
                _ => {}
            }
        }
    }

    fn ui(&self, frame: &mut Frame) {
        let area = frame.area();

        // Minimum usable terminal size
        const MIN_WIDTH: u16 = 40;
        const MIN_HEIGHT: u16 = 16;
        if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
            let msg = "Terminal too small";
            let msg_len = msg.len() as u16;
            let x = area.x + area.width.saturating_sub(msg_len) / 2;
            let y = area.y + area.height / 2;
            let w = msg_len.min(area.width);
            if w > 0 && area.height > 0 {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        msg,
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Rect::new(x, y, w, 1),
                );
            }
            return;
        }

        let output_height = self.output.lines().count() as u16 + 2;
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(output_height),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        // Typewriter header
        let typed = lock(&self.header).text().to_owned();
        let header = Paragraph::new(render::render_command_line(&typed))
            .block(Block::bordered().title(" ellie "));
        frame.render_widget(header, chunks[0]);

        // Output of the command last shown in the header
        let output = Paragraph::new(render::render_transcript(self.output, false))
            .block(Block::bordered().title(" Output "));
        frame.render_widget(output, chunks[1]);

        // Demo tabs
        let titles: Vec<&str> = DemoTab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, chunks[2]);

        // Demo transcript, scrolled so the newest line stays visible
        let transcript = lock(&self.demo).text().to_owned();
        let text = render::render_transcript(&transcript, self.demo_animation.is_running());
        let inner_height = chunks[3].height.saturating_sub(2) as usize;
        let scroll = text.lines.len().saturating_sub(inner_height);
        let demo = Paragraph::new(text)
            .block(Block::bordered().title(format!(" Demo \u{2014} {} ", self.tab.title())))
            .scroll((scroll as u16, 0));
        frame.render_widget(demo, chunks[3]);

        // Status bar
        let state = self.header_animation.snapshot();
        let status = format!(
            " command {}/{} \u{2014} {:?}  ? help  q quit",
            state.sequence_index + 1,
            showcase::COMMANDS.len(),
            self.header_animation.phase(),
        );
        let status_bar = Paragraph::new(Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::White),
        ))
        .style(Style::default().bg(Color::White));
        frame.render_widget(status_bar, chunks[4]);

        if let Some(ref help) = self.help {
            render_help(frame, help, area);
        }
    }
}

/// Compute a centered rectangle within `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = (area.width * percent_x / 100).max(30).min(area.width);
    let height = (area.height * percent_y / 100).max(5).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Render the help/shortcuts modal overlay.
fn render_help(frame: &mut Frame, help: &HelpState, viewport_area: Rect) {
    let popup = centered_rect(60, 60, viewport_area);

    // Clear the popup area
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for cat in shortcut_categories() {
        lines.push(Line::from(Span::styled(
            format!(" {}", cat.name),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in &cat.entries {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("   {:18}", entry.key),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    entry.description.to_owned(),
                    Style::default().fg(Color::White),
                ),
            ]));
        }
        // Blank line after each category
        lines.push(Line::from(""));
    }

    let block = Block::bordered()
        .title(" Help \u{2014} ? to close ")
        .style(Style::default().fg(Color::White));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((help.scroll_offset as u16, 0));

    frame.render_widget(paragraph, popup);
}

/// Run the showcase until the user quits.
pub fn run_showcase<Sc: Scheduler>(animator: TextAnimator<Sc>) -> Result<(), AppError> {
    ratatui::run(|terminal| {
        let mut app = Showcase::new(animator)?;
        let result = app.run(terminal);
        app.shutdown();
        result
    })
}

//! Terminal transcript rendering.
//!
//! Converts plain transcript text (as produced by an animation) into styled
//! ratatui [`Text`] for display in the showcase panels.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

/// Kind of a transcript line, used to choose its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `$ command`
    Prompt,
    Success,
    Failure,
    Rule,
    /// Conventional-commit subject or `BREAKING CHANGE` trailer.
    Highlight,
    Plain,
}

pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if line.starts_with("$ ") {
        LineKind::Prompt
    } else if trimmed.starts_with('✅') {
        LineKind::Success
    } else if trimmed.starts_with('❌') {
        LineKind::Failure
    } else if !trimmed.is_empty() && trimmed.chars().all(|c| c == '─') {
        LineKind::Rule
    } else if trimmed.starts_with("BREAKING CHANGE") || is_commit_subject(trimmed) {
        LineKind::Highlight
    } else {
        LineKind::Plain
    }
}

fn is_commit_subject(line: &str) -> bool {
    match line.split_once("): ") {
        Some((head, _)) => head
            .split_once('(')
            .is_some_and(|(kind, _)| !kind.is_empty() && kind.chars().all(|c| c.is_ascii_lowercase())),
        None => false,
    }
}

pub fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Prompt => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        LineKind::Success => Style::default().fg(Color::Green),
        LineKind::Failure => Style::default().fg(Color::Red),
        LineKind::Rule => Style::default().fg(Color::DarkGray),
        LineKind::Highlight => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        LineKind::Plain => Style::default(),
    }
}

/// Style a (possibly partial) transcript.
///
/// `cursor` appends a block cursor to the last line, as a terminal would
/// show while output is still being produced.
pub fn render_transcript(text: &str, cursor: bool) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = text.split('\n').map(render_line).collect();
    if cursor {
        if let Some(last) = lines.last_mut() {
            last.spans.push(cursor_span());
        }
    }
    Text::from(lines)
}

fn render_line(line: &str) -> Line<'static> {
    let kind = classify(line);
    match kind {
        LineKind::Prompt => {
            let prompt_style = Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD);
            Line::from(vec![
                Span::styled("$ ", prompt_style),
                Span::styled(line[2..].to_owned(), line_style(kind)),
            ])
        }
        _ => Line::from(Span::styled(line.to_owned(), line_style(kind))),
    }
}

/// The header: a prompt followed by the partially typed command.
pub fn render_command_line(typed: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "$ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            typed.to_owned(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        cursor_span(),
    ])
}

fn cursor_span() -> Span<'static> {
    Span::styled(
        "▌",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::SLOW_BLINK),
    )
}

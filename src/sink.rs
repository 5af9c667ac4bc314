//! Display targets for animated text.

use std::io::Write;

use crossterm::{
    cursor::{MoveLeft, MoveToColumn, MoveToPreviousLine},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthStr;

use crate::error::SinkUnavailable;

/// Something that can show the current partial text.
///
/// Animations hold sinks weakly; a sink that can also notice its target
/// disappearing on its own reports it by returning [`SinkUnavailable`].
pub trait RenderSink: Send + 'static {
    fn set_text(&mut self, text: &str) -> Result<(), SinkUnavailable>;
}

// ---------------------------------------------------------------------------
// Terminal line writer
// ---------------------------------------------------------------------------

/// Animates text in place on a terminal line.
///
/// Only the difference from the previously shown text is written: a
/// growing string appends its new tail, a shrinking or diverging one moves
/// the cursor back over the removed text and clears what follows. Cursor
/// movement is measured in display columns, so wide glyphs erase cleanly.
/// Erasing across a line break moves up to the line the kept text ends on.
/// Lines are assumed not to soft-wrap at the terminal edge.
pub struct TerminalSink<W> {
    out: W,
    shown: String,
}

impl<W: Write + Send + 'static> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: String::new(),
        }
    }

    /// The text currently on screen.
    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Emit a line break after the animated text.
    pub fn finish_line(&mut self) -> std::io::Result<()> {
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    fn write_diff(&mut self, text: &str) -> std::io::Result<()> {
        let common = common_prefix_bytes(&self.shown, text);
        let removed = &self.shown[common..];
        if !removed.is_empty() {
            let lines_up = removed.matches('\n').count();
            if lines_up == 0 {
                let cols = columns(removed);
                if cols > 0 {
                    queue!(self.out, MoveLeft(cols))?;
                }
                queue!(self.out, Clear(ClearType::UntilNewLine))?;
            } else {
                let kept = &self.shown[..common];
                let line_start = kept.rfind('\n').map_or(0, |i| i + 1);
                let col = columns(&kept[line_start..]);
                let rows = u16::try_from(lines_up).unwrap_or(u16::MAX);
                queue!(self.out, MoveToPreviousLine(rows))?;
                if col > 0 {
                    queue!(self.out, MoveToColumn(col))?;
                }
                queue!(self.out, Clear(ClearType::FromCursorDown))?;
            }
        }
        let tail = &text[common..];
        if !tail.is_empty() {
            queue!(self.out, Print(tail))?;
        }
        self.out.flush()
    }
}

/// Terminal columns taken by `text`.
fn columns(text: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}

impl<W: Write + Send + 'static> RenderSink for TerminalSink<W> {
    fn set_text(&mut self, text: &str) -> Result<(), SinkUnavailable> {
        if let Err(e) = self.write_diff(text) {
            tracing::debug!(error = %e, "terminal write failed, detaching");
            return Err(SinkUnavailable);
        }
        self.shown.clear();
        self.shown.push_str(text);
        Ok(())
    }
}

/// Byte length of the longest common prefix, on a char boundary.
fn common_prefix_bytes(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

// ---------------------------------------------------------------------------
// TUI panel buffer
// ---------------------------------------------------------------------------

/// A text buffer shared with a TUI that redraws it every frame.
#[derive(Debug, Default)]
pub struct TextPanel {
    text: String,
    /// Bumped on every successful write.
    revision: u64,
    detached: bool,
}

impl TextPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the contents directly, outside of any animation.
    pub fn replace(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.revision += 1;
    }

    /// Mark the panel as gone. Animations writing to it will stop.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl RenderSink for TextPanel {
    fn set_text(&mut self, text: &str) -> Result<(), SinkUnavailable> {
        if self.detached {
            return Err(SinkUnavailable);
        }
        self.replace(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A writer that fails once `fail` is set.
    struct FlakyWriter {
        fail: bool,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.fail {
                return Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn output(sink: &TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.get_ref().clone()).unwrap()
    }

    #[test]
    fn growing_text_appends_only_the_tail() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("e").unwrap();
        sink.set_text("el").unwrap();
        sink.set_text("ell").unwrap();
        assert_eq!(output(&sink), "ell");
        assert_eq!(sink.shown(), "ell");
    }

    #[test]
    fn shrinking_text_moves_back_and_clears() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("ab").unwrap();
        sink.set_text("a").unwrap();
        sink.set_text("").unwrap();
        assert_eq!(output(&sink), "ab\x1b[1D\x1b[K\x1b[1D\x1b[K");
    }

    #[test]
    fn wide_glyphs_erase_their_full_width() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("🌐").unwrap();
        sink.set_text("").unwrap();
        assert_eq!(output(&sink), "🌐\x1b[2D\x1b[K");

        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("日本x").unwrap();
        sink.set_text("日").unwrap();
        assert_eq!(output(&sink), "日本x\x1b[3D\x1b[K");
    }

    #[test]
    fn erasing_a_line_break_moves_up() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("a\nb").unwrap();
        sink.set_text("a").unwrap();
        assert_eq!(output(&sink), "a\nb\x1b[1F\x1b[2G\x1b[J");
        assert_eq!(sink.shown(), "a");
    }

    #[test]
    fn erasing_several_lines_returns_to_kept_column() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("$ ls\nsrc\ntests").unwrap();
        sink.set_text("$ l").unwrap();
        assert_eq!(output(&sink), "$ ls\nsrc\ntests\x1b[2F\x1b[4G\x1b[J");

        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("ab\n").unwrap();
        sink.set_text("").unwrap();
        assert_eq!(output(&sink), "ab\n\x1b[1F\x1b[J");
    }

    #[test]
    fn diverging_text_rewrites_from_common_prefix() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("✅ done").unwrap();
        sink.set_text("✅ dig").unwrap();
        assert_eq!(output(&sink), "✅ done\x1b[3D\x1b[Kig");
        assert_eq!(sink.shown(), "✅ dig");
    }

    #[test]
    fn finish_line_appends_newline() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.set_text("hi").unwrap();
        sink.finish_line().unwrap();
        assert_eq!(output(&sink), "hi\n");
    }

    #[test]
    fn write_failure_reports_unavailable() {
        let mut sink = TerminalSink::new(FlakyWriter { fail: false });
        sink.set_text("a").unwrap();
        sink.out.fail = true;
        assert_eq!(sink.set_text("ab"), Err(SinkUnavailable));
        assert_eq!(sink.shown(), "a");
    }

    #[test]
    fn common_prefix_on_char_boundaries() {
        assert_eq!(common_prefix_bytes("abc", "abd"), 2);
        assert_eq!(common_prefix_bytes("ab", "abcd"), 2);
        assert_eq!(common_prefix_bytes("🌐x", "🌐y"), "🌐".len());
        assert_eq!(common_prefix_bytes("", "x"), 0);
    }

    #[test]
    fn panel_tracks_revisions_and_detaches() {
        let mut panel = TextPanel::new();
        panel.set_text("a").unwrap();
        panel.set_text("ab").unwrap();
        assert_eq!(panel.text(), "ab");
        assert_eq!(panel.revision(), 2);

        panel.detach();
        assert!(panel.is_detached());
        assert_eq!(panel.set_text("abc"), Err(SinkUnavailable));
        assert_eq!(panel.text(), "ab");
    }
}

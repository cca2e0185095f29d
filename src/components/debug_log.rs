//! In-app log buffer and the pane that shows it.
//!
//! `tracing` output is routed into a [`LogHandle`] while the terminal is in
//! raw mode, since writing to stderr would corrupt the screen.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::components::Component;
use crate::constants::LOG_BUFFER_LINES;
use crate::ui::UiFrame;

static GLOBAL_LOG: OnceLock<LogHandle> = OnceLock::new();

pub fn set_global_log(handle: LogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_log() -> Option<LogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Copy panic reports into the log buffer before the default hook runs, so
/// they survive leaving the alternate screen.
pub fn install_panic_hook() {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    if INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(handle) = GLOBAL_LOG.get() {
            handle.push("=== PANIC ===");
            if let Some(location) = info.location() {
                handle.push(format!("{}:{}", location.file(), location.line()));
            }
            if let Some(msg) = info.payload().downcast_ref::<&str>() {
                handle.push(format!("message: {msg}"));
            } else if let Some(msg) = info.payload().downcast_ref::<String>() {
                handle.push(format!("message: {msg}"));
            }
        }
        prev(info);
    }));
}

#[derive(Debug)]
struct LogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

/// Shared, capped ring of log lines.
#[derive(Clone, Debug)]
pub struct LogHandle {
    inner: Arc<Mutex<LogBuffer>>,
}

impl Default for LogHandle {
    fn default() -> Self {
        Self::new(LOG_BUFFER_LINES)
    }
}

impl LogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_line(line.into());
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last `count` lines, oldest first, skipping `from_end` newer ones.
    pub fn tail(&self, count: usize, from_end: usize) -> Vec<String> {
        let buffer = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let end = buffer.lines.len().saturating_sub(from_end);
        let start = end.saturating_sub(count);
        buffer.lines.range(start..end).cloned().collect()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter::new(self.clone())
    }
}

/// `io::Write` adapter that turns formatted output into buffer lines.
#[derive(Debug)]
pub struct LogWriter {
    handle: LogHandle,
    pending: Vec<u8>,
}

impl LogWriter {
    pub fn new(handle: LogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.handle.push(line);
            }
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_complete_lines();
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.handle.push(rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Bordered pane showing the tail of the log. Scrolls with PageUp/PageDown
/// and the mouse wheel; `End` jumps back to the newest line.
#[derive(Debug)]
pub struct LogPane {
    handle: LogHandle,
    /// Lines hidden below the view; 0 follows the tail.
    scroll_back: usize,
    last_view: usize,
}

impl LogPane {
    pub fn new(handle: LogHandle) -> Self {
        Self {
            handle,
            scroll_back: 0,
            last_view: 0,
        }
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    fn scroll(&mut self, delta: isize) {
        let max = self.handle.len().saturating_sub(self.last_view.max(1));
        self.scroll_back = self.scroll_back.saturating_add_signed(delta).min(max);
    }
}

impl Component for LogPane {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        let view = usize::from(area.height - 2);
        self.last_view = view;
        let title = if self.is_following() {
            " Log ".to_string()
        } else {
            format!(" Log (+{} newer) ", self.scroll_back)
        };
        let lines = self.handle.tail(view, self.scroll_back);
        let text = Text::from(lines.into_iter().map(Line::from).collect::<Vec<_>>());
        let widget = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(widget, area);
    }

    fn handle_event(&mut self, event: &Event) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) => match key.code {
                KeyCode::PageUp => self.scroll(page),
                KeyCode::PageDown => self.scroll(-page),
                KeyCode::End => self.scroll_back = 0,
                _ => return false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll(3),
                MouseEventKind::ScrollDown => self.scroll(-3),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    #[test]
    fn buffer_is_capped() {
        let handle = LogHandle::new(3);
        for line in ["one", "two", "three", "four"] {
            handle.push(line);
        }
        assert_eq!(handle.len(), 3);
        assert_eq!(handle.tail(10, 0), vec!["two", "three", "four"]);
        assert_eq!(handle.tail(2, 1), vec!["two", "three"]);
    }

    #[test]
    fn writer_splits_lines_and_flushes_partial() {
        let handle = LogHandle::new(10);
        let mut writer = handle.writer();
        writer.write_all(b"first line\nsecond").unwrap();
        assert_eq!(handle.tail(10, 0), vec!["first line"]);
        writer.write_all(b" line\npartial").unwrap();
        writer.flush().unwrap();
        assert_eq!(
            handle.tail(10, 0),
            vec!["first line", "second line", "partial"]
        );
    }

    #[test]
    fn pane_scrolls_and_returns_to_tail() {
        let handle = LogHandle::new(100);
        for i in 0..20 {
            handle.push(format!("line{i}"));
        }
        let mut pane = LogPane::new(handle);
        let area = Rect::new(0, 0, 20, 7);
        let mut buffer = Buffer::empty(area);
        pane.render(&mut UiFrame::from_parts(area, &mut buffer), area);
        let page_up = Event::Key(KeyEvent::new(KeyCode::PageUp, KeyModifiers::NONE));
        assert!(pane.handle_event(&page_up));
        assert!(!pane.is_following());
        assert!(pane.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::End,
            KeyModifiers::NONE
        ))));
        assert!(pane.is_following());
        assert!(!pane.handle_event(&Event::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE
        ))));
    }

    #[test]
    fn pane_renders_newest_lines() {
        let handle = LogHandle::new(100);
        for i in 0..10 {
            handle.push(format!("line{i}"));
        }
        let mut pane = LogPane::new(handle);
        let area = Rect::new(0, 0, 20, 4);
        let mut buffer = Buffer::empty(area);
        pane.render(&mut UiFrame::from_parts(area, &mut buffer), area);
        let row: String = (1..7)
            .map(|x| buffer.cell((x, 2)).map_or(" ", |c| c.symbol()))
            .collect();
        assert_eq!(row, "line9 ");
    }
}

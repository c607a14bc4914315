use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    cursor::{Hide, Show},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;

pub type TerminalType = Terminal<CrosstermBackend<Stdout>>;

/// Ticks a panel stays on screen before the queue auto-dismisses it.
pub const DISMISS_TICKS: u32 = 90;

pub const MIN_BOX_ROWS: usize = 5;
pub const MIN_BOX_COLS: usize = 10;

/// One bordered dialog/status box in the message stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub body: String,
    pub options: Vec<String>,
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Panel {
            title: title.into(),
            body: body.into(),
            options,
        }
    }

    /// Draws the panel into a `rows x cols` box. Dimensions below the
    /// minimum are clamped rather than rejected. With a non-empty body,
    /// `rows - 6` interior lines hold hard-wrapped body text followed by a
    /// divider; the remaining interior lines each hold one option,
    /// truncated with an ellipsis when too wide. With an empty body every
    /// interior line is an option line.
    pub fn render(&self, rows: usize, cols: usize) -> Vec<String> {
        let rows = rows.max(MIN_BOX_ROWS);
        let cols = cols.max(MIN_BOX_COLS);
        let inner = cols - 2;

        let mut lines = Vec::with_capacity(rows);
        lines.push(title_border(&self.title, inner));

        let interior = rows - 2;
        let mut option_rows = interior;
        let mut next_option = 0;

        if !self.body.is_empty() {
            let body_rows = rows.saturating_sub(6);
            let wrapped = hard_wrap(&self.body, inner);
            for i in 0..body_rows {
                let text = wrapped.get(i).map(String::as_str).unwrap_or("");
                lines.push(framed(text, inner));
            }
            lines.push(plain_border(inner));
            option_rows = interior - body_rows - 1;
        }

        for _ in 0..option_rows {
            let text = match self.options.get(next_option) {
                Some(option) => truncate(option, inner),
                None => String::new(),
            };
            next_option += 1;
            lines.push(framed(&text, inner));
        }

        lines.push(plain_border(inner));
        lines
    }
}

fn plain_border(inner: usize) -> String {
    format!("+{}+", "-".repeat(inner))
}

fn title_border(title: &str, inner: usize) -> String {
    let title = truncate(title, inner);
    let len = title.chars().count();
    let left = (inner - len) / 2;
    format!(
        "+{}{}{}+",
        "-".repeat(left),
        title,
        "-".repeat(inner - len - left)
    )
}

fn framed(text: &str, inner: usize) -> String {
    let len = text.chars().count();
    format!("|{}{}|", text, " ".repeat(inner - len))
}

/// Hard character-count wrapping at exact column width; no word-boundary
/// logic. Explicit newlines in the source text are honored.
fn hard_wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source in text.split('\n') {
        let chars: Vec<char> = source.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// LIFO stack of panels. The base status panel sits at the bottom, is never
/// auto-dismissed, and is rebuilt from live status whenever the stack has
/// otherwise drained.
pub struct MessageQueue {
    stack: Vec<Panel>,
    countdown: u32,
}

impl MessageQueue {
    pub fn new(base: Panel) -> Self {
        MessageQueue {
            stack: vec![base],
            countdown: DISMISS_TICKS,
        }
    }

    /// Number of panels above the base.
    pub fn pending(&self) -> usize {
        self.stack.len() - 1
    }

    /// True once only the base panel remains.
    pub fn is_drained(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn peek(&self) -> &Panel {
        self.stack.last().expect("base panel is always present")
    }

    /// Pushes on top and restarts the countdown so the new panel gets the
    /// full display duration.
    pub fn push(&mut self, panel: Panel) {
        self.stack.push(panel);
        self.countdown = DISMISS_TICKS;
    }

    /// Removes the top panel; the base is the stack floor. Returns whether
    /// anything was removed.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Drops every panel above the base.
    pub fn clear(&mut self) {
        self.stack.truncate(1);
        self.countdown = DISMISS_TICKS;
    }

    /// Replaces the base panel outside the countdown, used whenever status
    /// fields change.
    pub fn set_base(&mut self, base: Panel) {
        self.stack[0] = base;
    }

    /// Per-tick countdown step. At zero the top panel is dismissed, unless
    /// only the base remains, in which case the base is rebuilt in place
    /// from `base` and never dismissed.
    pub fn advance(&mut self, base: Panel) {
        if self.countdown > 0 {
            self.countdown -= 1;
        }
        if self.countdown == 0 {
            if !self.pop() {
                self.stack[0] = base;
            }
            self.countdown = DISMISS_TICKS;
        }
    }
}

/// Seam between the state machine and the terminal: non-blocking input,
/// display size (queried once at startup), and the rendering sink.
pub trait Frontend {
    fn poll_key(&mut self) -> anyhow::Result<Option<char>>;
    /// (cols, rows) of the display.
    fn size(&self) -> (u16, u16);
    fn draw(&mut self, block: &str) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
    fn cleanup(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct GameUI {
    terminal: TerminalType,
    size: (u16, u16),
}

impl GameUI {
    pub fn new() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().map_err(|e| {
            anyhow::anyhow!(
                "Failed to enable raw mode: {}.\n\nThis usually means you're not running in a proper terminal.",
                e
            )
        })?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)
            .map_err(|e| anyhow::anyhow!("Failed to setup terminal screen: {}", e))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)
            .map_err(|e| anyhow::anyhow!("Failed to create terminal: {}", e))?;

        terminal
            .clear()
            .map_err(|e| anyhow::anyhow!("Failed to clear terminal: {}", e))?;

        let area = terminal.size()?;
        let size = (area.width, area.height);

        Ok(GameUI { terminal, size })
    }
}

impl Frontend for GameUI {
    fn poll_key(&mut self) -> anyhow::Result<Option<char>> {
        // Zero timeout: a tick never stalls waiting on the user.
        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if !is_press(&key) {
                    return Ok(None);
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return Ok(Some('q'));
                }
                if let KeyCode::Char(c) = key.code {
                    return Ok(Some(c.to_ascii_lowercase()));
                }
            }
        }
        Ok(None)
    }

    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn draw(&mut self, block: &str) -> anyhow::Result<()> {
        let text = block.to_string();
        self.terminal.draw(move |f| {
            let widget = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title(" wildgrass "));
            f.render_widget(widget, f.size());
        })?;
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.terminal.clear()?;
        Ok(())
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)?;
        Ok(())
    }
}

fn is_press(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Panel {
        Panel::new("STATUS", "", vec!["HP 20/20".to_string()])
    }

    #[test]
    fn box_dimensions_are_clamped_to_the_minimum() {
        let panel = Panel::new("T", "body", vec![]);
        let lines = panel.render(1, 3);
        assert_eq!(lines.len(), MIN_BOX_ROWS);
        for line in &lines {
            assert_eq!(line.chars().count(), MIN_BOX_COLS);
        }
    }

    #[test]
    fn title_is_centered_on_the_top_border() {
        let panel = Panel::new("HI", "", vec![]);
        let lines = panel.render(5, 12);
        assert_eq!(lines[0], "+----HI----+");
    }

    #[test]
    fn body_is_hard_wrapped_at_exact_width() {
        let panel = Panel::new("T", "abcdefghijkl", vec![]);
        // rows 8 -> 2 body lines, divider, 3 option rows
        let lines = panel.render(8, 10);
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[1], "|abcdefgh|");
        assert_eq!(lines[2], "|ijkl    |");
        assert_eq!(lines[3], "+--------+");
    }

    #[test]
    fn with_a_body_exactly_three_option_rows_remain() {
        let options: Vec<String> = (1..=5).map(|i| format!("option {}", i)).collect();
        let panel = Panel::new("T", "hello", options);
        let lines = panel.render(9, 14);
        assert_eq!(lines.len(), 9);
        // rows - 6 = 3 body lines at 1..=3, divider at 4, options at 5..=7
        assert_eq!(lines[4], "+------------+");
        assert_eq!(lines[5], "|option 1    |");
        assert_eq!(lines[7], "|option 3    |");
        assert_eq!(lines[8], "+------------+");
    }

    #[test]
    fn wide_options_are_truncated_with_an_ellipsis() {
        let panel = Panel::new("T", "", vec!["abcdefghijklmnop".to_string()]);
        let lines = panel.render(5, 12);
        assert_eq!(lines[1], "|abcdefg...|");
    }

    #[test]
    fn missing_options_render_as_blank_rows() {
        let panel = Panel::new("T", "", vec!["one".to_string()]);
        let lines = panel.render(6, 10);
        assert_eq!(lines[2], "|        |");
        assert_eq!(lines[3], "|        |");
    }

    #[test]
    fn push_then_pop_restores_the_previous_top() {
        let mut queue = MessageQueue::new(base());
        let before = queue.peek().clone();
        for i in 0..4 {
            queue.push(Panel::new(format!("p{}", i), "", vec![]));
        }
        for _ in 0..4 {
            assert!(queue.pop());
        }
        assert_eq!(*queue.peek(), before);
        assert!(!queue.pop());
    }

    #[test]
    fn advance_pops_exactly_one_panel_per_dismiss_duration() {
        let mut queue = MessageQueue::new(base());
        queue.push(Panel::new("a", "", vec![]));
        queue.push(Panel::new("b", "", vec![]));

        for _ in 0..DISMISS_TICKS - 1 {
            queue.advance(base());
        }
        assert_eq!(queue.pending(), 2);
        queue.advance(base());
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.peek().title, "a");
    }

    #[test]
    fn base_panel_is_refreshed_instead_of_dismissed() {
        let mut queue = MessageQueue::new(base());
        for _ in 0..DISMISS_TICKS * 3 {
            queue.advance(Panel::new("fresh", "", vec![]));
        }
        assert!(queue.is_drained());
        assert_eq!(queue.peek().title, "fresh");
    }

    #[test]
    fn clear_keeps_only_the_base() {
        let mut queue = MessageQueue::new(base());
        queue.push(Panel::new("a", "", vec![]));
        queue.push(Panel::new("b", "", vec![]));
        queue.clear();
        assert!(queue.is_drained());
        assert_eq!(queue.peek().title, "STATUS");
    }

    #[test]
    fn push_restarts_the_shared_countdown() {
        let mut queue = MessageQueue::new(base());
        queue.push(Panel::new("a", "", vec![]));
        for _ in 0..DISMISS_TICKS / 2 {
            queue.advance(base());
        }
        queue.push(Panel::new("b", "", vec![]));
        for _ in 0..DISMISS_TICKS - 1 {
            queue.advance(base());
        }
        // "b" only expires after a full duration of its own.
        assert_eq!(queue.pending(), 2);
        queue.advance(base());
        assert_eq!(queue.pending(), 1);
    }
}

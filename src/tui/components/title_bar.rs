//! # TitleBar Component
//!
//! Top status bar: current view, active emotion filter, loading spinner and
//! the latest status message.
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.view, app.emotion_filter, &app.status_message);
//! title_bar.is_loading = app.is_loading;
//! title_bar.render(frame, area);
//! ```
//!
//! The text is built left to right in priority order so the view name stays
//! visible on narrow terminals:
//!
//! 1. `"FeelTok | Explore"`
//! 2. `"FeelTok | Explore [love]"` when a filter is active
//! 3. `"... | ⠋ Loading Explore..."` while a fetch is in flight

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::model::{Emotion, FeedView};
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar<'a> {
    pub view: FeedView,
    pub emotion_filter: Option<Emotion>,
    pub status_message: &'a str,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> TitleBar<'a> {
    pub fn new(view: FeedView, emotion_filter: Option<Emotion>, status_message: &'a str) -> Self {
        Self {
            view,
            emotion_filter,
            status_message,
            is_loading: false,
            spinner_frame: 0,
        }
    }

    fn line(&self) -> Line<'a> {
        let accent = Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled("FeelTok", accent),
            Span::raw(" | "),
            Span::styled(self.view.label(), Style::default().add_modifier(Modifier::BOLD)),
        ];

        if self.view == FeedView::Explore
            && let Some(emotion) = self.emotion_filter
        {
            spans.push(Span::styled(
                format!(" [{emotion}]"),
                Style::default().fg(Color::Yellow),
            ));
        }

        if self.is_loading {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                SPINNER[self.spinner_frame % SPINNER.len()],
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::raw(self.status_message));
        } else if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message,
                Style::default().fg(Color::DarkGray),
            ));
        }

        Line::from(spans)
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

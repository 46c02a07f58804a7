//! # CommentBox Component
//!
//! Modal overlay for writing a comment on the selected post. While open it
//! receives every key event; Enter submits, Esc cancels.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::model::PostId;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const OVERLAY_WIDTH: u16 = 60;
const OVERLAY_HEIGHT: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentEvent {
    Submit { post_id: PostId, content: String },
    Cancel,
}

#[derive(Debug, Clone)]
pub struct CommentBox {
    pub post_id: PostId,
    /// Handle of the post's author, shown in the title.
    pub author_handle: String,
    pub buffer: String,
}

impl CommentBox {
    pub fn new(post_id: PostId, author_handle: String) -> Self {
        Self {
            post_id,
            author_handle,
            buffer: String::new(),
        }
    }
}

impl EventHandler for CommentBox {
    type Event = CommentEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                // Comments are single-line
                self.buffer.push_str(&text.replace(['\r', '\n'], " "));
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => {
                // Blank input stays open; the store would reject it anyway
                if self.buffer.trim().is_empty() {
                    return None;
                }
                Some(CommentEvent::Submit {
                    post_id: self.post_id.clone(),
                    content: std::mem::take(&mut self.buffer),
                })
            }
            TuiEvent::Escape => Some(CommentEvent::Cancel),
            _ => None,
        }
    }
}

impl Component for CommentBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [row] = Layout::vertical([Constraint::Length(OVERLAY_HEIGHT.min(area.height))])
            .flex(Flex::Center)
            .areas(area);
        let [overlay] = Layout::horizontal([Constraint::Length(OVERLAY_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(row);

        let block = Block::bordered()
            .title(format!(" Comment on @{} ", self.author_handle))
            .title_bottom(Line::from(" Enter send · Esc cancel ").right_aligned())
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1));

        let text = Line::from(vec![
            Span::raw(self.buffer.as_str()),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]);

        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
            overlay,
        );
    }
}

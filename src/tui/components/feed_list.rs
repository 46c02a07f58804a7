//! # FeedList Component
//!
//! Single-column scrollable list of post cards, used for the Home view.
//!
//! `FeedList` is a transient component (created each frame) that wraps
//! `&'a mut FeedScrollState` (persistent state) and the posts (props).
//! [`FeedScrollState`] is shared with the explore grid so switching views
//! keeps the same scrolling behaviour.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::model::Post;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::post_card::PostCard;
use crate::tui::event::TuiEvent;

/// Scroll state for a feed. Must be persisted in the parent TuiState.
#[derive(Default)]
pub struct FeedScrollState {
    pub scroll_state: ScrollViewState,
    /// Last known viewport height (for clamping between frames)
    pub viewport_height: u16,
    /// Last rendered canvas height
    pub content_height: u16,
    /// Scroll the selected card into view on the next render
    pub follow_selection: bool,
}

impl FeedScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll so the span `top..bottom` is visible.
    /// Spans taller than the viewport are aligned to their top edge.
    pub fn reveal(&mut self, top: u16, bottom: u16) {
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if bottom > offset_y + self.viewport_height {
            let new_y = bottom.saturating_sub(self.viewport_height).min(top);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
        }
    }

    pub fn reset(&mut self) {
        self.scroll_state.set_offset(Position { x: 0, y: 0 });
        self.follow_selection = true;
    }

    /// Renders `cards` (x, y, width, height, post) into a scroll canvas.
    /// Cards outside the viewport are skipped.
    pub(crate) fn render_cards(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        canvas_width: u16,
        cards: &[(Rect, &Post)],
        selected_id: Option<&str>,
    ) {
        self.viewport_height = area.height;
        self.content_height = cards
            .iter()
            .map(|(rect, _)| rect.y.saturating_add(rect.height))
            .max()
            .unwrap_or(0);

        if self.follow_selection {
            if let Some((rect, _)) = cards
                .iter()
                .find(|(_, post)| Some(post.id.as_str()) == selected_id)
            {
                self.reveal(rect.y, rect.y.saturating_add(rect.height));
            }
            self.follow_selection = false;
        }
        self.clamp_scroll();

        let offset_y = self.scroll_state.offset().y;
        let view_end = offset_y.saturating_add(area.height);

        let mut scroll_view = ScrollView::new(Size::new(canvas_width, self.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (rect, post) in cards {
            if rect.y.saturating_add(rect.height) <= offset_y || rect.y >= view_end {
                continue;
            }
            let is_selected = Some(post.id.as_str()) == selected_id;
            scroll_view.render_widget(PostCard::new(post, is_selected), *rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.scroll_state);
    }
}

impl EventHandler for FeedScrollState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            _ => {}
        }
        None
    }
}

/// Shown in place of a feed with no posts.
pub(crate) fn render_empty(frame: &mut Frame, area: Rect, is_loading: bool) {
    let text = if is_loading {
        "Loading..."
    } else {
        "No posts yet. Press r to refresh."
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    let y = area.y + area.height / 2;
    frame.render_widget(paragraph, Rect::new(area.x, y, area.width, 1.min(area.height)));
}

/// Home feed: one card per row in display order.
pub struct FeedList<'a> {
    pub state: &'a mut FeedScrollState,
    pub posts: &'a [Post],
    pub selected_id: Option<&'a str>,
    pub is_loading: bool,
}

impl<'a> FeedList<'a> {
    pub fn new(
        state: &'a mut FeedScrollState,
        posts: &'a [Post],
        selected_id: Option<&'a str>,
        is_loading: bool,
    ) -> Self {
        Self {
            state,
            posts,
            selected_id,
            is_loading,
        }
    }
}

impl Component for FeedList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.posts.is_empty() {
            render_empty(frame, area, self.is_loading);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let mut y: u16 = 0;
        let cards: Vec<(Rect, &Post)> = self
            .posts
            .iter()
            .map(|post| {
                let height = PostCard::calculate_height(post, content_width);
                let rect = Rect::new(0, y, content_width, height);
                y = y.saturating_add(height);
                (rect, post)
            })
            .collect();

        self.state
            .render_cards(frame, area, content_width, &cards, self.selected_id);
    }
}

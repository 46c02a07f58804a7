//! # MasonryGrid Component
//!
//! Explore view: posts already split into columns by the layout engine,
//! drawn side by side and stacked top to bottom within each column.
//!
//! Column assignment uses the engine's height estimates; the cards here are
//! stacked with their actual terminal heights, so column bottoms only line up
//! approximately.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::model::Post;
use crate::tui::component::Component;
use crate::tui::components::feed_list::{FeedScrollState, render_empty};
use crate::tui::components::post_card::PostCard;

/// Columns narrower than this are not drawn.
const MIN_COLUMN_WIDTH: u16 = 12;

pub struct MasonryGrid<'a> {
    pub state: &'a mut FeedScrollState,
    pub columns: &'a [Vec<Post>],
    pub selected_id: Option<&'a str>,
    pub is_loading: bool,
}

impl<'a> MasonryGrid<'a> {
    pub fn new(
        state: &'a mut FeedScrollState,
        columns: &'a [Vec<Post>],
        selected_id: Option<&'a str>,
        is_loading: bool,
    ) -> Self {
        Self {
            state,
            columns,
            selected_id,
            is_loading,
        }
    }

    /// Card rectangles in canvas coordinates, column by column.
    fn card_rects(&self, column_width: u16) -> Vec<(Rect, &'a Post)> {
        let columns: &'a [Vec<Post>] = self.columns;

        let mut cards = Vec::new();
        let mut x: u16 = 0;
        for column in columns {
            let mut y: u16 = 0;
            for post in column {
                let height = PostCard::calculate_height(post, column_width);
                cards.push((Rect::new(x, y, column_width, height), post));
                y = y.saturating_add(height);
            }
            x = x.saturating_add(column_width);
        }
        cards
    }
}

impl Component for MasonryGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.columns.iter().all(Vec::is_empty) {
            render_empty(frame, area, self.is_loading);
            return;
        }

        let canvas_width = area.width.saturating_sub(1); // -1 for scrollbar
        let column_width = u16::try_from(self.columns.len().max(1))
            .map(|count| canvas_width / count)
            .unwrap_or(0);
        if column_width < MIN_COLUMN_WIDTH {
            let warning = Paragraph::new("Terminal too narrow for this many columns")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(warning, area);
            return;
        }

        let cards = self.card_rects(column_width);
        self.state
            .render_cards(frame, area, canvas_width, &cards, self.selected_id);
    }
}

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::core::model::FeedView;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{FeedList, MasonryGrid, TitleBar};

const HELP: &str = "Tab view  j/k move  l like  b save  c comment  r refresh  0-6 filter  q quit";

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(app.view, app.emotion_filter, &app.status_message);
    title_bar.is_loading = app.is_loading;
    title_bar.spinner_frame = spinner_frame;
    title_bar.render(frame, title_area);

    // A failed load with nothing to show replaces the feed
    match &app.error {
        Some(error_msg) if app.store.is_empty() && !app.is_loading => {
            draw_error_view(frame, main_area, error_msg);
        }
        _ => draw_feed(frame, main_area, app, tui),
    }

    frame.render_widget(
        Line::styled(HELP, Style::default().fg(Color::DarkGray)),
        help_area,
    );

    if let Some(comment_box) = tui.comment_box.as_mut() {
        comment_box.render(frame, main_area);
    }
}

fn draw_feed(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let selected_id = tui.selected_id.as_deref();
    match app.view {
        FeedView::Home => {
            let posts = app.store.list();
            FeedList::new(&mut tui.feed, &posts, selected_id, app.is_loading).render(frame, area);
        }
        FeedView::Explore => match app.columns() {
            Ok(columns) => {
                MasonryGrid::new(&mut tui.feed, &columns, selected_id, app.is_loading)
                    .render(frame, area);
            }
            Err(e) => draw_error_view(frame, area, &e.to_string()),
        },
    }
}

fn draw_error_view(frame: &mut Frame, area: Rect, error_msg: &str) {
    let error_paragraph = Paragraph::new(format!("{error_msg}\n\nPress r to retry."))
        .block(Block::bordered().title("ERROR"))
        .style(Style::default().fg(Color::Red))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error_paragraph, area);
}

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::model::{MediaKind, Post};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Header and footer rows, always present.
const FIXED_ROWS: u16 = 2;

/// A stateless component that renders one post as a bordered card.
///
/// ```text
/// ╭ Ada Lovelace ──────────────╮
/// │ @ada · Nov 02 · gratitude  │   header
/// │ grateful for the people    │   wrapped text (optional)
/// │ who showed up today        │
/// │ ▶ video postVideos/clip.mp4│   media (optional)
/// │ ♥ 12   ★   ✎ 3             │   footer
/// │ @bob: same                 │   latest comment (optional)
/// ╰────────────────────────────╯
/// ```
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with the same wrapping the widget uses, so feeds can lay out a scroll
/// canvas without rendering first.
#[derive(Clone, Copy)]
pub struct PostCard<'a> {
    pub post: &'a Post,
    pub is_selected: bool,
}

impl<'a> PostCard<'a> {
    pub fn new(post: &'a Post, is_selected: bool) -> Self {
        Self { post, is_selected }
    }

    pub fn calculate_height(post: &Post, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }

        let text_rows = wrap_text(post, content_width).len() as u16;
        let media_rows = u16::from(post.has_media());
        let comment_rows = u16::from(!post.comments.is_empty());

        VERTICAL_OVERHEAD + FIXED_ROWS + text_rows + media_rows + comment_rows
    }

    fn lines(&self, content_width: u16) -> Vec<Line<'a>> {
        let post = self.post;
        let width = content_width as usize;
        let muted = Style::default().fg(Color::DarkGray);

        let mut header = format!("@{} · {}", post.author_handle, post.created_at.format("%b %d"));
        if let Some(emotion) = post.emotion {
            header.push_str(" · ");
            header.push_str(emotion.as_str());
        }
        let mut lines = vec![Line::styled(truncate_to_width(&header, width), muted)];

        lines.extend(
            wrap_text(post, content_width)
                .into_iter()
                .map(Line::raw),
        );

        if let Some(url) = post.media_url.as_deref().filter(|_| post.has_media()) {
            let icon = match post.media_kind {
                MediaKind::Video => "▶ video",
                MediaKind::Image | MediaKind::None => "▣ image",
            };
            lines.push(Line::styled(
                truncate_to_width(&format!("{icon} {url}"), width),
                Style::default().fg(Color::Blue),
            ));
        }

        let heart = if post.is_liked_by_viewer {
            Span::styled(format!("♥ {}", post.like_count), Style::default().fg(Color::Red))
        } else {
            Span::raw(format!("♡ {}", post.like_count))
        };
        let star = if post.is_bookmarked_by_viewer {
            Span::styled("★", Style::default().fg(Color::Yellow))
        } else {
            Span::raw("☆")
        };
        lines.push(Line::from(vec![
            heart,
            Span::raw("   "),
            star,
            Span::raw(format!("   ✎ {}", post.comments.len())),
        ]));

        if let Some(latest) = post.comments.last() {
            let text = format!("@{}: {}", latest.author_handle, latest.content);
            lines.push(Line::styled(
                truncate_to_width(&text, width),
                muted.add_modifier(Modifier::ITALIC),
            ));
        }

        lines
    }
}

/// Wrap the post's text the way the card renders it. Empty for text-less posts.
fn wrap_text(post: &Post, content_width: u16) -> Vec<String> {
    let Some(text) = post.text_content.as_deref().map(str::trim).filter(|t| !t.is_empty())
    else {
        return Vec::new();
    };

    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    textwrap::wrap(text, options)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl Widget for PostCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(self.post.author_name.as_str())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner_area.width)).render(inner_area, buf);
    }
}

impl Component for PostCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Comment;
    use crate::test_support::{post, post_with};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn calculate_height_bare_post() {
        // Borders + header + footer
        assert_eq!(PostCard::calculate_height(&post("p"), 40), 4);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(PostCard::calculate_height(&post("p"), HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_wraps_text() {
        // content width 9 - 4 = 5: "Hello" | "world"
        let p = post_with("p", Some("Hello world"), None);
        assert_eq!(PostCard::calculate_height(&p, 9), 4 + 2);
    }

    #[test]
    fn calculate_height_media_and_comment_rows() {
        let mut p = post_with("p", Some("hi"), Some("https://cdn/postImages/a.jpg"));
        p.comments.push(Comment {
            author_handle: "bob".to_string(),
            content: "nice".to_string(),
            created_at: p.created_at,
        });
        assert_eq!(PostCard::calculate_height(&p, 40), 4 + 1 + 1 + 1);
    }

    #[test]
    fn whitespace_text_adds_no_rows() {
        let p = post_with("p", Some("   "), None);
        assert_eq!(PostCard::calculate_height(&p, 40), 4);
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        // Wide characters take two columns each
        assert_eq!(truncate_to_width("感謝感謝", 5), "感謝…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn render_shows_counts_and_author() {
        let mut p = post_with("p", Some("grateful"), None);
        p.like_count = 7;
        p.is_liked_by_viewer = true;
        p.author_name = "Ada".to_string();

        let height = PostCard::calculate_height(&p, 30);
        let backend = TestBackend::new(30, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(PostCard::new(&p, true), f.area());
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Ada"));
        assert!(text.contains("grateful"));
        assert!(text.contains("♥ 7"));
    }
}

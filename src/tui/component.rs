use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive the feed data they draw as props (struct fields) and
/// may borrow persistent presentation state, such as the shared
/// [`FeedScrollState`](crate::tui::components::FeedScrollState), for the
/// duration of one frame.
///
/// # Mutability
///
/// `render` takes `&mut self` so a component can update that borrowed state
/// while drawing. The feed list and masonry grid measure card heights and
/// clamp the scroll offset to keep the selected card visible. This mirrors
/// Ratatui's `StatefulWidget` pattern.
pub trait Component {
    /// Draw the component into `area`.
    ///
    /// Called once per frame; anything computed here is discarded unless it
    /// is written back into borrowed state.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns terminal events into its own higher-level events.
///
/// The comment composer emits `CommentEvent`s; the scroll state handles
/// paging and emits nothing.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}

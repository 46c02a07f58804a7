//! # TUI Components
//!
//! All UI components for the terminal client.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: Top status bar showing view, filter and status
//! - `PostCard`: One post rendered as a bordered card
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that wrap persistent state or emit events:
//! - `FeedList`: Home feed, one scrollable column of cards
//! - `MasonryGrid`: Explore feed, columns assigned by the layout engine
//! - `CommentBox`: Comment composer overlay
//!
//! ### Props-Based Data Flow
//!
//! Components receive external data as "props" (struct fields), not by
//! reaching into `App`:
//!
//! ```rust,ignore
//! // Good: dependencies are explicit
//! TitleBar::new(app.view, app.emotion_filter, &app.status_message).render(frame, area);
//!
//! // Bad: hidden dependency on global state
//! title_bar.render(frame, area); // reads from App
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── post_card.rs     (Single post card + height prediction)
//! ├── feed_list.rs     (Home list + shared scroll state)
//! ├── masonry.rs       (Explore grid)
//! └── comment_box.rs   (Comment composer overlay)
//! ```

pub mod comment_box;
pub mod feed_list;
pub mod masonry;
pub mod post_card;
mod title_bar;

pub use comment_box::{CommentBox, CommentEvent};
pub use feed_list::{FeedList, FeedScrollState};
pub use masonry::MasonryGrid;
pub use title_bar::TitleBar;

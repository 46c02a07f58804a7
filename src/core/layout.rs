//! # Masonry Layout
//!
//! Distributes posts across a fixed number of columns so the estimated
//! rendered height of each column stays roughly equal.
//!
//! The assignment is greedy and streaming: each post, in input order, goes to
//! the column with the smallest running height. Ties go to the lowest column
//! index, so the result is fully determined by the input.
//!
//! ```text
//! heights: [0, 0]      A(150) → col 0    [150,   0]
//!                      B(350) → col 1    [150, 350]
//!                      C(150) → col 0    [300, 350]
//! result:  [[A, C], [B]]
//! ```

use crate::core::error::{FeedError, Result};
use crate::core::model::Post;

/// Number of columns used by the explore grid unless configured otherwise.
pub const DEFAULT_COLUMN_COUNT: usize = 2;

pub const DEFAULT_BASE_HEIGHT: u32 = 150;
pub const DEFAULT_TEXT_HEIGHT: u32 = 30;
pub const DEFAULT_MEDIA_HEIGHT: u32 = 200;

/// Estimates how tall a post will render.
///
/// Must be pure: the estimate may only depend on the post's own fields,
/// never on where the post sits in the feed.
pub trait HeightEstimator {
    fn estimate(&self, post: &Post) -> u32;
}

impl<F> HeightEstimator for F
where
    F: Fn(&Post) -> u32,
{
    fn estimate(&self, post: &Post) -> u32 {
        self(post)
    }
}

/// Card height model: a base height plus fixed increments for text and media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHeights {
    pub base: u32,
    pub text: u32,
    pub media: u32,
}

impl Default for CardHeights {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_HEIGHT,
            text: DEFAULT_TEXT_HEIGHT,
            media: DEFAULT_MEDIA_HEIGHT,
        }
    }
}

impl HeightEstimator for CardHeights {
    fn estimate(&self, post: &Post) -> u32 {
        let mut height = self.base;
        if post.has_text() {
            height = height.saturating_add(self.text);
        }
        if post.has_media() {
            height = height.saturating_add(self.media);
        }
        height
    }
}

pub struct FeedLayoutEngine<E = CardHeights> {
    estimator: E,
}

impl Default for FeedLayoutEngine<CardHeights> {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedLayoutEngine<CardHeights> {
    pub fn new() -> Self {
        Self {
            estimator: CardHeights::default(),
        }
    }
}

impl<E: HeightEstimator> FeedLayoutEngine<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Assign `posts` to `column_count` columns.
    ///
    /// Every post lands in exactly one column, and each column keeps the
    /// input's relative order. Returns `column_count` columns even when
    /// `posts` is empty. Runs in O(posts × columns).
    pub fn distribute<'a>(
        &self,
        posts: &'a [Post],
        column_count: usize,
    ) -> Result<Vec<Vec<&'a Post>>> {
        if column_count == 0 {
            return Err(FeedError::InvalidArgument(
                "column count must be at least 1".to_string(),
            ));
        }

        let mut columns: Vec<Vec<&'a Post>> = vec![Vec::new(); column_count];
        let mut heights: Vec<u64> = vec![0; column_count];

        for post in posts {
            // min_by_key returns the first minimum, so the lowest index wins ties
            let target = (0..column_count)
                .min_by_key(|&i| heights[i])
                .unwrap_or(0);
            columns[target].push(post);
            heights[target] += u64::from(self.estimator.estimate(post));
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, post_with};

    fn ids(columns: &[Vec<&Post>]) -> Vec<Vec<String>> {
        columns
            .iter()
            .map(|col| col.iter().map(|p| p.id.clone()).collect())
            .collect()
    }

    /// Heights keyed off the post id so tests can use literal values.
    fn literal_heights(post: &Post) -> u32 {
        match post.id.as_str() {
            "A" | "C" => 150,
            "B" => 350,
            _ => 100,
        }
    }

    #[test]
    fn test_zero_columns_is_invalid() {
        let engine = FeedLayoutEngine::new();
        let posts = vec![post("p1")];
        assert!(matches!(
            engine.distribute(&posts, 0),
            Err(FeedError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_input_yields_empty_columns() {
        let engine = FeedLayoutEngine::new();
        let columns = engine.distribute(&[], 3).unwrap();
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_lowest_index_wins_ties() {
        let engine = FeedLayoutEngine::with_estimator(literal_heights);
        let posts = vec![post("A"), post("B"), post("C")];
        let columns = engine.distribute(&posts, 2).unwrap();
        assert_eq!(
            ids(&columns),
            vec![vec!["A".to_string(), "C".to_string()], vec!["B".to_string()]]
        );
    }

    #[test]
    fn test_single_column_keeps_input_order() {
        let engine = FeedLayoutEngine::new();
        let posts = vec![post("1"), post("2"), post("3")];
        let columns = engine.distribute(&posts, 1).unwrap();
        assert_eq!(ids(&columns), vec![vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_equal_heights_round_robin() {
        let engine = FeedLayoutEngine::with_estimator(|_: &Post| -> u32 { 10 });
        let posts: Vec<Post> = (0..5).map(|i| post(&i.to_string())).collect();
        let columns = engine.distribute(&posts, 3).unwrap();
        assert_eq!(ids(&columns), vec![vec!["0", "3"], vec!["1", "4"], vec!["2"]]);
    }

    #[test]
    fn test_card_heights_components() {
        let heights = CardHeights::default();
        assert_eq!(heights.estimate(&post("bare")), 150);
        assert_eq!(heights.estimate(&post_with("t", Some("hello"), None)), 180);
        assert_eq!(
            heights.estimate(&post_with("m", None, Some("https://cdn/postImages/a.jpg"))),
            350
        );
        assert_eq!(
            heights.estimate(&post_with("tm", Some("hi"), Some("https://cdn/postVideos/b.mp4"))),
            380
        );
    }

    #[test]
    fn test_tall_card_pushes_followers_to_other_column() {
        let engine = FeedLayoutEngine::new();
        let posts = vec![
            post_with("tall", Some("text"), Some("https://cdn/postImages/1.jpg")),
            post("s1"),
            post("s2"),
            post("s3"),
        ];
        // tall=380 in col 0; s1, s2 fill col 1 to 300; s3 still fits col 1 (300 < 380)
        let columns = engine.distribute(&posts, 2).unwrap();
        assert_eq!(ids(&columns), vec![vec!["tall"], vec!["s1", "s2", "s3"]]);
    }

    #[test]
    fn test_distribute_is_repeatable() {
        let engine = FeedLayoutEngine::new();
        let posts = vec![
            post_with("a", Some("x"), None),
            post("b"),
            post_with("c", None, Some("u")),
        ];
        let first = ids(&engine.distribute(&posts, 2).unwrap());
        let second = ids(&engine.distribute(&posts, 2).unwrap());
        assert_eq!(first, second);
    }
}

use std::time::{Duration, Instant};

use crate::search::{EmphasisTracker, Navigator};

/// Where the chat pane is scrolled to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMode {
    /// Stick to the newest entry
    FollowLatest,
    /// Keep this entry centred
    Entry(usize),
    /// Fixed first visible line
    Offset(usize),
}

/// Visible window of the chat pane as computed by the last draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub max_top: usize,
    pub height: usize,
}

/// View state of the chat pane: scroll position, the focused entry and
/// the emphasis timers started by search navigation.
#[derive(Debug)]
pub struct ChatView {
    pub scroll: ScrollMode,
    pub focused: Option<usize>,
    pub emphasis: EmphasisTracker,
    pub viewport: Viewport,
    clock: Instant,
}

impl ChatView {
    pub fn new(emphasis: Duration, now: Instant) -> Self {
        Self {
            scroll: ScrollMode::FollowLatest,
            focused: None,
            emphasis: EmphasisTracker::new(emphasis),
            viewport: Viewport::default(),
            clock: now,
        }
    }

    /// Time used for emphasis started by the next navigation
    pub fn set_clock(&mut self, now: Instant) {
        self.clock = now;
    }

    pub fn follow_latest(&mut self) {
        self.scroll = ScrollMode::FollowLatest;
        self.focused = None;
    }

    /// Entry that copy and reactions apply to: the focused one, else the newest
    pub fn target(&self, entry_count: usize) -> Option<usize> {
        match self.focused {
            Some(index) if index < entry_count => Some(index),
            _ => entry_count.checked_sub(1),
        }
    }

    /// Move focus by `delta` entries and keep it in view
    pub fn move_focus(&mut self, delta: isize, entry_count: usize) {
        let Some(current) = self.target(entry_count) else {
            return;
        };
        let last = entry_count - 1;
        let next = current.saturating_add_signed(delta).min(last);
        if next == last && delta > 0 {
            self.follow_latest();
            return;
        }
        self.focused = Some(next);
        self.scroll = ScrollMode::Entry(next);
    }

    /// Scroll by whole pages relative to the last drawn viewport
    pub fn page(&mut self, pages: isize) {
        let step = self.viewport.height.max(1) as isize * pages;
        let top = self.viewport.top.saturating_add_signed(step);
        self.scroll = if top >= self.viewport.max_top {
            ScrollMode::FollowLatest
        } else {
            ScrollMode::Offset(top)
        };
    }

    /// First visible line for a chat of `total` lines.
    ///
    /// `starts[i]` is the first line of entry `i`; `height` is the pane's
    /// inner height.
    pub fn resolve_top(&self, starts: &[usize], total: usize, height: usize) -> usize {
        let max_top = total.saturating_sub(height);
        let top = match self.scroll {
            ScrollMode::FollowLatest => max_top,
            ScrollMode::Offset(top) => top,
            ScrollMode::Entry(index) => match starts.get(index) {
                Some(&start) => {
                    let end = starts.get(index + 1).copied().unwrap_or(total);
                    let middle = start + (end - start) / 2;
                    middle.saturating_sub(height / 2)
                }
                None => max_top,
            },
        };
        top.min(max_top)
    }
}

impl Navigator for ChatView {
    fn scroll_to_and_emphasize(&mut self, index: usize) {
        self.scroll = ScrollMode::Entry(index);
        self.focused = Some(index);
        self.emphasis.emphasize(index, self.clock);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ChatView {
        ChatView::new(Duration::from_millis(2000), Instant::now())
    }

    #[test]
    fn test_target_defaults_to_newest() {
        let view = view();
        assert_eq!(view.target(0), None);
        assert_eq!(view.target(5), Some(4));
    }

    #[test]
    fn test_move_focus_walks_entries() {
        let mut view = view();
        view.move_focus(-1, 5);
        assert_eq!(view.focused, Some(3));
        view.move_focus(-10, 5);
        assert_eq!(view.focused, Some(0));
        assert_eq!(view.scroll, ScrollMode::Entry(0));
    }

    #[test]
    fn test_move_focus_past_end_follows_latest() {
        let mut view = view();
        view.move_focus(-2, 5);
        view.move_focus(5, 5);
        assert_eq!(view.focused, None);
        assert_eq!(view.scroll, ScrollMode::FollowLatest);
    }

    #[test]
    fn test_navigator_emphasises_with_clock() {
        let start = Instant::now();
        let mut view = ChatView::new(Duration::from_millis(2000), start);
        view.set_clock(start + Duration::from_millis(500));

        view.scroll_to_and_emphasize(3);

        assert_eq!(view.focused, Some(3));
        assert_eq!(view.scroll, ScrollMode::Entry(3));
        assert!(view.emphasis.is_emphasized(3));
        assert_eq!(view.emphasis.next_expiry(), Some(start + Duration::from_millis(2500)));
    }

    #[test]
    fn test_resolve_top_follow_latest() {
        let view = view();
        assert_eq!(view.resolve_top(&[0, 10, 20], 30, 10), 20);
        assert_eq!(view.resolve_top(&[0], 4, 10), 0);
    }

    #[test]
    fn test_resolve_top_centres_entry() {
        let mut view = view();
        view.scroll = ScrollMode::Entry(1);
        // entry 1 spans lines 10..20, middle 15, half height 5
        assert_eq!(view.resolve_top(&[0, 10, 20, 30], 40, 10), 10);

        view.scroll = ScrollMode::Entry(0);
        assert_eq!(view.resolve_top(&[0, 10, 20, 30], 40, 10), 0);
    }

    #[test]
    fn test_resolve_top_clamps_offset() {
        let mut view = view();
        view.scroll = ScrollMode::Offset(500);
        assert_eq!(view.resolve_top(&[0, 10], 20, 10), 10);
    }

    #[test]
    fn test_page_to_bottom_follows_latest() {
        let mut view = view();
        view.viewport = Viewport { top: 0, max_top: 15, height: 10 };
        view.page(1);
        assert_eq!(view.scroll, ScrollMode::Offset(10));

        view.viewport = Viewport { top: 10, max_top: 15, height: 10 };
        view.page(1);
        assert_eq!(view.scroll, ScrollMode::FollowLatest);

        view.viewport = Viewport { top: 3, max_top: 15, height: 10 };
        view.page(-1);
        assert_eq!(view.scroll, ScrollMode::Offset(0));
    }
}

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for one frame
pub struct AppLayout {
    pub chat_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
    pub search: Option<SearchLayout>,
}

/// Regions of the search pane, present only while it is open
pub struct SearchLayout {
    pub input_area: Rect,
    pub results_area: Rect,
}

impl AppLayout {
    /// - Chat history: top, 60% width when the search pane is open
    /// - Search pane: right 40% (query box + results)
    /// - Message input: 3 rows under the chat
    /// - Status bar: bottom row
    pub fn new(area: Rect, search_open: bool) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Chat (and search pane)
                Constraint::Length(3), // Message input
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        if !search_open {
            return Self {
                chat_area: vertical[0],
                input_area: vertical[1],
                status_area: vertical[2],
                search: None,
            };
        }

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(vertical[0]);

        let search_column = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(horizontal[1]);

        Self {
            chat_area: horizontal[0],
            input_area: vertical[1],
            status_area: vertical[2],
            search: Some(SearchLayout {
                input_area: search_column[0],
                results_area: search_column[1],
            }),
        }
    }
}

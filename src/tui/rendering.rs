use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::app::{Focus, MessageType, StatusMessage};
use super::chat_view::{ChatView, Viewport};
use super::layout::AppLayout;
use super::timestamps::{format_clock, format_entry_time};
use crate::markup::{self, Block as MarkupBlock};
use crate::models::{ChatEntry, Role, SearchResult, Snippet};
use crate::search::{NO_MATCHES_PLACEHOLDER, SearchState};
use crate::store::{MessageStore, ReactionBoard};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const VIOLET: Color = Color::Rgb(139, 92, 246);
const SURFACE: Color = Color::Rgb(24, 24, 27);
const CODE_FG: Color = Color::Rgb(165, 243, 252);
const EMPHASIS_BG: Color = Color::Rgb(8, 51, 68);
const MATCH_BG: Color = Color::Rgb(250, 204, 21);
const ERROR_FG: Color = Color::Rgb(239, 68, 68);

/// Characters of context kept before the first match in a result row
const SNIPPET_CONTEXT_CHARS: usize = 24;

/// Everything a frame needs, borrowed from the app
pub struct RenderState<'a> {
    pub store: &'a MessageStore,
    pub reactions: &'a ReactionBoard,
    pub chat: &'a ChatView,
    pub compose_input: &'a str,
    pub focus: Focus,
    pub search: Option<SearchPane<'a>>,
    pub status_message: Option<&'a StatusMessage>,
}

/// Search pane contents, present while the pane is open
pub struct SearchPane<'a> {
    pub query: &'a str,
    pub state: &'a SearchState,
    pub pending: bool,
    pub selected: usize,
}

/// Render the entire UI and report the chat viewport that was drawn
pub fn render_ui(frame: &mut Frame, state: &RenderState) -> Viewport {
    let layout = AppLayout::new(frame.area(), state.search.is_some());

    let viewport = render_chat(frame, layout.chat_area, state);
    render_input(
        frame,
        layout.input_area,
        " Message ",
        state.compose_input,
        state.focus == Focus::Compose,
    );

    if let (Some(search_layout), Some(pane)) = (&layout.search, &state.search) {
        render_input(
            frame,
            search_layout.input_area,
            " Search ",
            pane.query,
            state.focus == Focus::Search,
        );
        render_results(frame, search_layout.results_area, pane);
    }

    render_status_bar(frame, layout.status_area, state);
    viewport
}

fn render_chat(frame: &mut Frame, area: Rect, state: &RenderState) -> Viewport {
    let inner_width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let (lines, starts) = chat_lines(state.store, state.reactions, state.chat, inner_width);
    let top = state.chat.resolve_top(&starts, lines.len(), height);
    let viewport = Viewport { top, max_top: lines.len().saturating_sub(height), height };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(" Quantum Chat "),
        )
        .scroll((u16::try_from(top).unwrap_or(u16::MAX), 0));

    frame.render_widget(paragraph, area);
    viewport
}

/// Lay out every entry as pre-wrapped lines.
/// Returns the lines and the first line index of each entry.
fn chat_lines(
    store: &MessageStore,
    reactions: &ReactionBoard,
    chat: &ChatView,
    width: usize,
) -> (Vec<Line<'static>>, Vec<usize>) {
    let now = Local::now();
    let snapshot = store.all();

    let mut lines = Vec::new();
    let mut starts = Vec::with_capacity(snapshot.len());

    for entry in &snapshot {
        starts.push(lines.len());
        let focused = chat.focused == Some(entry.sequence_index);
        let mut entry_lines = vec![entry_header(entry, reactions, focused, &now)];
        entry_lines.extend(entry_body(&entry.content, width));
        entry_lines.push(Line::from(""));

        if chat.emphasis.is_emphasized(entry.sequence_index) {
            let emphasis = Style::default().bg(EMPHASIS_BG);
            entry_lines = entry_lines.into_iter().map(|line| line.style(emphasis)).collect();
        }
        lines.extend(entry_lines);
    }

    (lines, starts)
}

fn role_color(role: Role) -> Color {
    match role {
        Role::User => EMERALD,
        Role::Assistant => VIOLET,
    }
}

fn entry_header(
    entry: &ChatEntry,
    reactions: &ReactionBoard,
    focused: bool,
    now: &DateTime<Local>,
) -> Line<'static> {
    let marker = if focused { "▸ " } else { "  " };
    let time = format_entry_time(&entry.timestamp.with_timezone(&Local), now);

    let mut spans = vec![
        Span::styled(marker, Style::default().fg(BRIGHT)),
        Span::styled(
            format!("{} {}", entry.role.icon(), entry.role.label()),
            Style::default().fg(role_color(entry.role)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" • {}", time), Style::default().fg(MUTED)),
    ];

    let badges = reactions.reactions(entry.sequence_index);
    if !badges.is_empty() {
        let text: Vec<&str> = badges.iter().map(|r| r.emoji()).collect();
        spans.push(Span::raw(format!("  {}", text.join(" "))));
    }

    Line::from(spans)
}

fn entry_body(content: &str, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in markup::parse(content) {
        match block {
            MarkupBlock::Text(text) => {
                for line in text.lines() {
                    for chunk in wrap(line, width.saturating_sub(2)) {
                        lines.push(Line::from(format!("  {}", chunk)));
                    }
                }
            }
            MarkupBlock::Code { language, body } => {
                let code_style = Style::default().fg(CODE_FG).bg(SURFACE);
                let label = language.unwrap_or_else(|| "code".to_string());
                lines.push(Line::from(Span::styled(
                    format!("  ┌ {}", label),
                    Style::default().fg(MUTED),
                )));
                for line in body.lines() {
                    for chunk in wrap(line, width.saturating_sub(4)) {
                        lines.push(Line::from(vec![
                            Span::styled("  │ ", Style::default().fg(MUTED)),
                            Span::styled(chunk, code_style),
                        ]));
                    }
                }
            }
        }
    }

    lines
}

/// Hard-wrap a line into chunks of at most `width` chars
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.is_empty() {
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, input: &str, focused: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let char_count = input.chars().count();
    // Keep the tail visible once the input outgrows the box
    let visible: String =
        input.chars().skip(char_count.saturating_sub(inner_width.saturating_sub(1))).collect();
    let offset = u16::try_from(visible.chars().count()).unwrap_or(u16::MAX);

    let border = if focused { EMERALD } else { MUTED };
    let paragraph = Paragraph::new(visible).style(Style::default().fg(BRIGHT)).block(
        Block::default().borders(Borders::ALL).border_style(Style::default().fg(border)).title(title),
    );
    frame.render_widget(paragraph, area);

    if focused && area.width > 2 && area.height > 2 {
        let x = area.x.saturating_add(1).saturating_add(offset).min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn render_results(frame: &mut Frame, area: Rect, pane: &SearchPane) {
    let block = |title: String| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(MUTED))
            .title(title)
    };
    let width = area.width.saturating_sub(2) as usize;

    let results = match pane.state {
        SearchState::Ready { results, .. } => results,
        SearchState::Idle => {
            let hint = if pane.pending {
                "Searching…"
            } else {
                "Type at least 2 characters to search"
            };
            let paragraph = Paragraph::new(hint)
                .style(Style::default().fg(MUTED))
                .block(block(" Results ".to_string()));
            frame.render_widget(paragraph, area);
            return;
        }
    };

    if results.is_empty() {
        let list = List::new(vec![ListItem::new(NO_MATCHES_PLACEHOLDER)])
            .style(Style::default().fg(MUTED))
            .block(block(" Results ".to_string()));
        frame.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = results.iter().map(|result| result_item(result, width)).collect();
    let list = List::new(items)
        .block(block(format!(" Results ({}) ", results.len())))
        .highlight_style(Style::default().bg(Color::Rgb(39, 39, 42)).add_modifier(Modifier::BOLD));

    let mut list_state = ListState::default().with_selected(Some(pane.selected.min(results.len() - 1)));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn result_item(result: &SearchResult, width: usize) -> ListItem<'static> {
    let meta = format!(
        "{} • {}",
        result.role.label(),
        format_clock(&result.matched_at.with_timezone(&Local))
    );
    ListItem::new(Text::from(vec![
        snippet_line(&result.snippet, width),
        Line::from(Span::styled(meta, Style::default().fg(MUTED))),
    ]))
}

/// One row of snippet text starting a little before the first match, with
/// the matched runs highlighted
fn snippet_line(snippet: &Snippet, width: usize) -> Line<'static> {
    let first_match = snippet.spans.first().map(|span| span.start).unwrap_or(0);
    let window_start = snippet.text[..first_match]
        .char_indices()
        .rev()
        .nth(SNIPPET_CONTEXT_CHARS.saturating_sub(1))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut budget = width.max(1);
    let mut spans = Vec::new();
    if window_start > 0 {
        spans.push(Span::styled("…", Style::default().fg(MUTED)));
        budget = budget.saturating_sub(1);
    }

    let highlight = Style::default().fg(Color::Black).bg(MATCH_BG).add_modifier(Modifier::BOLD);
    let mut offset = 0;
    for segment in snippet.segments() {
        let seg_start = offset;
        offset += segment.text.len();
        if offset <= window_start || budget == 0 {
            continue;
        }
        let visible = &segment.text[window_start.saturating_sub(seg_start)..];
        let text: String =
            visible.chars().take(budget).map(|c| if c == '\n' { ' ' } else { c }).collect();
        budget = budget.saturating_sub(text.chars().count());

        let style = if segment.highlighted { highlight } else { Style::default().fg(BRIGHT) };
        spans.push(Span::styled(text, style));
    }

    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let base = Style::default().bg(SURFACE);

    let (status_text, style) = if let Some(msg) = state.status_message {
        let fg = match msg.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => ERROR_FG,
        };
        (format!(" {} ", msg.text), base.fg(fg))
    } else {
        let mut parts = vec![format!("{} messages", state.store.len())];
        match state.focus {
            Focus::Compose => {
                parts.push("Enter: send".to_string());
                parts.push("Ctrl+F: search".to_string());
                parts.push("↑↓: focus".to_string());
                parts.push("F1-F4: react".to_string());
                parts.push("Ctrl+Y: copy".to_string());
            }
            Focus::Search => {
                parts.push("Enter: jump".to_string());
                parts.push("↑↓: select".to_string());
                parts.push("Esc: clear/close".to_string());
                parts.push("Tab: chat".to_string());
            }
        }
        parts.push("Ctrl+C: quit".to_string());
        (format!(" {} ", parts.join(" | ")), base.fg(BRIGHT))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use chrono::Utc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::models::Reaction;
    use crate::search::Navigator;

    fn store() -> MessageStore {
        let mut store = MessageStore::new();
        store.append(Role::Assistant, "Hello! I'm your AI assistant.").unwrap();
        store.append(Role::User, "what is a qubit?").unwrap();
        store
            .append(Role::Assistant, "A qubit is the basic unit.\n```python\nprint('qubit')\n```")
            .unwrap();
        store
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(state: &RenderState, width: u16, height: u16) -> (Terminal<TestBackend>, Viewport) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut viewport = Viewport::default();
        terminal
            .draw(|f| {
                viewport = render_ui(f, state);
            })
            .unwrap();
        (terminal, viewport)
    }

    fn chat() -> ChatView {
        ChatView::new(Duration::from_millis(2000), Instant::now())
    }

    fn result(index: usize, text: &str, spans: Vec<std::ops::Range<usize>>) -> SearchResult {
        SearchResult {
            source_index: index,
            role: Role::User,
            snippet: Snippet::new(text.to_string(), spans),
            matched_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_chat_entries() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Compose,
            search: None,
            status_message: None,
        };

        let (terminal, _) = draw(&state, 100, 30);
        let text = buffer_text(&terminal);

        assert!(text.contains("what is a qubit?"));
        assert!(text.contains("┌ python"));
        assert!(text.contains("print('qubit')"));
        assert!(text.contains("3 messages"));
    }

    #[test]
    fn test_render_code_fence_markers_hidden() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Compose,
            search: None,
            status_message: None,
        };

        let (terminal, _) = draw(&state, 100, 30);
        assert!(!buffer_text(&terminal).contains("```"));
    }

    #[test]
    fn test_render_reaction_badges() {
        let store = store();
        let mut reactions = ReactionBoard::new();
        reactions.add(&store, 1, Reaction::Wave).unwrap();
        let chat = chat();
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Compose,
            search: None,
            status_message: None,
        };

        let (terminal, _) = draw(&state, 100, 30);
        assert!(buffer_text(&terminal).contains("🌊"));
    }

    #[test]
    fn test_render_emphasised_entry_background() {
        let store = store();
        let reactions = ReactionBoard::new();
        let mut chat = chat();
        chat.scroll_to_and_emphasize(1);

        let (lines, starts) = chat_lines(&store, &reactions, &chat, 80);
        let emphasised = &lines[starts[1]];
        assert_eq!(emphasised.style.bg, Some(EMPHASIS_BG));
        assert_eq!(lines[starts[0]].style.bg, None);
    }

    #[test]
    fn test_chat_line_starts_are_increasing() {
        let store = store();
        let reactions = ReactionBoard::new();
        let (lines, starts) = chat_lines(&store, &reactions, &chat(), 80);

        assert_eq!(starts.len(), 3);
        assert_eq!(starts[0], 0);
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        assert!(starts[2] < lines.len());
    }

    #[test]
    fn test_viewport_follows_latest() {
        let mut store = MessageStore::new();
        for i in 0..40 {
            store.append(Role::User, &format!("message number {}", i)).unwrap();
        }
        let reactions = ReactionBoard::new();
        let chat = chat();
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Compose,
            search: None,
            status_message: None,
        };

        let (terminal, viewport) = draw(&state, 80, 20);
        assert!(viewport.max_top > 0);
        assert_eq!(viewport.top, viewport.max_top);
        assert!(buffer_text(&terminal).contains("message number 39"));
    }

    #[test]
    fn test_render_search_placeholder() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let search_state =
            SearchState::Ready { query: "zzz".to_string(), results: Vec::new() };
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Search,
            search: Some(SearchPane {
                query: "zzz",
                state: &search_state,
                pending: false,
                selected: 0,
            }),
            status_message: None,
        };

        let (terminal, _) = draw(&state, 120, 30);
        let text = buffer_text(&terminal);
        assert!(text.contains(NO_MATCHES_PLACEHOLDER));
        assert_eq!(text.matches(NO_MATCHES_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_render_search_idle_hint() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Search,
            search: Some(SearchPane {
                query: "q",
                state: &SearchState::Idle,
                pending: false,
                selected: 0,
            }),
            status_message: None,
        };

        let (terminal, _) = draw(&state, 120, 30);
        let text = buffer_text(&terminal);
        assert!(text.contains("Type at least 2 characters"));
        assert!(!text.contains(NO_MATCHES_PLACEHOLDER));
    }

    #[test]
    fn test_render_search_results_meta() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let hit = result(1, "what is a qubit?", vec![10..15]);
        let clock = format_clock(&hit.matched_at.with_timezone(&Local));
        let search_state =
            SearchState::Ready { query: "qubit".to_string(), results: vec![hit] };
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "",
            focus: Focus::Search,
            search: Some(SearchPane {
                query: "qubit",
                state: &search_state,
                pending: false,
                selected: 0,
            }),
            status_message: None,
        };

        let (terminal, _) = draw(&state, 120, 30);
        let text = buffer_text(&terminal);
        assert!(text.contains("Results (1)"));
        assert!(text.contains(&format!("User • {}", clock)));
    }

    #[test]
    fn test_snippet_line_highlights_match() {
        let snippet = Snippet::new("what is a qubit?".to_string(), vec![10..15]);
        let line = snippet_line(&snippet, 80);

        let highlighted: Vec<&str> = line
            .spans
            .iter()
            .filter(|span| span.style.bg == Some(MATCH_BG))
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(highlighted, vec!["qubit"]);
    }

    #[test]
    fn test_snippet_line_skips_leading_context() {
        let text = format!("{}needle tail", "x".repeat(100));
        let snippet = Snippet::new(text, vec![100..106]);
        let line = snippet_line(&snippet, 80);

        assert_eq!(line.spans[0].content, "…");
        let rendered: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(rendered.contains("needle"));
        assert_eq!(rendered.chars().count(), 1 + SNIPPET_CONTEXT_CHARS + "needle tail".len());
    }

    #[test]
    fn test_snippet_line_flattens_newlines() {
        let snippet = Snippet::new("first\nsecond".to_string(), vec![6..12]);
        let line = snippet_line(&snippet, 80);
        let rendered: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rendered, "first second");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("", 4), vec![""]);
        assert_eq!(wrap("abc", 0), vec!["abc"]);
    }

    #[test]
    fn test_render_status_message() {
        let store = store();
        let reactions = ReactionBoard::new();
        let chat = chat();
        let status = StatusMessage {
            text: "✓ Copied to clipboard".to_string(),
            message_type: MessageType::Success,
            expires_at: Instant::now() + Duration::from_secs(3),
        };
        let state = RenderState {
            store: &store,
            reactions: &reactions,
            chat: &chat,
            compose_input: "typing",
            focus: Focus::Compose,
            search: None,
            status_message: Some(&status),
        };

        let (terminal, _) = draw(&state, 100, 30);
        let text = buffer_text(&terminal);
        assert!(text.contains("Copied to clipboard"));
        assert!(text.contains("typing"));
    }
}

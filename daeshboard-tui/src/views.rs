//! Rendering: tab headers, the selected tab's items and the help line.

use crate::notifier::PROGRAM_NAME;
use crate::theme::Theme;
use daeshboard_core::{DashboardState, TabId};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame,
};

/// Header label, `*` marking unread tabs.
pub fn tab_label(tab: TabId, count: usize, unread: bool) -> String {
    let notice = if unread { "*" } else { "" };
    format!("{notice}{} [{count}]", tab.title())
}

pub fn window_title(any_unread: bool) -> String {
    if any_unread {
        format!("● {PROGRAM_NAME}")
    } else {
        PROGRAM_NAME.to_string()
    }
}

pub fn help_line(tab_count: usize) -> String {
    format!(
        "<hjkl, wasd, arrows, 1..{tab_count}> MOVE    <enter, space> OPEN    <ctrl-r> REFRESH    <q> QUIT"
    )
}

pub fn render(f: &mut Frame<'_>, state: &DashboardState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_headers(f, state, theme, layout[0]);
    render_items(f, state, theme, layout[1]);
    render_help(f, state, theme, layout[2]);
}

fn render_headers(f: &mut Frame<'_>, state: &DashboardState, theme: &Theme, area: Rect) {
    let nav = state.nav();
    let selected = nav.selected_tab();
    let titles: Vec<Line> = state
        .tabs()
        .iter()
        .map(|tab| {
            let unread = nav.is_unread(tab, state.store());
            let label = tab_label(tab, state.snapshot(tab).len(), unread);
            Line::from(Span::styled(label, theme.tab_style(tab == selected, unread)))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(state.tabs().position(selected).unwrap_or(0))
        .highlight_style(theme.tab_style(true, false))
        .divider(Span::styled("|", Style::default().fg(theme.border)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().bg(theme.bg));
    f.render_widget(tabs, area);
}

fn render_items(f: &mut Frame<'_>, state: &DashboardState, theme: &Theme, area: Rect) {
    let tab = state.nav().selected_tab();
    let snapshot = state.snapshot(tab);
    let items: Vec<ListItem> = snapshot
        .items
        .iter()
        .map(|item| ListItem::new(Span::styled(item.value.clone(), Style::default().fg(theme.text))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focus))
                .title(Span::styled(tab.title(), Style::default().fg(theme.header_selected))),
        )
        .style(Style::default().bg(theme.bg))
        .highlight_style(theme.cursor_style());

    let mut list_state = ListState::default();
    if !snapshot.is_empty() {
        list_state.select(Some(state.nav().selected_item(tab)));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_help(f: &mut Frame<'_>, state: &DashboardState, theme: &Theme, area: Rect) {
    let help = Paragraph::new(help_line(state.tabs().len()))
        .style(Style::default().fg(theme.text_dim).bg(theme.bg));
    f.render_widget(help, area);
}

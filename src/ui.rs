//! Terminal drawing - renders a `RenderState` snapshot with ratatui

use ratatui::{prelude::*, widgets::*};

use crate::app::state::NoticeLevel;
use crate::backend::BackendStatus;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;

pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, chunks[0]);

    match state.screen {
        Screen::Home => draw_home(f, state, chunks[1]),
        Screen::Admin => draw_admin(f, state, chunks[1]),
        Screen::Work => match &state.active_category {
            Some(_) => draw_category_detail(f, state, chunks[1]),
            None => draw_category_picker(f, state, chunks[1]),
        },
    }

    draw_status_bar(f, state, chunks[2]);

    if state.show_help {
        draw_help_popup(f, area);
    }
    if state.notice.is_some() {
        draw_notice_popup(f, state, area);
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let screen = match state.screen {
        Screen::Home => "Home",
        Screen::Work => "Work",
        Screen::Admin => "Admin",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::raw(" "),
        Span::styled(screen, Style::default().fg(Color::Gray)),
        Span::styled(
            if state.is_loading { "  [...]" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let backend_color = match state.backend_status {
        BackendStatus::Local => Color::Green,
        BackendStatus::Remote { .. } => Color::Cyan,
        BackendStatus::Unconfigured => Color::Yellow,
    };

    let lines = vec![
        Line::from(Span::styled(APP_NAME, Style::default().bold())),
        Line::from(Span::styled("Choose where to go", Style::default().fg(Color::Gray))),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" w ", Style::default().fg(Color::Black).bg(Color::Yellow)),
            Span::raw("  Enter / work"),
        ]),
        Line::from(vec![
            Span::styled(" a ", Style::default().fg(Color::Black).bg(Color::Yellow)),
            Span::raw("  Manage categories"),
        ]),
        Line::raw(""),
        Line::from(Span::styled(
            state.backend_status.describe(),
            Style::default().fg(backend_color),
        )),
        Line::from(Span::styled(
            format!("v{}", APP_VERSION),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Home ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_admin(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    draw_input(
        f,
        chunks[0],
        " Add category (e=edit, Enter=add) ",
        &state.label_input,
        "e.g. \"Debts\" or \"Reports\"",
        editing,
    );

    let items: Vec<ListItem> = state
        .categories
        .iter()
        .map(|c| {
            let in_use = state.active_category.as_ref().map(|a| a.key == c.key).unwrap_or(false);
            let mut spans = vec![
                Span::styled(c.label.clone(), Style::default().bold()),
                Span::styled(format!("  {}", c.key), Style::default().fg(Color::DarkGray)),
            ];
            if in_use {
                spans.push(Span::styled("  (in use)", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(if editing { Style::default() } else { Style::default().fg(Color::Cyan) })
                .title(format!(" Categories ({}) - d:delete ", state.categories.len())),
        )
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.categories.is_empty() {
        list_state.select(Some(state.admin_cursor));
    }
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_category_picker(f: &mut Frame, state: &RenderState, area: Rect) {
    let items: Vec<ListItem> = state
        .categories
        .iter()
        .map(|c| ListItem::new(c.label.clone()))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Work - choose a category (Enter to open) ");

    if items.is_empty() {
        let empty = Paragraph::new("No categories. Add one from the admin screen.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(state.draft_index);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_category_detail(f: &mut Frame, state: &RenderState, area: Rect) {
    let label = state
        .active_category
        .as_ref()
        .map(|c| c.label.as_str())
        .unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    draw_input(
        f,
        chunks[0],
        " New item (e=edit, Enter=add) ",
        &state.title_input,
        &format!("Add an item to: {}", label),
        editing,
    );

    let title = format!(" Category: {} ({}) ", label, state.items.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing { Style::default() } else { Style::default().fg(Color::Cyan) })
        .title(title);

    if state.is_loading || state.items.is_empty() {
        let message = if state.is_loading { "Loading items..." } else { "No items yet." };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(paragraph, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = state
        .items
        .iter()
        .map(|item| {
            let (mark, style) = if item.completed {
                ("[x]", Style::default().fg(Color::DarkGray).crossed_out())
            } else {
                ("[ ]", Style::default())
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", mark)),
                Span::styled(item.title.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_item));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

/// Single-line text input with placeholder and cursor
fn draw_input(f: &mut Frame, area: Rect, title: &str, value: &str, placeholder: &str, editing: bool) {
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let text = if value.is_empty() && !editing {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string());
    f.render_widget(Paragraph::new(text).block(block), area);

    if editing {
        f.set_cursor_position(Position::new(input_cursor_x(area, value), area.y.saturating_add(1)));
    }
}

/// Column just past the typed text, kept inside the input's border
fn input_cursor_x(area: Rect, value: &str) -> u16 {
    let typed = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(typed).saturating_add(1).min(max_x)
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.input_mode == InputMode::Editing {
        " Enter:add | Esc:stop editing "
    } else {
        match state.screen {
            Screen::Home => " w:work | a:admin | ?:help | q:quit ",
            Screen::Admin => " e:add | ↑/↓:move | d:delete | h:home ",
            Screen::Work if state.active_category.is_some() => {
                " e:add | space:toggle | d:delete | r:reload | l:switch category | h:home "
            }
            Screen::Work => " ↑/↓:choose | Enter:open | h:home ",
        }
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_notice_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(notice) = &state.notice else {
        return;
    };
    let popup_area = centered_rect(60, 20, area);

    let (title, color) = match notice.level {
        NoticeLevel::Info => (" Notice ", Color::Cyan),
        NoticeLevel::Error => (" Error ", Color::Red),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_bottom(Line::from(" any key to dismiss ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let body = Paragraph::new(notice.message.as_str())
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(body, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 MY MISSION - Keyboard Shortcuts

 HOME
   w                  Work with a category
   a                  Manage categories

 WORK
   ↑ / ↓              Choose category / item
   Enter              Open category
   e                  Type a new item, Enter to add
   Space / t          Toggle item done
   d                  Delete item
   r                  Reload items
   l                  Switch category

 ADMIN
   e                  Type a new category, Enter to add
   d                  Delete category (not the one in use)

 GENERAL
   h / Esc            Back to home
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Notice;
    use crate::models::Category;
    use ratatui::backend::TestBackend;

    fn render(state: &RenderState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_picker_lists_categories() {
        let state = RenderState {
            screen: Screen::Work,
            ..RenderState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Reminders"));
        assert!(screen.contains("choose a category"));
    }

    #[test]
    fn test_detail_shows_empty_message_and_notice() {
        let state = RenderState {
            screen: Screen::Work,
            active_category: Some(Category::new("books", "Books")),
            notice: Some(Notice::error("permission denied")),
            ..RenderState::default()
        };
        let screen = render(&state);
        assert!(screen.contains("Category: Books"));
        assert!(screen.contains("No items yet."));
        assert!(screen.contains("permission denied"));
    }

    #[test]
    fn test_long_input_keeps_cursor_in_box() {
        let area = Rect::new(2, 5, 40, 3);
        assert_eq!(input_cursor_x(area, ""), 3);
        assert_eq!(input_cursor_x(area, "milk"), 7);
        assert_eq!(input_cursor_x(area, &"x".repeat(70_000)), 40);

        let state = RenderState {
            screen: Screen::Work,
            active_category: Some(Category::new("books", "Books")),
            input_mode: InputMode::Editing,
            title_input: "x".repeat(70_000),
            ..RenderState::default()
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, &state)).unwrap();
        assert!(terminal.get_cursor_position().unwrap().x < 80);
    }
}

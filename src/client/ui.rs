//! Renders the client's state to the terminal.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use crate::expense::ExpenseId;

use super::state::{App, Dialog, ExpenseForm, Field, NoticeKind};

const HELP_TEXT: &str = "a add · e edit · d delete · r refresh · q quit";

/// Draw one frame of the client.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(frame.size());

    draw_expense_table(frame, chunks[0], app);
    draw_status_bar(frame, chunks[1], app);

    match &app.dialog {
        Dialog::None => {}
        Dialog::Add { form } => draw_form_dialog(frame, "Add Expense", form),
        Dialog::Edit { id, form } => {
            draw_form_dialog(frame, &format!("Edit Expense #{id}"), form);
        }
        Dialog::ConfirmDelete { id } => draw_confirm_dialog(frame, *id),
    }
}

fn draw_expense_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let header = Row::new(["ID", "Description", "Amount", "Date"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .map(|expense| {
            Row::new([
                Cell::from(expense.id.to_string()),
                Cell::from(expense.description.clone()),
                Cell::from(format!("${:.2}", expense.amount)),
                Cell::from(expense.date.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Expenses"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, &mut app.table);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match &app.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            (notice.message.as_str(), Style::default().fg(color))
        }
        None => (HELP_TEXT, Style::default().fg(Color::DarkGray)),
    };

    let paragraph =
        Paragraph::new(Span::styled(text, style)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_form_dialog(frame: &mut Frame, title: &str, form: &ExpenseForm) {
    let area = centered_rect(frame.size(), 50, 9);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        field_line("Description", &form.description, form.focus == Field::Description),
        field_line("Amount", &form.amount, form.focus == Field::Amount),
        field_line("Date", &form.date, form.focus == Field::Date),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab next field · Enter save · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_owned()),
    );
    frame.render_widget(dialog, area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:<12}"), label_style),
        Span::raw(value),
    ])
}

fn draw_confirm_dialog(frame: &mut Frame, id: ExpenseId) {
    let area = centered_rect(frame.size(), 46, 5);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(format!("Delete expense #{id}? This cannot be undone.")),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/y confirm · Esc/n cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm Delete"),
    );
    frame.render_widget(dialog, area);
}

/// A `width` x `height` rectangle centered within `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod centered_rect_tests {
    use ratatui::layout::Rect;

    use super::centered_rect;

    #[test]
    fn centers_within_the_area() {
        let area = Rect::new(0, 0, 100, 40);

        let rect = centered_rect(area, 50, 10);

        assert_eq!(rect, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn clamps_to_small_areas() {
        let area = Rect::new(0, 0, 20, 4);

        let rect = centered_rect(area, 50, 10);

        assert_eq!(rect, Rect::new(0, 0, 20, 4));
    }
}

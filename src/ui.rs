use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};

use sv::record::{Field, Record};
use sv::sort::{SortDirection, parse_date};

use crate::model::{Model, UIData};

pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const STATUSLINE_HEIGHT: usize = 1;
pub const CMDLINE_HEIGHT: usize = 1;

/// Table columns in display order with their sort key.
const COLUMNS: [(Field, &str, char); 4] = [
    (Field::Name, "Name", '1'),
    (Field::Modified, "Modified", '2'),
    (Field::Created, "Created", '3'),
    (Field::CountryCheckSeverity, "Severity", '4'),
];

pub fn draw(model: &Model, frame: &mut Frame) {
    let uidata = model.get_uidata();
    let [table_area, status_area, cmd_area] = Layout::vertical([
        Constraint::Min(TABLE_HEADER_HEIGHT as u16 + 1),
        Constraint::Length(STATUSLINE_HEIGHT as u16),
        Constraint::Length(CMDLINE_HEIGHT as u16),
    ])
    .areas(frame.area());

    draw_table(&uidata, frame, table_area);
    draw_statusline(&uidata, frame, status_area);
    draw_cmdline(&uidata, frame, cmd_area);
}

/// "2016-07-19T10:01:51.008066Z" => "19.07.2016". Unparseable text is shown as is.
pub fn human_date(s: &str) -> String {
    parse_date(s)
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|_| s.to_string())
}

pub fn severity_style(record: &Record) -> Style {
    let color = match record.severity_label().as_str() {
        "critical" => Color::Red,
        "warning" => Color::Yellow,
        "ok" => Color::Green,
        _ => Color::DarkGray,
    };
    Style::default().fg(color)
}

fn header_label(uidata: &UIData, field: Field, title: &str, key: char) -> String {
    let marker = match (uidata.sort_field, uidata.sort_direction) {
        (Some(f), SortDirection::Ascending) if f == field => " ▲",
        (Some(f), SortDirection::Descending) if f == field => " ▼",
        _ => "",
    };
    format!("{title} [{key}]{marker}")
}

fn draw_table(uidata: &UIData, frame: &mut Frame, area: Rect) {
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(field, title, key)| Cell::from(header_label(uidata, *field, title, *key))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
    .height(TABLE_HEADER_HEIGHT as u16);

    let rows = uidata.rows.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.name.as_str()),
            Cell::from(human_date(&r.modified)),
            Cell::from(human_date(&r.created)),
            Cell::from(r.country_check_severity.as_str()).style(severity_style(r)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !uidata.rows.is_empty() {
        state.select(Some(uidata.selected_row));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_statusline(uidata: &UIData, frame: &mut Frame, area: Rect) {
    let name = if uidata.name_filter.is_empty() { "-" } else { uidata.name_filter };
    let line = Line::from(vec![
        Span::from(format!(" {}/{} rows ", uidata.rows.len(), uidata.total)).bold(),
        Span::from(format!("| name: {name} | severity: {} ", uidata.severity_filter)),
        Span::from(format!("| {} ", uidata.status_message)).dark_gray(),
    ]);
    frame.render_widget(Paragraph::new(line).reversed(), area);
}

fn draw_cmdline(uidata: &UIData, frame: &mut Frame, area: Rect) {
    if uidata.active_cmdinput {
        let text = format!("/{}", uidata.cmdinput.input);
        frame.render_widget(Paragraph::new(text), area);
        let x = area.x + 1 + uidata.cmdinput.curser_pos as u16;
        frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
    } else {
        frame.render_widget(Paragraph::new("/ to filter by name").dark_gray(), area);
    }
}

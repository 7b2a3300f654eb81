use gestao_core::{
    billing::MonthlySnapshot,
    schedule::{BIN_TYPES, BinDirection, WEEKDAYS},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let (month, year) = App::reference_month();
    let header = Paragraph::new(format!("gestao – painel de gestão · {month:02}/{year}"))
        .block(Block::default().borders(Borders::ALL).title("Gestao"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::Dashboard => draw_dashboard(frame, app, *content_area),
        Screen::Calendar => draw_calendar(frame, app, *content_area),
        Screen::Services => draw_services(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::Dashboard => "Tab/1-3 switch screen · r refresh · q/Ctrl-C quit",
        Screen::Calendar => "←/→ move day · Tab/1-3 switch screen · r refresh · q/Ctrl-C quit",
        Screen::Services => "↑/↓ move · Tab/1-3 switch screen · r refresh · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(snapshot) = &app.snapshot else {
        let placeholder = Paragraph::new("No data yet. Press r to load the monthly snapshot.")
            .block(Block::default().borders(Borders::ALL).title("Resumo mensal"))
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    };

    let rounded = snapshot.rounded();
    let tiles = tile_values(&rounded);

    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    for (chunk, (label, value, color)) in layout_chunks.iter().zip(tiles) {
        let tile = Paragraph::new(format!("\n{value} €"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(tile, *chunk);
    }
}

fn tile_values(snapshot: &MonthlySnapshot) -> [(&'static str, String, Color); 5] {
    [
        ("Faturado", snapshot.billed.to_string(), Color::Cyan),
        ("URSSAF", snapshot.urssaf.to_string(), Color::Magenta),
        ("Custos", snapshot.costs.to_string(), Color::Yellow),
        ("Bruto", snapshot.gross.to_string(), Color::Blue),
        ("Líquido", snapshot.net.to_string(), Color::Green),
    ]
}

fn draw_calendar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let [grid_area, legend_area] = rows.as_ref() else {
        return;
    };

    let legend = Paragraph::new(format!("Tipos: {}", BIN_TYPES.join(" · ")))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(legend, *legend_area);

    let layout_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(*grid_area);

    for (index, chunk) in layout_chunks.iter().enumerate() {
        let day = u8::try_from(index).unwrap_or(0);
        let day_title = WEEKDAYS.get(index).copied().unwrap_or("");

        let items: Vec<ListItem<'_>> = app
            .events_for_day(day)
            .into_iter()
            .map(|event| {
                let marker = match event.direction {
                    BinDirection::Out => "▲",
                    BinDirection::In => "▼",
                };
                let color = match event.direction {
                    BinDirection::Out => Color::Yellow,
                    BinDirection::In => Color::Green,
                };
                let line = format!(
                    "{} {marker} {} — {}",
                    event.time.format("%H:%M"),
                    event.title,
                    event.client_name
                );
                ListItem::new(line).style(Style::default().fg(color))
            })
            .collect();

        let border_style = if day == app.selected_day {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(day_title),
        );

        frame.render_widget(list, *chunk);
    }
}

fn draw_services(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items: Vec<ListItem<'_>> = if app.services.is_empty() {
        vec![ListItem::new("No services loaded. Press r to refresh.")]
    } else {
        app.services
            .iter()
            .map(|record| {
                let client = record
                    .client
                    .as_ref()
                    .map_or("<sem cliente>", |reference| reference.name.as_str());
                let category = record.category.as_deref().unwrap_or("-");
                let schedule = record.bins.rendered();
                let line = if schedule.is_empty() {
                    format!("{category} · {client}")
                } else {
                    format!("{category} · {client} · {schedule}")
                };
                ListItem::new(line)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Serviços (↑/↓)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.services.is_empty() {
        state.select(Some(app.service_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

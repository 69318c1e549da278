use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::{DragPayload, DragSource};
use crate::theme;

pub struct TemplateList;

impl TemplateList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        source: Option<&DragSource>,
        dragging: Option<&DragPayload>,
        focused: bool,
    ) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            theme::current().border
        };

        let block = Block::default()
            .title(" Drag Event ")
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(border_style);

        let Some(source) = source else {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No templates").style(theme::current().dim);
            frame.render_widget(msg, inner);
            return;
        };

        let inner_w = area.width.saturating_sub(4) as usize;
        let panel = source.panel();

        let mut items: Vec<ListItem> = panel
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let chip = format!("{:^width$}", truncate(&item.title, inner_w), width = inner_w);
                let style = if focused && i == panel.selected() {
                    theme::current().selected.add_modifier(Modifier::BOLD)
                } else {
                    theme::current().event
                };
                ListItem::new(vec![
                    Line::from(Span::styled(format!(" {} ", chip), style)),
                    Line::from(""),
                ])
            })
            .collect();

        if let Some(payload) = dragging {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(" \u{21b3} ", theme::current().dim),
                Span::styled(truncate(&payload.title, inner_w.saturating_sub(2)), theme::current().drag),
            ])));
        }

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

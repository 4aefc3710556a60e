use crate::app::{AppState, Confirmation};
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn modal_title(action: &Confirmation) -> &'static str {
    match action {
        Confirmation::DeleteTask(_) => " Delete Task ",
        Confirmation::DeleteHistoryEntry(_) => " Delete Session ",
        Confirmation::ClearAllData => " Clear All Data ",
    }
}

/// Render the y/n confirmation modal
pub fn render_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(modal) = &app.modal {
        let modal_area = create_modal_area(area);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let lines = vec![
            Line::raw(""),
            Line::raw(format!("  {}", modal.message)),
            Line::raw(""),
            Line::from(Span::styled("  This cannot be undone.", error_style())),
            Line::raw(""),
            Line::from(vec![
                Span::styled("  [y]", modal_title_style()),
                Span::raw(" Yes  "),
                Span::styled("[n]", modal_title_style()),
                Span::raw(" No"),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(modal_title(&modal.action), modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

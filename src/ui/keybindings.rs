use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("Space/s start/pause   "),
        Span::raw("x stop   "),
        Span::raw("Enter focus task   "),
        Span::raw("a add   "),
        Span::raw("d done   "),
        Span::raw("Del delete   "),
        Span::raw("m mode   "),
        Span::raw("g goal   "),
        Span::raw("e export   "),
        Span::raw("H drop last session   "),
        Span::raw("X clear all   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}

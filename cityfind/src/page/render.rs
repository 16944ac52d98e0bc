use crate::{autocomplete::dropdown::Dropdown, page::color_scheme::ColorScheme};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Borders, List, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub struct Render<'a> {
    input: &'a str,
    dropdown: &'a Dropdown,
    color_scheme: &'a ColorScheme,
}

impl<'a> Render<'a> {
    const INPUT_HEIGHT: u16 = 3;
    const INPUT_TITLE: &'static str = " query ";
    const DROPDOWN_TITLE: &'static str = " autocomplete ";
    const HIGHLIGHT_SYMBOL: &'static str = "> ";
    const NO_OPTIONS_TEXT: &'static str = "no suggestions";

    pub fn new(input: &'a str, dropdown: &'a Dropdown, color_scheme: &'a ColorScheme) -> Self {
        Self {
            input,
            dropdown,
            color_scheme,
        }
    }

    fn block(&self, title: &'static str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(self.color_scheme.title.style())
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.input)
            .style(self.color_scheme.input.style())
            .block(self.block(Self::INPUT_TITLE));
        // NOTE: the cursor sits after the last character, inside the left border
        let input_width = u16::try_from(self.input.width()).unwrap_or(u16::MAX);
        let max_x = area.right().saturating_sub(2);
        let cursor_x = area.x.saturating_add(1).saturating_add(input_width).min(max_x);

        frame.render_widget(paragraph, area);
        frame.set_cursor(cursor_x, area.y.saturating_add(1));
    }

    fn render_dropdown(&self, frame: &mut Frame, area: Rect) {
        if self.dropdown.is_empty() {
            let paragraph = Paragraph::new(Self::NO_OPTIONS_TEXT)
                .style(self.color_scheme.options.style())
                .block(self.block(Self::DROPDOWN_TITLE));

            frame.render_widget(paragraph, area);

            return;
        }

        let labels = self.dropdown.options().iter().map(|option| option.label().to_owned());
        let list = List::new(labels)
            .style(self.color_scheme.options.style())
            .highlight_style(self.color_scheme.selected.style())
            .highlight_symbol(Self::HIGHLIGHT_SYMBOL)
            .block(self.block(Self::DROPDOWN_TITLE));
        let mut list_state = ListState::default().with_selected(self.dropdown.selected_index());

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    pub fn render(&self, frame: &mut Frame) {
        let [input_area, dropdown_area] =
            Layout::vertical([Constraint::Length(Self::INPUT_HEIGHT), Constraint::Min(0)]).areas(frame.size());

        self.render_input(frame, input_area);
        self.render_dropdown(frame, dropdown_area);
    }
}

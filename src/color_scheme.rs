use ratatui::style::{Color, Modifier, Style};

/// Color scheme variants, cycled with `c`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSchemeId {
    Default = 0,
    Monochrome = 1,
    Ocean = 2,
    LightTerminal = 3,
}

impl ColorSchemeId {
    pub fn all() -> &'static [ColorSchemeId] {
        &[
            ColorSchemeId::Default,
            ColorSchemeId::Monochrome,
            ColorSchemeId::Ocean,
            ColorSchemeId::LightTerminal,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorSchemeId::Default => "Default",
            ColorSchemeId::Monochrome => "Monochrome",
            ColorSchemeId::Ocean => "Ocean",
            ColorSchemeId::LightTerminal => "Light Terminal",
        }
    }

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => ColorSchemeId::Default,
            1 => ColorSchemeId::Monochrome,
            2 => ColorSchemeId::Ocean,
            3 => ColorSchemeId::LightTerminal,
            _ => ColorSchemeId::Default,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index((*self as usize + 1) % Self::all().len())
    }
}

/// All configurable color slots used across the app
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub bg: Color,

    // Stats panel
    pub title: Color,
    pub label: Color,
    pub value: Color,
    pub upload: Color,
    pub download: Color,
    pub dim: Color,

    // Footer
    pub footer_key_fg: Color,
    pub footer_key_bg: Color,
    pub footer_label_fg: Color,
    pub footer_label_bg: Color,

    // Popups
    pub popup_border: Color,
    pub popup_bg: Color,
    pub popup_title: Color,
    pub popup_text: Color,
    pub popup_warning: Color,
}

impl ColorScheme {
    pub fn from_id(id: ColorSchemeId) -> Self {
        match id {
            ColorSchemeId::Default => Self::default_scheme(),
            ColorSchemeId::Monochrome => Self::monochrome(),
            ColorSchemeId::Ocean => Self::ocean(),
            ColorSchemeId::LightTerminal => Self::light_terminal(),
        }
    }

    fn default_scheme() -> Self {
        Self {
            bg: Color::Reset,

            title: Color::Cyan,
            label: Color::White,
            value: Color::Cyan,
            upload: Color::Red,
            download: Color::Green,
            dim: Color::DarkGray,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::Cyan,
            footer_label_fg: Color::Indexed(252),
            footer_label_bg: Color::Indexed(234),

            popup_border: Color::Cyan,
            popup_bg: Color::Black,
            popup_title: Color::Yellow,
            popup_text: Color::White,
            popup_warning: Color::Red,
        }
    }

    fn monochrome() -> Self {
        Self {
            bg: Color::Reset,

            title: Color::White,
            label: Color::White,
            value: Color::White,
            upload: Color::White,
            download: Color::White,
            dim: Color::Gray,

            footer_key_fg: Color::Black,
            footer_key_bg: Color::White,
            footer_label_fg: Color::White,
            footer_label_bg: Color::Reset,

            popup_border: Color::White,
            popup_bg: Color::Reset,
            popup_title: Color::White,
            popup_text: Color::White,
            popup_warning: Color::White,
        }
    }

    fn ocean() -> Self {
        Self {
            bg: Color::Indexed(17),

            title: Color::Indexed(51),
            label: Color::Indexed(252),
            value: Color::Indexed(117),
            upload: Color::Indexed(213),
            download: Color::Indexed(86),
            dim: Color::Indexed(67),

            footer_key_fg: Color::Black,
            footer_key_bg: Color::Indexed(51),
            footer_label_fg: Color::Indexed(252),
            footer_label_bg: Color::Indexed(18),

            popup_border: Color::Indexed(51),
            popup_bg: Color::Indexed(17),
            popup_title: Color::Indexed(226),
            popup_text: Color::Indexed(252),
            popup_warning: Color::Indexed(203),
        }
    }

    fn light_terminal() -> Self {
        Self {
            bg: Color::Reset,

            title: Color::Blue,
            label: Color::Black,
            value: Color::Blue,
            upload: Color::Red,
            download: Color::Indexed(28),
            dim: Color::Gray,

            footer_key_fg: Color::White,
            footer_key_bg: Color::Blue,
            footer_label_fg: Color::Black,
            footer_label_bg: Color::Indexed(253),

            popup_border: Color::Blue,
            popup_bg: Color::White,
            popup_title: Color::Blue,
            popup_text: Color::Black,
            popup_warning: Color::Red,
        }
    }

    // ── Convenience style builders ──────────────────────────────────────

    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::default().fg(self.label)
    }

    pub fn value_style(&self) -> Style {
        Style::default().fg(self.value).add_modifier(Modifier::BOLD)
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default()
            .fg(self.footer_key_fg)
            .bg(self.footer_key_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_label_style(&self) -> Style {
        Style::default().fg(self.footer_label_fg).bg(self.footer_label_bg)
    }

    pub fn popup_style(&self) -> Style {
        Style::default().fg(self.popup_text).bg(self.popup_bg)
    }
}

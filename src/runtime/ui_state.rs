use crate::catalog::PlaylistId;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// ANSI colour used for headings and the now-playing marker.
    fn accent(self) -> &'static str {
        match self {
            Theme::Light => "\x1b[34m",
            Theme::Dark => "\x1b[36m",
        }
    }

    pub fn paint(self, text: &str) -> String {
        format!("{}{text}\x1b[0m", self.accent())
    }
}

/// Where the session's listing comes from.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ListingSource {
    #[default]
    Library,
    Playlist(PlaylistId),
}

/// Presentation state owned by the shell.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub theme: Theme,
    pub source: ListingSource,
    /// Title filter applied to the library listing.
    pub filter: Option<String>,
}

impl UiState {
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn show_library(&mut self, filter: Option<String>) {
        self.source = ListingSource::Library;
        self.filter = filter.filter(|f| !f.trim().is_empty());
    }

    pub fn show_playlist(&mut self, id: PlaylistId) {
        self.source = ListingSource::Playlist(id);
        self.filter = None;
    }
}

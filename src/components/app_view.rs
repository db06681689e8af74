//! Defines the shared application view state.

use crate::catalog::Content;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppView {
    Home,
    Movies,
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::Home => "Home",
        AppView::Movies => "Movies",
    }
}

/// At most one dialog is open over the browse pages.
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveModal {
    Details(Content),
    Search,
    AiStudio,
    AiSettings,
    Profile,
}

impl ActiveModal {
    pub fn title(&self, search_query: &str) -> String {
        match self {
            Self::Details(_) => "Details".to_string(),
            Self::Search => format!("Gemini Results for: \"{search_query}\""),
            Self::AiStudio => "SeikoYT AI Studio".to_string(),
            Self::AiSettings => "AI Settings".to_string(),
            Self::Profile => "Edit Profile".to_string(),
        }
    }
}

//! The components module contains all screens and shared widgets for the app.

mod ai_studio;
mod app;
mod app_view;
mod browse;
mod chatbot;
mod header;
mod icons;
mod login;
mod modal;
mod navigation;
mod profile_setup;
mod search_results;
mod video_player;

pub use ai_studio::*;
pub use app::*;
pub use app_view::*;
pub use browse::*;
pub use chatbot::*;
pub use header::*;
pub use icons::*;
pub use login::*;
pub use modal::*;
pub use navigation::*;
pub use profile_setup::*;
pub use search_results::*;
pub use video_player::*;

pub mod gemini;
pub mod models;

pub use gemini::{
    edit_image, generate_image, generate_profile_picture, search_with_sources, send_chat_message,
    warn_if_unconfigured,
};
pub use models::*;

//! Video playback: time base, control auto-hide, directives and the bindings
//! to the host's `<video>` element.

pub mod clock;
pub mod controller;
pub mod element;
pub mod timer;
pub mod visibility;

pub use clock::format_time;
pub use controller::{PlaybackController, PLAYBACK_RATES};
pub use element::{
    request_fullscreen_change, sample_captions_data_url, MediaSubscription, VideoHandle,
    PLAYER_CONTAINER_ID, VIDEO_ELEMENT_ID,
};
pub use timer::IdleTimer;
pub use visibility::{ControlsVisibility, CONTROLS_IDLE_TIMEOUT};

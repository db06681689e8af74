//! Playback intent state and the directives it issues to the media element.
//!
//! Directives update the intent fields optimistically; native media events are
//! applied afterwards through [`PlaybackController::apply_event`] and always win.

use super::clock::MediaClock;

pub const PLAYBACK_RATES: [PlaybackRate; 4] = [
    PlaybackRate::Half,
    PlaybackRate::Normal,
    PlaybackRate::OneAndHalf,
    PlaybackRate::Double,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackRate {
    Half,
    #[default]
    Normal,
    OneAndHalf,
    Double,
}

impl PlaybackRate {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Half => 0.5,
            Self::Normal => 1.0,
            Self::OneAndHalf => 1.5,
            Self::Double => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Half => "0.5x",
            Self::Normal => "1x",
            Self::OneAndHalf => "1.5x",
            Self::Double => "2x",
        }
    }

    /// Maps a native `playbackRate` back onto the supported set.
    pub fn from_f64(rate: f64) -> Option<Self> {
        PLAYBACK_RATES
            .into_iter()
            .find(|candidate| (candidate.as_f64() - rate).abs() < 1e-6)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
    #[default]
    Hidden,
    Showing,
}

impl TrackMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Showing,
            Self::Showing => Self::Hidden,
        }
    }
}

/// Native lifecycle notifications, the authority over intent state.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeUpdate(f64),
    LoadedMetadata { duration: f64, has_caption_track: bool },
    /// Duration revised after metadata, e.g. by a growing stream.
    DurationChange(f64),
    Play,
    Pause,
    Ended,
    VolumeChange(f64),
    RateChange(f64),
    FullscreenChange(bool),
}

/// The environment-provided playable video. Commands are fire-and-forget;
/// their outcome comes back as [`MediaEvent`]s.
pub trait MediaElement {
    /// Starts or resumes playback. Implementations log a rejected start rather
    /// than reporting it; the next native event reconciles the phase.
    fn play(&self);
    fn pause(&self);
    fn seek(&self, seconds: f64);
    fn set_volume(&self, volume: f64);
    fn set_playback_rate(&self, rate: f64);
    /// Mode of the first caption track, `None` when the source has none.
    fn caption_track_mode(&self) -> Option<TrackMode>;
    fn set_caption_track_mode(&self, mode: TrackMode);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    source_url: String,
    clock: MediaClock,
    phase: PlaybackPhase,
    volume: f64,
    rate: PlaybackRate,
    subtitles_visible: bool,
    speed_menu_open: bool,
    fullscreen: bool,
    notice: Option<String>,
}

impl PlaybackController {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            clock: MediaClock::new(),
            // Opening a source always attempts autoplay.
            phase: PlaybackPhase::Playing,
            volume: 1.0,
            rate: PlaybackRate::Normal,
            subtitles_visible: false,
            speed_menu_open: false,
            fullscreen: false,
            notice: None,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn clock(&self) -> &MediaClock {
        &self.clock
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn playback_rate(&self) -> PlaybackRate {
        self.rate
    }

    pub fn subtitles_visible(&self) -> bool {
        self.subtitles_visible
    }

    pub fn speed_menu_open(&self) -> bool {
        self.speed_menu_open
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Points the session at a new source and attempts autoplay. The element is
    /// expected to have been handed the URL already.
    pub fn load_source(&mut self, source_url: impl Into<String>, element: &impl MediaElement) {
        self.source_url = source_url.into();
        self.clock.reset();
        self.subtitles_visible = false;
        self.phase = PlaybackPhase::Playing;
        element.set_volume(self.volume);
        element.set_playback_rate(self.rate.as_f64());
        element.play();
    }

    pub fn toggle_play_pause(&mut self, element: &impl MediaElement) {
        match self.phase {
            PlaybackPhase::Playing => {
                self.phase = PlaybackPhase::Paused;
                element.pause();
            }
            PlaybackPhase::Paused => {
                self.phase = PlaybackPhase::Playing;
                element.play();
            }
        }
    }

    /// Seeks to `percent` of the duration. Returns `false` (and does nothing)
    /// while the duration is unknown.
    pub fn scrub(&mut self, percent: f64, element: &impl MediaElement) -> bool {
        let Some(target) = self.clock.scrub_target(percent) else {
            return false;
        };
        element.seek(target);
        self.clock.on_time_update(target);
        true
    }

    pub fn set_volume(&mut self, volume: f64, element: &impl MediaElement) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        element.set_volume(self.volume);
    }

    pub fn toggle_mute(&mut self, element: &impl MediaElement) {
        let target = if self.volume > 0.0 { 0.0 } else { 1.0 };
        self.set_volume(target, element);
    }

    pub fn toggle_speed_menu(&mut self) {
        self.speed_menu_open = !self.speed_menu_open;
    }

    pub fn set_playback_rate(&mut self, rate: PlaybackRate, element: &impl MediaElement) {
        self.rate = rate;
        element.set_playback_rate(rate.as_f64());
        self.speed_menu_open = false;
    }

    /// Flips the caption track between hidden and showing. Returns `false`
    /// without touching anything when the source has no track.
    pub fn toggle_subtitles(&mut self, element: &impl MediaElement) -> bool {
        let Some(mode) = element.caption_track_mode() else {
            return false;
        };
        let next = mode.toggled();
        element.set_caption_track_mode(next);
        self.subtitles_visible = next == TrackMode::Showing;
        true
    }

    pub fn fullscreen_request(&self) -> FullscreenRequest {
        if self.fullscreen {
            FullscreenRequest::Exit
        } else {
            FullscreenRequest::Enter
        }
    }

    /// Records the outcome of a fullscreen toggle. A denial becomes a notice
    /// the shell shows until dismissed.
    pub fn on_fullscreen_result(&mut self, result: Result<bool, String>) {
        match result {
            Ok(fullscreen) => {
                self.fullscreen = fullscreen;
                self.notice = None;
            }
            Err(message) => {
                tracing::warn!("fullscreen request denied: {message}");
                self.notice = Some(format!(
                    "Error attempting to enable full-screen mode: {message}"
                ));
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn apply_event(&mut self, event: MediaEvent, element: &impl MediaElement) {
        match event {
            MediaEvent::TimeUpdate(seconds) => self.clock.on_time_update(seconds),
            MediaEvent::LoadedMetadata {
                duration,
                has_caption_track,
            } => {
                self.clock.on_loaded_metadata(duration);
                if has_caption_track {
                    element.set_caption_track_mode(TrackMode::Hidden);
                }
                self.subtitles_visible = false;
            }
            MediaEvent::DurationChange(duration) => self.clock.on_loaded_metadata(duration),
            MediaEvent::Play => self.phase = PlaybackPhase::Playing,
            MediaEvent::Pause | MediaEvent::Ended => self.phase = PlaybackPhase::Paused,
            MediaEvent::VolumeChange(volume) => {
                if volume.is_finite() {
                    self.volume = volume.clamp(0.0, 1.0);
                }
            }
            MediaEvent::RateChange(rate) => {
                if let Some(rate) = PlaybackRate::from_f64(rate) {
                    self.rate = rate;
                }
            }
            MediaEvent::FullscreenChange(fullscreen) => self.fullscreen = fullscreen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Command {
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
        Rate(f64),
        TrackMode(TrackMode),
    }

    #[derive(Default)]
    struct RecordingElement {
        commands: RefCell<Vec<Command>>,
        track: RefCell<Option<TrackMode>>,
    }

    impl RecordingElement {
        fn with_track(mode: TrackMode) -> Self {
            Self {
                commands: RefCell::default(),
                track: RefCell::new(Some(mode)),
            }
        }

        fn take(&self) -> Vec<Command> {
            std::mem::take(&mut *self.commands.borrow_mut())
        }
    }

    impl MediaElement for RecordingElement {
        fn play(&self) {
            self.commands.borrow_mut().push(Command::Play);
        }
        fn pause(&self) {
            self.commands.borrow_mut().push(Command::Pause);
        }
        fn seek(&self, seconds: f64) {
            self.commands.borrow_mut().push(Command::Seek(seconds));
        }
        fn set_volume(&self, volume: f64) {
            self.commands.borrow_mut().push(Command::Volume(volume));
        }
        fn set_playback_rate(&self, rate: f64) {
            self.commands.borrow_mut().push(Command::Rate(rate));
        }
        fn caption_track_mode(&self) -> Option<TrackMode> {
            *self.track.borrow()
        }
        fn set_caption_track_mode(&self, mode: TrackMode) {
            if let Some(track) = self.track.borrow_mut().as_mut() {
                *track = mode;
            }
            self.commands.borrow_mut().push(Command::TrackMode(mode));
        }
    }

    fn opened(duration: f64, element: &RecordingElement) -> PlaybackController {
        let mut controller = PlaybackController::new("");
        controller.load_source("https://cdn.example/movie.mp4", element);
        controller.apply_event(
            MediaEvent::LoadedMetadata {
                duration,
                has_caption_track: element.caption_track_mode().is_some(),
            },
            element,
        );
        element.take();
        controller
    }

    #[test]
    fn opening_a_source_attempts_autoplay() {
        let element = RecordingElement::default();
        let mut controller = PlaybackController::new("a.mp4");
        controller.load_source("b.mp4", &element);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
        assert_eq!(controller.source_url(), "b.mp4");
        assert_eq!(element.take().last(), Some(&Command::Play));
    }

    #[test]
    fn scripted_session_from_open_to_speed_change() {
        let element = RecordingElement::default();
        let mut controller = opened(120.0, &element);

        assert!(controller.scrub(50.0, &element));
        assert_eq!(controller.clock().current_time(), 60.0);
        assert_eq!(element.take(), vec![Command::Seek(60.0)]);

        controller.toggle_play_pause(&element);
        assert_eq!(controller.phase(), PlaybackPhase::Paused);
        assert_eq!(element.take(), vec![Command::Pause]);

        controller.toggle_speed_menu();
        assert!(controller.speed_menu_open());
        controller.set_playback_rate(PlaybackRate::Double, &element);
        assert_eq!(controller.playback_rate(), PlaybackRate::Double);
        assert!(!controller.speed_menu_open());
        assert_eq!(element.take(), vec![Command::Rate(2.0)]);

        // Time keeps coming from the element; nothing is computed from the rate.
        controller.apply_event(MediaEvent::TimeUpdate(64.0), &element);
        assert_eq!(controller.clock().current_time(), 64.0);
    }

    #[test]
    fn scrub_is_exact_across_the_range() {
        let element = RecordingElement::default();
        let mut controller = opened(90.0, &element);
        for percent in [0.0, 12.5, 33.0, 50.0, 99.0, 100.0] {
            assert!(controller.scrub(percent, &element));
            let expected = percent / 100.0 * 90.0;
            assert!((controller.clock().current_time() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn scrub_before_metadata_is_a_no_op() {
        let element = RecordingElement::default();
        let mut controller = PlaybackController::new("movie.mp4");
        assert!(!controller.scrub(40.0, &element));
        assert!(element.take().is_empty());
        assert_eq!(controller.clock().current_time(), 0.0);
    }

    #[test]
    fn volume_is_clamped_and_mute_restores_full_volume() {
        let element = RecordingElement::default();
        let mut controller = PlaybackController::new("movie.mp4");

        controller.set_volume(1.7, &element);
        assert_eq!(controller.volume(), 1.0);
        controller.set_volume(-0.2, &element);
        assert_eq!(controller.volume(), 0.0);
        controller.set_volume(f64::NAN, &element);
        assert_eq!(controller.volume(), 0.0);

        controller.set_volume(0.0, &element);
        controller.set_volume(1.0, &element);
        assert_eq!(controller.volume(), 1.0);

        element.take();
        controller.toggle_mute(&element);
        assert_eq!(controller.volume(), 0.0);
        controller.toggle_mute(&element);
        assert_eq!(controller.volume(), 1.0);
        assert_eq!(element.take(), vec![Command::Volume(0.0), Command::Volume(1.0)]);
    }

    #[test]
    fn subtitle_toggle_twice_restores_the_track_mode() {
        let element = RecordingElement::with_track(TrackMode::Showing);
        let mut controller = opened(60.0, &element);
        // Metadata load forces the track hidden.
        assert_eq!(element.caption_track_mode(), Some(TrackMode::Hidden));
        assert!(!controller.subtitles_visible());

        assert!(controller.toggle_subtitles(&element));
        assert!(controller.subtitles_visible());
        assert_eq!(element.caption_track_mode(), Some(TrackMode::Showing));

        assert!(controller.toggle_subtitles(&element));
        assert!(!controller.subtitles_visible());
        assert_eq!(element.caption_track_mode(), Some(TrackMode::Hidden));
    }

    #[test]
    fn duration_revision_keeps_subtitles_on() {
        let element = RecordingElement::with_track(TrackMode::Hidden);
        let mut controller = opened(60.0, &element);
        assert!(controller.toggle_subtitles(&element));
        element.take();

        controller.apply_event(MediaEvent::DurationChange(60.5), &element);
        assert_eq!(controller.clock().duration(), 60.5);
        assert!(controller.subtitles_visible());
        assert_eq!(element.caption_track_mode(), Some(TrackMode::Showing));
        assert!(element.take().is_empty());
    }

    #[test]
    fn subtitle_toggle_without_track_changes_nothing() {
        let element = RecordingElement::default();
        let mut controller = opened(60.0, &element);
        assert!(!controller.toggle_subtitles(&element));
        assert!(!controller.subtitles_visible());
        assert!(element.take().is_empty());
    }

    #[test]
    fn native_events_override_intent() {
        let element = RecordingElement::default();
        let mut controller = opened(60.0, &element);
        assert!(controller.is_playing());

        controller.apply_event(MediaEvent::Pause, &element);
        assert_eq!(controller.phase(), PlaybackPhase::Paused);
        controller.apply_event(MediaEvent::Play, &element);
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
        controller.apply_event(MediaEvent::Ended, &element);
        assert_eq!(controller.phase(), PlaybackPhase::Paused);

        controller.apply_event(MediaEvent::VolumeChange(0.25), &element);
        assert_eq!(controller.volume(), 0.25);
        controller.apply_event(MediaEvent::RateChange(1.5), &element);
        assert_eq!(controller.playback_rate(), PlaybackRate::OneAndHalf);
        controller.apply_event(MediaEvent::RateChange(3.0), &element);
        assert_eq!(controller.playback_rate(), PlaybackRate::OneAndHalf);
    }

    #[test]
    fn rejected_autoplay_keeps_optimistic_phase_until_reconciled() {
        let element = RecordingElement::default();
        let mut controller = opened(60.0, &element);
        // A blocked start produces no native event, so intent still reads "playing".
        assert!(controller.is_playing());
        controller.apply_event(MediaEvent::Pause, &element);
        assert!(!controller.is_playing());
    }

    #[test]
    fn fullscreen_denial_is_surfaced() {
        let mut controller = PlaybackController::new("movie.mp4");
        assert_eq!(controller.fullscreen_request(), FullscreenRequest::Enter);

        controller.on_fullscreen_result(Err("Permissions check failed (TypeError)".into()));
        assert!(!controller.is_fullscreen());
        assert_eq!(
            controller.notice(),
            Some("Error attempting to enable full-screen mode: Permissions check failed (TypeError)")
        );

        controller.on_fullscreen_result(Ok(true));
        assert!(controller.is_fullscreen());
        assert_eq!(controller.notice(), None);
        assert_eq!(controller.fullscreen_request(), FullscreenRequest::Exit);
    }

    #[test]
    fn rates_round_trip_through_native_values() {
        for rate in PLAYBACK_RATES {
            assert_eq!(PlaybackRate::from_f64(rate.as_f64()), Some(rate));
        }
        assert_eq!(PlaybackRate::from_f64(0.75), None);
    }
}

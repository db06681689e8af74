//! Bindings from [`MediaElement`] to the real `<video>` element.
//!
//! On wasm the element is driven directly through `web_sys` and native DOM
//! listeners. Desktop webviews have no direct DOM access from Rust, so there a
//! small JavaScript bridge receives JSON commands and is polled for snapshots.

use super::controller::{FullscreenRequest, MediaElement, MediaEvent, TrackMode};
use dioxus::prelude::*;
use serde::Deserialize;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlVideoElement, TextTrack, TextTrackMode};

#[cfg(not(target_arch = "wasm32"))]
use dioxus::core::{Runtime, Task};
#[cfg(not(target_arch = "wasm32"))]
use std::{cell::RefCell, rc::Rc};

pub const VIDEO_ELEMENT_ID: &str = "seikoyt-video";
pub const PLAYER_CONTAINER_ID: &str = "seikoyt-player";

#[cfg(target_arch = "wasm32")]
const MEDIA_EVENT_NAMES: [&str; 8] = [
    "timeupdate",
    "loadedmetadata",
    "durationchange",
    "play",
    "pause",
    "ended",
    "volumechange",
    "ratechange",
];

#[cfg(not(target_arch = "wasm32"))]
const SNAPSHOT_POLL_MS: u64 = 200;

const SAMPLE_CAPTIONS_VTT: &str = "WEBVTT

00:00:01.000 --> 00:00:04.003
This is a sample subtitle for demonstration.

00:00:05.000 --> 00:00:09.000
Playback speed and subtitles are now fully functional.
";

/// Inline WebVTT payload attached to every source as its caption track.
pub fn sample_captions_data_url() -> String {
    use base64::Engine;
    format!(
        "data:text/vtt;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(SAMPLE_CAPTIONS_VTT)
    )
}

#[derive(Debug, Deserialize)]
struct FullscreenOutcome {
    ok: bool,
    #[serde(default)]
    fullscreen: bool,
    #[serde(default)]
    message: String,
}

/// Enters or leaves fullscreen on the player container. `Ok` carries the
/// resulting fullscreen state, `Err` the environment's refusal.
pub async fn request_fullscreen_change(
    container_id: &str,
    request: FullscreenRequest,
) -> Result<bool, String> {
    let enter = matches!(request, FullscreenRequest::Enter);
    let script = format!(
        r#"return await (async () => {{
            try {{
                if ({enter}) {{
                    const el = document.getElementById("{container_id}");
                    if (!el) return {{ ok: false, message: "player container is not mounted" }};
                    await el.requestFullscreen();
                    return {{ ok: true, fullscreen: true }};
                }}
                if (document.fullscreenElement) {{
                    await document.exitFullscreen();
                }}
                return {{ ok: true, fullscreen: false }};
            }} catch (err) {{
                return {{ ok: false, message: `${{err.message}} (${{err.name}})` }};
            }}
        }})();"#
    );
    match document::eval(&script).join::<FullscreenOutcome>().await {
        Ok(outcome) if outcome.ok => Ok(outcome.fullscreen),
        Ok(outcome) => Err(outcome.message),
        Err(err) => Err(format!("{err:?}")),
    }
}

// ---------------------------------------------------------------------------
// wasm: direct DOM access
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
#[derive(Clone)]
pub struct VideoHandle {
    video: HtmlVideoElement,
}

#[cfg(target_arch = "wasm32")]
impl VideoHandle {
    pub fn attach(element_id: &str) -> Option<Self> {
        let document = window()?.document()?;
        let video = document
            .get_element_by_id(element_id)?
            .dyn_into::<HtmlVideoElement>()
            .ok()?;
        Some(Self { video })
    }

    fn first_track(&self) -> Option<TextTrack> {
        first_track(&self.video)
    }
}

#[cfg(target_arch = "wasm32")]
fn first_track(video: &HtmlVideoElement) -> Option<TextTrack> {
    let tracks = video.text_tracks()?;
    if tracks.length() == 0 {
        return None;
    }
    tracks.get(0)
}

#[cfg(target_arch = "wasm32")]
fn describe_js_error(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return format!("{} ({})", String::from(error.message()), String::from(error.name()));
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[cfg(target_arch = "wasm32")]
impl MediaElement for VideoHandle {
    fn play(&self) {
        match self.video.play() {
            Ok(promise) => {
                spawn(async move {
                    if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                        tracing::warn!("autoplay prevented: {}", describe_js_error(&err));
                    }
                });
            }
            Err(err) => tracing::warn!("play() threw: {}", describe_js_error(&err)),
        }
    }

    fn pause(&self) {
        if let Err(err) = self.video.pause() {
            tracing::warn!("pause() threw: {}", describe_js_error(&err));
        }
    }

    fn seek(&self, seconds: f64) {
        self.video.set_current_time(seconds.max(0.0));
    }

    fn set_volume(&self, volume: f64) {
        self.video.set_volume(volume.clamp(0.0, 1.0));
    }

    fn set_playback_rate(&self, rate: f64) {
        self.video.set_playback_rate(rate);
    }

    fn caption_track_mode(&self) -> Option<TrackMode> {
        let track = self.first_track()?;
        Some(match track.mode() {
            TextTrackMode::Showing => TrackMode::Showing,
            _ => TrackMode::Hidden,
        })
    }

    fn set_caption_track_mode(&self, mode: TrackMode) {
        if let Some(track) = self.first_track() {
            track.set_mode(match mode {
                TrackMode::Showing => TextTrackMode::Showing,
                TrackMode::Hidden => TextTrackMode::Hidden,
            });
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn read_event(name: &str, video: &HtmlVideoElement) -> Option<MediaEvent> {
    Some(match name {
        "timeupdate" => MediaEvent::TimeUpdate(video.current_time()),
        "loadedmetadata" => MediaEvent::LoadedMetadata {
            duration: video.duration(),
            has_caption_track: first_track(video).is_some(),
        },
        "durationchange" => MediaEvent::DurationChange(video.duration()),
        "play" => MediaEvent::Play,
        "pause" => MediaEvent::Pause,
        "ended" => MediaEvent::Ended,
        "volumechange" => MediaEvent::VolumeChange(video.volume()),
        "ratechange" => MediaEvent::RateChange(video.playback_rate()),
        _ => return None,
    })
}

/// Live listeners on one video element. Detaching (or dropping) removes every
/// listener so no callback can reach a closed session.
#[cfg(target_arch = "wasm32")]
pub struct MediaSubscription {
    video: HtmlVideoElement,
    listeners: Vec<(&'static str, Closure<dyn FnMut()>)>,
    fullscreen_listener: Option<Closure<dyn FnMut()>>,
}

#[cfg(target_arch = "wasm32")]
impl MediaSubscription {
    pub fn subscribe<F>(handle: &VideoHandle, on_event: F) -> Self
    where
        F: FnMut(MediaEvent) + 'static,
    {
        let runtime = Runtime::current();
        let on_event = Rc::new(RefCell::new(on_event));
        let mut listeners = Vec::with_capacity(MEDIA_EVENT_NAMES.len());

        for name in MEDIA_EVENT_NAMES {
            let video = handle.video.clone();
            let runtime = runtime.clone();
            let on_event = on_event.clone();
            let callback = Closure::wrap(Box::new(move || {
                let _guard = RuntimeGuard::new(runtime.clone());
                if let Some(event) = read_event(name, &video) {
                    (on_event.borrow_mut())(event);
                }
            }) as Box<dyn FnMut()>);
            let _ = handle
                .video
                .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
            listeners.push((name, callback));
        }

        let fullscreen_listener = window().and_then(|w| w.document()).map(|doc| {
            let runtime = runtime.clone();
            let on_event = on_event.clone();
            let watched = doc.clone();
            let callback = Closure::wrap(Box::new(move || {
                let _guard = RuntimeGuard::new(runtime.clone());
                let fullscreen = watched.fullscreen_element().is_some();
                (on_event.borrow_mut())(MediaEvent::FullscreenChange(fullscreen));
            }) as Box<dyn FnMut()>);
            let _ = doc.add_event_listener_with_callback(
                "fullscreenchange",
                callback.as_ref().unchecked_ref(),
            );
            callback
        });

        // Metadata may already be in before the listeners were attached.
        if handle.video.ready_state() >= 1 {
            if let Some(event) = read_event("loadedmetadata", &handle.video) {
                (on_event.borrow_mut())(event);
            }
        }

        Self {
            video: handle.video.clone(),
            listeners,
            fullscreen_listener,
        }
    }

    pub fn detach(&mut self) {
        for (name, callback) in self.listeners.drain(..) {
            let _ = self
                .video
                .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref());
        }
        if let Some(callback) = self.fullscreen_listener.take() {
            if let Some(doc) = window().and_then(|w| w.document()) {
                let _ = doc.remove_event_listener_with_callback(
                    "fullscreenchange",
                    callback.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for MediaSubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

// ---------------------------------------------------------------------------
// desktop: JavaScript bridge inside the webview
// ---------------------------------------------------------------------------

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_VIDEO_BRIDGE_JS: &str = r#"
(() => {
  if (window.__seikoytVideoBridge) {
    return true;
  }

  const video = (id) => document.getElementById(id);
  let lastPlayError = null;

  const firstTrack = (el) =>
    el && el.textTracks && el.textTracks.length > 0 ? el.textTracks[0] : null;

  window.__seikoytVideoBridge = {
    apply(id, cmd) {
      const el = video(id);
      if (!el || !cmd) return;
      switch (cmd.type) {
        case "play":
          el.play().catch((err) => {
            lastPlayError = `${err.message} (${err.name})`;
          });
          break;
        case "pause":
          el.pause();
          break;
        case "seek":
          el.currentTime = Math.max(0, cmd.value || 0);
          break;
        case "volume":
          el.volume = Math.min(1, Math.max(0, cmd.value));
          break;
        case "rate":
          el.playbackRate = cmd.value;
          break;
        case "track_mode": {
          const track = firstTrack(el);
          if (track) track.mode = cmd.value;
          break;
        }
      }
    },
    snapshot(id) {
      const el = video(id);
      if (!el) return null;
      const track = firstTrack(el);
      const playError = lastPlayError;
      lastPlayError = null;
      return {
        current_time: Number.isFinite(el.currentTime) ? el.currentTime : 0,
        duration: Number.isFinite(el.duration) ? el.duration : 0,
        ready: el.readyState >= 1,
        paused: !!el.paused,
        ended: !!el.ended,
        volume: el.volume,
        rate: el.playbackRate,
        track_mode: track ? track.mode : null,
        fullscreen: !!document.fullscreenElement,
        play_error: playError,
      };
    },
  };
  return true;
})();
"#;

#[cfg(not(target_arch = "wasm32"))]
fn ensure_video_bridge() {
    let _ = document::eval(NATIVE_VIDEO_BRIDGE_JS);
}

/// One poll of the bridged element.
#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeSnapshot {
    pub current_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub ready: bool,
    pub paused: bool,
    pub ended: bool,
    pub volume: f64,
    pub rate: f64,
    #[serde(default)]
    pub track_mode: Option<String>,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default)]
    pub play_error: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
impl BridgeSnapshot {
    fn track(&self) -> Option<TrackMode> {
        self.track_mode.as_deref().map(|mode| match mode {
            "showing" => TrackMode::Showing,
            _ => TrackMode::Hidden,
        })
    }
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
/// Turns two consecutive polls into the events a DOM listener would have seen.
pub fn diff_snapshots(previous: Option<&BridgeSnapshot>, next: &BridgeSnapshot) -> Vec<MediaEvent> {
    let mut events = Vec::new();
    let Some(previous) = previous else {
        if next.ready {
            events.push(MediaEvent::LoadedMetadata {
                duration: next.duration,
                has_caption_track: next.track_mode.is_some(),
            });
        }
        events.push(MediaEvent::TimeUpdate(next.current_time));
        return events;
    };

    if next.ready && !previous.ready {
        events.push(MediaEvent::LoadedMetadata {
            duration: next.duration,
            has_caption_track: next.track_mode.is_some(),
        });
    } else if next.ready && (next.duration - previous.duration).abs() > f64::EPSILON {
        events.push(MediaEvent::DurationChange(next.duration));
    }
    if (next.current_time - previous.current_time).abs() > f64::EPSILON {
        events.push(MediaEvent::TimeUpdate(next.current_time));
    }
    if next.ended && !previous.ended {
        events.push(MediaEvent::Ended);
    } else if next.paused != previous.paused {
        events.push(if next.paused {
            MediaEvent::Pause
        } else {
            MediaEvent::Play
        });
    }
    if (next.volume - previous.volume).abs() > f64::EPSILON {
        events.push(MediaEvent::VolumeChange(next.volume));
    }
    if (next.rate - previous.rate).abs() > f64::EPSILON {
        events.push(MediaEvent::RateChange(next.rate));
    }
    if next.fullscreen != previous.fullscreen {
        events.push(MediaEvent::FullscreenChange(next.fullscreen));
    }
    events
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct VideoHandle {
    element_id: String,
    last_snapshot: Rc<RefCell<Option<BridgeSnapshot>>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl VideoHandle {
    pub fn attach(element_id: &str) -> Option<Self> {
        ensure_video_bridge();
        Some(Self {
            element_id: element_id.to_string(),
            last_snapshot: Rc::new(RefCell::new(None)),
        })
    }

    fn command(&self, value: serde_json::Value) {
        let payload = serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string());
        let element_id = serde_json::to_string(&self.element_id).unwrap_or_default();
        let script = format!(
            r#"(function () {{
                const bridge = window.__seikoytVideoBridge;
                if (!bridge) return false;
                bridge.apply({element_id}, {payload});
                return true;
            }})();"#
        );
        let _ = document::eval(&script);
    }

    async fn snapshot(&self) -> Option<BridgeSnapshot> {
        let element_id = serde_json::to_string(&self.element_id).unwrap_or_default();
        let script = format!(
            r#"const bridge = window.__seikoytVideoBridge;
            return bridge ? bridge.snapshot({element_id}) : null;"#
        );
        document::eval(&script)
            .join::<Option<BridgeSnapshot>>()
            .await
            .ok()
            .flatten()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaElement for VideoHandle {
    fn play(&self) {
        self.command(serde_json::json!({ "type": "play" }));
    }

    fn pause(&self) {
        self.command(serde_json::json!({ "type": "pause" }));
    }

    fn seek(&self, seconds: f64) {
        self.command(serde_json::json!({ "type": "seek", "value": seconds.max(0.0) }));
    }

    fn set_volume(&self, volume: f64) {
        self.command(serde_json::json!({ "type": "volume", "value": volume.clamp(0.0, 1.0) }));
    }

    fn set_playback_rate(&self, rate: f64) {
        self.command(serde_json::json!({ "type": "rate", "value": rate }));
    }

    fn caption_track_mode(&self) -> Option<TrackMode> {
        self.last_snapshot.borrow().as_ref().and_then(BridgeSnapshot::track)
    }

    fn set_caption_track_mode(&self, mode: TrackMode) {
        let value = match mode {
            TrackMode::Showing => "showing",
            TrackMode::Hidden => "hidden",
        };
        if let Some(snapshot) = self.last_snapshot.borrow_mut().as_mut() {
            if snapshot.track_mode.is_some() {
                snapshot.track_mode = Some(value.to_string());
            }
        }
        self.command(serde_json::json!({ "type": "track_mode", "value": value }));
    }
}

/// Snapshot poll standing in for DOM listeners. Detaching (or dropping) stops
/// the poll.
#[cfg(not(target_arch = "wasm32"))]
pub struct MediaSubscription {
    task: Option<Task>,
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaSubscription {
    pub fn subscribe<F>(handle: &VideoHandle, mut on_event: F) -> Self
    where
        F: FnMut(MediaEvent) + 'static,
    {
        let handle = handle.clone();
        let task = spawn(async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_millis(SNAPSHOT_POLL_MS)).await;
                let Some(next) = handle.snapshot().await else {
                    continue;
                };
                if let Some(reason) = next.play_error.as_deref() {
                    tracing::warn!("autoplay prevented: {reason}");
                }
                let previous = handle.last_snapshot.borrow().clone();
                let events = diff_snapshots(previous.as_ref(), &next);
                *handle.last_snapshot.borrow_mut() = Some(next);
                for event in events {
                    on_event(event);
                }
            }
        });
        Self { task: Some(task) }
    }

    pub fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for MediaSubscription {
    fn drop(&mut self) {
        if Runtime::try_current().is_some() {
            self.detach();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> BridgeSnapshot {
        BridgeSnapshot {
            current_time: 0.0,
            duration: 0.0,
            ready: false,
            paused: true,
            ended: false,
            volume: 1.0,
            rate: 1.0,
            track_mode: None,
            fullscreen: false,
            play_error: None,
        }
    }

    #[test]
    fn first_poll_reports_metadata_once_ready() {
        let mut next = snapshot();
        assert_eq!(diff_snapshots(None, &next), vec![MediaEvent::TimeUpdate(0.0)]);

        next.ready = true;
        next.duration = 95.0;
        next.track_mode = Some("disabled".into());
        assert_eq!(
            diff_snapshots(None, &next),
            vec![
                MediaEvent::LoadedMetadata {
                    duration: 95.0,
                    has_caption_track: true
                },
                MediaEvent::TimeUpdate(0.0),
            ]
        );
    }

    #[test]
    fn playback_transitions_become_events() {
        let mut previous = snapshot();
        previous.ready = true;
        previous.duration = 60.0;

        let mut next = previous.clone();
        next.paused = false;
        next.current_time = 0.4;
        assert_eq!(
            diff_snapshots(Some(&previous), &next),
            vec![MediaEvent::TimeUpdate(0.4), MediaEvent::Play]
        );

        let mut ended = next.clone();
        ended.paused = true;
        ended.ended = true;
        assert_eq!(diff_snapshots(Some(&next), &ended), vec![MediaEvent::Ended]);
    }

    #[test]
    fn later_duration_changes_do_not_reload_metadata() {
        let mut previous = snapshot();
        previous.ready = true;
        previous.duration = 60.0;
        previous.current_time = 5.0;
        previous.track_mode = Some("showing".into());

        let mut next = previous.clone();
        next.duration = 60.5;
        next.current_time = 5.2;
        assert_eq!(
            diff_snapshots(Some(&previous), &next),
            vec![MediaEvent::DurationChange(60.5), MediaEvent::TimeUpdate(5.2)]
        );
    }

    #[test]
    fn volume_rate_and_fullscreen_changes_are_reported() {
        let previous = snapshot();
        let mut next = previous.clone();
        next.volume = 0.0;
        next.rate = 2.0;
        next.fullscreen = true;
        assert_eq!(
            diff_snapshots(Some(&previous), &next),
            vec![
                MediaEvent::VolumeChange(0.0),
                MediaEvent::RateChange(2.0),
                MediaEvent::FullscreenChange(true),
            ]
        );
    }

    #[test]
    fn unchanged_polls_are_silent() {
        let previous = snapshot();
        assert!(diff_snapshots(Some(&previous), &previous.clone()).is_empty());
    }

    #[test]
    fn caption_payload_is_an_inline_webvtt_file() {
        use base64::Engine;
        let url = sample_captions_data_url();
        let encoded = url.strip_prefix("data:text/vtt;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .unwrap();
        let text = String::from_utf8(decoded).unwrap();
        assert!(text.starts_with("WEBVTT"));
        assert!(text.contains("This is a sample subtitle for demonstration."));
    }

    #[test]
    fn snapshot_decodes_bridge_payload() {
        let snapshot: BridgeSnapshot = serde_json::from_str(
            r#"{"current_time":3.5,"duration":10,"ready":true,"paused":false,"ended":false,
                "volume":0.5,"rate":1.5,"track_mode":"showing","fullscreen":false,"play_error":null}"#,
        )
        .unwrap();
        assert_eq!(snapshot.track(), Some(TrackMode::Showing));
        assert_eq!(snapshot.rate, 1.5);
    }
}

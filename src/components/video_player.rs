use crate::components::Icon;
use crate::player::{
    format_time, request_fullscreen_change, sample_captions_data_url, ControlsVisibility,
    IdleTimer, MediaSubscription, PlaybackController, VideoHandle, CONTROLS_IDLE_TIMEOUT,
    PLAYBACK_RATES, PLAYER_CONTAINER_ID, VIDEO_ELEMENT_ID,
};
use chrono::Utc;
use dioxus::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Runs a directive against the attached element. Directives issued before the
/// element is attached are dropped.
fn drive(
    mut controller: Signal<PlaybackController>,
    handle: Signal<Option<VideoHandle>>,
    directive: impl FnOnce(&mut PlaybackController, &VideoHandle),
) {
    let Some(element) = handle.peek().clone() else {
        return;
    };
    directive(&mut controller.write(), &element);
}

fn play_label(playing: bool) -> &'static str {
    if playing {
        "Pause"
    } else {
        "Play"
    }
}

fn toggle_class(active: bool) -> &'static str {
    if active {
        "accent-text"
    } else {
        ""
    }
}

fn fade_class(visible: bool) -> &'static str {
    if visible {
        "fade shown"
    } else {
        "fade hidden"
    }
}

/// Fullscreen player for one source. The parent keys it by URL, so a new
/// source mounts a fresh session.
#[component]
pub fn VideoPlayer(src: String, on_close: EventHandler<()>) -> Element {
    let initial_src = src.clone();
    let mut controller = use_signal(move || PlaybackController::new(initial_src));
    let mut visibility = use_signal(ControlsVisibility::new);
    let mut handle = use_signal(|| None::<VideoHandle>);
    let hide_timer = use_hook(|| Rc::new(RefCell::new(IdleTimer::default())));
    let subscription = use_hook(|| Rc::new(RefCell::new(None::<MediaSubscription>)));
    let captions_url = use_hook(sample_captions_data_url);

    // Every interaction lands here: show the controls and restart the countdown.
    let show_controls = use_callback({
        let hide_timer = hide_timer.clone();
        move |_: ()| {
            let Some(ticket) = visibility.write().show(Utc::now()) else {
                return;
            };
            hide_timer
                .borrow_mut()
                .schedule(CONTROLS_IDLE_TIMEOUT, move || {
                    visibility.write().expire(ticket);
                });
        }
    });

    // Cancel the countdown and drop the listeners. Safe to call more than once.
    let teardown = use_callback({
        let hide_timer = hide_timer.clone();
        let subscription = subscription.clone();
        move |_: ()| {
            hide_timer.borrow_mut().cancel();
            if let Some(mut active) = subscription.borrow_mut().take() {
                active.detach();
            }
            if let Ok(mut visibility) = visibility.try_write() {
                visibility.teardown();
            }
        }
    });

    use_effect({
        let subscription = subscription.clone();
        let src = src.clone();
        move || {
            let Some(element) = VideoHandle::attach(VIDEO_ELEMENT_ID) else {
                tracing::warn!("video element {VIDEO_ELEMENT_ID} is not mounted");
                return;
            };
            controller.write().load_source(src.clone(), &element);

            let events_element = element.clone();
            let active = MediaSubscription::subscribe(&element, move |event| {
                controller.write().apply_event(event, &events_element);
            });
            *subscription.borrow_mut() = Some(active);
            handle.set(Some(element));
            tracing::debug!("player session opened for {src}");
            show_controls.call(());
        }
    });

    use_drop({
        let hide_timer = hide_timer.clone();
        let subscription = subscription.clone();
        move || {
            hide_timer.borrow_mut().cancel();
            if let Some(mut active) = subscription.borrow_mut().take() {
                active.detach();
            }
        }
    });

    let on_toggle_play = move |_: MouseEvent| {
        drive(controller, handle, |c, el| c.toggle_play_pause(el));
        show_controls.call(());
    };

    let on_scrub = move |evt: FormEvent| {
        if let Ok(percent) = evt.value().parse::<f64>() {
            drive(controller, handle, |c, el| {
                c.scrub(percent, el);
            });
        }
        show_controls.call(());
    };

    let on_volume = move |evt: FormEvent| {
        if let Ok(volume) = evt.value().parse::<f64>() {
            drive(controller, handle, |c, el| c.set_volume(volume, el));
        }
        show_controls.call(());
    };

    let on_fullscreen = move |_: MouseEvent| {
        show_controls.call(());
        let request = controller.peek().fullscreen_request();
        spawn(async move {
            let result = request_fullscreen_change(PLAYER_CONTAINER_ID, request).await;
            controller.write().on_fullscreen_result(result);
        });
    };

    let on_close_click = move |_: MouseEvent| {
        teardown.call(());
        on_close.call(());
    };

    let state = controller();
    let clock = *state.clock();
    let progress = clock.progress_percent();
    let controls_visible = visibility().is_visible();
    let readout = format!(
        "{} / {}",
        format_time(clock.current_time()),
        format_time(clock.duration())
    );
    let notice = state.notice().map(|message| {
        let message = message.to_string();
        rsx! {
            div { class: "player-notice", role: "alert",
                span { "{message}" }
                button {
                    class: "icon-button",
                    aria_label: "Dismiss",
                    onclick: move |_| controller.write().dismiss_notice(),
                    Icon { name: "close".to_string(), class: "icon-sm".to_string() }
                }
            }
        }
    });

    rsx! {
        div {
            id: PLAYER_CONTAINER_ID,
            class: "player",
            onmousemove: move |_| show_controls.call(()),
            video {
                id: VIDEO_ELEMENT_ID,
                class: "player-video",
                src: "{src}",
                crossorigin: "anonymous",
                playsinline: true,
                onclick: on_toggle_play,
                track {
                    default: true,
                    kind: "subtitles",
                    srclang: "en",
                    label: "English",
                    src: "{captions_url}",
                }
            }

            {notice}

            button {
                class: "player-close {fade_class(controls_visible)}",
                aria_label: "Close player",
                onclick: on_close_click,
                Icon { name: "close".to_string(), class: "icon-lg".to_string() }
            }

            div { class: "player-controls {fade_class(controls_visible)}",
                input {
                    class: "scrub",
                    r#type: "range",
                    min: "0",
                    max: "100",
                    step: "0.1",
                    value: "{progress}",
                    disabled: !clock.has_duration(),
                    style: "background-size: {progress}% 100%",
                    oninput: on_scrub,
                }
                div { class: "control-row",
                    div { class: "control-group",
                        button {
                            aria_label: play_label(state.is_playing()),
                            onclick: on_toggle_play,
                            if state.is_playing() {
                                Icon { name: "pause".to_string(), class: "icon-lg".to_string() }
                            } else {
                                Icon { name: "play".to_string(), class: "icon-lg".to_string() }
                            }
                        }
                        div { class: "control-group tight",
                            button {
                                aria_label: "Mute",
                                onclick: move |_| {
                                    drive(controller, handle, |c, el| c.toggle_mute(el));
                                    show_controls.call(());
                                },
                                if state.volume() > 0.0 {
                                    Icon { name: "volume".to_string(), class: "icon-md".to_string() }
                                } else {
                                    Icon { name: "volume-off".to_string(), class: "icon-md".to_string() }
                                }
                            }
                            input {
                                class: "volume",
                                r#type: "range",
                                min: "0",
                                max: "1",
                                step: "0.05",
                                value: "{state.volume()}",
                                oninput: on_volume,
                            }
                        }
                        span { class: "readout", "{readout}" }
                    }
                    div { class: "control-group",
                        div { class: "speed-menu",
                            button {
                                class: "speed-button",
                                onclick: move |_| {
                                    controller.write().toggle_speed_menu();
                                    show_controls.call(());
                                },
                                "{state.playback_rate().label()}"
                            }
                            if state.speed_menu_open() {
                                ul { class: "speed-options",
                                    for rate in PLAYBACK_RATES {
                                        li { key: "{rate.label()}",
                                            button {
                                                onclick: move |_| {
                                                    drive(controller, handle, |c, el| c.set_playback_rate(rate, el));
                                                    show_controls.call(());
                                                },
                                                "{rate.label()}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        button {
                            class: toggle_class(state.subtitles_visible()),
                            aria_label: "Subtitles",
                            onclick: move |_| {
                                drive(controller, handle, |c, el| {
                                    c.toggle_subtitles(el);
                                });
                                show_controls.call(());
                            },
                            Icon { name: "subtitles".to_string(), class: "icon-md".to_string() }
                        }
                        button {
                            aria_label: "Fullscreen",
                            onclick: on_fullscreen,
                            if state.is_fullscreen() {
                                Icon { name: "fullscreen-exit".to_string(), class: "icon-md".to_string() }
                            } else {
                                Icon { name: "fullscreen".to_string(), class: "icon-md".to_string() }
                            }
                        }
                    }
                }
            }
        }
    }
}

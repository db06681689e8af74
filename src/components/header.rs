use crate::components::{view_label, AppView, Icon};
use crate::profile::UserProfile;
use dioxus::prelude::*;

const NAV_VIEWS: [AppView; 2] = [AppView::Home, AppView::Movies];

fn nav_class(view: AppView, current: AppView) -> &'static str {
    if view == current {
        "nav-link active"
    } else {
        "nav-link"
    }
}

#[component]
pub fn Header(
    current_view: AppView,
    profile: UserProfile,
    on_navigate: EventHandler<AppView>,
    on_search: EventHandler<String>,
    on_ai_tools: EventHandler<()>,
    on_ai_settings: EventHandler<()>,
    on_profile: EventHandler<()>,
    on_logout: EventHandler<()>,
) -> Element {
    let mut query = use_signal(String::new);
    let mut menu_open = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let trimmed = query.peek().trim().to_string();
        if !trimmed.is_empty() {
            on_search.call(trimmed);
        }
    };

    rsx! {
        header { class: "top-bar",
            div { class: "top-bar-left",
                h1 { class: "brand", "SEIKOYT" }
                nav { class: "top-nav",
                    for view in NAV_VIEWS {
                        button {
                            key: "{view_label(&view)}",
                            class: nav_class(view, current_view),
                            onclick: move |_| on_navigate.call(view),
                            "{view_label(&view)}"
                        }
                    }
                }
            }
            div { class: "top-bar-right",
                form { onsubmit: on_submit,
                    input {
                        class: "search-field",
                        r#type: "text",
                        placeholder: "Ask Gemini about movies...",
                        value: "{query}",
                        oninput: move |e| query.set(e.value()),
                    }
                }
                button {
                    class: "round-button accent",
                    aria_label: "AI Tools",
                    onclick: move |_| on_ai_tools.call(()),
                    Icon { name: "sparkles".to_string(), class: "icon-sm".to_string() }
                }
                div { class: "profile-menu",
                    button {
                        class: "avatar-button",
                        onclick: move |_| menu_open.set(!menu_open()),
                        if profile.profile_picture_url.is_empty() {
                            span { class: "avatar-initial", "{profile.initial()}" }
                        } else {
                            img {
                                src: "{profile.profile_picture_url}",
                                alt: "{profile.username}",
                            }
                        }
                    }
                    if menu_open() {
                        div { class: "dropdown",
                            div { class: "dropdown-head",
                                p { class: "truncate bold", "{profile.username}" }
                            }
                            button {
                                class: "dropdown-item",
                                onclick: move |_| {
                                    menu_open.set(false);
                                    on_profile.call(());
                                },
                                "Profile"
                            }
                            button {
                                class: "dropdown-item",
                                onclick: move |_| {
                                    menu_open.set(false);
                                    on_ai_settings.call(());
                                },
                                "AI Settings"
                            }
                            button {
                                class: "dropdown-item",
                                onclick: move |_| on_logout.call(()),
                                "Sign Out"
                            }
                        }
                    }
                }
            }
        }
    }
}

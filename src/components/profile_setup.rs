use crate::api::generate_profile_picture;
use crate::catalog;
use crate::components::{Icon, Session};
use crate::config::AiSettings;
use crate::profile::UserProfile;
use crate::storage::SharedStore;
use dioxus::prelude::*;

#[component]
fn AvatarPreview(url: String, loading: bool) -> Element {
    rsx! {
        div { class: "avatar-preview",
            if loading {
                div { class: "muted small", "Generating..." }
            } else if url.is_empty() {
                Icon { name: "user".to_string(), class: "icon-xl muted".to_string() }
            } else {
                img { src: "{url}", alt: "Profile Avatar" }
            }
        }
    }
}

/// First-run page: pick a username and generate an avatar for it.
#[component]
pub fn ProfileSetupPage() -> Element {
    let session = use_context::<Session>();
    let store = use_context::<SharedStore>();
    let ai_settings = use_context::<Signal<AiSettings>>();
    let mut username = use_signal(String::new);
    let mut picture_url = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let on_generate = move |_: MouseEvent| {
        let name = username.peek().trim().to_string();
        if name.is_empty() {
            error.set("Please enter a username first.".to_string());
            return;
        }
        loading.set(true);
        error.set(String::new());
        let settings = ai_settings.peek().clone();
        spawn(async move {
            match generate_profile_picture(&settings, &name).await {
                Some(image) => picture_url.set(image.to_data_url()),
                None => error.set("Could not generate an avatar. Please try again.".to_string()),
            }
            loading.set(false);
        });
    };

    let on_save = move |_: MouseEvent| {
        let picture = picture_url.peek().clone();
        if username.peek().trim().is_empty() || picture.is_empty() {
            error.set("Please enter a username and generate an avatar.".to_string());
            return;
        }
        match UserProfile::validated(&username.peek(), &picture) {
            Ok(profile) => session.save_profile(&store, profile),
            Err(message) => error.set(message),
        }
    };

    let backdrop = catalog::all()[0].backdrop_url.clone();
    let can_generate = !loading() && !username().is_empty();
    let can_save = !username().is_empty() && !picture_url().is_empty();

    rsx! {
        div { class: "gate",
            img { class: "gate-backdrop", src: "{backdrop}", alt: "background" }
            div { class: "gate-shade" }
            header { class: "gate-header",
                h1 { class: "brand", "SEIKOYT" }
            }
            div { class: "gate-card",
                h2 { class: "gate-title centered", "Create Your Profile" }
                div { class: "stack",
                    div {
                        label { class: "field-label", r#for: "username", "Username" }
                        input {
                            id: "username",
                            class: "field",
                            r#type: "text",
                            placeholder: "e.g., CinemaFan99",
                            value: "{username}",
                            oninput: move |e| username.set(e.value()),
                        }
                    }
                    div { class: "avatar-column",
                        AvatarPreview { url: picture_url(), loading: loading() }
                        button {
                            class: "btn btn-muted btn-block",
                            disabled: !can_generate,
                            onclick: on_generate,
                            if loading() {
                                "Generating..."
                            } else {
                                "Generate AI Avatar"
                            }
                        }
                    }
                    if !error().is_empty() {
                        p { class: "error centered", "{error}" }
                    }
                    button {
                        class: "btn btn-primary btn-block",
                        disabled: !can_save,
                        onclick: on_save,
                        "Save and Continue"
                    }
                }
            }
        }
    }
}

/// Profile dialog body: rename and regenerate the avatar.
#[component]
pub fn ProfileEditor(
    profile: UserProfile,
    on_save: EventHandler<UserProfile>,
    on_close: EventHandler<()>,
) -> Element {
    let ai_settings = use_context::<Signal<AiSettings>>();
    let initial = profile.clone();
    let mut username = use_signal(move || initial.username.clone());
    let initial_picture = profile.profile_picture_url.clone();
    let mut picture_url = use_signal(move || initial_picture);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let on_generate = move |_: MouseEvent| {
        let typed = username.peek().trim().to_string();
        let name = if typed.is_empty() { "user".to_string() } else { typed };
        loading.set(true);
        error.set(String::new());
        let settings = ai_settings.peek().clone();
        spawn(async move {
            match generate_profile_picture(&settings, &name).await {
                Some(image) => picture_url.set(image.to_data_url()),
                None => error.set("Could not generate a new avatar. Please try again.".to_string()),
            }
            loading.set(false);
        });
    };

    let on_submit = move |_: MouseEvent| {
        match UserProfile::validated(&username.peek(), &picture_url.peek()) {
            Ok(updated) => {
                on_save.call(updated);
                on_close.call(());
            }
            Err(message) => error.set(message),
        }
    };

    rsx! {
        div { class: "stack",
            div { class: "avatar-column",
                AvatarPreview { url: picture_url(), loading: loading() }
                button {
                    class: "btn btn-muted",
                    disabled: loading(),
                    onclick: on_generate,
                    if loading() {
                        "Generating..."
                    } else {
                        "Generate New Avatar"
                    }
                }
            }
            div {
                label { class: "field-label", r#for: "edit-username", "Username" }
                input {
                    id: "edit-username",
                    class: "field",
                    r#type: "text",
                    value: "{username}",
                    oninput: move |e| username.set(e.value()),
                }
            }
            if !error().is_empty() {
                p { class: "error", "{error}" }
            }
            button { class: "btn btn-primary btn-block", onclick: on_submit, "Save Changes" }
        }
    }
}

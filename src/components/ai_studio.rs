use crate::api::{edit_image, generate_image, InlineImage};
use crate::config::AiSettings;
use crate::storage::SharedStore;
use dioxus::prelude::*;

const UPLOAD_INPUT_ID: &str = "seikoyt-image-upload";

/// Reads the chosen file of the upload input as a `data:` URL.
async fn read_selected_file(input_id: &str) -> Option<String> {
    let input_id = serde_json::to_string(input_id).ok()?;
    let script = format!(
        r#"const input = document.getElementById({input_id});
        const file = input && input.files && input.files[0];
        if (!file) return null;
        return await new Promise((resolve) => {{
            const reader = new FileReader();
            reader.onload = () => resolve(reader.result);
            reader.onerror = () => resolve(null);
            reader.readAsDataURL(file);
        }});"#
    );
    match document::eval(&script).join::<Option<String>>().await {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!("failed to read uploaded file: {err:?}");
            None
        }
    }
}

#[component]
pub fn AiStudio() -> Element {
    rsx! {
        div { class: "studio-grid",
            ImageEditor {}
            PosterGenerator {}
        }
    }
}

#[component]
fn ImageEditor() -> Element {
    let ai_settings = use_context::<Signal<AiSettings>>();
    let mut prompt = use_signal(String::new);
    let mut original = use_signal(|| None::<String>);
    let mut edited = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let on_upload = move |_: FormEvent| {
        spawn(async move {
            if let Some(data_url) = read_selected_file(UPLOAD_INPUT_ID).await {
                edited.set(None);
                error.set(String::new());
                original.set(Some(data_url));
            }
        });
    };

    let on_edit = move |_: MouseEvent| {
        let instruction = prompt.peek().clone();
        let Some(source) = original.peek().clone() else {
            error.set("Please upload an image and provide a prompt.".to_string());
            return;
        };
        if instruction.is_empty() {
            error.set("Please upload an image and provide a prompt.".to_string());
            return;
        }
        let Some(image) = InlineImage::parse_data_url(&source) else {
            tracing::warn!("uploaded file is not a base64 data URL");
            error.set("Failed to edit the image. Please try again.".to_string());
            return;
        };

        loading.set(true);
        error.set(String::new());
        edited.set(None);
        let settings = ai_settings.peek().clone();
        spawn(async move {
            match edit_image(&settings, &image, &instruction).await {
                Some(result) => edited.set(Some(result.to_data_url())),
                None => error.set("Failed to edit the image. Please try again.".to_string()),
            }
            loading.set(false);
        });
    };

    let ready = !loading() && original().is_some() && !prompt().is_empty();

    rsx! {
        div { class: "stack",
            h3 { class: "section-title", "Image Editor" }
            p { class: "muted", "Upload an image and tell Gemini how to edit it." }
            div {
                input {
                    id: UPLOAD_INPUT_ID,
                    class: "visually-hidden",
                    r#type: "file",
                    accept: "image/*",
                    onchange: on_upload,
                }
                label { class: "btn btn-muted", r#for: UPLOAD_INPUT_ID, "Upload Image" }
            }
            div { class: "pair-grid",
                div {
                    h4 { class: "caption", "Original" }
                    div { class: "image-frame square",
                        {
                            match original() {
                                Some(url) => rsx! {
                                    img { src: "{url}", alt: "Original" }
                                },
                                None => rsx! {
                                    span { class: "muted", "Upload an image" }
                                },
                            }
                        }
                    }
                }
                div {
                    h4 { class: "caption", "Edited" }
                    div { class: "image-frame square",
                        {
                            match (loading(), edited()) {
                                (true, _) => rsx! {
                                    div { class: "muted", "Editing..." }
                                },
                                (false, Some(url)) => rsx! {
                                    img { src: "{url}", alt: "Edited" }
                                },
                                (false, None) => rsx! {
                                    span { class: "muted", "Your edited image will appear here" }
                                },
                            }
                        }
                    }
                }
            }
            input {
                class: "field",
                r#type: "text",
                placeholder: "e.g., \"Add a retro filter\" or \"Make it black and white\"",
                value: "{prompt}",
                oninput: move |e| prompt.set(e.value()),
            }
            button {
                class: "btn btn-primary btn-block",
                disabled: !ready,
                onclick: on_edit,
                if loading() {
                    "Editing..."
                } else {
                    "Edit with Gemini"
                }
            }
            if !error().is_empty() {
                p { class: "error", "{error}" }
            }
        }
    }
}

#[component]
fn PosterGenerator() -> Element {
    let ai_settings = use_context::<Signal<AiSettings>>();
    let mut prompt = use_signal(String::new);
    let mut generated = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(String::new);

    let on_generate = move |_: MouseEvent| {
        let theme = prompt.peek().clone();
        if theme.is_empty() {
            error.set("Please provide a prompt.".to_string());
            return;
        }
        loading.set(true);
        error.set(String::new());
        generated.set(None);
        let settings = ai_settings.peek().clone();
        spawn(async move {
            match generate_image(&settings, &theme).await {
                Some(image) => generated.set(Some(image.to_data_url())),
                None => error.set("Failed to generate the image. Please try again.".to_string()),
            }
            loading.set(false);
        });
    };

    rsx! {
        div { class: "stack",
            h3 { class: "section-title", "Poster Generator" }
            p { class: "muted", "Describe a movie poster and let Gemini create it for you." }
            div { class: "image-frame portrait",
                {
                    match (loading(), generated()) {
                        (true, _) => rsx! {
                            div { class: "muted", "Generating..." }
                        },
                        (false, Some(url)) => rsx! {
                            img { src: "{url}", alt: "Generated Poster" }
                        },
                        (false, None) => rsx! {
                            span { class: "muted", "Your poster will appear here" }
                        },
                    }
                }
            }
            input {
                class: "field",
                r#type: "text",
                placeholder: "e.g., \"A lone astronaut looking at a swirling galaxy\"",
                value: "{prompt}",
                oninput: move |e| prompt.set(e.value()),
            }
            button {
                class: "btn btn-primary btn-block",
                disabled: loading() || prompt().is_empty(),
                onclick: on_generate,
                if loading() {
                    "Generating..."
                } else {
                    "Generate with Gemini"
                }
            }
            if !error().is_empty() {
                p { class: "error", "{error}" }
            }
        }
    }
}

/// Overrides for the build-time Gemini configuration.
#[component]
pub fn AiSettingsPanel() -> Element {
    let store = use_context::<SharedStore>();
    let mut ai_settings = use_context::<Signal<AiSettings>>();
    let mut draft = use_signal(|| ai_settings.peek().clone());
    let mut status = use_signal(|| None::<Result<String, String>>);

    let save_store = store.clone();
    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let settings = draft.peek().clone().normalized();
        match settings.save(&save_store) {
            Ok(()) => {
                tracing::info!("AI settings updated");
                draft.set(settings.clone());
                ai_settings.set(settings);
                status.set(Some(Ok("Settings saved.".to_string())));
            }
            Err(err) => {
                tracing::error!("failed to save AI settings: {err}");
                status.set(Some(Err(format!("Could not save settings: {err}"))));
            }
        }
    };

    let on_reset = move |_: MouseEvent| {
        draft.set(AiSettings::default());
        status.set(None);
    };

    let current = draft();
    let key_state = if ai_settings().has_api_key() {
        "An API key is configured."
    } else {
        "No API key configured. AI features will show fallback messages."
    };

    rsx! {
        form { class: "stack", onsubmit: on_save,
            p { class: "muted", "{key_state}" }
            SettingsField {
                label: "API key",
                input_type: "password",
                value: current.api_key.clone(),
                on_input: move |value: String| draft.write().api_key = value,
            }
            SettingsField {
                label: "API base URL",
                input_type: "url",
                value: current.api_base.clone(),
                on_input: move |value: String| draft.write().api_base = value,
            }
            SettingsField {
                label: "Chat model",
                input_type: "text",
                value: current.chat_model.clone(),
                on_input: move |value: String| draft.write().chat_model = value,
            }
            SettingsField {
                label: "Search model",
                input_type: "text",
                value: current.search_model.clone(),
                on_input: move |value: String| draft.write().search_model = value,
            }
            SettingsField {
                label: "Image edit model",
                input_type: "text",
                value: current.image_edit_model.clone(),
                on_input: move |value: String| draft.write().image_edit_model = value,
            }
            SettingsField {
                label: "Image generation model",
                input_type: "text",
                value: current.image_model.clone(),
                on_input: move |value: String| draft.write().image_model = value,
            }
            SettingsField {
                label: "Request timeout (seconds)",
                input_type: "number",
                value: current.request_timeout_secs.to_string(),
                on_input: move |value: String| {
                    if let Ok(secs) = value.trim().parse::<u32>() {
                        draft.write().request_timeout_secs = secs;
                    }
                },
            }
            div { class: "button-row",
                button { class: "btn btn-primary", r#type: "submit", "Save" }
                button {
                    class: "btn btn-muted",
                    r#type: "button",
                    onclick: on_reset,
                    "Reset to defaults"
                }
            }
            {
                match status() {
                    Some(Ok(message)) => rsx! {
                        p { class: "success", "{message}" }
                    },
                    Some(Err(message)) => rsx! {
                        p { class: "error", "{message}" }
                    },
                    None => rsx! {},
                }
            }
        }
    }
}

#[component]
fn SettingsField(
    label: &'static str,
    input_type: &'static str,
    value: String,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        label { class: "field-label",
            "{label}"
            input {
                class: "field",
                r#type: input_type,
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
        }
    }
}

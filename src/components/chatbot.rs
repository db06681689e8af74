use crate::api::{send_chat_message, ChatMessage, ChatRole};
use crate::components::Icon;
use crate::config::AiSettings;
use dioxus::prelude::*;

const CHAT_END_ID: &str = "seikoyt-chat-end";

fn scroll_to_latest() {
    let _ = document::eval(&format!(
        r#"const end = document.getElementById("{CHAT_END_ID}");
        if (end) end.scrollIntoView({{ behavior: "smooth" }});"#
    ));
}

fn line_class(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "chat-line from-user",
        ChatRole::Model => "chat-line from-model",
    }
}

fn sent_label(message: &ChatMessage) -> String {
    message
        .sent_at
        .with_timezone(&chrono::Local)
        .format("%H:%M")
        .to_string()
}

/// Floating SeikoBot assistant.
#[component]
pub fn Chatbot() -> Element {
    let ai_settings = use_context::<Signal<AiSettings>>();
    let mut open = use_signal(|| false);
    let mut messages = use_signal(|| vec![ChatMessage::greeting()]);
    let mut input = use_signal(String::new);
    let mut loading = use_signal(|| false);

    use_effect(move || {
        let _ = messages.read().len();
        if open() {
            scroll_to_latest();
        }
    });

    let on_send = move |evt: FormEvent| {
        evt.prevent_default();
        let text = input.peek().clone();
        if text.trim().is_empty() || *loading.peek() {
            return;
        }
        let history = messages.peek().clone();
        messages.write().push(ChatMessage::user(text.clone()));
        input.set(String::new());
        loading.set(true);

        let settings = ai_settings.peek().clone();
        spawn(async move {
            let reply = send_chat_message(&settings, &history, &text).await;
            messages.write().push(ChatMessage::model(reply));
            loading.set(false);
        });
    };

    rsx! {
        div { class: "chat-dock",
            if open() {
                div { class: "chat-panel",
                    header { class: "chat-header",
                        h3 { "SeikoBot Assistant" }
                    }
                    div { class: "chat-log",
                        for message in messages() {
                            div {
                                key: "{message.id}",
                                class: line_class(message.role),
                                div {
                                    class: "chat-bubble",
                                    title: sent_label(&message),
                                    "{message.text}"
                                }
                            }
                        }
                        if loading() {
                            div { class: "chat-line from-model",
                                div { class: "chat-bubble typing",
                                    span { class: "dot" }
                                    span { class: "dot" }
                                    span { class: "dot" }
                                }
                            }
                        }
                        div { id: CHAT_END_ID }
                    }
                    form { class: "chat-form", onsubmit: on_send,
                        input {
                            class: "chat-input",
                            r#type: "text",
                            placeholder: "Ask me anything...",
                            value: "{input}",
                            oninput: move |e| input.set(e.value()),
                        }
                        button {
                            class: "icon-button accent-text",
                            r#type: "submit",
                            disabled: loading(),
                            Icon { name: "send".to_string(), class: "icon-sm".to_string() }
                        }
                    }
                }
            }
            button {
                class: "chat-toggle",
                aria_label: "Toggle assistant",
                onclick: move |_| open.set(!open()),
                if open() {
                    Icon { name: "close".to_string(), class: "icon-lg".to_string() }
                } else {
                    Icon { name: "chat".to_string(), class: "icon-lg".to_string() }
                }
            }
        }
    }
}

use crate::components::Icon;
use dioxus::prelude::*;

#[component]
pub fn Modal(title: String, on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                header { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    button {
                        class: "icon-button",
                        aria_label: "Close",
                        onclick: move |_| on_close.call(()),
                        Icon { name: "close".to_string(), class: "icon-md".to_string() }
                    }
                }
                div { class: "modal-body", {children} }
            }
        }
    }
}

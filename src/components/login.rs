use crate::catalog;
use crate::components::{Icon, Session};
use crate::storage::SharedStore;
use dioxus::prelude::*;

/// Sign-in / sign-up gate. Any submission opens a session.
#[component]
pub fn LoginPage() -> Element {
    let session = use_context::<Session>();
    let store = use_context::<SharedStore>();
    let mut is_sign_up = use_signal(|| false);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let featured = catalog::featured();

    let form_store = store.clone();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        session.sign_in(&form_store);
    };
    let on_google = move |_: MouseEvent| session.sign_in(&store);

    let (heading, toggle_prompt, toggle_action) = if is_sign_up() {
        ("Sign Up", "Already have an account?", "Sign in now.")
    } else {
        ("Sign In", "New to SeikoYT?", "Sign up now.")
    };

    rsx! {
        div { class: "gate",
            img {
                class: "gate-backdrop",
                src: "{featured.backdrop_url}",
                alt: "background",
            }
            div { class: "gate-shade" }
            header { class: "gate-header",
                h1 { class: "brand", "SEIKOYT" }
            }
            div { class: "gate-card",
                h2 { class: "gate-title", "{heading}" }
                form { class: "stack", onsubmit: on_submit,
                    input {
                        class: "field",
                        r#type: "email",
                        placeholder: "Email Address",
                        required: true,
                        value: "{email}",
                        oninput: move |e| email.set(e.value()),
                    }
                    input {
                        class: "field",
                        r#type: "password",
                        placeholder: "Password",
                        required: true,
                        value: "{password}",
                        oninput: move |e| password.set(e.value()),
                    }
                    button { class: "btn btn-primary btn-block", r#type: "submit", "{heading}" }
                }
                div { class: "gate-divider", "or" }
                button { class: "btn btn-light btn-block", onclick: on_google,
                    Icon { name: "google".to_string(), class: "icon-md".to_string() }
                    span { "Sign in with Google" }
                }
                p { class: "gate-toggle",
                    "{toggle_prompt}"
                    button {
                        class: "link-button",
                        onclick: move |_| is_sign_up.set(!is_sign_up()),
                        "{toggle_action}"
                    }
                }
                p { class: "gate-legal",
                    "By signing in, you agree to our Terms of Service and Privacy Policy."
                }
            }
        }
    }
}

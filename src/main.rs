use dioxus::prelude::*;

mod api;
mod catalog;
mod components;
mod config;
mod diagnostics;
mod player;
mod profile;
mod storage;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "SeikoYT" }
        document::Meta { name: "theme-color", content: "#141414" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "SeikoYT" }

        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}

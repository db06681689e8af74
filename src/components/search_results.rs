use crate::api::{GroundingSource, SearchAnswer};
use dioxus::prelude::*;

/// Grounding can cite the same page twice, so the position is part of the key.
fn source_keys(sources: &[GroundingSource]) -> Vec<String> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| format!("{index}-{}", source.uri))
        .collect()
}

#[component]
pub fn SearchResults(answer: Option<SearchAnswer>, loading: bool) -> Element {
    if loading {
        return rsx! {
            div { class: "centered padded", "Searching the web with Gemini..." }
        };
    }
    let Some(answer) = answer else {
        return rsx! {};
    };

    rsx! {
        div {
            p { class: "answer", "{answer.text}" }
            if !answer.sources.is_empty() {
                div {
                    h4 { class: "sources-title", "Sources:" }
                    ul { class: "sources",
                        for (key , source) in source_keys(&answer.sources).into_iter().zip(answer.sources.iter()) {
                            li { key: "{key}",
                                a {
                                    href: "{source.uri}",
                                    target: "_blank",
                                    rel: "noopener noreferrer",
                                    "{source.display_title()}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

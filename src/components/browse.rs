use crate::catalog::{self, Content};
use crate::components::{Icon, Navigation};
use crate::diagnostics::{log_perf, PerfTimer};
use dioxus::prelude::*;

#[component]
pub fn HeroBanner(
    content: Content,
    on_play: EventHandler<String>,
    on_details: EventHandler<Content>,
) -> Element {
    let video_url = content.video_url.clone();
    let details = content.clone();

    rsx! {
        section { class: "hero",
            img {
                class: "hero-backdrop",
                src: "{content.backdrop_url}",
                alt: "{content.title}",
            }
            div { class: "hero-shade" }
            div { class: "hero-body",
                h2 { class: "hero-title", "{content.title}" }
                p { class: "hero-description", "{content.description}" }
                div { class: "button-row",
                    button {
                        class: "btn btn-light",
                        disabled: video_url.is_none(),
                        onclick: move |_| {
                            if let Some(url) = video_url.clone() {
                                on_play.call(url);
                            }
                        },
                        Icon { name: "play".to_string(), class: "icon-md".to_string() }
                        span { "Play" }
                    }
                    button {
                        class: "btn btn-glass",
                        onclick: move |_| on_details.call(details.clone()),
                        Icon { name: "info".to_string(), class: "icon-md".to_string() }
                        span { "More Info" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ContentCard(content: Content, on_select: EventHandler<Content>) -> Element {
    let selected = content.clone();
    rsx! {
        div {
            class: "card",
            title: "{content.title}",
            onclick: move |_| on_select.call(selected.clone()),
            div { class: "card-poster",
                img {
                    src: "{content.thumbnail_url}",
                    alt: "{content.title}",
                    loading: "lazy",
                }
            }
        }
    }
}

#[component]
pub fn ContentRow(title: String, contents: Vec<Content>, on_select: EventHandler<Content>) -> Element {
    rsx! {
        section { class: "row",
            h3 { class: "row-title", "{title}" }
            div { class: "row-strip",
                for content in contents {
                    ContentCard { key: "{content.id}", content: content.clone(), on_select }
                }
            }
        }
    }
}

#[component]
pub fn HomePage(on_select: EventHandler<Content>, on_play: EventHandler<String>) -> Element {
    let timer = PerfTimer::start();
    let featured = catalog::featured().clone();
    let rows: Vec<(String, Vec<Content>)> = catalog::genres()
        .into_iter()
        .map(|genre| {
            let contents = catalog::by_genre(&genre);
            (genre, contents)
        })
        .collect();
    log_perf("home.rows", timer, &format!("rows={}", rows.len()));

    rsx! {
        HeroBanner { content: featured, on_play, on_details: on_select }
        div { class: "rows",
            for (genre , contents) in rows {
                ContentRow {
                    key: "{genre}",
                    title: genre.clone(),
                    contents,
                    on_select,
                }
            }
        }
    }
}

#[component]
pub fn MoviesPage(contents: Vec<Content>, on_select: EventHandler<Content>) -> Element {
    let navigation = use_context::<Navigation>();

    rsx! {
        div { class: "page",
            div { class: "page-heading",
                if navigation.can_go_back() {
                    button {
                        class: "round-button",
                        aria_label: "Back",
                        onclick: move |_| {
                            navigation.go_back();
                        },
                        Icon { name: "back".to_string(), class: "icon-sm".to_string() }
                    }
                }
                h2 { class: "page-title", "All Movies" }
            }
            div { class: "grid",
                for content in contents {
                    ContentCard { key: "{content.id}", content: content.clone(), on_select }
                }
            }
        }
    }
}

#[component]
pub fn DetailsContent(content: Content, on_play: EventHandler<String>) -> Element {
    let movie_url = content.video_url.clone();
    let trailer_url = content.trailer_url.clone();

    rsx! {
        div {
            div { class: "details-banner",
                img { src: "{content.backdrop_url}", alt: "{content.title}" }
                div { class: "details-shade" }
                h2 { class: "details-title", "{content.title}" }
            }
            div { class: "details-grid",
                div { class: "details-main",
                    p { class: "muted", "{content.description}" }
                    div { class: "button-row",
                        button {
                            class: "btn btn-light",
                            disabled: movie_url.is_none(),
                            onclick: move |_| {
                                if let Some(url) = movie_url.clone() {
                                    on_play.call(url);
                                }
                            },
                            Icon { name: "play".to_string(), class: "icon-md".to_string() }
                            span { "Play Movie" }
                        }
                        button {
                            class: "btn btn-glass",
                            disabled: trailer_url.is_none(),
                            onclick: move |_| {
                                if let Some(url) = trailer_url.clone() {
                                    on_play.call(url);
                                }
                            },
                            Icon { name: "play".to_string(), class: "icon-md".to_string() }
                            span { "Play Trailer" }
                        }
                    }
                }
                div { class: "details-facts",
                    p {
                        span { class: "fact-label", "Genres: " }
                        "{content.genre_line()}"
                    }
                    p {
                        span { class: "fact-label", "Release Year: " }
                        "{content.release_year}"
                    }
                    p {
                        span { class: "fact-label", "Rating: " }
                        "{content.rating}"
                    }
                }
            }
        }
    }
}

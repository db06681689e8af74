use crate::api::{search_with_sources, warn_if_unconfigured, SearchAnswer};
use crate::catalog;
use crate::components::{
    ActiveModal, AiSettingsPanel, AiStudio, AppView, Chatbot, DetailsContent, Header, HomePage,
    LoginPage, Modal, MoviesPage, Navigation, ProfileEditor, ProfileSetupPage, SearchResults,
    VideoPlayer, ViewHistory,
};
use crate::config::AiSettings;
use crate::profile::{ProfileStore, UserProfile};
use crate::storage::SharedStore;
use dioxus::core::Task;
use dioxus::prelude::*;

/// Sign-in state and the viewer's profile, shared through context.
#[derive(Clone, Copy, PartialEq)]
pub struct Session {
    pub authenticated: Signal<bool>,
    pub profile: Signal<Option<UserProfile>>,
}

impl Session {
    /// The gate accepts any submission; the stored profile decides whether
    /// setup is needed.
    pub fn sign_in(mut self, store: &SharedStore) {
        self.authenticated.set(true);
        self.profile.set(ProfileStore::new(store).load());
        tracing::info!("session started");
    }

    pub fn save_profile(mut self, store: &SharedStore, profile: UserProfile) {
        if let Err(err) = ProfileStore::new(store).save(&profile) {
            tracing::error!("failed to persist profile: {err}");
        }
        self.profile.set(Some(profile));
    }

    pub fn sign_out(mut self, store: &SharedStore) {
        if let Err(err) = ProfileStore::new(store).clear() {
            tracing::error!("failed to clear profile: {err}");
        }
        self.profile.set(None);
        self.authenticated.set(false);
        tracing::info!("session ended");
    }
}

#[component]
pub fn AppShell() -> Element {
    let store = use_context_provider(SharedStore::open_default);
    let settings_store = store.clone();
    use_context_provider(move || {
        let settings = AiSettings::load(&settings_store);
        warn_if_unconfigured(&settings);
        Signal::new(settings)
    });

    let authenticated = use_signal(|| false);
    let profile = use_signal(|| None::<UserProfile>);
    let session = use_context_provider(|| Session {
        authenticated,
        profile,
    });

    let body = match ((session.authenticated)(), (session.profile)()) {
        (false, _) => rsx! { LoginPage {} },
        (true, None) => rsx! { ProfileSetupPage {} },
        (true, Some(profile)) => rsx! { MainApp { profile } },
    };

    rsx! {
        {body}
    }
}

#[component]
fn MainApp(profile: UserProfile) -> Element {
    let store = use_context::<SharedStore>();
    let session = use_context::<Session>();
    let ai_settings = use_context::<Signal<AiSettings>>();

    let history = use_signal(|| ViewHistory::new(AppView::Home));
    let navigation = use_context_provider(|| Navigation::new(history));

    let mut active_modal = use_signal(|| None::<ActiveModal>);
    let mut search_query = use_signal(String::new);
    let mut search_answer = use_signal(|| None::<SearchAnswer>);
    let mut search_loading = use_signal(|| false);
    let mut search_task = use_signal(|| None::<Task>);
    let mut playing_url = use_signal(|| None::<String>);

    let open_details = move |content: catalog::Content| {
        active_modal.set(Some(ActiveModal::Details(content)));
    };

    // Opening a player always closes whatever dialog launched it.
    let open_player = move |url: String| {
        active_modal.set(None);
        playing_url.set(Some(url));
    };

    let run_search = move |query: String| {
        if let Some(previous) = search_task.write().take() {
            previous.cancel();
        }
        search_query.set(query.clone());
        search_answer.set(None);
        search_loading.set(true);
        active_modal.set(Some(ActiveModal::Search));

        let settings = ai_settings.peek().clone();
        let task = spawn(async move {
            let answer = search_with_sources(&settings, &query).await;
            search_answer.set(Some(answer));
            search_loading.set(false);
        });
        search_task.set(Some(task));
    };

    let close_modal = move |_: ()| {
        if let Some(task) = search_task.write().take() {
            task.cancel();
        }
        search_loading.set(false);
        active_modal.set(None);
    };

    let logout_store = store.clone();
    let profile_store = store.clone();

    let page = match navigation.current() {
        AppView::Home => rsx! {
            HomePage { on_select: open_details, on_play: open_player }
        },
        AppView::Movies => rsx! {
            MoviesPage { contents: catalog::all().to_vec(), on_select: open_details }
        },
    };

    let modal = active_modal().map(|modal| {
        let title = modal.title(&search_query());
        let content = match modal {
            ActiveModal::Details(content) => rsx! {
                DetailsContent { content, on_play: open_player }
            },
            ActiveModal::Search => rsx! {
                SearchResults { answer: search_answer(), loading: search_loading() }
            },
            ActiveModal::AiStudio => rsx! {
                AiStudio {}
            },
            ActiveModal::AiSettings => rsx! {
                AiSettingsPanel {}
            },
            ActiveModal::Profile => {
                let store = profile_store.clone();
                rsx! {
                    ProfileEditor {
                        profile: profile.clone(),
                        on_save: move |updated: UserProfile| session.save_profile(&store, updated),
                        on_close: move |_| active_modal.set(None),
                    }
                }
            }
        };
        rsx! {
            Modal { title, on_close: close_modal, {content} }
        }
    });

    let player = playing_url().map(|url| {
        rsx! {
            VideoPlayer {
                key: "{url}",
                src: url.clone(),
                on_close: move |_| playing_url.set(None),
            }
        }
    });

    rsx! {
        div { class: "app-root",
            Header {
                current_view: navigation.current(),
                profile: profile.clone(),
                on_navigate: move |view: AppView| navigation.navigate_to(view),
                on_search: run_search,
                on_ai_tools: move |_| active_modal.set(Some(ActiveModal::AiStudio)),
                on_ai_settings: move |_| active_modal.set(Some(ActiveModal::AiSettings)),
                on_profile: move |_| active_modal.set(Some(ActiveModal::Profile)),
                on_logout: move |_| session.sign_out(&logout_store),
            }

            main { {page} }

            Chatbot {}

            {player}
            {modal}
        }
    }
}

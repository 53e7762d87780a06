use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::guard::{is_auth_page, DASHBOARD_PATH, ENTRY_PATH, REGISTER_PATH};
use crate::state::AppContext;
use icons::Search;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

#[component]
pub fn Navbar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let state = StoredValue::new(app_state.0.clone());
    let auth = app_state.0.auth;
    let scope = app_state.0.search_scope;

    let pathname = use_location().pathname;
    let navigate = StoredValue::new(use_navigate());
    let search_visible: RwSignal<bool> = RwSignal::new(false);

    let is_authenticated = move || auth.with(|s| s.is_authenticated());
    let show_session_controls =
        move || is_authenticated() && !is_auth_page(&pathname.get());
    let brand_href = move || {
        if is_authenticated() {
            DASHBOARD_PATH
        } else {
            ENTRY_PATH
        }
    };

    // The box edits whichever list the dashboard is showing.
    let query_value = move || state.with_value(|s| s.query(scope.get())).get();
    let on_search_input = move |ev: web_sys::Event| {
        let value = event_target_value(&ev);
        state.with_value(|s| s.set_query(scope.get_untracked(), value));
    };

    let on_logout = move |_| {
        state.with_value(|s| s.logout());
        search_visible.set(false);
        navigate.with_value(|nav| nav(ENTRY_PATH, Default::default()));
    };

    view! {
        <nav class="sticky top-0 z-50 flex items-center justify-between bg-gray-900 px-6 py-3 text-white shadow-md">
            <div class="flex items-center gap-6">
                <a
                    href=brand_href
                    class="bg-gradient-to-r from-blue-400 to-purple-500 bg-clip-text text-2xl font-extrabold text-transparent transition hover:opacity-80"
                >
                    "StudyHub"
                </a>
                <Show when=show_session_controls fallback=|| ().into_view()>
                    <a href=DASHBOARD_PATH class="transition hover:text-blue-400">"Dashboard"</a>
                </Show>
            </div>

            <div class="flex items-center gap-4">
                <Show when=show_session_controls fallback=|| ().into_view()>
                    <div class="relative flex items-center">
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            attr:title="Search"
                            on:click=move |_| search_visible.update(|v| *v = !*v)
                        >
                            <Search class="size-5" />
                        </Button>
                        <Show when=move || search_visible.get() fallback=|| ().into_view()>
                            <input
                                type="search"
                                class="ml-2 w-52 rounded-lg bg-amber-50 px-3 py-1 text-black focus:outline-none focus:ring-2 focus:ring-blue-400"
                                placeholder=move || scope.get().placeholder()
                                prop:value=query_value
                                on:input=on_search_input
                            />
                        </Show>
                    </div>
                </Show>

                <a
                    href="https://www.instagram.com/ordinary_vk/"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="transition hover:text-pink-500"
                >
                    "Instagram"
                </a>
                <a
                    href="https://www.youtube.com/@javawithvk"
                    target="_blank"
                    rel="noopener noreferrer"
                    class="transition hover:text-red-500"
                >
                    "YouTube"
                </a>

                <Show
                    when=show_session_controls
                    fallback=|| view! {
                        <a href=ENTRY_PATH class="mr-3 transition hover:text-blue-400">"Login"</a>
                        <a href=REGISTER_PATH class="transition hover:text-blue-400">"Register"</a>
                    }
                >
                    <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_logout>
                        "Logout"
                    </Button>
                </Show>
            </div>
        </nav>
    }
}

use icons::X;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Full-screen overlay driven by an `open` signal. Escape and the close button dismiss it.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(into, optional)] class: String,
    children: ChildrenFn,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative h-[90vh] w-full overflow-hidden rounded-xl bg-background shadow-lg md:w-11/12 lg:w-4/5",
        class
    );

    let escape = leptos_dom::helpers::window_event_listener(leptos::ev::keydown, move |ev| {
        if ev.key() == "Escape" && open.get_untracked() {
            on_close.run(());
        }
    });
    on_cleanup(move || escape.remove());

    let children = StoredValue::new(children);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                data-name="Modal"
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/70 p-4"
                role="dialog"
                aria-modal="true"
            >
                <div class=merged_class.clone()>
                    <button
                        type="button"
                        class="absolute right-4 top-4 z-50 text-destructive hover:opacity-80"
                        aria-label="Close"
                        on:click=move |_| on_close.run(())
                    >
                        <X class="size-6" />
                    </button>
                    {move || children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}

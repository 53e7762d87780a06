use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

const INPUT_CLASS: &str = "placeholder:text-muted-foreground border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm focus-visible:border-ring focus-visible:ring-2 focus-visible:ring-ring/50";

/// Text input two-way bound to a signal.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,
    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,

    // Wired by hand rather than `bind:value`, which has shifted between Leptos releases.
    #[prop(into)] bind_value: RwSignal<String>,

    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(INPUT_CLASS, class);

    let on_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            bind_value.set(input.value());
        }
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            required=required
            autofocus=autofocus
            prop:value=move || bind_value.get()
            on:input=on_input
            node_ref=node_ref
        />
    }
}

/// File picker. The selected file is read from `node_ref` at submit time.
#[component]
pub fn FileInput(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] id: String,
    node_ref: NodeRef<html::Input>,
    /// Set whenever the selection changes.
    selected: RwSignal<bool>,
) -> impl IntoView {
    let merged_class = tw_merge!(INPUT_CLASS, "file:mr-3 file:border-0 file:bg-transparent file:text-sm file:font-medium", class);

    let on_change = move |_: web_sys::Event| {
        let has_file = node_ref
            .get_untracked()
            .and_then(|el| el.files())
            .is_some_and(|files| files.length() > 0);
        selected.set(has_file);
    };

    view! {
        <input
            data-name="FileInput"
            type="file"
            class=merged_class
            id=id
            on:change=on_change
            node_ref=node_ref
        />
    }
}

/// First file picked in a file input, if any.
pub fn selected_file(node_ref: NodeRef<html::Input>) -> Option<web_sys::File> {
    node_ref
        .get_untracked()
        .and_then(|el| el.files())
        .and_then(|files| files.get(0))
}

/// Reset a file input after a successful upload.
pub fn clear_file_input(node_ref: NodeRef<html::Input>, selected: RwSignal<bool>) {
    if let Some(el) = node_ref.get_untracked() {
        el.set_value("");
    }
    selected.set(false);
}

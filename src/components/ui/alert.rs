use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertDescription, p, "text-sm leading-relaxed"}
}

pub use components::*;

/// Outcome tone of an inline status message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

/// Inline message shown under a form; renders nothing while `message` is `None`.
#[component]
pub fn StatusMessage(
    #[prop(into)] message: Signal<Option<(StatusTone, String)>>,
) -> impl IntoView {
    move || {
        message.get().map(|(tone, text)| {
            let (frame, body) = match tone {
                StatusTone::Success => ("border-green-600/30", "text-green-700"),
                StatusTone::Error => ("border-destructive/30", "text-destructive"),
            };
            view! {
                <Alert class=frame>
                    <AlertDescription class=body>{text}</AlertDescription>
                </Alert>
            }
        })
    }
}

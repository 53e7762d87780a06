use crate::guard::{evaluate_session, Capabilities, GuardOutcome, ENTRY_PATH};
use crate::session::Role;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::NavigateOptions;

/// Renders `children` only while the session satisfies `roles`.
///
/// The outcome is recomputed whenever the session signal changes, so logging
/// out (or a role change) redirects without a reload.
#[component]
pub fn Protected(
    /// Roles allowed through; empty admits any logged-in user.
    #[prop(optional)]
    roles: Vec<Role>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = expect_context::<AppContext>().0.auth;
    let required = StoredValue::new(Capabilities::roles(roles));
    let children = StoredValue::new(children);

    move || {
        let outcome = required.with_value(|caps| auth.with(|s| evaluate_session(caps, s)));
        match outcome {
            GuardOutcome::Admitted => children.with_value(|c| c()).into_any(),
            denied => {
                let path = denied.redirect_path().unwrap_or(ENTRY_PATH);
                let options = NavigateOptions {
                    replace: true,
                    ..Default::default()
                };
                view! { <Redirect path=path options=options /> }.into_any()
            }
        }
    }
}

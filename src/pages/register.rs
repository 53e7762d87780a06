use super::navigate_if_mounted;
use crate::components::ui::{
    Button, Card, CardContent, CardFooter, CardHeader, CardTitle, Input, Label, Spinner,
    StatusMessage, StatusTone,
};
use crate::forms::RegisterForm;
use crate::guard::ENTRY_PATH;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local_scoped_with_cancellation;
use leptos_router::hooks::use_navigate;
use std::time::Duration;

const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

#[component]
pub fn RegisterPage() -> impl IntoView {
    let username: RwSignal<String> = RwSignal::new(String::new());
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let status: RwSignal<Option<(StatusTone, String)>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let form = RegisterForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let req = match form.validate() {
            Ok(req) => req,
            Err(e) => {
                status.set(Some((StatusTone::Error, e.to_string())));
                return;
            }
        };

        let api = app_state.0.api.clone();
        loading.set(true);
        status.set(None);

        spawn_local_scoped_with_cancellation(async move {
            match api.register(&req).await {
                Ok(()) => {
                    status.set(Some((
                        StatusTone::Success,
                        "Registered successfully! Redirecting to Login...".to_string(),
                    )));
                    leptos_dom::helpers::set_timeout(
                        move || {
                            if !navigate_if_mounted(navigate, ENTRY_PATH) {
                                log::debug!("register: page left before redirect");
                            }
                        },
                        REDIRECT_DELAY,
                    );
                }
                Err(e) => {
                    log::warn!("registration failed: {e}");
                    status.set(Some((
                        StatusTone::Error,
                        "Registration failed. Try again.".to_string(),
                    )));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="flex min-h-screen items-center justify-center bg-gradient-to-br from-blue-100 to-blue-300 px-4">
            <Card class="w-full max-w-md">
                <CardHeader>
                    <CardTitle class="text-2xl">"Create Account"</CardTitle>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <StatusMessage message=status />

                        <div class="flex flex-col gap-2">
                            <Label html_for="username">"Username"</Label>
                            <Input
                                id="username"
                                name="username"
                                placeholder="Enter your username"
                                bind_value=username
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input
                                id="email"
                                name="email"
                                r#type="email"
                                placeholder="Enter your email"
                                bind_value=email
                                required=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input
                                id="password"
                                name="password"
                                r#type="password"
                                placeholder="Create a password"
                                bind_value=password
                                required=true
                            />
                        </div>

                        <Button class="w-full" attr:disabled=move || loading.get()>
                            <Show when=move || loading.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if loading.get() { "Registering..." } else { "Register" }}
                        </Button>
                    </form>
                </CardContent>

                <CardFooter class="justify-center">
                    <div class="text-sm text-muted-foreground">
                        "Already have an account? "
                        <a class="font-medium text-primary hover:underline" href=ENTRY_PATH>"Login"</a>
                    </div>
                </CardFooter>
            </Card>
        </div>
    }
}

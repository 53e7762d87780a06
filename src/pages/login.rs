use super::{navigate_if_mounted, LOGIN_FAILED};
use crate::components::ui::{
    Button, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle, Input, Label,
    Spinner, StatusMessage, StatusTone,
};
use crate::forms::LoginForm;
use crate::guard::{DASHBOARD_PATH, REGISTER_PATH};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos::task::spawn_local_scoped_with_cancellation;
use leptos_router::hooks::use_navigate;

#[component]
pub fn LoginPage() -> impl IntoView {
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

        let form = LoginForm {
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
        let session = app_state.0.session.clone();
        loading.set(true);
        status.set(None);

        // Cancelled if the page unmounts first.
        spawn_local_scoped_with_cancellation(async move {
            let outcome = match api.login(&req).await {
                Ok(res) => session.login(&res.token, &res.role).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => {
                    navigate_if_mounted(navigate, DASHBOARD_PATH);
                }
                Err(reason) => {
                    log::warn!("login failed: {reason}");
                    status.set(Some((StatusTone::Error, LOGIN_FAILED.to_string())));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="flex min-h-screen items-center justify-center bg-gradient-to-br from-blue-100 to-blue-300 px-4">
            <Card class="w-full max-w-md">
                <CardHeader>
                    <CardTitle class="text-2xl">"Login"</CardTitle>
                    <CardDescription>"Sign in to browse and download notes."</CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <StatusMessage message=status />

                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="Enter your email"
                                bind_value=email
                                required=true
                                autofocus=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="Enter your password"
                                bind_value=password
                                required=true
                            />
                        </div>

                        <Button class="w-full" attr:disabled=move || loading.get()>
                            <Show when=move || loading.get() fallback=|| ().into_view()>
                                <Spinner />
                            </Show>
                            {move || if loading.get() { "Logging in..." } else { "Login" }}
                        </Button>
                    </form>
                </CardContent>

                <CardFooter class="justify-center">
                    <div class="text-sm text-muted-foreground">
                        "Don't have an account? "
                        <a class="font-medium text-primary hover:underline" href=REGISTER_PATH>"Register"</a>
                    </div>
                </CardFooter>
            </Card>
        </div>
    }
}

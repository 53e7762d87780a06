use crate::guard::DASHBOARD_PATH;
use leptos::prelude::*;

#[component]
pub fn UnauthorizedPage() -> impl IntoView {
    view! {
        <div class="flex min-h-[60vh] flex-col items-center justify-center gap-3 px-4 text-center">
            <h1 class="text-3xl font-bold text-gray-800">"Access denied"</h1>
            <p class="text-sm text-muted-foreground">
                "Your account does not have permission to view this page."
            </p>
            <a class="text-sm font-medium text-primary hover:underline" href=DASHBOARD_PATH>
                "Back to Dashboard"
            </a>
        </div>
    }
}

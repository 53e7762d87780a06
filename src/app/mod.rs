use crate::components::{Footer, Navbar};
use crate::pages::{DashboardPage, LoginPage, Protected, RegisterPage, UnauthorizedPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    // Navbar reads the location, so it has to sit inside <Router>.
    view! {
        <Router>
            <div class="flex min-h-screen flex-col">
                <Navbar />
                <main class="flex-1">
                    <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                        <Route path=path!("") view=LoginPage />
                        <Route path=path!("register") view=RegisterPage />
                        <Route path=path!("unauthorized") view=UnauthorizedPage />
                        <Route path=path!("dashboard") view=move || view! {
                            <Protected>
                                <DashboardPage />
                            </Protected>
                        } />
                    </Routes>
                </main>
                <Footer />
            </div>
        </Router>
    }
}

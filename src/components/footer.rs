use crate::util::current_year;
use leptos::prelude::*;

#[component]
pub fn Footer() -> impl IntoView {
    let year = current_year();

    view! {
        <footer class="mt-10 bg-gray-900 py-4 text-white">
            <div class="mx-auto flex max-w-6xl items-center justify-center px-6">
                <p class="text-sm">{format!("© {year} StudyHub. All rights reserved.")}</p>
            </div>
        </footer>
    }
}

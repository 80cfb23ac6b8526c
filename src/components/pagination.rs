//! Pagination Component

use leptos::prelude::*;

const PAGE_SIZES: &[u32] = &[10, 20, 50];

/// Previous/next controls plus a page size picker. `page` is zero-based.
#[component]
pub fn Pagination(
    #[prop(into)] page: Signal<u32>,
    #[prop(into)] total_pages: Signal<u32>,
    #[prop(into)] has_previous: Signal<bool>,
    #[prop(into)] has_next: Signal<bool>,
    #[prop(into)] size: Signal<u32>,
    #[prop(into)] on_page: Callback<u32>,
    #[prop(into)] on_size: Callback<u32>,
) -> impl IntoView {
    view! {
        <nav class="pagination">
            <button
                class="page-btn"
                disabled=move || !has_previous.get()
                on:click=move |_| on_page.run(page.get_untracked().saturating_sub(1))
            >
                "Previous"
            </button>
            <span class="page-indicator">
                {move || format!("Page {} of {}", page.get() + 1, total_pages.get().max(1))}
            </span>
            <button
                class="page-btn"
                disabled=move || !has_next.get()
                on:click=move |_| on_page.run(page.get_untracked() + 1)
            >
                "Next"
            </button>
            <select
                class="page-size"
                prop:value=move || size.get().to_string()
                on:change=move |ev| {
                    if let Ok(size) = event_target_value(&ev).parse() {
                        on_size.run(size);
                    }
                }
            >
                {PAGE_SIZES
                    .iter()
                    .map(|s| view! { <option value=s.to_string()>{format!("{s} / page")}</option> })
                    .collect_view()}
            </select>
        </nav>
    }
}

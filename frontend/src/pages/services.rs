use crate::api::use_api;
use crate::components::service_card::ServiceCard;
use crate::components::toast::use_toast;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::config::SERVICES_PAGE_SIZE;
use lifeease_shared::protocol::ListServicesRequest;
use lifeease_shared::{SERVICE_CATEGORIES, Service};

#[component]
pub fn ServicesPage() -> impl IntoView {
    let api = use_api();
    let toast = use_toast();

    let (items, set_items) = signal(Vec::<Service>::new());
    let (loading, set_loading) = signal(true);
    let q = RwSignal::new(String::new());
    let category = RwSignal::new(String::new());
    let (page, set_page) = signal(1u32);
    let (pages, set_pages) = signal(1u32);

    let fetch = move |target: u32| {
        let request = ListServicesRequest {
            q: Some(q.get_untracked()),
            category: Some(category.get_untracked()),
            page: target,
            limit: SERVICES_PAGE_SIZE,
        };
        let api = api.get();
        set_loading.set(true);
        spawn_local(async move {
            match api.list_services(&request).await {
                Ok(result) => {
                    set_page.set(result.current_page());
                    set_pages.set(result.total_pages());
                    set_items.set(result.items);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to load services");
                    toast.error("Failed to load services");
                }
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| fetch(1));

    let on_search = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        fetch(1);
    };

    let on_refresh = move |_| {
        q.set(String::new());
        category.set(String::new());
        fetch(1);
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <form class="flex flex-wrap gap-2" on:submit=on_search>
                <input
                    type="text"
                    placeholder="Search services…"
                    class="input input-bordered input-sm"
                    on:input=move |ev| q.set(event_target_value(&ev))
                    prop:value=move || q.get()
                />
                <select
                    class="select select-bordered select-sm"
                    on:change=move |ev| category.set(event_target_value(&ev))
                    prop:value=move || category.get()
                >
                    <option value="">"All categories"</option>
                    {SERVICE_CATEGORIES
                        .iter()
                        .map(|c| view! { <option value=*c>{*c}</option> })
                        .collect_view()}
                </select>
                <button type="submit" class="btn btn-primary btn-sm">"Search"</button>
                <button type="button" class="btn btn-ghost btn-sm" on:click=on_refresh>"Reset"</button>
            </form>

            {move || {
                if loading.get() {
                    view! {
                        <div class="flex justify-center py-16">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                    .into_any()
                } else if items.with(Vec::is_empty) {
                    view! { <p class="text-center py-16 text-base-content/60">"No services found."</p> }
                        .into_any()
                } else {
                    view! {
                        <div class="grid gap-4 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4">
                            <For
                                each=move || items.get()
                                key=|s| s.id.clone()
                                children=move |service| view! { <ServiceCard service=service api=api /> }
                            />
                        </div>
                        <div class="flex justify-center mt-6">
                            <div class="join">
                                {move || {
                                    (1..=pages.get())
                                        .map(|p| {
                                            let class = if p == page.get() {
                                                "join-item btn btn-sm btn-active"
                                            } else {
                                                "join-item btn btn-sm"
                                            };
                                            view! { <button class=class on:click=move |_| fetch(p)>{p}</button> }
                                        })
                                        .collect_view()
                                }}
                            </div>
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

use crate::api::use_api;
use crate::auth::{AuthMode, use_auth};
use crate::components::toast::use_toast;
use crate::web::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::AppRoute;
use lifeease::media::service_cover;
use lifeease_shared::Service;

const BOOKING_STUB: &str = "This would go to a booking/request flow.";

#[component]
pub fn ServiceDetailPage(id: String) -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();

    let (service, set_service) = signal(Option::<Service>::None);
    let (loading, set_loading) = signal(true);

    Effect::new(move |_| {
        let id = id.clone();
        let api = api.get();
        spawn_local(async move {
            match api.get_service(&id).await {
                Ok(found) => set_service.set(Some(found)),
                Err(e) => {
                    tracing::warn!(service_id = %id, error = %e, "failed to load service");
                    toast.error("Service not found");
                    router.replace(&AppRoute::Services.to_path());
                }
            }
            set_loading.set(false);
        });
    });

    let on_request = move |_| {
        if !auth.is_logged_in() {
            auth.open_modal(AuthMode::Login);
            return;
        }
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(BOOKING_STUB);
        }
    };

    view! {
        {move || {
            if loading.get() {
                return view! {
                    <div class="flex justify-center pt-24">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
                .into_any();
            }
            let Some(s) = service.get() else {
                return ().into_any();
            };

            let cover = service_cover(&api.base_url(), &s.images);
            let provider = s
                .provider
                .as_ref()
                .and_then(|p| p.name())
                .unwrap_or("—")
                .to_string();

            view! {
                <div class="max-w-6xl mx-auto p-4 md:p-8 grid gap-8 md:grid-cols-2">
                    <div class="rounded-box overflow-hidden shadow">
                        <img src=cover alt=s.title.clone() class="w-full block" />
                    </div>
                    <div class="space-y-4">
                        <h1 class="text-3xl font-extrabold">{s.title.clone()}</h1>
                        <p class="text-base-content/60">{s.category.clone().unwrap_or_else(|| "Service".to_string())}</p>
                        <div class="flex gap-2">
                            <span class="badge badge-primary badge-lg">{s.price_label()}</span>
                            {s.location.clone().map(|loc| view! { <span class="badge badge-outline badge-lg">{loc}</span> })}
                        </div>
                        <p class="whitespace-pre-line">{s.description.clone()}</p>
                        <button class="btn btn-primary btn-lg" on:click=on_request>"Request / Book"</button>
                        <p class="text-sm text-base-content/60">"Provider: " {provider}</p>
                    </div>
                </div>
            }
            .into_any()
        }}
    }
}

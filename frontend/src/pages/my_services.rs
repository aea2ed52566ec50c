use crate::api::use_api;
use crate::auth::{AuthContext, use_auth};
use crate::components::toast::use_toast;
use crate::web::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::AppRoute;
use lifeease::catalog;
use lifeease::config::MY_SERVICES_LIMIT;
use lifeease::media::service_cover;
use lifeease_shared::Service;
use lifeease_shared::protocol::ListMyServicesRequest;

#[component]
pub fn MyServicesPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();
    let router = use_router();

    let (items, set_items) = signal(Vec::<Service>::new());
    let (loading, set_loading) = signal(true);
    let approved = RwSignal::new(auth.session.with_untracked(|s| {
        s.as_ref().is_some_and(|s| s.user.is_approved_provider())
    }));

    let fetch = move || {
        let api = api.get();
        set_loading.set(true);
        spawn_local(async move {
            // 审核状态以后端为准
            match lifeease::auth::refresh_profile(&api, &AuthContext::store()).await {
                Ok(session) => {
                    approved.set(session.user.is_approved_provider());
                    auth.set_session(session);
                }
                Err(e) => tracing::warn!(error = %e, "failed to refresh approval status"),
            }

            let request = ListMyServicesRequest {
                page: 1,
                limit: MY_SERVICES_LIMIT,
                include_inactive: true,
                include_unapproved: true,
            };
            match api.list_my_services(&request).await {
                Ok(page) => set_items.set(page.items),
                Err(e) => toast.error(lifeease::AppError::from(e).user_message("Failed to load services")),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| fetch());

    let on_delete = move |service_id: String| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this service?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = api.get();
        spawn_local(async move {
            match catalog::delete_service(&api, &service_id).await {
                Ok(()) => toast.success("Service deleted"),
                Err(e) => toast.error(e.user_message("Delete failed")),
            }
            fetch();
        });
    };

    let on_toggle = move |service: Service| {
        let api = api.get();
        spawn_local(async move {
            if let Err(e) = catalog::set_active(&api, &service.id, !service.is_active).await {
                toast.error(e.user_message("Update failed"));
            }
            fetch();
        });
    };

    let card = move |s: Service| {
        let cover = service_cover(&api.base_url(), &s.images);
        let edit_path = AppRoute::EditService(s.id.clone()).to_path();
        let id = s.id.clone();
        let toggled = s.clone();
        let (active_label, active_class) = if s.is_active {
            ("Active", "badge badge-success badge-outline")
        } else {
            ("Inactive", "badge badge-warning badge-outline")
        };

        view! {
            <div class="card bg-base-100 shadow-xl h-full">
                <figure class="h-40">
                    <img src=cover alt=s.title.clone() class="object-cover w-full h-full" />
                </figure>
                <div class="card-body p-4">
                    <p class="text-sm text-base-content/60 truncate">{s.category.clone().unwrap_or_else(|| "Service".to_string())}</p>
                    <h3 class="card-title truncate" title=s.title.clone()>{s.title.clone()}</h3>
                    <p class="text-sm text-base-content/70 truncate" title=s.description.clone()>{s.description.clone()}</p>
                    <div class="flex flex-wrap gap-2 mt-2">
                        <span class="badge badge-primary">{s.price_label()}</span>
                        {s.location.clone().map(|loc| view! { <span class="badge badge-outline">{loc}</span> })}
                        <span class=active_class>{active_label}</span>
                        {s.admin_status.map(|st| view! { <span class="badge badge-outline">"Admin: " {st.as_str()}</span> })}
                    </div>
                    <div class="card-actions mt-3">
                        <button class="btn btn-primary btn-sm" on:click=move |_| router.navigate(&edit_path)>"Edit"</button>
                        <button class="btn btn-error btn-outline btn-sm" on:click=move |_| on_delete(id.clone())>"Delete"</button>
                        <button class="btn btn-ghost btn-sm" on:click=move |_| on_toggle(toggled.clone())>
                            {if s.is_active { "Set inactive" } else { "Set active" }}
                        </button>
                    </div>
                </div>
            </div>
        }
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-4">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-extrabold">"My Services"</h1>
                <Show when=move || approved.get()>
                    <Link to=AppRoute::CreateService.to_path() class="btn btn-primary btn-sm">"New Service"</Link>
                </Show>
            </div>

            <Show when=move || !approved.get()>
                <div role="alert" class="alert alert-info">
                    "You're not approved yet. You can view existing services but can't create new ones."
                </div>
            </Show>

            {move || {
                if loading.get() {
                    view! { <div class="flex justify-center py-16"><span class="loading loading-spinner loading-lg"></span></div> }.into_any()
                } else if items.with(Vec::is_empty) {
                    view! { <p class="text-center py-16 text-base-content/60">"No services yet."</p> }.into_any()
                } else {
                    view! {
                        <div class="grid gap-4 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4">
                            {items.get().into_iter().map(card).collect_view()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

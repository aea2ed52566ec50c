use crate::api::use_api;
use crate::components::service_form::{ServiceForm, ServiceFormFields};
use crate::components::toast::use_toast;
use crate::web::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::AppRoute;
use lifeease::catalog;

/// 创建（`id` 为空）或编辑服务
#[component]
pub fn ServiceEditorPage(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let api = use_api();
    let toast = use_toast();
    let router = use_router();

    let form = ServiceForm::new();
    let editing = id.is_some();
    let id = StoredValue::new(id);
    let (loading, set_loading) = signal(editing);
    let (saving, set_saving) = signal(false);

    // 编辑模式下载入服务
    Effect::new(move |_| {
        let Some(service_id) = id.get_value() else {
            return;
        };
        let api = api.get();
        spawn_local(async move {
            match api.get_owned_service(&service_id).await {
                Ok(service) => form.fill(&service),
                Err(e) => {
                    tracing::warn!(service_id = %service_id, error = %e, "failed to load owned service");
                    toast.error(lifeease::AppError::from(e).user_message("Failed to load service"));
                    router.replace(&AppRoute::MyServices.to_path());
                }
            }
            set_loading.set(false);
        });
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let input = form.to_input();
        let images = form.image_edits();
        let is_active = form.is_active.get_untracked();
        let api = api.get();
        set_saving.set(true);
        spawn_local(async move {
            let result = match id.get_value() {
                Some(service_id) => catalog::update_service(&api, &service_id, &input, images, is_active).await,
                None => catalog::create_service(&api, &input, images.uploads).await,
            };
            match result {
                Ok(_) => {
                    form.clear_picked();
                    toast.success(if editing { "Service updated" } else { "Service created" });
                    router.navigate(&AppRoute::MyServices.to_path());
                }
                Err(e) if e.is_validation() => toast.warning(e.user_message("Save failed")),
                Err(e) => toast.error(e.user_message("Save failed")),
            }
            set_saving.set(false);
        });
    };

    let on_toggle = move |_| {
        let Some(service_id) = id.get_value() else {
            return;
        };
        let next = !form.is_active.get_untracked();
        let api = api.get();
        spawn_local(async move {
            match catalog::set_active(&api, &service_id, next).await {
                Ok(service) => {
                    form.is_active.set(service.is_active);
                    toast.success(if service.is_active { "Service activated" } else { "Service deactivated" });
                }
                Err(e) => toast.error(e.user_message("Update failed")),
            }
        });
    };

    let on_delete = move |_| {
        let Some(service_id) = id.get_value() else {
            return;
        };
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Delete this service?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = api.get();
        spawn_local(async move {
            match catalog::delete_service(&api, &service_id).await {
                Ok(()) => {
                    toast.success("Service deleted");
                    router.navigate(&AppRoute::MyServices.to_path());
                }
                Err(e) => toast.error(e.user_message("Delete failed")),
            }
        });
    };

    view! {
        <div class="max-w-3xl mx-auto p-4 md:p-8">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex items-center justify-between">
                        <h1 class="card-title text-2xl">{if editing { "Edit Service" } else { "Create Service" }}</h1>
                        <Link to=AppRoute::MyServices.to_path() class="btn btn-ghost btn-sm">"Back"</Link>
                    </div>

                    <Show
                        when=move || !loading.get()
                        fallback=|| view! { <div class="flex justify-center py-16"><span class="loading loading-spinner loading-lg"></span></div> }
                    >
                        <form on:submit=on_submit class="space-y-4">
                            <ServiceFormFields form=form api=api />

                            <div class="flex flex-wrap gap-2 justify-end">
                                <Show when=move || editing>
                                    <button type="button" class="btn btn-outline btn-sm" on:click=on_toggle>
                                        {move || if form.is_active.get() { "Deactivate" } else { "Activate" }}
                                    </button>
                                    <button type="button" class="btn btn-error btn-outline btn-sm" on:click=on_delete>"Delete"</button>
                                </Show>
                                <button type="submit" class="btn btn-primary btn-sm" disabled=move || saving.get()>
                                    {move || if saving.get() { "Saving…" } else { "Save" }}
                                </button>
                            </div>
                        </form>
                    </Show>
                </div>
            </div>
        </div>
    }
}

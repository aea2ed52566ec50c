use crate::api::use_api;
use crate::auth::{AuthContext, use_auth};
use crate::components::provider_approval::ProviderApproval;
use crate::components::toast::use_toast;
use crate::web::{Link, read_file, take_selected_files, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::AppRoute;
use lifeease::config::DEFAULT_AVATAR_IMAGE;
use lifeease_shared::Role;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();
    let router = use_router();

    let editing = RwSignal::new(false);
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let (saving, set_saving) = signal(false);
    let (uploading, set_uploading) = signal(false);

    let user = move || auth.session.with(|s| s.as_ref().map(|s| s.user.clone()));

    let avatar_src = move || {
        user()
            .and_then(|u| u.avatar)
            .filter(|a| !a.is_empty())
            .map(|a| api.asset_url(&a))
            .unwrap_or_else(|| DEFAULT_AVATAR_IMAGE.to_string())
    };

    let start_edit = move |_| {
        if let Some(u) = user() {
            name.set(u.name);
            email.set(u.email);
        }
        editing.set(true);
    };

    let on_avatar = move |ev: web_sys::Event| {
        let Some(file) = take_selected_files(&ev).into_iter().next() else {
            return;
        };
        set_uploading.set(true);
        spawn_local(async move {
            let result = match read_file(&file).await {
                Ok(upload) => lifeease::auth::change_avatar(&api.get(), &AuthContext::store(), upload).await,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(session) => {
                    auth.set_session(session);
                    toast.success("Avatar updated!");
                }
                Err(e) => toast.error(e.user_message("Failed to upload avatar")),
            }
            set_uploading.set(false);
        });
    };

    let on_save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);
        spawn_local(async move {
            let result = lifeease::auth::update_profile(
                &api.get(),
                &AuthContext::store(),
                &name.get_untracked(),
                &email.get_untracked(),
            )
            .await;
            match result {
                Ok(session) => {
                    auth.set_session(session);
                    editing.set(false);
                    toast.success("Profile updated!");
                }
                Err(e) if e.is_validation() => toast.warning(e.user_message("Failed to update profile")),
                Err(e) => toast.error(e.user_message("Failed to update profile")),
            }
            set_saving.set(false);
        });
    };

    let on_logout = move |_| {
        auth.logout();
        toast.info("Logged out");
        router.navigate(&AppRoute::Home.to_path());
    };

    let is_provider = move || auth.role() == Some(Role::ServiceProvider);

    view! {
        <div class="max-w-5xl mx-auto p-4 md:p-8 space-y-6">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <div class="flex flex-col md:flex-row gap-6 items-center md:items-start">
                        <div class="flex flex-col items-center gap-2">
                            <div class="avatar">
                                <div class="w-28 rounded-full ring ring-primary ring-offset-2">
                                    <img src=avatar_src alt="avatar" />
                                </div>
                            </div>
                            <label class="btn btn-outline btn-xs" class:btn-disabled=move || uploading.get()>
                                {move || if uploading.get() { "Uploading…" } else { "Change avatar" }}
                                <input type="file" accept="image/*" class="hidden" on:change=on_avatar />
                            </label>
                        </div>

                        <div class="flex-1 w-full">
                            <Show
                                when=move || editing.get()
                                fallback=move || view! {
                                    <h2 class="text-2xl font-bold">{move || user().map(|u| u.name).unwrap_or_default()}</h2>
                                    <p class="text-base-content/70">{move || user().map(|u| u.email).unwrap_or_default()}</p>
                                    <span class="badge badge-secondary mt-2">
                                        {move || auth.role().map(|r| r.label()).unwrap_or_default()}
                                    </span>
                                    <div class="flex gap-2 mt-4">
                                        <button class="btn btn-primary btn-sm" on:click=start_edit>"Edit profile"</button>
                                        <Show when=is_provider>
                                            <Link to=AppRoute::MyServices.to_path() class="btn btn-outline btn-sm">"My Services"</Link>
                                        </Show>
                                        <button class="btn btn-ghost btn-sm" on:click=on_logout>"Logout"</button>
                                    </div>
                                }
                            >
                                <form class="space-y-3" on:submit=on_save>
                                    <input
                                        type="text"
                                        placeholder="Name"
                                        class="input input-bordered w-full"
                                        on:input=move |ev| name.set(event_target_value(&ev))
                                        prop:value=move || name.get()
                                    />
                                    <input
                                        type="email"
                                        placeholder="Email"
                                        class="input input-bordered w-full"
                                        on:input=move |ev| email.set(event_target_value(&ev))
                                        prop:value=move || email.get()
                                    />
                                    <div class="flex gap-2">
                                        <button type="submit" class="btn btn-primary btn-sm" disabled=move || saving.get()>"Save"</button>
                                        <button type="button" class="btn btn-ghost btn-sm" on:click=move |_| editing.set(false)>"Cancel"</button>
                                    </div>
                                </form>
                            </Show>
                        </div>
                    </div>
                </div>
            </div>

            <Show when=is_provider>
                <ProviderApproval />
            </Show>
        </div>
    }
}

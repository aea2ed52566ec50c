//! 管理后台
//!
//! 统计卡片、服务商审核队列和用户列表。管理员页面不显示主导航栏，
//! 因此这里自带登出按钮。

use crate::api::{ApiHandle, use_api};
use crate::auth::use_auth;
use crate::components::toast::{ToastContext, use_toast};
use crate::web::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::config::ADMIN_USERS_PAGE_SIZE;
use lifeease::{AppError, AppRoute};
use lifeease_shared::protocol::ListUsersRequest;
use lifeease_shared::{AdminStats, ApprovalStatus, Role, User};

fn load_failed(toast: ToastContext, what: &str, err: lifeease::ApiError) {
    tracing::warn!(error = %err, "failed to load {}", what);
    toast.error(AppError::from(err).user_message(&format!("Failed to load {}", what)));
}

#[component]
fn StatsCards(api: ApiHandle, refresh: ReadSignal<u32>) -> impl IntoView {
    let toast = use_toast();
    let (stats, set_stats) = signal(AdminStats::default());

    Effect::new(move |_| {
        refresh.track();
        let api = api.get();
        spawn_local(async move {
            match api.admin_stats().await {
                Ok(s) => set_stats.set(s),
                Err(e) => load_failed(toast, "stats", e),
            }
        });
    });

    let card = move |title: &'static str, value: fn(&AdminStats) -> u64| {
        view! {
            <div class="stat">
                <div class="stat-title">{title}</div>
                <div class="stat-value text-primary">{move || stats.with(value)}</div>
            </div>
        }
    };

    view! {
        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
            {card("Users", |s| s.total_users)}
            {card("Providers", |s| s.total_providers)}
            {card("Pending", |s| s.pending_providers)}
            {card("Approved", |s| s.approved_providers)}
            {card("Rejected", |s| s.rejected_providers)}
            {card("Services", |s| s.total_services)}
        </div>
    }
}

#[component]
fn ProviderQueue(api: ApiHandle, set_refresh: WriteSignal<u32>) -> impl IntoView {
    let toast = use_toast();
    let status = RwSignal::new(Some(ApprovalStatus::Pending));
    let (providers, set_providers) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(false);

    let fetch = move || {
        let api = api.get();
        let filter = status.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            match api.list_providers(filter).await {
                Ok(list) => set_providers.set(list),
                Err(e) => load_failed(toast, "providers", e),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        status.track();
        fetch();
    });

    let review = move |user_id: String, approve: bool| {
        let api = api.get();
        spawn_local(async move {
            let result = if approve {
                api.approve_provider(&user_id).await
            } else {
                api.reject_provider(&user_id).await
            };
            match result {
                Ok(resp) => {
                    let fallback = if approve { "Provider approved" } else { "Provider rejected" };
                    toast.success(resp.message.unwrap_or_else(|| fallback.to_string()));
                    tracing::info!(user_id = %user_id, approve, "provider reviewed");
                }
                Err(e) => toast.error(AppError::from(e).user_message("Review failed")),
            }
            fetch();
            set_refresh.update(|n| *n += 1);
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h2 class="card-title">"Provider Approvals"</h2>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| status.set(ApprovalStatus::parse(&event_target_value(&ev)))
                        prop:value=move || status.get().map(|s| s.as_str()).unwrap_or("")
                    >
                        <option value="">"All"</option>
                        {ApprovalStatus::ALL.iter().map(|s| view! { <option value={s.as_str()}>{s.as_str()}</option> }).collect_view()}
                    </select>
                </div>

                {move || {
                    if loading.get() {
                        return view! { <div class="flex justify-center py-8"><span class="loading loading-spinner"></span></div> }.into_any();
                    }
                    if providers.with(Vec::is_empty) {
                        return view! { <p class="text-center py-8 text-base-content/60">"No providers in this state."</p> }.into_any();
                    }
                    view! {
                        <div class="overflow-x-auto">
                            <table class="table table-zebra">
                                <thead>
                                    <tr><th>"Name"</th><th>"Company"</th><th>"License"</th><th>"Status"</th><th></th></tr>
                                </thead>
                                <tbody>
                                    {providers.get().into_iter().map(|u| {
                                        let profile = u.service_provider_profile.clone().unwrap_or_default();
                                        let state = u.approval_status();
                                        let approve_id = u.id.clone();
                                        let reject_id = u.id.clone();
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="font-bold">{u.name.clone()}</div>
                                                    <div class="text-sm opacity-60">{u.email.clone()}</div>
                                                </td>
                                                <td>{profile.company_name}</td>
                                                <td>{profile.business_license_number}</td>
                                                <td><span class="badge badge-outline">{state.map(|s| s.as_str()).unwrap_or("—")}</span></td>
                                                <td class="flex gap-1">
                                                    <button
                                                        class="btn btn-success btn-xs"
                                                        disabled={state == Some(ApprovalStatus::Approved)}
                                                        on:click=move |_| review(approve_id.clone(), true)
                                                    >"Approve"</button>
                                                    <button
                                                        class="btn btn-error btn-xs"
                                                        disabled={state == Some(ApprovalStatus::Rejected)}
                                                        on:click=move |_| review(reject_id.clone(), false)
                                                    >"Reject"</button>
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                    .into_any()
                }}
            </div>
        </div>
    }
}

#[component]
fn UserList(api: ApiHandle) -> impl IntoView {
    let toast = use_toast();
    let search = RwSignal::new(String::new());
    let role = RwSignal::new(Option::<Role>::None);
    let (users, set_users) = signal(Vec::<User>::new());
    let (page, set_page) = signal(1u32);
    let (pages, set_pages) = signal(1u32);

    let fetch = move |target: u32| {
        let request = ListUsersRequest {
            page: target,
            limit: ADMIN_USERS_PAGE_SIZE,
            search: Some(search.get_untracked()).filter(|s| !s.trim().is_empty()),
            role: role.get_untracked(),
        };
        let api = api.get();
        spawn_local(async move {
            match api.list_users(&request).await {
                Ok(result) => {
                    set_page.set(result.current_page());
                    set_pages.set(result.total_pages());
                    set_users.set(result.items);
                }
                Err(e) => load_failed(toast, "users", e),
            }
        });
    };

    Effect::new(move |_| {
        role.track();
        fetch(1);
    });

    let on_search = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        fetch(1);
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">"Users"</h2>
                <form class="flex flex-wrap gap-2" on:submit=on_search>
                    <input
                        type="text"
                        placeholder="Search name or email"
                        class="input input-bordered input-sm"
                        on:input=move |ev| search.set(event_target_value(&ev))
                        prop:value=move || search.get()
                    />
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| role.set(Role::parse(&event_target_value(&ev)))
                        prop:value=move || role.get().map(|r| r.as_str()).unwrap_or("")
                    >
                        <option value="">"All roles"</option>
                        {Role::ALL.iter().map(|r| view! { <option value={r.as_str()}>{r.label()}</option> }).collect_view()}
                    </select>
                    <button type="submit" class="btn btn-primary btn-sm">"Search"</button>
                </form>

                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr><th>"Name"</th><th>"Email"</th><th>"Role"</th><th>"Joined"</th></tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || users.get()
                                key=|u| u.id.clone()
                                children=|u| view! {
                                    <tr>
                                        <td>{u.name.clone()}</td>
                                        <td>{u.email.clone()}</td>
                                        <td><span class="badge badge-ghost">{u.role.label()}</span></td>
                                        <td>{u.created_at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()}</td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </div>

                <div class="flex justify-center">
                    <div class="join">
                        {move || {
                            (1..=pages.get())
                                .map(|p| {
                                    let class = if p == page.get() { "join-item btn btn-sm btn-active" } else { "join-item btn btn-sm" };
                                    view! { <button class=class on:click=move |_| fetch(p)>{p}</button> }
                                })
                                .collect_view()
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn AdminPanelPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();
    let router = use_router();
    let (refresh, set_refresh) = signal(0u32);

    let on_logout = move |_| {
        auth.logout();
        toast.info("Logged out");
        router.navigate(&AppRoute::Home.to_path());
    };

    view! {
        <div class="max-w-7xl mx-auto p-4 md:p-8 space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-extrabold">"Admin Panel"</h1>
                    <p class="text-base-content/60">"Manage users, services, and approvals."</p>
                </div>
                <button class="btn btn-outline btn-sm" on:click=on_logout>"Logout"</button>
            </div>
            <StatsCards api=api refresh=refresh />
            <ProviderQueue api=api set_refresh=set_refresh />
            <UserList api=api />
        </div>
    }
}

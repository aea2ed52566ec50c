//! 服务商审核资料
//!
//! 展示当前审核状态，并允许提交或重新提交资料。提交后重新拉取资料刷新状态。

use crate::api::{ApiHandle, use_api};
use crate::auth::{AuthContext, use_auth};
use crate::components::toast::{ToastContext, use_toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::AppError;
use lifeease::validation::{ProviderInput, merge_service_tags};
use lifeease_shared::{ApprovalStatus, BUSINESS_TYPES, ServiceProviderProfile};

/// 表单状态：将零散的 signal 整合在一起，负责回填与转换
#[derive(Clone, Copy)]
struct ProviderForm {
    company_name: RwSignal<String>,
    business_type: RwSignal<String>,
    business_license_number: RwSignal<String>,
    phone_number: RwSignal<String>,
    website: RwSignal<String>,
    address: RwSignal<String>,
    description: RwSignal<String>,
    services: RwSignal<Vec<String>>,
    services_input: RwSignal<String>,
    experience_years: RwSignal<String>,
}

impl ProviderForm {
    fn new() -> Self {
        Self {
            company_name: RwSignal::new(String::new()),
            business_type: RwSignal::new(String::new()),
            business_license_number: RwSignal::new(String::new()),
            phone_number: RwSignal::new(String::new()),
            website: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            services: RwSignal::new(Vec::new()),
            services_input: RwSignal::new(String::new()),
            experience_years: RwSignal::new(String::new()),
        }
    }

    /// 用已提交的资料回填表单
    fn fill(&self, profile: &ServiceProviderProfile) {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        self.company_name.set(profile.company_name.clone());
        self.business_type.set(text(&profile.business_type));
        self.business_license_number
            .set(profile.business_license_number.clone());
        self.phone_number.set(text(&profile.phone_number));
        self.website.set(text(&profile.website));
        self.address.set(text(&profile.address));
        self.description.set(text(&profile.description));
        self.services.set(profile.services.clone());
        self.services_input.set(String::new());
        self.experience_years.set(
            profile
                .experience_years
                .map(|y| y.to_string())
                .unwrap_or_default(),
        );
    }

    fn add_tags(&self) {
        let raw = self.services_input.get();
        self.services
            .update(|tags| *tags = merge_service_tags(tags, &raw));
        self.services_input.set(String::new());
    }

    fn remove_tag(&self, idx: usize) {
        self.services.update(|tags| {
            if idx < tags.len() {
                tags.remove(idx);
            }
        });
    }

    fn to_input(&self) -> ProviderInput {
        ProviderInput {
            company_name: self.company_name.get(),
            business_type: self.business_type.get(),
            business_license_number: self.business_license_number.get(),
            phone_number: self.phone_number.get(),
            website: self.website.get(),
            address: self.address.get(),
            description: self.description.get(),
            services: self.services.get(),
            experience_years: self.experience_years.get(),
        }
    }
}

/// 刷新资料并同步到表单与会话
async fn reload(api: ApiHandle, auth: AuthContext, form: ProviderForm, status: RwSignal<Option<ApprovalStatus>>) {
    match lifeease::auth::refresh_profile(&api.get(), &AuthContext::store()).await {
        Ok(session) => {
            let profile = session.user.service_provider_profile.clone();
            status.set(profile.as_ref().and_then(|p| p.approval_status));
            if let Some(profile) = &profile {
                form.fill(profile);
            }
            auth.set_session(session);
        }
        // 非服务商或网络错误时保持原样
        Err(e) => tracing::warn!(error = %e, "failed to refresh provider profile"),
    }
}

fn report(toast: ToastContext, err: &AppError, fallback: &str) {
    if err.is_validation() {
        toast.warning(err.user_message(fallback));
    } else {
        toast.error(err.user_message(fallback));
    }
}

#[component]
pub fn ProviderApproval() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let toast = use_toast();

    let form = ProviderForm::new();
    let status = RwSignal::new(auth.session.with_untracked(|s| {
        s.as_ref().and_then(|s| s.user.approval_status())
    }));
    let (loading, set_loading) = signal(true);
    let (submitting, set_submitting) = signal(false);

    Effect::new(move |_| {
        spawn_local(async move {
            reload(api, auth, form, status).await;
            set_loading.set(false);
        });
    });

    let on_submit = move |_| {
        set_submitting.set(true);
        let input = form.to_input();
        spawn_local(async move {
            let store = AuthContext::store();
            match lifeease::auth::submit_provider_profile(&api.get(), &store, &input).await {
                Ok(_) => {
                    toast.success("Submitted for approval. You will be notified once reviewed.");
                    reload(api, auth, form, status).await;
                }
                Err(e) => report(toast, &e, "Submit failed"),
            }
            set_submitting.set(false);
        });
    };

    let submit_label = move || match status.get() {
        Some(ApprovalStatus::Rejected) => "Resubmit for Approval",
        Some(_) => "Update Submission",
        None => "Submit for Approval",
    };

    let text_field = move |label: &'static str, signal: RwSignal<String>| {
        view! {
            <label class="form-control w-full">
                <div class="label"><span class="label-text">{label}</span></div>
                <input
                    type="text"
                    class="input input-bordered input-sm w-full"
                    on:input=move |ev| signal.set(event_target_value(&ev))
                    prop:value=move || signal.get()
                />
            </label>
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">"Service Provider Verification"</h2>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! { <div class="flex justify-center py-8"><span class="loading loading-spinner loading-lg"></span></div> }
                >
                    {move || match status.get() {
                        Some(ApprovalStatus::Approved) => view! {
                            <div role="alert" class="alert alert-success">"Approved. You can now create and manage services."</div>
                        }.into_any(),
                        Some(ApprovalStatus::Pending) => view! {
                            <div role="alert" class="alert alert-info">"Your profile is under review. You'll be able to list services once approved."</div>
                        }.into_any(),
                        Some(ApprovalStatus::Rejected) => view! {
                            <div role="alert" class="alert alert-warning">"Your previous submission was rejected. Please correct details and resubmit."</div>
                        }.into_any(),
                        None => ().into_any(),
                    }}

                    <div class="grid gap-3 md:grid-cols-2">
                        {text_field("Company Name *", form.company_name)}
                        <label class="form-control w-full">
                            <div class="label"><span class="label-text">"Business Type"</span></div>
                            <select
                                class="select select-bordered select-sm w-full"
                                on:change=move |ev| form.business_type.set(event_target_value(&ev))
                                prop:value=move || form.business_type.get()
                            >
                                <option value="">"Select type"</option>
                                {BUSINESS_TYPES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect_view()}
                            </select>
                        </label>
                        {text_field("Business License Number *", form.business_license_number)}
                        {text_field("Phone Number", form.phone_number)}
                        {text_field("Website (https://...)", form.website)}
                        <label class="form-control w-full">
                            <div class="label"><span class="label-text">"Experience (years)"</span></div>
                            <input
                                type="number"
                                min="0"
                                class="input input-bordered input-sm w-full"
                                on:input=move |ev| form.experience_years.set(event_target_value(&ev))
                                prop:value=move || form.experience_years.get()
                            />
                        </label>
                    </div>
                    {text_field("Address", form.address)}
                    <label class="form-control w-full">
                        <div class="label"><span class="label-text">"Business Description"</span></div>
                        <textarea
                            class="textarea textarea-bordered w-full"
                            rows="3"
                            on:input=move |ev| form.description.set(event_target_value(&ev))
                            prop:value=move || form.description.get()
                        ></textarea>
                    </label>

                    <div class="flex gap-2 items-end">
                        <div class="flex-1">{text_field("Services (comma-separated)", form.services_input)}</div>
                        <button type="button" class="btn btn-outline btn-sm" on:click=move |_| form.add_tags()>"Add Service"</button>
                    </div>
                    <div class="flex flex-wrap gap-2">
                        {move || form.services.get().into_iter().enumerate().map(|(idx, tag)| view! {
                            <span class="badge badge-lg gap-1">
                                {tag}
                                <button type="button" class="btn btn-ghost btn-xs" on:click=move |_| form.remove_tag(idx)>"✕"</button>
                            </span>
                        }).collect_view()}
                    </div>

                    <div class="card-actions justify-end">
                        <button class="btn btn-primary" disabled=move || submitting.get() on:click=on_submit>
                            {submit_label}
                        </button>
                    </div>
                </Show>
            </div>
        </div>
    }
}

//! 登录 / 注册弹窗

use crate::api::use_api;
use crate::auth::{AuthContext, AuthMode, use_auth};
use crate::components::toast::use_toast;
use crate::web::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::landing_for;
use lifeease::validation::RegisterInput;

/// 弹窗表单状态
#[derive(Clone, Copy)]
struct AuthForm {
    name: RwSignal<String>,
    email: RwSignal<String>,
    password: RwSignal<String>,
    confirm_password: RwSignal<String>,
    is_service_provider: RwSignal<bool>,
}

impl AuthForm {
    fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
            is_service_provider: RwSignal::new(false),
        }
    }

    fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.confirm_password.set(String::new());
        self.is_service_provider.set(false);
    }

    fn to_register_input(&self) -> RegisterInput {
        RegisterInput {
            name: self.name.get(),
            email: self.email.get(),
            password: self.password.get(),
            confirm_password: self.confirm_password.get(),
            is_service_provider: self.is_service_provider.get(),
        }
    }
}

#[component]
pub fn AuthModal() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();
    let toast = use_toast();

    let form = AuthForm::new();
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (is_submitting, set_is_submitting) = signal(false);

    let mode = move || auth.modal.get();
    let is_register = move || mode() == Some(AuthMode::Register);

    let close = move || {
        auth.close_modal();
        form.reset();
        set_error_msg.set(None);
    };

    let switch_mode = move |_| {
        let next = if is_register() {
            AuthMode::Login
        } else {
            AuthMode::Register
        };
        set_error_msg.set(None);
        auth.open_modal(next);
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let register_mode = is_register();
        let api = api.get();
        spawn_local(async move {
            if register_mode {
                match lifeease::auth::register(&api, &form.to_register_input()).await {
                    Ok(message) => {
                        toast.success(message);
                        form.password.set(String::new());
                        form.confirm_password.set(String::new());
                        auth.open_modal(AuthMode::Login);
                    }
                    Err(e) => set_error_msg.set(Some(e.user_message("Registration failed"))),
                }
            } else {
                let store = AuthContext::store();
                match lifeease::auth::login(&api, &store, &form.email.get_untracked(), &form.password.get_untracked()).await {
                    Ok(session) => {
                        let landing = landing_for(session.role());
                        auth.set_session(session);
                        toast.success("Welcome back!");
                        close();
                        router.navigate(&landing.to_path());
                    }
                    Err(e) => set_error_msg.set(Some(e.user_message("Login failed"))),
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Show when=move || mode().is_some()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg mb-4">
                        {move || if is_register() { "Create an account" } else { "Login" }}
                    </h3>

                    <form class="space-y-3" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <Show when=is_register>
                            <input
                                type="text"
                                placeholder="Name"
                                class="input input-bordered w-full"
                                on:input=move |ev| form.name.set(event_target_value(&ev))
                                prop:value=move || form.name.get()
                            />
                        </Show>
                        <input
                            type="email"
                            placeholder="Email"
                            class="input input-bordered w-full"
                            on:input=move |ev| form.email.set(event_target_value(&ev))
                            prop:value=move || form.email.get()
                        />
                        <input
                            type="password"
                            placeholder="Password"
                            class="input input-bordered w-full"
                            on:input=move |ev| form.password.set(event_target_value(&ev))
                            prop:value=move || form.password.get()
                        />
                        <Show when=is_register>
                            <input
                                type="password"
                                placeholder="Confirm password"
                                class="input input-bordered w-full"
                                on:input=move |ev| form.confirm_password.set(event_target_value(&ev))
                                prop:value=move || form.confirm_password.get()
                            />
                            <label class="label cursor-pointer justify-start gap-2">
                                <input
                                    type="checkbox"
                                    class="checkbox checkbox-primary"
                                    on:change=move |ev| form.is_service_provider.set(event_target_checked(&ev))
                                    prop:checked=move || form.is_service_provider.get()
                                />
                                <span class="label-text">"Register as a service provider"</span>
                            </label>
                        </Show>

                        <div class="modal-action">
                            <button type="button" class="btn btn-ghost" on:click=move |_| close()>"Cancel"</button>
                            <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any()
                                } else if is_register() {
                                    "Register".into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                    </form>

                    <p class="text-sm text-center mt-4">
                        {move || if is_register() { "Already have an account?" } else { "New to LifeEase?" }}
                        " "
                        <button type="button" class="link link-primary" on:click=switch_mode>
                            {move || if is_register() { "Login" } else { "Register" }}
                        </button>
                    </p>
                </div>
            </div>
        </Show>
    }
}

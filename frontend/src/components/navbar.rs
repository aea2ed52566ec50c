use crate::auth::{AuthMode, use_auth};
use crate::components::toast::use_toast;
use crate::web::{Link, use_router};
use leptos::prelude::*;
use lifeease::{AppRoute, shows_primary_nav};
use lifeease_shared::Role;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let toast = use_toast();
    let path = router.current_path();

    let visible = move || shows_primary_nav(auth.role(), &path.get());
    let role = move || auth.role();

    let on_logout = move |_| {
        auth.logout();
        toast.info("Logged out");
        router.navigate(&AppRoute::Home.to_path());
    };

    view! {
        <Show when=visible>
            <div class="navbar bg-base-100 shadow-md sticky top-0 z-30">
                <div class="flex-1 gap-2">
                    <Link to="/" class="btn btn-ghost text-xl">"LifeEase Japan"</Link>
                    <Link to="/services" class="btn btn-ghost btn-sm">"Services"</Link>
                </div>
                <div class="flex-none gap-2">
                    {move || match role() {
                        None => view! {
                            <button class="btn btn-ghost btn-sm" on:click=move |_| auth.open_modal(AuthMode::Login)>
                                "Login"
                            </button>
                            <button class="btn btn-primary btn-sm" on:click=move |_| auth.open_modal(AuthMode::Register)>
                                "Register"
                            </button>
                        }
                        .into_any(),
                        Some(role) => view! {
                            {match role {
                                Role::Admin => view! { <Link to="/admin" class="btn btn-ghost btn-sm">"Admin"</Link> }.into_any(),
                                _ => view! { <Link to="/dashboard" class="btn btn-ghost btn-sm">"Dashboard"</Link> }.into_any(),
                            }}
                            <Show when=move || role == Role::ServiceProvider>
                                <Link to="/provider/services" class="btn btn-ghost btn-sm">"My Services"</Link>
                            </Show>
                            <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>
                                "Logout"
                            </button>
                        }
                        .into_any(),
                    }}
                </div>
            </div>
        </Show>
    }
}

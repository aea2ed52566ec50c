use crate::web::Link;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="hero min-h-[calc(100vh-4rem)] bg-base-200" style="background-image: url(/slider1.jpg);">
            <div class="hero-overlay bg-black/40"></div>
            <div class="hero-content text-center text-neutral-content">
                <div class="max-w-xl">
                    <h1 class="mb-5 text-4xl md:text-5xl font-bold">"Welcome to LifeEase Japan"</h1>
                    <p class="mb-5 text-lg">
                        "Helping foreigners thrive in Japan with jobs, housing, and more."
                    </p>
                    <Link to="/services" class="btn btn-primary">"Browse services"</Link>
                </div>
            </div>
        </div>
    }
}

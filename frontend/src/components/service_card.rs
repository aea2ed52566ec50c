use crate::api::ApiHandle;
use crate::web::Link;
use leptos::prelude::*;
use lifeease::AppRoute;
use lifeease::media::service_cover;
use lifeease_shared::Service;

#[component]
pub fn ServiceCard(service: Service, api: ApiHandle) -> impl IntoView {
    let cover = service_cover(&api.base_url(), &service.images);
    let detail = AppRoute::ServiceDetail(service.id.clone()).to_path();
    let category = service
        .category
        .clone()
        .unwrap_or_else(|| "Service".to_string());
    let price = service.price_label();

    view! {
        <div class="card bg-base-100 shadow-xl h-full">
            <figure class="h-40">
                <img src=cover alt=service.title.clone() class="object-cover w-full h-full" />
            </figure>
            <div class="card-body p-4">
                <p class="text-sm text-base-content/60 truncate">{category}</p>
                <h3 class="card-title truncate" title=service.title.clone()>{service.title.clone()}</h3>
                <p class="text-sm text-base-content/70 truncate">{service.description.clone()}</p>
                <div class="flex flex-wrap gap-2 mt-2">
                    <span class="badge badge-primary">{price}</span>
                    {service.location.clone().map(|loc| view! { <span class="badge badge-outline">{loc}</span> })}
                </div>
                <div class="card-actions mt-3">
                    <Link to=detail class="btn btn-primary btn-sm btn-block">"View details"</Link>
                </div>
            </div>
        </div>
    }
}

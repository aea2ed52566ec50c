use leptos::prelude::*;
use lifeease::RequestTracker;

/// 全局加载遮罩：只要有请求在途就显示
#[component]
pub fn GlobalLoading() -> impl IntoView {
    let tracker = use_context::<RequestTracker>().expect("RequestTracker should be provided");
    let busy = RwSignal::new(tracker.is_busy());

    let subscription = tracker.subscribe(move |count| busy.set(count > 0));
    on_cleanup(move || subscription.unsubscribe());

    view! {
        <Show when=move || busy.get()>
            <div class="fixed inset-0 z-40 flex items-center justify-center bg-base-300/40 backdrop-blur-sm">
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </div>
        </Show>
    }
}

//! 服务编辑表单
//!
//! 创建与编辑共用同一份表单状态。已有图片可以标记移除，新选择的图片在提交时
//! 才上传。

use crate::api::ApiHandle;
use crate::components::toast::use_toast;
use crate::web::{PickedImage, pick_image, take_selected_files};
use leptos::prelude::*;
use leptos::task::spawn_local;
use lifeease::catalog::ImageEdits;
use lifeease::validation::ServiceInput;
use lifeease::UploadFile;
use lifeease_shared::{CURRENCIES, DEFAULT_CURRENCY, SERVICE_CATEGORIES, Service};
use std::collections::BTreeSet;

#[derive(Clone, Copy)]
pub struct ServiceForm {
    pub title: RwSignal<String>,
    pub category: RwSignal<String>,
    pub description: RwSignal<String>,
    pub price: RwSignal<String>,
    pub currency: RwSignal<String>,
    pub location: RwSignal<String>,
    pub is_active: RwSignal<bool>,
    /// 服务当前已有的图片路径
    pub existing: RwSignal<Vec<String>>,
    /// 被标记移除的已有图片下标
    pub removed: RwSignal<BTreeSet<usize>>,
    /// 待上传的新图片
    pub picked: RwSignal<Vec<PickedImage>>,
}

impl ServiceForm {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            category: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            price: RwSignal::new(String::new()),
            currency: RwSignal::new(DEFAULT_CURRENCY.to_string()),
            location: RwSignal::new(String::new()),
            is_active: RwSignal::new(true),
            existing: RwSignal::new(Vec::new()),
            removed: RwSignal::new(BTreeSet::new()),
            picked: RwSignal::new(Vec::new()),
        }
    }

    /// 用已保存的服务回填
    pub fn fill(&self, service: &Service) {
        self.title.set(service.title.clone());
        self.category.set(service.category.clone().unwrap_or_default());
        self.description.set(service.description.clone());
        self.price.set(service.price.to_string());
        self.currency.set(service.currency.clone());
        self.location.set(service.location.clone().unwrap_or_default());
        self.is_active.set(service.is_active);
        self.existing.set(service.images.clone());
        self.removed.set(BTreeSet::new());
        self.clear_picked();
    }

    pub fn to_input(&self) -> ServiceInput {
        ServiceInput {
            title: self.title.get_untracked(),
            category: self.category.get_untracked(),
            description: self.description.get_untracked(),
            price: self.price.get_untracked(),
            currency: self.currency.get_untracked(),
            location: self.location.get_untracked(),
        }
    }

    /// 待上传文件的副本
    pub fn uploads(&self) -> Vec<UploadFile> {
        self.picked
            .with_untracked(|p| p.iter().map(|img| img.upload.clone()).collect())
    }

    pub fn image_edits(&self) -> ImageEdits {
        ImageEdits {
            existing: self.existing.get_untracked(),
            removed: self.removed.get_untracked(),
            uploads: self.uploads(),
        }
    }

    pub fn toggle_removed(&self, idx: usize) {
        self.removed.update(|set| {
            if !set.remove(&idx) {
                set.insert(idx);
            }
        });
    }

    pub fn drop_picked(&self, idx: usize) {
        self.picked.update(|list| {
            if idx < list.len() {
                list.remove(idx).release();
            }
        });
    }

    pub fn clear_picked(&self) {
        self.picked.update(|list| {
            for img in list.drain(..) {
                img.release();
            }
        });
    }
}

impl Default for ServiceForm {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn ServiceFormFields(form: ServiceForm, api: ApiHandle) -> impl IntoView {
    let toast = use_toast();

    let on_pick = move |ev: web_sys::Event| {
        let files = take_selected_files(&ev);
        spawn_local(async move {
            for file in files {
                match pick_image(&file).await {
                    Ok(img) => form.picked.update(|list| list.push(img)),
                    Err(e) => {
                        tracing::warn!(file = %file.name(), error = %e, "failed to read image");
                        toast.error("Failed to read image");
                    }
                }
            }
        });
    };

    on_cleanup(move || form.clear_picked());

    view! {
        <div class="space-y-3">
            <input
                type="text"
                placeholder="Title *"
                class="input input-bordered w-full"
                on:input=move |ev| form.title.set(event_target_value(&ev))
                prop:value=move || form.title.get()
            />
            <div class="grid gap-3 md:grid-cols-3">
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| form.category.set(event_target_value(&ev))
                    prop:value=move || form.category.get()
                >
                    <option value="">"Category"</option>
                    {SERVICE_CATEGORIES.iter().map(|c| view! { <option value=*c>{*c}</option> }).collect_view()}
                </select>
                <input
                    type="number"
                    min="0"
                    step="any"
                    placeholder="Price *"
                    class="input input-bordered w-full"
                    on:input=move |ev| form.price.set(event_target_value(&ev))
                    prop:value=move || form.price.get()
                />
                <select
                    class="select select-bordered w-full"
                    on:change=move |ev| form.currency.set(event_target_value(&ev))
                    prop:value=move || form.currency.get()
                >
                    {CURRENCIES.iter().map(|c| view! { <option value=*c>{*c}</option> }).collect_view()}
                </select>
            </div>
            <input
                type="text"
                placeholder="Location"
                class="input input-bordered w-full"
                on:input=move |ev| form.location.set(event_target_value(&ev))
                prop:value=move || form.location.get()
            />
            <textarea
                placeholder="Description *"
                rows="5"
                class="textarea textarea-bordered w-full"
                on:input=move |ev| form.description.set(event_target_value(&ev))
                prop:value=move || form.description.get()
            ></textarea>

            <div class="space-y-2">
                <div class="flex items-center gap-2">
                    <span class="font-semibold">"Images"</span>
                    <label class="btn btn-outline btn-xs">
                        "Add images"
                        <input type="file" accept="image/*" multiple class="hidden" on:change=on_pick />
                    </label>
                </div>
                <div class="flex flex-wrap gap-3">
                    {move || {
                        form.existing.get().into_iter().enumerate().map(|(idx, path)| {
                            let removed = move || form.removed.with(|r| r.contains(&idx));
                            view! {
                                <div class="relative w-24 h-24">
                                    <img
                                        src=api.asset_url(&path)
                                        class="w-full h-full object-cover rounded-box"
                                        class:opacity-30=removed
                                    />
                                    <button
                                        type="button"
                                        class="btn btn-xs btn-circle absolute top-1 right-1"
                                        on:click=move |_| form.toggle_removed(idx)
                                    >
                                        {move || if removed() { "↺" } else { "✕" }}
                                    </button>
                                </div>
                            }
                        }).collect_view()
                    }}
                    {move || {
                        form.picked.get().into_iter().enumerate().map(|(idx, img)| view! {
                            <div class="relative w-24 h-24">
                                <img src=img.preview class="w-full h-full object-cover rounded-box ring ring-primary" />
                                <button
                                    type="button"
                                    class="btn btn-xs btn-circle absolute top-1 right-1"
                                    on:click=move |_| form.drop_picked(idx)
                                >"✕"</button>
                            </div>
                        }).collect_view()
                    }}
                </div>
            </div>
        </div>
    }
}

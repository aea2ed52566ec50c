//! 全局提示消息
//!
//! 任意组件都可以推送提示，消息在固定时间后自动消失。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use lifeease::config::NOTICE_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn alert_class(&self) -> &'static str {
        match self {
            ToastKind::Success => "alert alert-success shadow-lg",
            ToastKind::Error => "alert alert-error shadow-lg",
            ToastKind::Warning => "alert alert-warning shadow-lg",
            ToastKind::Info => "alert alert-info shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    kind: ToastKind,
    message: String,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastContext {
    fn new() -> Self {
        Self {
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| {
            list.push(Toast {
                id,
                kind,
                message: message.into(),
            })
        });

        let toasts = self.toasts;
        Timeout::new(NOTICE_DURATION_MS, move || {
            toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(ToastKind::Warning, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }
}

pub fn provide_toasts() -> ToastContext {
    let ctx = ToastContext::new();
    provide_context(ctx);
    ctx
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

#[component]
pub fn Toasts() -> impl IntoView {
    let ctx = use_toast();

    view! {
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=|toast| view! {
                    <div class=toast.kind.alert_class()>
                        <span>{toast.message}</span>
                    </div>
                }
            />
        </div>
    }
}

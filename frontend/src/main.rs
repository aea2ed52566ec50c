use leptos::prelude::*;
use lifeease_frontend::{App, init_logging_default};

// Use lol_alloc as the global allocator for smaller WASM size
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    init_logging_default();
    mount_to_body(App);
}

//! Shipmerge - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for uploading a shipment export, previewing the
//! aggregated table and downloading the processed CSV.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  MainContent                                                 │
//! │  ├── Hero (title, description)                               │
//! │  ├── UploadSection (until a table is ready)                  │
//! │  ├── LogsPanel (when logs exist)                             │
//! │  └── PreviewSection (table + download)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (PreviewTable, LogEntry, API responses)
//! - [`components`] - UI components
//! - [`services`] - Backend upload and browser download

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

pub mod components;
pub mod config;
pub mod services;
pub mod types;

pub use config::*;

pub use types::{
    AppError, AppResult, CsvInfo, ErrorBody, LogEntry, LogLevel, PreviewTable, ResponseMetadata,
    UploadResponse,
};

pub use components::*;

pub use services::*;

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Shipmerge - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (preview, set_preview) = create_signal(None::<PreviewTable>);
    let (is_processing, set_is_processing) = create_signal(false);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    init_sse_logs(set_logs);

    view! {
        <div class="container">
            <Hero/>

            <Show when=move || preview.get().is_none() fallback=|| view! {}>
                <UploadSection
                    set_preview=set_preview
                    set_is_processing=set_is_processing
                    set_logs=set_logs
                />
            </Show>

            <Show
                when=move || is_processing.get() || !logs.get().is_empty()
                fallback=|| view! {}
            >
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>

            <Show when=move || preview.get().is_some() fallback=|| view! {}>
                <PreviewSection preview=preview set_preview=set_preview set_logs=set_logs/>
            </Show>
        </div>

        <Footer/>
    }
}

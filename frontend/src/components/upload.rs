//! CSV upload component.
//!
//! Handles file selection, upload to the backend and conversion of the
//! response into a preview table. Errors are shown here and no preview is
//! produced.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlInputElement};

use super::logs::push_log;
use crate::services::upload_csv;
use crate::{LogEntry, LogLevel, PreviewTable, BACKEND_URL};

#[component]
pub fn UploadSection(
    set_preview: WriteSignal<Option<PreviewTable>>,
    set_is_processing: WriteSignal<bool>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);

        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        set_error.set(None);
        set_preview.set(None);
        set_logs.set(Vec::new());

        spawn_local(async move {
            set_is_uploading.set(true);
            set_is_processing.set(true);

            push_log(set_logs, LogLevel::Info, format!("📤 Uploading {}...", file.name()));

            match upload_csv(file, BACKEND_URL).await {
                Ok(response) => {
                    push_log(
                        set_logs,
                        LogLevel::Success,
                        format!(
                            "✅ {} input lines → {} shipment rows",
                            response.metadata.csv_info.row_count, response.metadata.total_rows
                        ),
                    );
                    set_preview.set(Some(PreviewTable::from_response(&response)));
                }
                Err(e) => {
                    push_log(set_logs, LogLevel::Error, format!("❌ {}", e));
                    set_error.set(Some(e.to_string()));
                }
            }

            set_is_uploading.set(false);
            set_is_processing.set(false);
        });
    };

    let trigger_file_input = move |_| {
        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"));
        if let Some(html_input) = input.as_ref().and_then(|i| i.dyn_ref::<HtmlInputElement>()) {
            html_input.click();
        }
    };

    view! {
        <div class="upload-section" id="uploadZone" on:click=trigger_file_input>
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ Uploading and processing..."
                } else {
                    "Upload your CSV file"
                }}
            </div>

            <Show when=move || !is_uploading.get() fallback=|| view! {}>
                <div class="upload-hint">
                    "Required columns: Delivery Number, Product ID, Quantity, Carrier, Planned Ship Date, ..."
                </div>
            </Show>

            <Show when=move || error.get().is_some() fallback=|| view! {}>
                <div class="error-message">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=".csv"
                style="display:none"
                on:change=on_file_change
                on:click=|ev| ev.stop_propagation()
            />
        </div>
    }
}

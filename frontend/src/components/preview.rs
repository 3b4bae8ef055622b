//! Preview of the processed table with the download action.

use leptos::*;

use super::logs::push_log;
use crate::services::save_csv;
use crate::{LogEntry, LogLevel, PreviewTable, DEFAULT_DOWNLOAD_NAME};

#[component]
pub fn PreviewSection(
    preview: ReadSignal<Option<PreviewTable>>,
    set_preview: WriteSignal<Option<PreviewTable>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let on_download = move |_| {
        let Some(table) = preview.get() else {
            return;
        };
        let file_name = if table.file_name.is_empty() {
            DEFAULT_DOWNLOAD_NAME.to_string()
        } else {
            table.file_name.clone()
        };

        match save_csv(&table.csv, &file_name) {
            Ok(()) => push_log(set_logs, LogLevel::Success, format!("💾 Downloaded {}", file_name)),
            Err(e) => push_log(set_logs, LogLevel::Error, format!("❌ {}", e)),
        }
    };

    let on_reset = move |_| {
        log::info!("🚫 Reset - back to upload");
        set_preview.set(None);
        set_logs.set(vec![]);
    };

    let columns = move || preview.get().map(|t| t.columns).unwrap_or_default();
    let rows = move || preview.get().map(|t| t.rows).unwrap_or_default();

    view! {
        <div class="preview-section show" id="previewSection">
            <div class="preview-header">
                <div class="preview-title">"Processed Data:"</div>
                <button class="btn btn-secondary" on:click=on_reset>"Upload another file"</button>
            </div>

            <div class="preview-table-wrapper">
                <table class="preview-table">
                    <thead>
                        <tr>
                            <For
                                each=columns
                                key=|col| col.clone()
                                children=|col| view! { <th>{col}</th> }
                            />
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows().into_iter().enumerate()
                            key=|(idx, _)| *idx
                            children=|(_, row)| {
                                view! {
                                    <tr>
                                        {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>

            <div class="preview-footer">
                <div class="preview-count">
                    <strong>{move || rows().len()}</strong> " rows"
                </div>
                <button class="btn btn-primary" id="downloadBtn" on:click=on_download>
                    "Download Processed CSV"
                </button>
            </div>
        </div>
    }
}

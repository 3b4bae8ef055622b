//! Browser download of the processed CSV.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::{AppError, AppResult};

/// Offer `csv` to the user as a file named `file_name`.
pub fn save_csv(csv: &str, file_name: &str) -> AppResult<()> {
    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(csv));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8");

    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(|e| AppError::Download(format!("Failed to create Blob: {:?}", e)))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| AppError::Download(format!("Failed to create URL: {:?}", e)))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document available".into()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| AppError::Download(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|_| AppError::Download("Element is not an anchor".into()))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    revoke_later(url);
    log::info!("💾 Saved {}", file_name);

    Ok(())
}

/// Delay before the object URL is released. Revoking right after `click()`
/// cancels the download in some browsers.
const REVOKE_DELAY_MS: u32 = 1_000;

fn revoke_later(url: String) {
    Timeout::new(REVOKE_DELAY_MS, move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("Failed to revoke {}: {:?}", url, e);
        }
    })
    .forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_outlives_click() {
        assert!(REVOKE_DELAY_MS >= 500);
    }
}

//! Hero section component

use leptos::*;

use crate::APP_NAME;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{APP_NAME} " - CSV File Processor"</h1>
            <p class="subtitle">
                "Upload a shipment export. Ship dates are reformatted, the carrier moves to "
                "Shipping Conditions and quantities are summed per delivery and product."
            </p>
        </div>
    }
}

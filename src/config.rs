//! Runtime Configuration
//!
//! Build-time defaults, overridden by a JSON `<meta name="taskboard-config">`
//! tag in the host page so one bundle can target different backends.

use taskboard_client::ClientConfig;

const META_SELECTOR: &str = r#"meta[name="taskboard-config"]"#;

fn meta_overlay() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let element = document.query_selector(META_SELECTOR).ok()??;
    element.get_attribute("content").filter(|content| !content.trim().is_empty())
}

pub fn load() -> ClientConfig {
    let base = ClientConfig::from_build_env();
    let Some(overlay) = meta_overlay() else {
        return base;
    };
    match base.clone().merged_with_json(&overlay) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed taskboard-config meta tag");
            base
        }
    }
}

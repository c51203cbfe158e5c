pub mod activity;
pub mod batch;
pub mod compute;
pub mod sustainability;

use anyhow::Result;
use serde::Serialize;

/// JSON goes to stdout; logs stay on stderr.
pub(crate) fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

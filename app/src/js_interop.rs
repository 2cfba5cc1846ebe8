//! JavaScript interop utilities for DOM manipulation
//!
//! Consolidates all document::eval calls into reusable async functions,
//! reducing code duplication across components.

use dioxus::prelude::document;
use livepen_core::preview::{SANDBOX_FLAGS, SURFACE_INIT_DELAY};
use livepen_core::{ContainerRect, FragmentKind, SurfaceError};
use serde::Deserialize;

/// Element that hosts the preview iframe
pub const PREVIEW_CONTAINER_ID: &str = "preview-container";

/// Id given to each freshly created preview iframe
pub const PREVIEW_FRAME_ID: &str = "preview";

/// Element whose bounds drive the split drag
pub const SPLIT_CONTAINER_ID: &str = "split-container";

/// DOM id of the editor textarea for a fragment
pub fn editor_id(kind: FragmentKind) -> String {
    format!("editor-{}", kind.id())
}

/// What the preview script reports back
#[derive(Deserialize)]
struct SurfaceReply {
    status: String,
    #[serde(default)]
    frame: u64,
    #[serde(default)]
    message: String,
}

/// Result of writing a document into a preview frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameWrite {
    /// The document is showing
    Written,
    /// A newer render replaced the frame first; its document wins
    Superseded,
    /// The frame is current but the write threw
    Failed { frame: u64, message: String },
}

/// Interpret the value a preview script returned
fn read_reply(value: serde_json::Value) -> Result<FrameWrite, SurfaceError> {
    let reply: SurfaceReply =
        serde_json::from_value(value).map_err(|e| SurfaceError::Write(e.to_string()))?;

    match reply.status.as_str() {
        "ok" => Ok(FrameWrite::Written),
        "superseded" => Ok(FrameWrite::Superseded),
        "missing" => Err(SurfaceError::Missing(PREVIEW_CONTAINER_ID.to_string())),
        "error" => Ok(FrameWrite::Failed {
            frame: reply.frame,
            message: reply.message,
        }),
        other => Err(SurfaceError::Write(format!("unexpected reply `{other}`"))),
    }
}

/// Write `html` into `frame` unless it has been detached or replaced
///
/// Shared tail of both preview scripts; expects `frame` and `id` in scope.
fn write_frame_js(html: &str) -> String {
    let html_json = serde_json::to_string(html).unwrap_or_default();
    format!(
        r#"
        if (!frame || !frame.isConnected || frame.dataset.render !== String(id)) {{
            return {{ status: 'superseded', frame: id }};
        }}
        try {{
            var doc = frame.contentDocument || frame.contentWindow.document;
            doc.open();
            doc.write({html_json});
            doc.close();
            return {{ status: 'ok', frame: id }};
        }} catch (error) {{
            return {{ status: 'error', frame: id, message: String((error && error.message) || error) }};
        }}
        "#
    )
}

fn replace_preview_js(html: &str) -> String {
    format!(
        r#"
        var container = document.getElementById('{container}');
        if (!container) return {{ status: 'missing' }};

        var old = document.getElementById('{frame}');
        if (old) old.remove();

        var id = (window.__livepenRenders = (window.__livepenRenders || 0) + 1);
        var frame = document.createElement('iframe');
        frame.id = '{frame}';
        frame.className = 'preview-frame';
        frame.title = 'Preview';
        frame.dataset.render = String(id);
        frame.setAttribute('sandbox', '{sandbox}');
        container.appendChild(frame);

        await new Promise(function(resolve) {{ setTimeout(resolve, {delay}); }});
        {write}
        "#,
        container = PREVIEW_CONTAINER_ID,
        frame = PREVIEW_FRAME_ID,
        sandbox = SANDBOX_FLAGS,
        delay = SURFACE_INIT_DELAY.as_millis(),
        write = write_frame_js(html),
    )
}

/// Remove the preview iframe, create a fresh sandboxed one, and write `html` into it
///
/// The new frame gets a short moment to initialize before the write. A frame
/// replaced by a later render during that moment is left alone.
pub async fn replace_preview(html: &str) -> Result<FrameWrite, SurfaceError> {
    let value = document::eval(&replace_preview_js(html))
        .await
        .map_err(|e| SurfaceError::Write(e.to_string()))?;
    read_reply(value)
}

/// Write `html` into the frame created by render `frame`, if it is still showing
pub async fn write_into_frame(frame: u64, html: &str) -> Result<FrameWrite, SurfaceError> {
    let js = format!(
        r"
        var id = {frame};
        var frame = document.getElementById('{PREVIEW_FRAME_ID}');
        {write}
        ",
        write = write_frame_js(html),
    );
    let value = document::eval(&js)
        .await
        .map_err(|e| SurfaceError::Write(e.to_string()))?;
    read_reply(value)
}

/// Insert indentation or indent selected lines
pub async fn insert_indent(kind: FragmentKind, width: u32) {
    let js = format!(
        r#"
        (function() {{
            var editor = document.getElementById('{}');
            if (!editor) return;
            var start = editor.selectionStart;
            var end = editor.selectionEnd;
            var value = editor.value;
            var indent = ' '.repeat({});

            if (start === end) {{
                editor.value = value.substring(0, start) + indent + value.substring(end);
                editor.selectionStart = editor.selectionEnd = start + indent.length;
            }} else {{
                var lineStart = value.lastIndexOf('\n', start - 1) + 1;
                var lineEnd = value.indexOf('\n', end);
                if (lineEnd === -1) lineEnd = value.length;

                var selected = value.substring(lineStart, lineEnd);
                var indented = selected.split('\n').map(function(line) {{
                    return indent + line;
                }}).join('\n');

                editor.value = value.substring(0, lineStart) + indented + value.substring(lineEnd);
                editor.selectionStart = start + indent.length;
                editor.selectionEnd = end + selected.split('\n').length * indent.length;
            }}
            editor.focus();
            editor.dispatchEvent(new Event('input', {{ bubbles: true }}));
        }})();
        "#,
        editor_id(kind),
        width.clamp(1, 8)
    );

    let _ = document::eval(&js).await;
}

/// Whether the device reports touch input
pub async fn detect_touch() -> bool {
    let js = "return ('ontouchstart' in window) || (navigator.maxTouchPoints || 0) > 0;";
    match document::eval(js).await {
        Ok(value) => value.as_bool().unwrap_or(false),
        Err(_) => false,
    }
}

/// Suppress double-tap zoom: a tap ending within 300ms of the previous one is swallowed
pub async fn install_touch_guards() {
    let js = r"
        if (window.__livepenTouchGuards) return;
        window.__livepenTouchGuards = true;
        var lastTouchEnd = 0;
        document.addEventListener('touchend', function(e) {
            var now = Date.now();
            if (now - lastTouchEnd <= 300) e.preventDefault();
            lastTouchEnd = now;
        }, { passive: false });
    ";
    let _ = document::eval(js).await;
}

/// Client-space bounds of the split container
pub async fn split_container_rect() -> Option<ContainerRect> {
    #[derive(Deserialize)]
    struct Rect {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    }

    let js = format!(
        r"
        var el = document.getElementById('{SPLIT_CONTAINER_ID}');
        if (!el) return null;
        var r = el.getBoundingClientRect();
        return {{ left: r.left, top: r.top, width: r.width, height: r.height }};
        "
    );

    let value = document::eval(&js).await.ok()?;
    let rect: Rect = serde_json::from_value(value).ok()?;
    Some(ContainerRect {
        left: rect.left,
        top: rect.top,
        width: rect.width,
        height: rect.height,
    })
}

/// Stream of connectivity changes; each message is `true` when back online
pub fn watch_connectivity() -> document::Eval {
    document::eval(
        r"
        window.addEventListener('online', function() { dioxus.send(true); });
        window.addEventListener('offline', function() { dioxus.send(false); });
        if (!navigator.onLine) dioxus.send(false);
        await new Promise(function() {});
        ",
    )
}

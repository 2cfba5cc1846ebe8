//! Preview document assembly and rendering
//!
//! A render turns the three fragments into one complete HTML document and
//! writes it into a brand-new isolated surface (a sandboxed iframe). The old
//! surface is discarded rather than cleared, so timers, listeners and globals
//! from a previous run never leak into the next one.

use std::time::Duration;
use thiserror::Error;

use crate::fragment::SourceBundle;

/// Sandbox flags for the preview surface: scripts and same-origin access only
pub const SANDBOX_FLAGS: &str = "allow-scripts allow-same-origin";

/// Pause between creating a surface and writing into it
pub const SURFACE_INIT_DELAY: Duration = Duration::from_millis(50);

/// Class of the inline banner that shows script errors inside the preview
pub const SCRIPT_ERROR_CLASS: &str = "livepen-script-error";

/// Installed in the head so errors are shown even if the user script fails
/// to parse at all
fn error_reporter() -> String {
    format!(
        r#"
window.__livepenReportError = function (error) {{
  var message = error && error.message ? error.message : String(error);
  var banner = document.createElement('pre');
  banner.className = '{SCRIPT_ERROR_CLASS}';
  banner.style.cssText = 'color:#b00020;background:#ffeeee;padding:10px;margin:10px 0;border-radius:5px;white-space:pre-wrap;font-family:monospace;';
  banner.textContent = 'Script error: ' + message;
  (document.body || document.documentElement).appendChild(banner);
}};
window.addEventListener('error', function (event) {{
  window.__livepenReportError(event.error || event.message);
}});
"#
    )
}

/// Errors from writing into a preview surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The element the surface lives in does not exist
    #[error("Preview surface `{0}` not found")]
    Missing(String),

    /// The document could not be written
    #[error("Failed to write preview document: {0}")]
    Write(String),
}

/// A place a preview document can be written to
pub trait PreviewSurface {
    /// Discard the current surface, create a fresh one in its place and
    /// write `document` into it
    fn replace_and_write(&mut self, document: &str) -> Result<(), SurfaceError>;
}

/// What a render ended up showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The assembled document was written
    Rendered,
    /// Writing failed; the fallback error document is shown instead
    Fallback(String),
}

/// Escape text for use inside HTML element content
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Rewrite every case-insensitive `</tag` as `<\/tag`
///
/// Inside a raw-text element the sequence would close the element early.
/// `<\/` means the same thing to both the JavaScript and CSS parsers.
fn neutralize_closing_tag(text: &str, tag: &str) -> String {
    let needle = format!("</{}", tag);
    let lowered = text.to_ascii_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    // ASCII lowercasing keeps byte offsets identical
    for (idx, _) in lowered.match_indices(&needle) {
        result.push_str(&text[last..idx]);
        result.push_str("<\\/");
        last = idx + 2;
    }
    result.push_str(&text[last..]);
    result
}

/// Build the complete preview document for a set of sources
///
/// The style goes in the head, the markup verbatim in the body and the
/// script last, wrapped in a try/catch so that a throwing script still
/// leaves the markup and style visible.
pub fn assemble_document(sources: &SourceBundle) -> String {
    let style = neutralize_closing_tag(&sources.css, "style");
    let script = neutralize_closing_tag(&sources.js, "script");
    let reporter = error_reporter();

    let mut doc = String::with_capacity(
        style.len() + sources.html.len() + script.len() + reporter.len() + 256,
    );

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<style>\n");
    doc.push_str(&style);
    doc.push_str("\n</style>\n");
    doc.push_str("<script>");
    doc.push_str(&reporter);
    doc.push_str("</script>\n");
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&sources.html);
    doc.push_str("\n<script>\ntry {\n");
    doc.push_str(&script);
    doc.push_str("\n} catch (error) {\n  window.__livepenReportError(error);\n}\n</script>\n");
    doc.push_str("</body>\n</html>\n");
    doc
}

/// Minimal document shown when the real one could not be written
pub fn fallback_document(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
  body {{ font-family: sans-serif; margin: 20px; }}
  .error {{ color: red; background: #ffeeee; padding: 10px; border-radius: 5px; }}
</style>
</head>
<body>
  <div class="error">
    <h3>Error in preview</h3>
    <p>{}</p>
  </div>
</body>
</html>
"#,
        escape_html(message)
    )
}

/// Render `sources` into `surface`
///
/// A missing surface is returned to the caller; a failed write is replaced by
/// the fallback document through the same surface.
pub fn render<S: PreviewSurface + ?Sized>(
    surface: &mut S,
    sources: &SourceBundle,
) -> Result<RenderOutcome, SurfaceError> {
    let document = assemble_document(sources);

    match surface.replace_and_write(&document) {
        Ok(()) => Ok(RenderOutcome::Rendered),
        Err(SurfaceError::Missing(id)) => {
            tracing::error!("Preview surface `{}` not found", id);
            Err(SurfaceError::Missing(id))
        }
        Err(SurfaceError::Write(message)) => {
            tracing::warn!("Error updating preview: {}", message);
            surface.replace_and_write(&fallback_document(&message))?;
            Ok(RenderOutcome::Fallback(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keeps every document written, optionally failing the first write
    #[derive(Default)]
    struct RecordingSurface {
        written: Vec<String>,
        fail_first_with: Option<SurfaceError>,
    }

    impl PreviewSurface for RecordingSurface {
        fn replace_and_write(&mut self, document: &str) -> Result<(), SurfaceError> {
            if let Some(err) = self.fail_first_with.take() {
                return Err(err);
            }
            self.written.push(document.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_scenario_document_contains_markup_and_style() {
        let sources = SourceBundle::new("<h1>Hi</h1>", "h1{color:red}", "console.log(1)");
        let doc = assemble_document(&sources);

        let body_start = doc.find("<body>").unwrap_or(usize::MAX);
        let markup_at = doc.find("<h1>Hi</h1>").unwrap_or(0);
        assert!(markup_at > body_start, "markup belongs in the body");

        let style_open = doc.find("<style>").unwrap_or(usize::MAX);
        let style_close = doc.find("</style>").unwrap_or(0);
        let rule = doc.find("color:red").unwrap_or(0);
        assert!(style_open < rule && rule < style_close);

        assert!(doc.contains("console.log(1)"));
    }

    #[test]
    fn test_script_is_wrapped_after_markup() {
        let sources = SourceBundle::new("<p id=\"x\">x</p>", "", "throw new Error('boom');");
        let doc = assemble_document(&sources);

        let markup_at = doc.find("<p id=\"x\">").unwrap_or(usize::MAX);
        let try_at = doc.find("try {\nthrow new Error('boom');").unwrap_or(0);
        assert!(markup_at < try_at, "markup must precede the script");
        assert!(doc.contains("} catch (error) {"));
    }

    #[test]
    fn test_error_banner_uses_shared_class() {
        let doc = assemble_document(&SourceBundle::default());
        assert!(doc.contains(&format!("banner.className = '{SCRIPT_ERROR_CLASS}';")));
    }

    #[test]
    fn test_script_cannot_close_its_own_block() {
        let sources = SourceBundle::new("", "", "var s = '</script><b>x</b>'; var t = '</SCRIPT>';");
        let doc = assemble_document(&sources);

        assert!(doc.contains(r"var s = '<\/script><b>x</b>';"));
        assert!(doc.contains(r"var t = '<\/SCRIPT>';"));
        // Only the two real closing tags (reporter + user block) remain
        assert_eq!(doc.matches("</script>").count(), 2);
    }

    #[test]
    fn test_style_cannot_close_its_own_block() {
        let sources = SourceBundle::new("", "/* </style><script>alert(1)</script> */", "");
        let doc = assemble_document(&sources);
        assert_eq!(doc.matches("</style>").count(), 1);
    }

    #[test]
    fn test_unicode_survives_assembly() {
        let sources = SourceBundle::new("<p>héllo 🌍</p>", "p::after{content:'✓'}", "let s = '日本';");
        let doc = assemble_document(&sources);
        assert!(doc.contains("<p>héllo 🌍</p>"));
        assert!(doc.contains("content:'✓'"));
        assert!(doc.contains("let s = '日本';"));
    }

    #[test]
    fn test_fallback_escapes_message() {
        let doc = fallback_document("bad <tag> & \"quote\"");
        assert!(doc.contains("bad &lt;tag&gt; &amp; &quot;quote&quot;"));
        assert!(doc.contains("Error in preview"));
    }

    #[test]
    fn test_render_writes_full_document() {
        let mut surface = RecordingSurface::default();
        let sources = SourceBundle::new("<h1>Hi</h1>", "", "");

        let outcome = render(&mut surface, &sources);
        assert_eq!(outcome, Ok(RenderOutcome::Rendered));
        assert_eq!(surface.written.len(), 1);
        assert_eq!(surface.written[0], assemble_document(&sources));
    }

    #[test]
    fn test_render_falls_back_on_write_failure() {
        let mut surface = RecordingSurface {
            fail_first_with: Some(SurfaceError::Write("document closed".into())),
            ..Default::default()
        };

        let outcome = render(&mut surface, &SourceBundle::default());
        assert_eq!(outcome, Ok(RenderOutcome::Fallback("document closed".into())));
        assert_eq!(surface.written.len(), 1);
        assert!(surface.written[0].contains("document closed"));
        assert!(surface.written[0].contains("Error in preview"));
    }

    #[test]
    fn test_render_reports_missing_surface() {
        let mut surface = RecordingSurface {
            fail_first_with: Some(SurfaceError::Missing("preview".into())),
            ..Default::default()
        };

        let outcome = render(&mut surface, &SourceBundle::default());
        assert_eq!(outcome, Err(SurfaceError::Missing("preview".into())));
        assert!(surface.written.is_empty());
    }

    #[test]
    fn test_sandbox_flags() {
        assert_eq!(SANDBOX_FLAGS, "allow-scripts allow-same-origin");
    }
}

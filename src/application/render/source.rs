use std::path::Path;

use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::{
    application::error::AppError,
    config::OutputFormat,
    domain::content::ContentDocument,
    infra::error::InfraError,
};

use super::{BlockRenderer, DiagnosticSink, render_html};

/// Read a raw content document from `path`; `-` reads standard input.
pub async fn read_source(path: &Path) -> Result<String, AppError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .map_err(InfraError::from)?;
        return Ok(buffer);
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))
}

/// Parse, decode and render a raw JSON document into `format`.
///
/// Unlike [`BlockRenderer::render_json`], input that is not a content document
/// is an error here, so command-line callers can exit non-zero.
pub fn render_source(
    raw: &str,
    format: OutputFormat,
    renderer: &BlockRenderer,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, AppError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| AppError::validation(format!("input is not valid JSON: {err}")))?;
    let document = ContentDocument::from_json(&value)?;
    let output = renderer.render(&document, sink);

    match format {
        OutputFormat::Html => Ok(render_html(output.as_ref())),
        OutputFormat::Json => serde_json::to_string_pretty(&output)
            .map_err(|err| AppError::unexpected(format!("serialize output: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;
    use crate::application::render::{DiagnosticKind, RenderDiagnostic};

    const DOCUMENT: &str =
        r#"{ "blocks": [{ "type": "paragraph", "data": { "text": "Hi & bye" } }] }"#;

    fn render(raw: &str, format: OutputFormat) -> Result<String, AppError> {
        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        render_source(raw, format, &BlockRenderer::default(), &mut sink)
    }

    #[test]
    fn html_format_renders_markup() {
        let html = render(DOCUMENT, OutputFormat::Html).expect("render html");
        assert_eq!(
            html,
            r#"<div class="block-editor-content"><p>Hi &amp; bye</p></div>"#
        );
    }

    #[test]
    fn json_format_renders_output_tree() {
        let output = render(DOCUMENT, OutputFormat::Json).expect("render json");
        let value: Value = serde_json::from_str(&output).expect("json output");

        assert_eq!(value["tag"], "div");
        assert_eq!(value["children"][0]["tag"], "p");
        assert_eq!(value["children"][0]["key"], "0");
        assert_eq!(value["children"][0]["children"], json!(["Hi & bye"]));
    }

    #[test]
    fn null_document_renders_empty_output() {
        assert_eq!(render("null", OutputFormat::Html).expect("html"), "");
        assert_eq!(render("null", OutputFormat::Json).expect("json"), "null");
    }

    #[test]
    fn invalid_json_is_a_validation_error() {
        let err = render("{ not json", OutputFormat::Html).expect_err("invalid json");
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn document_without_blocks_is_a_content_error() {
        let err = render(r#"{ "version": "2.28.0" }"#, OutputFormat::Html).expect_err("no blocks");
        assert!(matches!(err, AppError::Content(_)));
        assert!(err.to_string().contains("blocks"));
    }

    #[test]
    fn diagnostics_reach_the_sink() {
        let mut sink: Vec<RenderDiagnostic> = Vec::new();
        let raw = r#"{ "blocks": [{ "type": "callout", "data": { "text": "x" } }] }"#;
        render_source(raw, OutputFormat::Html, &BlockRenderer::default(), &mut sink)
            .expect("render");

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, DiagnosticKind::UnrecognizedBlockType);
    }

    #[tokio::test]
    async fn read_source_reads_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(DOCUMENT.as_bytes()).expect("write document");

        let raw = read_source(file.path()).await.expect("read source");
        assert_eq!(raw, DOCUMENT);
    }

    #[tokio::test]
    async fn read_source_reports_missing_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_source(&dir.path().join("missing.json"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, AppError::Infra(InfraError::Io(_))));
    }
}

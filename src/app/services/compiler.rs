//! The compile request: validation and correction over the same input.

use super::normalizer::{Html5Normalizer, NormalizeOptions, Normalizer};
use super::preview::{BrowserPreview, PreviewError, PreviewOpener};
use super::validator::{Html5Validator, Validator, ValidatorOptions};
use crate::app::domain::issue::ValidationIssue;
use crate::app::domain::source::{CompiledResult, SourceDocument};

/// Stateless front door to the validator, normalizer and preview opener.
///
/// Every call works only on its arguments, so two calls never influence
/// each other.
pub struct Compiler<N, V, P> {
    normalizer: N,
    validator: V,
    previewer: P,
}

impl Compiler<Html5Normalizer, Html5Validator, BrowserPreview> {
    /// html5ever-backed compiler that previews in the system browser.
    pub fn html5(normalize: NormalizeOptions, validate: ValidatorOptions) -> Self {
        Self::new(
            Html5Normalizer::new(normalize),
            Html5Validator::new(validate),
            BrowserPreview::default(),
        )
    }
}

impl<N, V, P> Compiler<N, V, P>
where
    N: Normalizer,
    V: Validator,
    P: PreviewOpener,
{
    pub fn new(normalizer: N, validator: V, previewer: P) -> Self {
        Self {
            normalizer,
            validator,
            previewer,
        }
    }

    /// Validate and correct `source`.
    ///
    /// Malformed markup never fails: it shows up as issues next to the
    /// corrected output. If either pass cannot process the input at all, the
    /// result holds a single issue describing why and the input unchanged.
    pub fn compile(&self, source: &SourceDocument) -> CompiledResult {
        let content = source.content.as_str();

        if source.had_invalid_utf8 {
            tracing::warn!("source is not valid UTF-8, returning it unmodified");
            return processing_failure(content, "Input is not valid UTF-8 text");
        }

        let issues = match self.validator.validate(content) {
            Ok(issues) => issues,
            Err(e) => {
                tracing::warn!(error = %e, "validator failed");
                return processing_failure(content, &format!("Could not validate input: {}", e));
            }
        };

        let corrected_html = match self.normalizer.normalize(content) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, "normalizer failed");
                return processing_failure(content, &format!("Could not correct input: {}", e));
            }
        };

        tracing::info!(
            input_bytes = content.len(),
            output_bytes = corrected_html.len(),
            issues = issues.len(),
            "compiled HTML"
        );
        CompiledResult::new(corrected_html, issues)
    }

    /// Show `html` in the preview viewer. Failures are returned, not retried.
    pub fn request_preview(&self, html: &str) -> Result<(), PreviewError> {
        if html.trim().is_empty() {
            return Err(PreviewError::NothingToPreview);
        }
        self.previewer.open(html).inspect_err(|e| {
            tracing::warn!(error = %e, "preview failed");
        })
    }
}

fn processing_failure(original: &str, message: &str) -> CompiledResult {
    CompiledResult::new(
        original.to_string(),
        vec![ValidationIssue::error(None, message)],
    )
}

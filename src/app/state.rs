use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use fltk::{
    app,
    dialog,
    enums::Font,
    prelude::*,
    text::WrapMode,
};

use super::domain::issue::ValidationIssue;
use super::domain::settings::{AppSettings, FontChoice};
use super::domain::source::{CompiledResult, SourceDocument};
use super::infrastructure::error::{AppError, Result};
use super::infrastructure::platform::resolve_dark_mode;
use super::services::compiler::Compiler;
use super::services::normalizer::{Html5Normalizer, OutputStyle};
use super::services::preview::{BrowserPreview, PreviewError, cleanup_preview_dir};
use super::services::validator::Html5Validator;
use crate::ui::dialogs::settings_dialog::show_settings_dialog;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::main_window::{MainWidgets, WINDOW_TITLE};
use crate::ui::theme::{apply_theme, neutral_status_colors, status_colors};
#[cfg(target_os = "windows")]
use crate::ui::theme::set_windows_titlebar_theme;

/// Template shown on start and after Clear All.
pub const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Sample HTML</title>
</head>
<body>
    <h1>Welcome to HtmlForge</h1>
    <p>Start editing your HTML code here!</p>
</body>
</html>"#;

/// One row of the issue list.
pub fn format_issue_line(issue: &ValidationIssue) -> String {
    format!("[{}] {}", issue.severity.label(), issue)
}

/// Byte offset where 1-based `line` starts, clamped to the end of `text`.
pub fn line_start_offset(text: &str, line: u64) -> usize {
    if line <= 1 {
        return 0;
    }
    text.match_indices('\n')
        .nth((line - 2) as usize)
        .map(|(i, _)| i + 1)
        .unwrap_or(text.len())
}

fn font_for(choice: FontChoice) -> Font {
    match choice {
        FontChoice::ScreenBold => Font::ScreenBold,
        FontChoice::Courier => Font::Courier,
        FontChoice::HelveticaMono => Font::Screen,
    }
}

pub struct AppState {
    pub widgets: MainWidgets,
    pub settings: Rc<RefCell<AppSettings>>,
    pub dark_mode: bool,
    pub fullscreen: bool,
    pub show_linenumbers: bool,
    pub word_wrap: bool,
    /// Result of the last compile; `None` until Compile is pressed or after Clear All.
    pub last_result: Option<CompiledResult>,
    /// Document most recently loaded from disk, kept so its decoding status
    /// survives until the editor text changes.
    loaded_source: Option<SourceDocument>,
    /// Last directory used in a file open/save dialog.
    pub last_open_directory: Option<String>,
}

impl AppState {
    pub fn new(widgets: MainWidgets, settings: Rc<RefCell<AppSettings>>) -> Self {
        let (dark_mode, fullscreen, show_linenumbers, word_wrap) = {
            let s = settings.borrow();
            (
                resolve_dark_mode(s.theme_mode),
                s.start_fullscreen,
                s.line_numbers_enabled,
                s.word_wrap_enabled,
            )
        };

        Self {
            widgets,
            settings,
            dark_mode,
            fullscreen,
            show_linenumbers,
            word_wrap,
            last_result: None,
            loaded_source: None,
            last_open_directory: None,
        }
    }

    fn compiler(&self) -> Compiler<Html5Normalizer, Html5Validator, BrowserPreview> {
        let s = self.settings.borrow();
        Compiler::html5(s.normalize_options(), s.validator_options())
    }

    fn input_text(&self) -> String {
        self.widgets
            .input
            .buffer()
            .map(|b| b.text())
            .unwrap_or_default()
    }

    fn set_input_text(&mut self, text: &str) {
        if let Some(mut buf) = self.widgets.input.buffer() {
            buf.set_text(text);
        }
        self.widgets.input.set_insert_position(0);
        self.widgets.input.show_insert_position();
    }

    fn set_output_text(&mut self, text: &str) {
        if let Some(mut buf) = self.widgets.output.buffer() {
            buf.set_text(text);
        }
    }

    fn set_status(&mut self, text: &str, has_issues: Option<bool>) {
        let (bg, fg) = match has_issues {
            Some(issues) => status_colors(self.dark_mode, issues),
            None => neutral_status_colors(self.dark_mode),
        };
        self.widgets.status.set_color(bg);
        self.widgets.status.set_label_color(fg);
        self.widgets.status.set_label(&format!("  {}", text));
        self.widgets.status.redraw();
    }

    /// The compile request for the current editor contents.
    fn current_source(&self) -> SourceDocument {
        let text = self.input_text();
        match &self.loaded_source {
            Some(doc) if doc.content == text => doc.clone(),
            _ => SourceDocument::new(text),
        }
    }

    pub fn initialize(&mut self) {
        self.set_input_text(DEFAULT_HTML);
        let settings = self.settings.borrow().clone();
        self.apply_settings(settings);
        self.set_status("Paste HTML and press Compile", None);
    }

    // --- Compile actions ---

    pub fn compile(&mut self) {
        let source = self.current_source();
        let result = self.compiler().compile(&source);
        self.show_result(&result);
        self.last_result = Some(result);
    }

    fn show_result(&mut self, result: &CompiledResult) {
        self.set_output_text(&result.corrected_html);

        self.widgets.issues.clear();
        for issue in &result.issues {
            self.widgets.issues.add(&format_issue_line(issue));
        }
        self.widgets.issues.redraw();

        self.set_status(&result.summary(), Some(!result.is_clean()));
    }

    pub fn preview(&mut self) {
        let html = self
            .last_result
            .as_ref()
            .map(|r| r.corrected_html.clone())
            .unwrap_or_default();
        match self.compiler().request_preview(&html) {
            Ok(()) => self.set_status("Opened preview in browser", None),
            Err(PreviewError::NothingToPreview) => {
                dialog::message_default("Please compile HTML first!");
            }
            Err(e) => dialog::alert_default(&e.to_string()),
        }
    }

    pub fn clear_all(&mut self) {
        self.last_result = None;
        self.loaded_source = None;
        self.set_input_text(DEFAULT_HTML);
        self.set_output_text("");
        self.widgets.issues.clear();
        self.widgets.issues.redraw();
        self.widgets.wind.set_label(WINDOW_TITLE);
        self.set_status("Cleared", None);
    }

    pub fn copy_output(&mut self) {
        match &self.last_result {
            Some(result) if !result.corrected_html.is_empty() => {
                app::copy(&result.corrected_html);
                self.set_status("Copied corrected HTML to clipboard", None);
            }
            _ => dialog::message_default("Please compile HTML first!"),
        }
    }

    /// Jump the input editor to the line of the selected issue.
    pub fn issue_selected(&mut self, row: i32) {
        if row < 1 {
            return;
        }
        let line = self
            .last_result
            .as_ref()
            .and_then(|r| r.issues.get(row as usize - 1))
            .and_then(|issue| issue.line);
        let Some(line) = line else {
            return;
        };
        let pos = line_start_offset(&self.input_text(), line);
        self.widgets.input.set_insert_position(pos as i32);
        self.widgets.input.show_insert_position();
        let _ = self.widgets.input.take_focus();
    }

    // --- File operations ---

    fn remember_directory(&mut self, path: &str) {
        if let Some(parent) = Path::new(path).parent() {
            self.last_open_directory = Some(parent.to_string_lossy().to_string());
        }
    }

    pub fn open_file(&mut self, path: &str) -> Result<()> {
        let bytes = fs::read(path)?;
        let source = SourceDocument::from_bytes(&bytes);
        if source.had_invalid_utf8 {
            tracing::warn!(path, "file is not valid UTF-8");
        }
        self.remember_directory(path);
        self.set_input_text(&source.content);
        self.loaded_source = Some(source);
        self.last_result = None;
        self.set_output_text("");
        self.widgets.issues.clear();

        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());
        self.widgets.wind.set_label(&format!("{} - {}", name, WINDOW_TITLE));
        self.set_status(&format!("Loaded {}", name), None);
        Ok(())
    }

    pub fn file_open(&mut self) {
        let Some(path) = native_open_dialog(self.last_open_directory.as_deref()) else {
            return;
        };
        if let Err(e) = self.open_file(&path) {
            dialog::alert_default(&format!("Error opening file: {}", e));
        }
    }

    pub fn save_output_to(&mut self, path: &str) -> Result<()> {
        let result = self
            .last_result
            .as_ref()
            .ok_or_else(|| AppError::Processing("nothing has been compiled yet".to_string()))?;
        fs::write(path, &result.corrected_html)?;
        self.remember_directory(path);
        Ok(())
    }

    pub fn save_output_as(&mut self) {
        if self.last_result.is_none() {
            dialog::message_default("Please compile HTML first!");
            return;
        }
        let Some(path) = native_save_dialog(self.last_open_directory.as_deref()) else {
            return;
        };
        match self.save_output_to(&path) {
            Ok(()) => self.set_status(&format!("Saved corrected HTML to {}", path), None),
            Err(e) => dialog::alert_default(&format!("Error saving file: {}", e)),
        }
    }

    /// Remove preview files and leave the event loop.
    pub fn file_quit(&mut self) {
        cleanup_preview_dir();
        app::quit();
    }

    // --- View toggles ---

    pub fn update_linenumber_width(&mut self) {
        let width = if self.show_linenumbers { 40 } else { 0 };
        self.widgets.input.set_linenumber_width(width);
        self.widgets.output.set_linenumber_width(width);
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_linenumbers = !self.show_linenumbers;
        self.update_linenumber_width();
        self.widgets.input.redraw();
        self.widgets.output.redraw();
    }

    fn apply_word_wrap(&mut self) {
        let mode = if self.word_wrap { WrapMode::AtBounds } else { WrapMode::None };
        self.widgets.input.wrap_mode(mode, 0);
        self.widgets.output.wrap_mode(mode, 0);
    }

    pub fn toggle_word_wrap(&mut self) {
        self.word_wrap = !self.word_wrap;
        self.apply_word_wrap();
        self.widgets.input.redraw();
        self.widgets.output.redraw();
    }

    fn apply_dark_mode(&mut self) {
        apply_theme(&mut self.widgets, self.dark_mode);
        #[cfg(target_os = "windows")]
        set_windows_titlebar_theme(&self.widgets.wind, self.dark_mode);
        if let Some(result) = &self.last_result {
            let (bg, fg) = status_colors(self.dark_mode, !result.is_clean());
            self.widgets.status.set_color(bg);
            self.widgets.status.set_label_color(fg);
        }
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.apply_dark_mode();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.widgets.wind.fullscreen(self.fullscreen);
        self.update_menu_checkbox("View/Toggle Full Screen", self.fullscreen);
    }

    // --- Format ---

    pub fn set_output_style(&mut self, style: OutputStyle) {
        {
            let mut s = self.settings.borrow_mut();
            if s.output_style == style {
                return;
            }
            s.output_style = style;
            if let Err(e) = s.save() {
                tracing::warn!(error = %e, "failed to save settings");
            }
        }
        if self.last_result.is_some() {
            self.compile();
        }
    }

    pub fn set_font(&mut self, font: Font) {
        self.widgets.input.set_text_font(font);
        self.widgets.output.set_text_font(font);
        self.widgets.input.redraw();
        self.widgets.output.redraw();
    }

    pub fn set_font_size(&mut self, size: i32) {
        self.widgets.input.set_text_size(size);
        self.widgets.output.set_text_size(size);
        self.widgets.input.redraw();
        self.widgets.output.redraw();
    }

    // --- Settings ---

    pub fn open_settings(&mut self) {
        let current = self.settings.borrow().clone();
        if let Some(new_settings) = show_settings_dialog(&current) {
            if let Err(e) = new_settings.save() {
                dialog::alert_default(&format!("Failed to save settings: {}", e));
                return;
            }
            let output_changed = new_settings.normalize_options() != current.normalize_options()
                || new_settings.validator_options() != current.validator_options();
            self.apply_settings(new_settings);
            if output_changed && self.last_result.is_some() {
                self.compile();
            }
        }
    }

    pub fn apply_settings(&mut self, new_settings: AppSettings) {
        self.dark_mode = resolve_dark_mode(new_settings.theme_mode);
        self.apply_dark_mode();
        self.update_menu_checkbox("View/Toggle Dark Mode", self.dark_mode);

        let font = font_for(new_settings.font);
        self.set_font(font);
        self.set_font_size(new_settings.font_size as i32);

        self.show_linenumbers = new_settings.line_numbers_enabled;
        self.update_linenumber_width();
        self.update_menu_checkbox("View/Toggle Line Numbers", self.show_linenumbers);

        self.word_wrap = new_settings.word_wrap_enabled;
        self.apply_word_wrap();
        self.update_menu_checkbox("View/Toggle Word Wrap", self.word_wrap);

        let pretty = new_settings.output_style == OutputStyle::Pretty;
        self.update_menu_checkbox("Format/Output Style/Compact", !pretty);
        self.update_menu_checkbox("Format/Output Style/Pretty", pretty);

        *self.settings.borrow_mut() = new_settings;
        self.widgets.wind.redraw();
    }

    fn update_menu_checkbox(&self, path: &str, checked: bool) {
        let idx = self.widgets.menu.find_index(path);
        if idx >= 0 {
            if let Some(mut item) = self.widgets.menu.at(idx) {
                if checked {
                    item.set();
                } else {
                    item.clear();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::normalizer::Normalizer;
    use crate::app::services::validator::Validator;

    #[test]
    fn test_format_issue_line() {
        let issue = ValidationIssue::error(Some(4), "Missing closing tag for <div>");
        assert_eq!(format_issue_line(&issue), "[error] Line 4: Missing closing tag for <div>");
    }

    #[test]
    fn test_default_template_is_clean() {
        assert!(Html5Validator::default().validate(DEFAULT_HTML).unwrap().is_empty());
        let corrected = Html5Normalizer::default().normalize(DEFAULT_HTML).unwrap();
        assert!(corrected.starts_with("<!DOCTYPE html><html><head>"));
        assert!(corrected.contains("<h1>Welcome to HtmlForge</h1>"));
    }

    #[test]
    fn test_line_start_offset() {
        let text = "a\nbc\n\nd";
        assert_eq!(line_start_offset(text, 1), 0);
        assert_eq!(line_start_offset(text, 2), 2);
        assert_eq!(line_start_offset(text, 4), 6);
        assert_eq!(line_start_offset(text, 9), text.len());
    }

    #[test]
    fn test_font_mapping() {
        assert_eq!(font_for(FontChoice::Courier), Font::Courier);
        assert_eq!(font_for(FontChoice::HelveticaMono), Font::Screen);
    }
}

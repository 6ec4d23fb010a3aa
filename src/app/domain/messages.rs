use fltk::enums::Font;

use crate::app::services::normalizer::OutputStyle;

/// All messages that can be sent through the FLTK channel.
/// Each menu or button callback sends one of these; the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileOpen,
    SaveOutputAs,
    FileQuit,
    WindowClose,

    // Compile
    Compile,
    PreviewInBrowser,
    ClearAll,
    CopyOutput,
    IssueSelected(i32),

    // View
    ToggleLineNumbers,
    ToggleWordWrap,
    ToggleDarkMode,
    ToggleFullscreen,

    // Format
    SetOutputStyle(OutputStyle),
    SetFont(Font),
    SetFontSize(i32),

    // Settings & Help
    OpenSettings,
    ShowAbout,
}

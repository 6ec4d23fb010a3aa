use fltk::{
    app::Sender,
    enums::{Font, Key, Shortcut},
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::services::normalizer::OutputStyle;

fn toggle_flag(on: bool) -> MenuFlag {
    if on { MenuFlag::Toggle | MenuFlag::Value } else { MenuFlag::Toggle }
}

fn radio_flag(on: bool) -> MenuFlag {
    if on { MenuFlag::Radio | MenuFlag::Value } else { MenuFlag::Radio }
}

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, settings: &AppSettings, initial_dark_mode: bool) {
    let s = sender;

    // File
    menu.add("File/Open HTML...", Shortcut::Ctrl | 'o', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileOpen) });
    menu.add("File/Save Output As...", Shortcut::Ctrl | 's', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::SaveOutputAs) });
    menu.add("File/Settings...", Shortcut::None, MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::OpenSettings) });
    menu.add("File/Quit", Shortcut::Ctrl | 'q', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::FileQuit) });

    // Compile
    menu.add("Compile/Compile HTML", Shortcut::Ctrl | Key::Enter, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::Compile) });
    menu.add("Compile/Preview in Browser", Shortcut::Ctrl | 'p', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::PreviewInBrowser) });
    menu.add("Compile/Copy Output", Shortcut::Ctrl | Shortcut::Shift | 'c', MenuFlag::MenuDivider, { let s = *s; move |_| s.send(Message::CopyOutput) });
    menu.add("Compile/Clear All", Shortcut::Ctrl | 'l', MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ClearAll) });

    // View
    menu.add("View/Toggle Line Numbers", Shortcut::None, toggle_flag(settings.line_numbers_enabled), { let s = *s; move |_| s.send(Message::ToggleLineNumbers) });
    menu.add("View/Toggle Word Wrap", Shortcut::None, toggle_flag(settings.word_wrap_enabled), { let s = *s; move |_| s.send(Message::ToggleWordWrap) });
    menu.add("View/Toggle Dark Mode", Shortcut::None, toggle_flag(initial_dark_mode), { let s = *s; move |_| s.send(Message::ToggleDarkMode) });
    menu.add("View/Toggle Full Screen", Shortcut::None | Key::F11, toggle_flag(settings.start_fullscreen), { let s = *s; move |_| s.send(Message::ToggleFullscreen) });

    // Format
    let pretty = settings.output_style == OutputStyle::Pretty;
    menu.add("Format/Output Style/Compact", Shortcut::None, radio_flag(!pretty), { let s = *s; move |_| s.send(Message::SetOutputStyle(OutputStyle::Compact)) });
    menu.add("Format/Output Style/Pretty", Shortcut::None, radio_flag(pretty), { let s = *s; move |_| s.send(Message::SetOutputStyle(OutputStyle::Pretty)) });
    menu.add("Format/Font/Screen (Bold)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFont(Font::ScreenBold)) });
    menu.add("Format/Font/Courier", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFont(Font::Courier)) });
    menu.add("Format/Font/Helvetica Mono", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFont(Font::Screen)) });
    menu.add("Format/Font Size/Small (12)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(12)) });
    menu.add("Format/Font Size/Medium (14)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(14)) });
    menu.add("Format/Font Size/Large (18)", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::SetFontSize(18)) });

    // Help
    menu.add("Help/About HtmlForge", Shortcut::None, MenuFlag::Normal, { let s = *s; move |_| s.send(Message::ShowAbout) });
}

#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::cell::RefCell;
use std::rc::Rc;

use clap::Parser;
use fltk::{app, prelude::*};

use html_forge::app::domain::messages::Message;
use html_forge::app::domain::settings::AppSettings;
use html_forge::app::infrastructure::logging::init_logging;
use html_forge::app::infrastructure::platform::resolve_dark_mode;
use html_forge::app::state::AppState;
use html_forge::cli::Args;
use html_forge::ui::dialogs::about::show_about_dialog;
use html_forge::ui::main_window::build_main_window;
use html_forge::ui::menu::build_menu;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let settings = Rc::new(RefCell::new(AppSettings::load()));
    let initial_dark_mode = resolve_dark_mode(settings.borrow().theme_mode);

    let mut widgets = build_main_window(&sender);
    build_menu(&mut widgets.menu, &sender, &settings.borrow(), initial_dark_mode);

    widgets.wind.set_callback({
        let s = sender;
        move |_| {
            if app::event() == fltk::enums::Event::Close {
                s.send(Message::WindowClose);
            }
        }
    });

    let mut state = AppState::new(widgets, settings);
    state.initialize();

    if let Some(path) = args.file {
        let path = path.to_string_lossy();
        if let Err(e) = state.open_file(&path) {
            tracing::error!(path = %path, error = %e, "could not open file");
        }
    }

    state.widgets.wind.show();
    #[cfg(target_os = "windows")]
    html_forge::ui::theme::set_windows_titlebar_theme(&state.widgets.wind, state.dark_mode);
    if state.fullscreen {
        state.widgets.wind.fullscreen(true);
    }
    tracing::debug!("main window shown");

    while app.wait() {
        let Some(msg) = receiver.recv() else {
            continue;
        };
        match msg {
            Message::FileOpen => state.file_open(),
            Message::SaveOutputAs => state.save_output_as(),
            Message::FileQuit | Message::WindowClose => state.file_quit(),
            Message::Compile => state.compile(),
            Message::PreviewInBrowser => state.preview(),
            Message::ClearAll => state.clear_all(),
            Message::CopyOutput => state.copy_output(),
            Message::IssueSelected(row) => state.issue_selected(row),
            Message::ToggleLineNumbers => state.toggle_line_numbers(),
            Message::ToggleWordWrap => state.toggle_word_wrap(),
            Message::ToggleDarkMode => state.toggle_dark_mode(),
            Message::ToggleFullscreen => state.toggle_fullscreen(),
            Message::SetOutputStyle(style) => state.set_output_style(style),
            Message::SetFont(font) => state.set_font(font),
            Message::SetFontSize(size) => state.set_font_size(size),
            Message::OpenSettings => state.open_settings(),
            Message::ShowAbout => show_about_dialog(),
        }
    }
}

use fltk::{
    button::{Button, CheckButton, RadioRoundButton},
    enums::{Align, Color},
    frame::Frame,
    group::Group,
    misc::Spinner,
    prelude::*,
    window::Window,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::domain::settings::{AppSettings, FontChoice, ThemeMode};
use crate::app::services::normalizer::OutputStyle;

fn section(y: i32, label: &str) {
    Frame::default()
        .with_pos(15, y)
        .with_size(320, 25)
        .with_label(label)
        .with_align(Align::Left | Align::Inside);
}

fn radio(y: i32, label: &str) -> RadioRoundButton {
    RadioRoundButton::default().with_pos(30, y).with_size(280, 25).with_label(label)
}

fn check(y: i32, label: &str, value: bool) -> CheckButton {
    let mut btn = CheckButton::default().with_pos(30, y).with_size(290, 25).with_label(label);
    btn.set_value(value);
    btn
}

/// Show settings dialog and return updated settings if user clicked Save.
pub fn show_settings_dialog(current_settings: &AppSettings) -> Option<AppSettings> {
    let mut dialog = Window::default()
        .with_size(350, 700)
        .with_label("Settings")
        .center_screen();
    dialog.make_modal(true);

    // Theme
    section(15, "Theme:");
    let theme_group = Group::default().with_pos(30, 45).with_size(280, 75);
    let mut theme_light = radio(45, "Light");
    let mut theme_dark = radio(70, "Dark");
    let mut theme_system = radio(95, "System Default");
    theme_group.end();
    match current_settings.theme_mode {
        ThemeMode::Light => theme_light.set_value(true),
        ThemeMode::Dark => theme_dark.set_value(true),
        ThemeMode::SystemDefault => theme_system.set_value(true),
    }

    // Font
    section(130, "Font:");
    let font_group = Group::default().with_pos(30, 160).with_size(280, 75);
    let mut font_screenbold = radio(160, "Screen (Bold)");
    let mut font_courier = radio(185, "Courier");
    let mut font_helvetica = radio(210, "Helvetica Mono");
    font_group.end();
    match current_settings.font {
        FontChoice::ScreenBold => font_screenbold.set_value(true),
        FontChoice::Courier => font_courier.set_value(true),
        FontChoice::HelveticaMono => font_helvetica.set_value(true),
    }

    // Font size
    section(245, "Font Size:");
    let size_group = Group::default().with_pos(30, 275).with_size(280, 75);
    let mut size_12 = radio(275, "Small (12)");
    let mut size_14 = radio(300, "Medium (14)");
    let mut size_18 = radio(325, "Large (18)");
    size_group.end();
    match current_settings.font_size {
        12 => size_12.set_value(true),
        18 => size_18.set_value(true),
        _ => size_14.set_value(true),
    }

    // Output
    section(360, "Corrected Output:");
    let style_group = Group::default().with_pos(30, 390).with_size(280, 50);
    let mut style_compact = radio(390, "Compact");
    let mut style_pretty = radio(415, "Pretty (indented)");
    style_group.end();
    match current_settings.output_style {
        OutputStyle::Compact => style_compact.set_value(true),
        OutputStyle::Pretty => style_pretty.set_value(true),
    }

    let mut indent = Spinner::default().with_pos(200, 445).with_size(60, 25);
    indent.set_label("Indent width:");
    indent.set_range(1.0, 8.0);
    indent.set_step(1.0);
    indent.set_value(current_settings.indent_width as f64);

    let check_doctype = check(480, "Warn about a missing <!DOCTYPE>", current_settings.warn_missing_doctype);

    // View
    section(515, "View Options:");
    let check_line_numbers = check(545, "Show Line Numbers", current_settings.line_numbers_enabled);
    let check_word_wrap = check(570, "Word Wrap", current_settings.word_wrap_enabled);
    let check_fullscreen = check(595, "Start in full screen", current_settings.start_fullscreen);

    let mut info_frame = Frame::default().with_pos(30, 620).with_size(290, 25);
    info_frame.set_label("Output settings apply to the next compile.");
    info_frame.set_label_size(11);
    info_frame.set_label_color(Color::from_rgb(100, 100, 100));
    info_frame.set_align(Align::Left | Align::Inside | Align::Wrap);

    let mut save_btn = Button::default().with_pos(150, 660).with_size(90, 30).with_label("Save");
    let mut cancel_btn = Button::default().with_pos(250, 660).with_size(90, 30).with_label("Cancel");

    dialog.end();
    dialog.show();

    let result = Rc::new(RefCell::new(None));
    let result_save = result.clone();
    let result_cancel = result.clone();

    let dialog_save = dialog.clone();
    save_btn.set_callback(move |_| {
        let new_settings = AppSettings {
            theme_mode: if theme_light.value() {
                ThemeMode::Light
            } else if theme_dark.value() {
                ThemeMode::Dark
            } else {
                ThemeMode::SystemDefault
            },
            font: if font_screenbold.value() {
                FontChoice::ScreenBold
            } else if font_courier.value() {
                FontChoice::Courier
            } else {
                FontChoice::HelveticaMono
            },
            font_size: if size_12.value() {
                12
            } else if size_18.value() {
                18
            } else {
                14
            },
            output_style: if style_pretty.value() {
                OutputStyle::Pretty
            } else {
                OutputStyle::Compact
            },
            indent_width: indent.value().round().clamp(1.0, 8.0) as u32,
            warn_missing_doctype: check_doctype.value(),
            line_numbers_enabled: check_line_numbers.value(),
            word_wrap_enabled: check_word_wrap.value(),
            start_fullscreen: check_fullscreen.value(),
        };

        *result_save.borrow_mut() = Some(new_settings);
        dialog_save.clone().hide();
    });

    let dialog_cancel = dialog.clone();
    cancel_btn.set_callback(move |_| {
        *result_cancel.borrow_mut() = None;
        dialog_cancel.clone().hide();
    });

    super::run_dialog(&dialog);

    result.borrow().clone()
}

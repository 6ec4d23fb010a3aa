use fltk::{enums::Color, prelude::*};

use super::main_window::MainWidgets;

struct Palette {
    background: Color,
    text_bg: Color,
    text_fg: Color,
    cursor: Color,
    selection: Color,
    linenumber_bg: Color,
    linenumber_fg: Color,
    menu_bg: Color,
    menu_hover: Color,
    button_bg: Color,
    status_bg: Color,
}

fn dark() -> Palette {
    Palette {
        background: Color::from_rgb(25, 25, 25),
        text_bg: Color::from_rgb(30, 30, 30),
        text_fg: Color::from_rgb(220, 220, 220),
        cursor: Color::from_rgb(255, 255, 255),
        selection: Color::from_rgb(70, 70, 100),
        linenumber_bg: Color::from_rgb(40, 40, 40),
        linenumber_fg: Color::from_rgb(150, 150, 150),
        menu_bg: Color::from_rgb(35, 35, 35),
        menu_hover: Color::from_rgb(60, 60, 60),
        button_bg: Color::from_rgb(50, 50, 55),
        status_bg: Color::from_rgb(40, 40, 40),
    }
}

fn light() -> Palette {
    Palette {
        background: Color::from_rgb(240, 240, 240),
        text_bg: Color::White,
        text_fg: Color::Black,
        cursor: Color::Black,
        selection: Color::from_rgb(173, 216, 230),
        linenumber_bg: Color::from_rgb(240, 240, 240),
        linenumber_fg: Color::from_rgb(100, 100, 100),
        menu_bg: Color::from_rgb(240, 240, 240),
        menu_hover: Color::from_rgb(200, 200, 200),
        button_bg: Color::from_rgb(225, 225, 225),
        status_bg: Color::from_rgb(230, 230, 230),
    }
}

/// Status line colors for a clean compile and for one with issues.
pub fn status_colors(is_dark: bool, has_issues: bool) -> (Color, Color) {
    match (is_dark, has_issues) {
        (true, false) => (Color::from_rgb(20, 70, 50), Color::from_rgb(209, 250, 229)),
        (true, true) => (Color::from_rgb(90, 30, 30), Color::from_rgb(254, 226, 226)),
        (false, false) => (Color::from_rgb(209, 250, 229), Color::from_rgb(5, 150, 105)),
        (false, true) => (Color::from_rgb(254, 226, 226), Color::from_rgb(220, 38, 38)),
    }
}

/// Status line colors when there is no compile outcome to show.
pub fn neutral_status_colors(is_dark: bool) -> (Color, Color) {
    let p = if is_dark { dark() } else { light() };
    (p.status_bg, p.text_fg)
}

pub fn apply_theme(w: &mut MainWidgets, is_dark: bool) {
    let p = if is_dark { dark() } else { light() };

    w.input.set_color(p.text_bg);
    w.input.set_text_color(p.text_fg);
    w.input.set_cursor_color(p.cursor);
    w.input.set_selection_color(p.selection);
    w.input.set_linenumber_bgcolor(p.linenumber_bg);
    w.input.set_linenumber_fgcolor(p.linenumber_fg);

    w.output.set_color(p.text_bg);
    w.output.set_text_color(p.text_fg);
    w.output.set_selection_color(p.selection);
    w.output.set_linenumber_bgcolor(p.linenumber_bg);
    w.output.set_linenumber_fgcolor(p.linenumber_fg);

    w.issues.set_color(p.text_bg);
    w.issues.set_text_color(p.text_fg);
    w.issues.set_selection_color(p.selection);

    w.wind.set_color(p.background);
    w.wind.set_label_color(p.text_fg);
    w.menu.set_color(p.menu_bg);
    w.menu.set_text_color(p.text_fg);
    w.menu.set_selection_color(p.menu_hover);

    for label in w.labels.iter_mut() {
        label.set_label_color(p.text_fg);
    }
    for btn in w.buttons.iter_mut() {
        btn.set_color(p.button_bg);
        btn.set_label_color(p.text_fg);
    }

    let (status_bg, status_fg) = neutral_status_colors(is_dark);
    w.status.set_color(status_bg);
    w.status.set_label_color(status_fg);

    w.wind.redraw();
}

/// Set Windows title bar theme (Windows 10 build 1809+)
/// Must be called AFTER window.show() to have a valid HWND
#[cfg(target_os = "windows")]
pub fn set_windows_titlebar_theme(window: &fltk::window::Window, is_dark: bool) {
    use std::mem::size_of;
    use std::ptr::from_ref;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmSetWindowAttribute};

    let on: i32 = if is_dark { 1 } else { 0 };
    // 20 on Windows 11 / 10 2004+, 19 on 10 1809-1903
    for attribute in [20, 19] {
        unsafe {
            let hwnd = HWND(window.raw_handle() as *mut std::ffi::c_void);
            let _ = DwmSetWindowAttribute(
                hwnd,
                DWMWINDOWATTRIBUTE(attribute),
                from_ref(&on).cast(),
                size_of::<i32>() as u32,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors_differ_by_outcome() {
        assert_ne!(status_colors(false, false), status_colors(false, true));
        assert_ne!(status_colors(true, false), status_colors(true, true));
    }
}

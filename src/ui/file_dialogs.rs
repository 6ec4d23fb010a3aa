use fltk::dialog;

/// FLTK filter for HTML sources: "Description\tPattern" lines.
const HTML_FILTER: &str = "HTML Files\t*.{html,htm,xhtml}\nAll Files\t*";

pub fn native_open_dialog(last_dir: Option<&str>) -> Option<String> {
    dialog::file_chooser("Open HTML", HTML_FILTER, last_dir.unwrap_or("."), false)
}

pub fn native_save_dialog(last_dir: Option<&str>) -> Option<String> {
    dialog::file_chooser("Save Output As", HTML_FILTER, last_dir.unwrap_or("."), false)
}

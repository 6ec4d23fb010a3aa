use crate::app::domain::settings::ThemeMode;

/// Resolve a theme setting to "use dark colors or not".
pub fn resolve_dark_mode(mode: ThemeMode) -> bool {
    match mode {
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
        ThemeMode::SystemDefault => detect_system_dark_mode(),
    }
}

/// Best-effort check of the desktop's dark mode preference. Light on failure.
pub fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "windows")]
    {
        if let Some(dark) = windows_prefers_dark() {
            return dark;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if gnome_prefers_dark() {
            return true;
        }
    }

    #[cfg(target_os = "macos")]
    {
        if macos_prefers_dark() {
            return true;
        }
    }

    false
}

#[cfg(target_os = "windows")]
fn windows_prefers_dark() -> Option<bool> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let personalize = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    // AppsUseLightTheme: 0 = dark, 1 = light
    let light: u32 = personalize.get_value("AppsUseLightTheme").ok()?;
    Some(light == 0)
}

#[cfg(target_os = "linux")]
fn gnome_prefers_dark() -> bool {
    let read = |key: &str| {
        std::process::Command::new("gsettings")
            .args(["get", "org.gnome.desktop.interface", key])
            .output()
            .ok()
            .map(|out| String::from_utf8_lossy(&out.stdout).into_owned())
    };
    gsettings_says_dark(read("gtk-theme").as_deref(), read("color-scheme").as_deref())
}

#[cfg(target_os = "macos")]
fn macos_prefers_dark() -> bool {
    std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .map(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).to_lowercase().contains("dark")
        })
        .unwrap_or(false)
}

/// Interpret the `gtk-theme` and `color-scheme` values reported by gsettings.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn gsettings_says_dark(gtk_theme: Option<&str>, color_scheme: Option<&str>) -> bool {
    let theme_dark = gtk_theme.is_some_and(|t| t.to_lowercase().contains("dark"));
    let scheme_dark = color_scheme.is_some_and(|s| s.contains("prefer-dark"));
    theme_dark || scheme_dark
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_modes_skip_detection() {
        assert!(resolve_dark_mode(ThemeMode::Dark));
        assert!(!resolve_dark_mode(ThemeMode::Light));
    }

    #[test]
    fn test_gsettings_theme_name() {
        assert!(gsettings_says_dark(Some("'Adwaita-dark'\n"), None));
        assert!(!gsettings_says_dark(Some("'Adwaita'\n"), Some("'default'\n")));
    }

    #[test]
    fn test_gsettings_color_scheme() {
        assert!(gsettings_says_dark(Some("'Yaru'\n"), Some("'prefer-dark'\n")));
        assert!(!gsettings_says_dark(None, None));
    }
}

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "HtmlForge")]
#[command(version, about = "Validate, correct and preview HTML")]
pub struct Args {
    /// HTML file to load into the input editor
    pub file: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["HtmlForge"]).unwrap();
        assert!(!args.verbose);
        assert!(args.file.is_none());
    }

    #[test]
    fn test_verbose_and_file() {
        let args = Args::try_parse_from(["HtmlForge", "-v", "page.html"]).unwrap();
        assert!(args.verbose);
        assert_eq!(args.file, Some(PathBuf::from("page.html")));

        let args = Args::try_parse_from(["HtmlForge", "page.html", "--verbose"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Args::try_parse_from(["HtmlForge", "--verbos"]).is_err());
    }

    #[test]
    fn test_second_file_is_rejected() {
        assert!(Args::try_parse_from(["HtmlForge", "a.html", "b.html"]).is_err());
    }
}

//! Command-line argument definitions for the Easel CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, logging verbosity and a few render overrides.

use clap::Parser;

use easel_core::config::Theme;

/// Command-line arguments for the Easel scene exporter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scene (JSON)
    #[arg(help = "Path to the input scene")]
    pub input: String,

    /// Path to the output file; a `.png` extension selects the raster backend
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Color scheme override (light, dark)
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Pixels per document unit for PNG output
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Leave the canvas background transparent
    #[arg(long)]
    pub no_background: bool,
}

/// Output format, chosen from the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl Args {
    pub fn output_format(&self) -> OutputFormat {
        let is_png = std::path::Path::new(&self.output)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png { OutputFormat::Png } else { OutputFormat::Svg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["easel", "scene.json"]);
        assert_eq!(args.output, "out.svg");
        assert_eq!(args.output_format(), OutputFormat::Svg);
        assert_eq!(args.scale, 1.0);
        assert!(args.theme.is_none());
        assert!(!args.no_background);
    }

    #[test]
    fn test_png_output_and_overrides() {
        let args = parse(&[
            "easel",
            "scene.json",
            "-o",
            "shot.PNG",
            "--theme",
            "dark",
            "--scale",
            "2",
            "--no-background",
        ]);
        assert_eq!(args.output_format(), OutputFormat::Png);
        assert_eq!(args.theme, Some(Theme::Dark));
        assert_eq!(args.scale, 2.0);
        assert!(args.no_background);
    }

    #[test]
    fn test_invalid_theme_rejected() {
        assert!(Args::try_parse_from(["easel", "scene.json", "--theme", "sepia"]).is_err());
    }
}

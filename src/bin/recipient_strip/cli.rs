//! CLI flag schema for the recipient-strip binary.

use anyhow::{Context, Result};
use clap::Parser;
use recipient_strip::{AppConfig, Recipient};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "recipient-strip",
    about = "Fit a recipient list into one terminal row with a +N overflow badge",
    version
)]
pub(crate) struct StripCli {
    #[command(flatten)]
    pub(crate) app: AppConfig,

    /// Recipients to display, in order
    pub(crate) recipients: Vec<String>,

    /// Read more recipients from a file, one per line (appended after positional ones)
    #[arg(long = "file")]
    pub(crate) file: Option<PathBuf>,

    /// Fit into this many columns, print the row and exit instead of opening the viewer
    #[arg(long = "width")]
    pub(crate) width: Option<u16>,

    /// With --width, print the fit result as JSON
    #[arg(long = "json", requires = "width", default_value_t = false)]
    pub(crate) json: bool,

    /// Disable colors
    #[arg(long = "no-color", default_value_t = false)]
    pub(crate) no_color: bool,
}

fn parse_recipient_lines(contents: &str) -> impl Iterator<Item = Recipient> + '_ {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

impl StripCli {
    pub(crate) fn collect_recipients(&self) -> Result<Vec<Recipient>> {
        let mut recipients = self.recipients.clone();
        if let Some(path) = &self.file {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read recipients from {}", path.display()))?;
            recipients.extend(parse_recipient_lines(&contents));
        }
        Ok(recipients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_recipients_keep_order() {
        let cli = StripCli::parse_from(["test-app", "bob@x.com", "alice@x.com", "bob@x.com"]);
        assert_eq!(
            cli.collect_recipients().expect("collect"),
            vec!["bob@x.com", "alice@x.com", "bob@x.com"]
        );
    }

    #[test]
    fn recipient_file_lines_are_trimmed_and_blank_lines_skipped() {
        let parsed: Vec<Recipient> =
            parse_recipient_lines("  alice@x.com \n\n bob@x.com\n   \n").collect();
        assert_eq!(parsed, vec!["alice@x.com", "bob@x.com"]);
    }

    #[test]
    fn json_requires_width() {
        assert!(StripCli::try_parse_from(["test-app", "--json", "a"]).is_err());
        let cli = StripCli::parse_from(["test-app", "--json", "--width", "40", "a"]);
        assert!(cli.json);
        assert_eq!(cli.width, Some(40));
    }

    #[test]
    fn app_flags_are_flattened() {
        let cli = StripCli::parse_from(["test-app", "--logs", "--spacing", "3", "a"]);
        assert!(cli.app.logs);
        assert_eq!(cli.app.spacing, Some(3));
    }
}

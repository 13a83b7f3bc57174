//! recipient-strip: show a recipient list in one terminal row, collapsing the
//! overflow into a `+N` badge whose tooltip lists everyone.

mod cli;
mod event_loop;

use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use recipient_strip::config::load_user_config;
use recipient_strip::telemetry::init_tracing;
use recipient_strip::{
    CellSurface, Recipient, RecipientStrip, RecipientStripView, StripSettings, StripTheme,
};

use crate::cli::StripCli;

/// Render the strip into a detached one-row buffer and return its text.
fn render_row(strip: &RecipientStrip, width: u16) -> String {
    let area = Rect::new(0, 0, width, 1);
    let mut buf = Buffer::empty(area);
    RecipientStripView::new(strip)
        .theme(StripTheme::plain())
        .render(area, &mut buf);
    let row: String = (0..width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
    row.trim_end().to_string()
}

fn print_fit(
    settings: StripSettings,
    recipients: Vec<Recipient>,
    width: u16,
    json: bool,
) -> Result<()> {
    let mut surface = CellSurface::new();
    let mut strip = RecipientStrip::new(settings);
    strip.on_resize(width, &mut surface)?;
    strip.set_recipients(recipients, &mut surface)?;

    if json {
        let encoded =
            serde_json::to_string(&strip.state().fit).context("encode fit result as JSON")?;
        println!("{encoded}");
    } else {
        println!("{}", render_row(&strip, width));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = StripCli::parse();
    if let Some(path) = init_tracing(&cli.app) {
        tracing::info!(path = %path.display(), "trace logging enabled");
    }

    let user = load_user_config(cli.app.config_path.as_deref()).context("load user config")?;
    let settings = StripSettings::resolve(&cli.app, &user);
    let recipients = cli.collect_recipients()?;
    tracing::debug!(
        recipients = recipients.len(),
        spacing = settings.spacing,
        "starting recipient strip"
    );

    if let Some(width) = cli.width {
        return print_fit(settings, recipients, width, cli.json);
    }

    let theme = if cli.no_color {
        StripTheme::plain()
    } else {
        StripTheme::default()
    };
    let mut strip = RecipientStrip::new(settings);
    strip.set_recipients(recipients, &mut CellSurface::new())?;
    event_loop::run(&mut strip, theme)
}

//! Render a page's markup for the active locale and, optionally, open the
//! rental inquiry dialog for one equipment item.
//!
//! Usage:
//!   rafe-site <page.json>                  # print the rendered page
//!   rafe-site <page.json> <equipment-id>   # also open the inquiry dialog
//!   rafe-site <page.json> <id> --lang ar   # select a locale first
//!
//! Optional environment variables: see `Config::from_env`. The user agent's
//! preferred language is taken from `LANG`.

use anyhow::{bail, Context, Result};
use rafe_site::config::Config;
use rafe_site::i18n::Locale;
use rafe_site::modal::OpenOutcome;
use rafe_site::page::Page;
use rafe_site::site::Site;
use rafe_site::storage::FileStore;
use tracing::info;

struct Args {
    page_path: String,
    equipment_id: Option<String>,
    locale: Option<Locale>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut locale = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            let code = args.next().context("--lang needs a value (ar/en)")?;
            locale = Some(Locale::from_code(&code)?);
        } else {
            positional.push(arg);
        }
    }

    let mut positional = positional.into_iter();
    let Some(page_path) = positional.next() else {
        bail!("Usage: rafe-site <page.json> [equipment-id] [--lang ar|en]");
    };

    Ok(Args {
        page_path,
        equipment_id: positional.next(),
        locale,
    })
}

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rafe_site=info".parse()?),
        )
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let markup = std::fs::read_to_string(&args.page_path)
        .with_context(|| format!("Failed to read {}", args.page_path))?;
    let page = Page::from_json(&markup).context("Failed to parse page markup")?;

    let mut builder = Site::builder(page, config.clone())
        .with_store(FileStore::new(&config.preferences_file));
    if let Ok(lang) = std::env::var("LANG") {
        builder = builder.with_browser_language(&lang);
    }
    let mut site = builder.bootstrap();

    if let Some(locale) = args.locale {
        site.set_locale(locale);
    }

    if let Some(id) = args.equipment_id.as_deref() {
        match site.open_rental(id) {
            Some(OpenOutcome::Opened) => {
                if let Some(context) = site.modal().and_then(|modal| modal.context()) {
                    println!("Equipment: {} ({})", context.resolved_name, context.equipment_id);
                    println!("Chat:      {}", context.links.chat);
                    println!("Email:     {}", context.links.email);
                }
            }
            Some(_) => {
                for notice in site.page().notices() {
                    eprintln!("{}", notice.message);
                }
            }
            None => bail!("This page has no rental dialog"),
        }
    }

    let rendered = site.page().to_markup(site.page().root());
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    info!("Rendered {} in {}", args.page_path, site.locale());
    Ok(())
}

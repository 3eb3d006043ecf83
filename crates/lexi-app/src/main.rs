use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexi_config::Config;
use lexi_core::{CardStore, LanguageService};
use lexi_lang_english::OxfordDictionary;
use lexi_store::FsCardStore;
use lexi_translator::DeeplTranslator;

use crate::console::TerminalConsole;
use crate::controller::{CardController, Start};
use crate::editor::CardEditor;

mod console;
mod controller;
mod editor;
mod field;
mod logging;
mod template;

#[cfg(test)]
mod tests;

/// Only English headwords have a dictionary provider
const ENGLISH: &str = "en";

#[derive(Parser, Debug)]
#[clap(name = "lexi", version, about = "Build vocabulary cards from the terminal")]
struct Cli {
    #[clap(long, short, global = true, help = "Configuration file (JSON), defaults to ./lexi.json")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vocabulary card
    Create {
        #[clap(required = true, help = "Word or phrase to learn")]
        words: Vec<String>,
    },
    /// Browse saved cards
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => println!("bye bye"),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    logging::init(&config.log)?;

    let store_path = config.store.validated_path()?;
    tracing::info!("Cards stored in {}", store_path.display());
    let store: Arc<dyn CardStore> = Arc::new(FsCardStore::new(store_path));

    let editor = CardEditor::new(
        language_service(&config)?,
        store,
        config.timeouts.clone(),
        config.languages.source.clone(),
        config.languages.target.clone(),
    );
    let controller = CardController::new(editor, Arc::new(TerminalConsole::new()));

    let start = match cli.command {
        Commands::Create { words } => Start::Create(words.join(" ")),
        Commands::List => Start::List,
    };

    controller.run(start).await.context("card session ended abnormally")?;

    Ok(())
}

fn language_service(config: &Config) -> anyhow::Result<LanguageService> {
    let languages = &config.languages;
    let mut service = LanguageService::new();

    if !config.dictionary.enabled {
        tracing::warn!("Dictionary disabled");
    } else if languages.source == ENGLISH {
        let dictionary = OxfordDictionary::new(
            &config.dictionary.url,
            config.dictionary.app_id.clone(),
            config.dictionary.app_key.clone(),
            languages.source.clone(),
        )?;
        service = service.with_dictionary(Arc::new(dictionary));
    } else {
        tracing::warn!("No dictionary available for {}", languages.source);
    }

    if !config.translator.enabled {
        tracing::warn!("Translator disabled");
    } else if config.translator.provider.eq_ignore_ascii_case("deepl") {
        let translator = DeeplTranslator::new(
            config.translator.api_key.clone(),
            config.translator.api_url.clone(),
            languages.source.clone(),
            languages.target.clone(),
        );
        service = service.with_translator(Arc::new(translator));
    } else {
        tracing::warn!("Unknown translator provider {}", config.translator.provider);
    }

    Ok(service)
}

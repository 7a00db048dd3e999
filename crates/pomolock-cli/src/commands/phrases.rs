use clap::Args;
use pomolock_core::challenge::phrases;
use pomolock_core::{Config, Language};

#[derive(Args)]
pub struct PhrasesArgs {
    /// Phrase language (RU or EN); defaults to the configured one
    #[arg(long)]
    language: Option<Language>,
}

pub fn run(args: PhrasesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let language = args
        .language
        .unwrap_or_else(|| Config::load_or_default().language);
    for phrase in phrases::corpus(language) {
        println!("{phrase}");
    }
    Ok(())
}

use clap::Subcommand;
use std::path::Path;

use aula_client::{change_locale, initial_locale, Locale};

use crate::tab::Tab;

#[derive(Subcommand)]
pub enum LocaleCmd {
    /// Show the locale the interface starts in
    Get {
        /// Navigator language tag (defaults to $LANG)
        #[arg(long)]
        navigator: Option<String>,
    },
    /// Save a locale preference (en, es, ca, eu)
    Set {
        locale: Locale,
    },
}

pub fn run(cmd: LocaleCmd, tab: &Tab, store_root: &Path) -> anyhow::Result<()> {
    let store = tab.local_store(store_root);
    match cmd {
        LocaleCmd::Get { navigator } => {
            let navigator = navigator.or_else(|| std::env::var("LANG").ok());
            println!("{}", initial_locale(&store, navigator.as_deref()));
        }
        LocaleCmd::Set { locale } => {
            change_locale(&store, locale)?;
            println!("locale = {locale}");
        }
    }
    Ok(())
}

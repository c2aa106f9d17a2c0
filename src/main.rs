use clap::{Parser, Subcommand};
use newtab_board::background::BackgroundClient;
use newtab_board::favicon::FaviconCache;
use newtab_board::prefs::Preferences;
use newtab_board::settings::Settings;
use newtab_board::suggest::{matching_shortcuts, search_url, SearchBox, SuggestClient};
use newtab_board::{logging, Board, JsonFileStore};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "newtab_board")]
#[command(about = "Shortcuts grouped into tabs for a new-tab page")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = "settings.json")]
    settings: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shortcuts of the active tab
    List,
    /// All tabs
    Tabs,
    /// Add a shortcut
    Add {
        name: String,
        url: String,
        /// Tab to place it in; the default tab when omitted
        tab: Option<String>,
    },
    /// Edit a shortcut, optionally moving it to another tab
    Edit {
        id: String,
        name: String,
        url: String,
        tab: Option<String>,
    },
    /// Delete a shortcut
    Rm { id: String },
    /// Create a tab
    TabAdd { name: String },
    /// Rename a tab
    TabRename { id: String, name: String },
    /// Delete a tab
    TabRm { id: String },
    /// Make a tab active
    Select { id: String },
    /// Drop tab <src> onto <target>
    MoveTab { src: String, target: String },
    /// Drop shortcut <src> onto <target>
    Move { src: String, target: String },
    /// Autocomplete suggestions
    Suggest {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Url the search box would open, followed by matching shortcuts
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Pick a background image
    Background,
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(&cli.settings)?;
    let _guard = logging::init(settings.debug_logging, settings.log_file.clone());

    let store = JsonFileStore::new(&settings.store_path);

    match cli.command {
        Commands::List => {
            let mut board = Board::load(store)?;
            let visible: Vec<_> = board.visible_shortcuts().into_iter().cloned().collect();
            let mut icons = FaviconCache::new(board.store_mut());
            for s in visible {
                let icon = icons.lookup(&s.url)?.unwrap_or_default();
                println!("{}\t{}\t{}\t{}", s.id, s.name, s.url, icon);
            }
        }
        Commands::Tabs => {
            let board = Board::load(store)?;
            for tab in board.tabs() {
                let marker = if board.active_tab_id() == Some(tab.id.as_str()) { "*" } else { " " };
                println!("{marker} {}\t{}\t{} shortcuts", tab.id, tab.name, tab.shortcuts.len());
            }
        }
        Commands::Add { name, url, tab } => {
            let mut board = Board::load(store)?;
            let s = board.add_shortcut(&name, &url, tab.as_deref())?;
            println!("{}", s.id);
        }
        Commands::Edit { id, name, url, tab } => {
            Board::load(store)?.update_shortcut(&id, &name, &url, tab.as_deref())?;
        }
        Commands::Rm { id } => {
            Board::load(store)?.delete_shortcut(&id)?;
        }
        Commands::TabAdd { name } => {
            let tab = Board::load(store)?.create_tab(&name)?;
            println!("{}", tab.id);
        }
        Commands::TabRename { id, name } => {
            Board::load(store)?.rename_tab(&id, &name)?;
        }
        Commands::TabRm { id } => {
            Board::load(store)?.delete_tab(&id)?;
        }
        Commands::Select { id } => {
            Board::load(store)?.select_tab(&id)?;
        }
        Commands::MoveTab { src, target } => {
            if !Board::load(store)?.move_tab(&src, &target)? {
                println!("order unchanged");
            }
        }
        Commands::Move { src, target } => {
            if !Board::load(store)?.move_shortcut(&src, &target)? {
                println!("order unchanged");
            }
        }
        Commands::Suggest { query } => {
            let client = SuggestClient::from_settings(&settings)?;
            let mut search = SearchBox::from_settings(client, &settings);
            let now = Instant::now();
            search.on_input(&query.join(" "), now);
            search.tick(now + search.delay());
            for s in search.suggestions() {
                println!("{s}");
            }
        }
        Commands::Search { query } => {
            let query = query.join(" ");
            if let Some(url) = search_url(&query) {
                println!("{url}");
            }
            let board = Board::load(store)?;
            for s in matching_shortcuts(board.shortcuts(), &query) {
                println!("{}\t{}\t{}", s.id, s.name, s.url);
            }
        }
        Commands::Background => {
            let prefs = Preferences::load(&store)?;
            let client = BackgroundClient::from_settings(&settings)?;
            let key = prefs.unsplash_key.as_deref().unwrap_or_default();
            match client.random_image(prefs.background_query(), key) {
                Some(img) => println!("{}", img.url),
                None => println!("background unchanged"),
            }
        }
    }
    Ok(())
}

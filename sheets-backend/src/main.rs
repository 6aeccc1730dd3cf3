use dotenv::dotenv;

use sheets_backend::config::{self, Config};
use sheets_backend::reminder;
use sheets_backend::AppState;

fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Memory sheets v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    log::info!("Sheets directory: {:?} ({:?} layout)", config.sheets_dir, config.layout);
    log::info!("Nav directory: {:?}", config.nav_dir);
    log::info!("Pattern file: {:?}", config.pattern_file);

    config::initialize_dirs(&config)?;

    let state = match AppState::bootstrap(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load sheets: {}", e);
            std::process::exit(1);
        }
    };

    let today = reminder::today();
    let due = state.due_on(today);
    log::info!("{} memory sheets in {:?}", state.sheets.len(), state.sheets.root());
    log::info!("{} nav sheets in {:?}", state.nav_sheets.len(), state.nav_sheets.root());
    log::info!(
        "Pattern {:?} from {:?}",
        state.pattern.get().intervals(),
        state.pattern.path()
    );

    println!("Due on {}: {} sheet(s)", today, due.len());
    for sheet in &due {
        let first_line = sheet.text.lines().next().unwrap_or("").trim();
        println!("  {}  {}", sheet.display_date(), first_line);
    }

    match state.sheets.get(&today) {
        Ok(_) => println!("Today's sheet is written."),
        Err(e) if e.is_not_found() => println!("No sheet for today yet."),
        Err(e) => log::warn!("Could not read today's sheet: {}", e),
    }

    Ok(())
}

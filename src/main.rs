use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use popcorn_manager::config::Settings;
use popcorn_manager::external::{CacheCleanupTask, CachedMovieApi, OmdbClient};
use popcorn_manager::models::MovieDetail;
use popcorn_manager::services::{
    JsonFileStorage, KeyValueStorage, MovieSelection, QuerySearchController, SearchSnapshot,
    SearchStatus, WatchListStore,
};

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Query(&'a str),
    Results,
    Select(&'a str),
    Details,
    Rate(&'a str),
    Add,
    Delete(&'a str),
    Watched,
    Stats,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// 空行不是命令，返回 `None`
    fn parse(line: &'a str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Command::Query(line));
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest.trim(), ""),
        };

        let command = match name {
            "results" => Command::Results,
            "select" => Command::Select(arg),
            "details" => Command::Details,
            "rate" => Command::Rate(arg),
            "add" => Command::Add,
            "delete" => Command::Delete(arg),
            "watched" => Command::Watched,
            "stats" => Command::Stats,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(name),
        };
        Some(command)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env()?;

    // Initialize external API client
    let client = Arc::new(OmdbClient::from_settings(&settings)?);
    // 详情走缓存，搜索每次都实时请求
    let api = Arc::new(CachedMovieApi::new(client.clone()));

    // Start cache cleanup task
    let cache_cleanup_task = CacheCleanupTask::new(
        api.cache.clone(),
        Duration::from_secs(5 * 60), // 每5分钟清理一次
    );
    tokio::spawn(cache_cleanup_task.start());

    let storage = JsonFileStorage::new(&settings.store_dir);
    let mut store = WatchListStore::open(storage, settings.store_key.clone(), Vec::new()).await;
    tracing::info!(
        "📼 Watched list ready: {} movies ({:?})",
        store.list().len(),
        settings.store_dir
    );

    // 搜索词变化时清空选中
    let query_changed = Arc::new(AtomicBool::new(false));
    let flag = query_changed.clone();
    let mut search = QuerySearchController::new(client)
        .with_on_query_change(move || flag.store(true, Ordering::SeqCst));
    let mut selection = MovieSelection::new(api);

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Query(query) => {
                search.set_query(query);
            }
            Command::Results => print_results(&search.snapshot()),
            Command::Select(id) => match selection.toggle(id) {
                Some(id) => println!("Selected {} (use /details)", id),
                None => println!("Selection cleared"),
            },
            Command::Details => match selection.load_details().await {
                Ok(detail) => {
                    let detail = detail.clone();
                    print_detail(&detail, selection.existing_rating(&store));
                }
                Err(e) => println!("{}", e),
            },
            Command::Rate(raw) => match raw.parse::<u8>() {
                Ok(rating) => match selection.set_rating(rating) {
                    Ok(()) => println!("Rated {} (use /add to save)", rating),
                    Err(e) => println!("{}", e),
                },
                Err(_) => println!("Rating must be a number between 1 and 10"),
            },
            Command::Add => match selection.confirm(&mut store).await {
                Ok(movie) => println!("Added {} ({}⭐)", movie.title, movie.user_rating),
                Err(e) => println!("{}", e),
            },
            Command::Delete(id) => match store.remove(id).await {
                Ok(movie) => println!("Removed {}", movie.title),
                Err(e) => println!("{}", e),
            },
            Command::Watched => print_watched(&store),
            Command::Stats => print_stats(&store),
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command: /{}", name),
        }

        if query_changed.swap(false, Ordering::SeqCst) {
            selection.clear();
        }
    }

    search.cancel();
    tracing::info!("Bye 🍿");
    Ok(())
}

fn print_help() {
    println!("🍿 usePopcorn: type to search (3+ characters)");
    println!("  /results        show current search results");
    println!("  /select <id>    select or deselect a movie");
    println!("  /details        load details of the selected movie");
    println!("  /rate <1-10>    rate the selected movie");
    println!("  /add            add the rated movie to the watched list");
    println!("  /delete <id>    remove a movie from the watched list");
    println!("  /watched        list watched movies");
    println!("  /stats          watched list statistics");
    println!("  /quit");
}

fn print_results(snapshot: &SearchSnapshot) {
    match snapshot.status {
        SearchStatus::Loading => println!("LOADING..."),
        _ if snapshot.has_error() => println!("⛔ {}", snapshot.error),
        _ => {
            println!("Found {} results", snapshot.results.len());
            for movie in &snapshot.results {
                println!("  {}  {} ({})", movie.imdb_id, movie.title, movie.year);
            }
        }
    }
}

fn print_detail(detail: &MovieDetail, existing_rating: Option<u8>) {
    let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());

    println!("{} ({})", detail.title, detail.year);
    println!(
        "  {} • {}",
        na(&detail.released),
        detail
            .runtime
            .map(|r| format!("{} min", r))
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  {}", na(&detail.genre));
    if let Some(rating) = detail.imdb_rating {
        println!("  ⭐ {} IMDb rating", rating);
    }
    if let Some(awards) = &detail.awards {
        println!("  Award: {}", awards);
    }
    println!("  {}", na(&detail.plot));
    println!("  Starring {}", na(&detail.actors));
    println!("  Directed by {}", na(&detail.director));
    println!("  Writer: {}", na(&detail.writer));
    if let Some(website) = &detail.website {
        println!("  {}", website);
    }

    match existing_rating {
        Some(rating) => println!("You rated this movie {}⭐", rating),
        None => println!("Rate it with /rate <1-10>"),
    }
}

fn print_watched<S: KeyValueStorage>(store: &WatchListStore<S>) {
    for movie in store.list() {
        let imdb = movie
            .imdb_rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let runtime = movie
            .runtime
            .map(|r| format!("{} min", r))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "  {}  {}  ⭐️ {}  🌟 {}  ⏳ {}",
            movie.imdb_id, movie.title, imdb, movie.user_rating, runtime
        );
    }
}

fn print_stats<S: KeyValueStorage>(store: &WatchListStore<S>) {
    let summary = store.summary();
    println!("Movies you watched");
    println!("  #️⃣ {} movies", summary.count);
    println!("  ⭐️ {:.2}", summary.avg_imdb_rating);
    println!("  🌟 {:.2}", summary.avg_user_rating);
    println!("  ⏳ {:.0} min", summary.avg_runtime);
}

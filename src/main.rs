use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookreview::config::Config;
use bookreview::infrastructure::AppState;
use bookreview::pages::BooksPage;
use bookreview::routes::ListingQuery;
use bookreview::views::BookListView;

const USAGE: &str = "USAGE: bookreview [--profile NAME] [--page N] [SEARCH TERMS...]";

#[derive(Debug, PartialEq)]
struct Args {
    profile: Option<String>,
    page: u32,
    search: String,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(Args),
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut profile = None;
    let mut page = 1;
    let mut terms = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--profile" => match iter.next() {
                Some(name) if !name.starts_with("--") => profile = Some(name.clone()),
                _ => return Err("--profile needs a name".to_string()),
            },
            "--page" => {
                page = iter
                    .next()
                    .and_then(|v| v.parse::<u32>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| "--page needs a number of 1 or more".to_string())?;
            }
            other => terms.push(other.to_string()),
        }
    }

    Ok(Command::Run(Args {
        profile,
        page,
        search: terms.join(" "),
    }))
}

fn print_listing(view: &BookListView) {
    println!("{}", view.heading());
    if let BookListView::Results { cards, .. } = view {
        for card in cards {
            println!();
            println!("  {} by {} [{}]", card.title, card.author, card.genre);
            println!("  {}  ({} reviews)", card.stars, card.num_reviews);
            if let Some(summary) = &card.summary {
                println!("  {}", summary);
            }
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let profile = args.profile.clone();
    let config = Config::from_lookup(|key| match (key, &profile) {
        ("PROFILE", Some(p)) => Some(p.clone()),
        _ => std::env::var(key).ok(),
    });
    tracing::info!(
        "Using backend {} (profile {})",
        config.api_base_url,
        config.profile
    );

    let app = AppState::new(config).map_err(|e| format!("Failed to start: {}", e))?;
    app.auth.restore_session().await;
    if let Some(user) = app.auth.current_user() {
        tracing::info!("Signed in as {}", user.name);
    }

    let page = BooksPage::new(app, ListingQuery::new(args.search, args.page));
    page.mount().await;
    print_listing(&page.view());
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookreview=info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(&args) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}", USAGE);
            return;
        }
        Err(problem) => {
            eprintln!("{}", problem);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    // A panic anywhere below must still end with a readable message
    match tokio::spawn(run(args)).await {
        Ok(Ok(())) => {}
        Ok(Err(message)) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Unexpected failure: {}", e);
            eprintln!("Something went wrong. Please try again later.");
            std::process::exit(1);
        }
    }
}

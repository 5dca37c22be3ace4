use scratch_core::forms::{FormState, PlayerForm};
use scratch_core::routes::{self, Route};
use scratch_core::{ClientConfig, PlayService, SqliteSessionStore};
use tempfile::tempdir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let temp_dir = tempdir()?;
    println!("Using temporary directory: {:?}", temp_dir.path());

    let store = SqliteSessionStore::new(&temp_dir.path().join("session.db")).await?;

    // Protected screens redirect until a session exists
    let access = routes::enter(Route::AdminDashboard, &store).await?;
    println!("Admin dashboard: {:?}", access);

    // Fill in the player form; submission stays blocked until it is valid
    let mut form = FormState::new(PlayerForm::new(Some("DEMO-TOKEN")));
    println!("Form errors: {}", form.errors());

    form.update(|f| {
        f.first_name = "Grace".to_string();
        f.last_name = "Hopper".to_string();
        f.phone = "5550102030".to_string();
        f.email = "grace@example.com".to_string();
        f.age = Some(30);
        f.accept_terms = true;
    });
    let request = form.submit()?;

    let config = ClientConfig::default();
    println!("Claiming play against {}...", config.base_url());

    let play = PlayService::new(&config)?;
    match play.claim(&request).await {
        Ok(result) => {
            println!("Play {}: {}", result.play_id, result.result.prize_type);
            println!("Result code: {}", result.result.result_code);
        }
        Err(e) => println!("Claim failed: {}", e.user_message()),
    }

    Ok(())
}

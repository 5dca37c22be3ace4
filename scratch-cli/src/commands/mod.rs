pub mod admin;
pub mod play;
pub mod staff;

pub use admin::{handle_admin_command, AdminCommands};
pub use play::{handle_check, handle_play, handle_status, PlayArgs};
pub use staff::{handle_staff_command, StaffCommands};

use crate::config::CliConfig;
use comfy_table::{presets::UTF8_FULL, Table};
use scratch_core::routes::{self, Access, Route};
use scratch_core::types::PlaySummary;
use scratch_core::{
    ClientConfig, Portal, Result, ScratchError, SessionContext, SessionStore, StoredSession,
};
use std::sync::Arc;

/// What every command needs: settings and the persisted session store.
pub struct App {
    pub config: CliConfig,
    pub client: ClientConfig,
    pub store: Arc<dyn SessionStore>,
}

impl App {
    pub fn session(&self, portal: Portal) -> Arc<SessionContext> {
        Arc::new(SessionContext::new(portal, self.store.clone()))
    }

    /// Check the stored session before a protected screen loads anything.
    pub async fn enter(&self, route: Route) -> Result<Option<StoredSession>> {
        match routes::enter(route, &*self.store).await? {
            Access::Open => Ok(None),
            Access::Granted(session) => Ok(Some(session)),
            Access::Redirect(login_route) => Err(ScratchError::Unauthenticated {
                message: "Please log in to continue".to_string(),
                login_route,
            }),
        }
    }
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header);
    table
}

pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn plays_table(plays: &[PlaySummary]) -> Table {
    let mut table = new_table(vec![
        "ID", "Name", "Phone", "Result Code", "Prize", "Winner", "Redeemed", "Played",
    ]);
    for play in plays {
        table.add_row(vec![
            play.id.clone(),
            play.full_name(),
            play.phone.clone(),
            play.result_code.clone(),
            play.prize_type.clone(),
            yes_no(play.is_winner).to_string(),
            yes_no(play.is_redeemed).to_string(),
            play.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    table
}

pub fn print_play(play: &PlaySummary) {
    println!("Play {}:", play.id);
    println!("  Name: {}", play.full_name());
    println!("  Phone: {}", play.phone);
    if let Some(email) = &play.email {
        println!("  Email: {}", email);
    }
    println!("  Result Code: {}", play.result_code);
    println!("  Prize: {}", play.prize_type);
    println!("  Winner: {}", yes_no(play.is_winner));
    match play.redeemed_at {
        Some(at) if play.is_redeemed => println!("  Redeemed: {}", at.format("%Y-%m-%d %H:%M")),
        _ => println!("  Redeemed: {}", yes_no(play.is_redeemed)),
    }
}

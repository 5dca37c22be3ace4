use super::{plays_table, print_play, App};
use clap::Subcommand;
use dialoguer::{Confirm, Input, Password};
use scratch_core::forms::{FormState, RedeemForm, SearchForm};
use scratch_core::routes::Route;
use scratch_core::{
    Portal, Result, ScratchError, SessionContext, StaffService, StoredSession,
};
use std::sync::Arc;

#[derive(Subcommand)]
pub enum StaffCommands {
    /// Manage the stored staff session
    #[command(subcommand)]
    Session(SessionCommands),

    #[command(flatten)]
    Desk(DeskCommands),
}

#[derive(Subcommand)]
pub enum DeskCommands {
    /// Search plays by result code, phone number or email
    Search {
        /// Search query
        query: String,
    },
    /// Show one play
    Show {
        /// Play ID
        id: String,
    },
    /// Hand out the prize of a winning play
    Redeem {
        /// Play ID
        id: String,
        /// Name of the staff member redeeming (prompted for when missing)
        #[arg(long)]
        by: Option<String>,
        /// Optional notes
        #[arg(long)]
        notes: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Store the staff access token issued by an administrator
    Set {
        /// Access token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Forget the stored staff token
    Clear,
}

pub async fn handle_staff_command(cmd: StaffCommands, app: &App) -> Result<()> {
    let session = app.session(Portal::Staff);

    match cmd {
        StaffCommands::Session(SessionCommands::Set { token }) => {
            let token = match token {
                Some(t) => t,
                None => Password::new().with_prompt("Staff token").interact()?,
            };
            let token = token.trim();
            if token.is_empty() {
                return Err(ScratchError::config("Staff token cannot be empty"));
            }
            session.establish(StoredSession::new(token, None)).await?;
            println!("Staff session stored.");
            Ok(())
        }
        StaffCommands::Session(SessionCommands::Clear) => {
            session.end().await?;
            println!("Staff session cleared.");
            Ok(())
        }
        StaffCommands::Desk(cmd) => handle_desk_command(cmd, app, session).await,
    }
}

async fn handle_desk_command(
    cmd: DeskCommands,
    app: &App,
    session: Arc<SessionContext>,
) -> Result<()> {
    app.enter(Route::Staff).await?;
    let staff = StaffService::new(&app.client, session)?;

    match cmd {
        DeskCommands::Search { query } => {
            let query = FormState::new(SearchForm { query }).submit()?;
            let plays = staff.search_play(&query).await?;

            if plays.is_empty() {
                println!("No plays found for '{}'.", query);
                return Ok(());
            }

            println!("{}", plays_table(&plays));
            let redeemable: Vec<_> = plays.iter().filter(|p| p.is_redeemable()).collect();
            if !redeemable.is_empty() {
                println!("Redeemable:");
                for play in redeemable {
                    println!("  scratch staff redeem {}  ({})", play.id, play.prize_type);
                }
            }
        }

        DeskCommands::Show { id } => {
            let play = staff.get_play(&id).await?;
            print_play(&play);
        }

        DeskCommands::Redeem {
            id,
            by,
            notes,
            force,
        } => {
            let play = staff.get_play(&id).await?;
            if !play.is_redeemable() {
                let reason = if play.is_redeemed {
                    "has already been redeemed"
                } else {
                    "is not a winning play"
                };
                println!("Play {} {}.", play.id, reason);
                return Ok(());
            }

            let redeemed_by = match by {
                Some(name) => name,
                None => Input::new().with_prompt("Your name").interact_text()?,
            };
            let request = FormState::new(RedeemForm {
                redeemed_by,
                notes: notes.unwrap_or_default(),
            })
            .submit()?;

            if !force {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Redeem {} for {}?",
                        play.prize_type,
                        play.full_name()
                    ))
                    .default(false)
                    .interact()?;
                if !confirm {
                    println!("Redemption cancelled.");
                    return Ok(());
                }
            }

            staff.redeem_play(&play.id, &request).await?;
            println!("Prize redeemed for {} by {}.", play.full_name(), request.redeemed_by);
        }
    }

    Ok(())
}

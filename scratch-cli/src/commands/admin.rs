use super::{new_table, plays_table, yes_no, App};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use dialoguer::{Confirm, Input, Password};
use scratch_core::forms::{FormState, LoginForm, PrizeForm, RedeemForm, TokenBatchForm};
use scratch_core::routes::Route;
use scratch_core::services::admin::DEFAULT_PAGE_SIZE;
use scratch_core::types::{PlayFilters, PrizeUpdate, ResultType};
use scratch_core::{AdminService, Portal, Result, ScratchError};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Log in to the admin portal
    Login {
        /// Admin email (will prompt if not provided)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Log out of the admin portal
    Logout,
    /// Show the logged-in admin
    Profile,
    /// Show token, play and prize statistics
    Dashboard,
    /// Token management commands
    #[command(subcommand)]
    Tokens(TokenCommands),
    /// Prize type management commands
    #[command(subcommand)]
    Prizes(PrizeCommands),
    /// Play listing, export and redemption
    #[command(subcommand)]
    Plays(PlayCommands),
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// List tokens
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
        /// Filter by token code
        #[arg(short, long)]
        search: Option<String>,
        /// Only used (true) or unused (false) tokens
        #[arg(long)]
        used: Option<bool>,
    },
    /// Upload a file of token codes
    Upload {
        /// File with one token code per line
        file: PathBuf,
    },
    /// Generate a batch of tokens
    Create {
        /// Number of tokens to create
        #[arg(short, long)]
        count: i64,
        /// Expiry time (RFC 3339)
        #[arg(long)]
        expires_at: Option<DateTime<Utc>>,
        /// Metadata attached to every token (JSON)
        #[arg(long)]
        metadata: Option<String>,
    },
    /// Show token statistics
    Stats,
    /// Delete tokens
    Delete {
        /// Token IDs
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum PrizeCommands {
    /// List prize types
    List {
        /// Include inactive prize types
        #[arg(short, long)]
        all: bool,
    },
    /// Show one prize type
    Show { id: String },
    /// Create a prize type
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        description: Option<String>,
        /// Displayed prize value
        #[arg(long)]
        value: Option<String>,
        /// Selection weight
        #[arg(long, default_value_t = 1.0)]
        weight: f64,
        /// Maximum number handed out (unlimited when omitted)
        #[arg(long)]
        stock: Option<i64>,
        /// Create a losing result type
        #[arg(long)]
        no_prize: bool,
        /// Create the type inactive
        #[arg(long)]
        inactive: bool,
    },
    /// Update a prize type
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        is_prize: Option<bool>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a prize type
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Show prize statistics
    Stats,
    /// Set the stock limit of a prize type
    Stock { id: String, limit: u64 },
    /// Check the prize configuration for problems
    Validate,
}

#[derive(Subcommand)]
pub enum PlayCommands {
    /// List plays
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
        #[command(flatten)]
        filters: FilterArgs,
        /// Only redeemed (true) or unredeemed (false) plays
        #[arg(long)]
        redeemed: Option<bool>,
    },
    /// Export plays as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file
        #[arg(short, long, default_value = "plays.csv")]
        out: PathBuf,
    },
    /// Redeem a winning play
    Redeem {
        id: String,
        #[arg(long)]
        by: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// Played on or after this date
    #[arg(long)]
    from: Option<String>,
    /// Played on or before this date
    #[arg(long)]
    to: Option<String>,
    /// Prize type code
    #[arg(long)]
    prize_type: Option<String>,
}

impl FilterArgs {
    fn into_filters(self, is_redeemed: Option<bool>) -> PlayFilters {
        PlayFilters {
            from: self.from,
            to: self.to,
            prize_type: self.prize_type,
            is_redeemed,
        }
    }
}

pub async fn handle_admin_command(cmd: AdminCommands, app: &App) -> Result<()> {
    let admin = AdminService::new(&app.client, app.session(Portal::Admin))?;

    match cmd {
        AdminCommands::Login { email } => {
            let email = match email {
                Some(e) => e,
                None => Input::new().with_prompt("Email").interact_text()?,
            };
            let password = Password::new().with_prompt("Password").interact()?;

            let credentials = FormState::new(LoginForm { email, password }).submit()?;
            let response = admin.login(&credentials).await?;
            println!(
                "Logged in as {} ({}).",
                response.admin.name, response.admin.email
            );
        }

        AdminCommands::Logout => {
            admin.logout().await?;
            println!("Logged out.");
        }

        AdminCommands::Profile => {
            app.enter(Route::AdminDashboard).await?;
            let account = admin.profile().await?;
            println!("Admin Profile:");
            println!("  Name: {}", account.name);
            println!("  Email: {}", account.email);
            println!("  Role: {:?}", account.role);
            println!("  Active: {}", yes_no(account.is_active));
            println!("  Since: {}", account.created_at.format("%Y-%m-%d"));
        }

        AdminCommands::Dashboard => {
            app.enter(Route::AdminDashboard).await?;
            let stats = admin.dashboard().await?;

            println!("Tokens:");
            println!("  Total: {}", stats.tokens.total);
            println!("  Used: {}", stats.tokens.used);
            println!("  Available: {}", stats.tokens.available);
            println!();
            println!("Plays:");
            println!("  Total: {}", stats.plays.total);
            println!("  Today: {}", stats.plays.today);
            println!("  This week: {}", stats.plays.this_week);
            println!("  Redeemed: {}", stats.plays.redeemed);

            if !stats.result_types.is_empty() {
                println!();
                let mut table = new_table(vec!["Prize", "Code", "Weight", "Stock", "Plays"]);
                for usage in &stats.result_types {
                    let rt = &usage.result_type;
                    table.add_row(vec![
                        rt.name.clone(),
                        rt.code.clone(),
                        rt.weight.to_string(),
                        stock_label(rt),
                        usage.plays_count.to_string(),
                    ]);
                }
                println!("{}", table);
            }
        }

        AdminCommands::Tokens(cmd) => {
            app.enter(Route::AdminTokens).await?;
            handle_token_command(cmd, &admin).await?;
        }

        AdminCommands::Prizes(cmd) => {
            app.enter(Route::AdminPrizes).await?;
            handle_prize_command(cmd, &admin).await?;
        }

        AdminCommands::Plays(cmd) => {
            app.enter(Route::AdminPlays).await?;
            handle_play_command(cmd, &admin).await?;
        }
    }

    Ok(())
}

async fn handle_token_command(cmd: TokenCommands, admin: &AdminService) -> Result<()> {
    match cmd {
        TokenCommands::List {
            page,
            limit,
            search,
            used,
        } => {
            let tokens = admin.tokens(page, limit, search.as_deref(), used).await?;

            if tokens.items.is_empty() {
                println!("No tokens found.");
                return Ok(());
            }

            let mut table = new_table(vec!["Code", "Used", "Used At", "Created", "Expires"]);
            for token in &tokens.items {
                table.add_row(vec![
                    token.code.clone(),
                    yes_no(token.is_used).to_string(),
                    format_time(token.used_at),
                    token.created_at.format("%Y-%m-%d").to_string(),
                    format_time(token.expires_at),
                ]);
            }
            println!("{}", table);

            if let Some(p) = tokens.pagination {
                println!("Page {} ({} per page), {} tokens in total", p.page, p.limit, p.total);
            }
        }

        TokenCommands::Upload { file } => {
            let contents = tokio::fs::read(&file).await?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("tokens.csv");

            let summary = admin.upload_tokens(file_name, contents).await?;
            println!("Uploaded {} tokens.", summary.count);
            if !summary.message.is_empty() {
                println!("{}", summary.message);
            }
        }

        TokenCommands::Create {
            count,
            expires_at,
            metadata,
        } => {
            let batch = FormState::new(TokenBatchForm {
                count: Some(count),
                expires_at,
            })
            .submit()?;
            let metadata = metadata
                .map(|m| serde_json::from_str::<Value>(&m))
                .transpose()
                .map_err(|e| ScratchError::config(format!("Invalid metadata JSON: {}", e)))?;

            let created = admin
                .create_tokens(batch.count, batch.expires_at, metadata)
                .await?;
            println!("Created {} tokens.", batch.count);
            print_value(&created)?;
        }

        TokenCommands::Stats => {
            print_value(&admin.token_stats().await?)?;
        }

        TokenCommands::Delete { ids, force } => {
            if !force && !confirm(&format!("Delete {} token(s)?", ids.len()))? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            admin.delete_tokens(&ids).await?;
            println!("Deleted {} token(s).", ids.len());
        }
    }

    Ok(())
}

async fn handle_prize_command(cmd: PrizeCommands, admin: &AdminService) -> Result<()> {
    match cmd {
        PrizeCommands::List { all } => {
            let prizes = admin.prizes(all).await?;
            if prizes.is_empty() {
                println!("No prize types configured.");
                return Ok(());
            }

            let mut table = new_table(vec![
                "ID", "Name", "Code", "Value", "Weight", "Stock", "Handed Out", "Prize", "Active",
            ]);
            for rt in &prizes {
                table.add_row(vec![
                    rt.id.clone(),
                    rt.name.clone(),
                    rt.code.clone(),
                    rt.prize_value.clone().unwrap_or_default(),
                    rt.weight.to_string(),
                    stock_label(rt),
                    rt.distributed_count.to_string(),
                    yes_no(rt.is_prize).to_string(),
                    yes_no(rt.is_active).to_string(),
                ]);
            }
            println!("{}", table);
        }

        PrizeCommands::Show { id } => {
            let rt = admin.prize(&id).await?;
            print_prize(&rt);
        }

        PrizeCommands::Create {
            name,
            code,
            description,
            value,
            weight,
            stock,
            no_prize,
            inactive,
        } => {
            let draft = FormState::new(PrizeForm {
                name,
                code,
                description: description.unwrap_or_default(),
                prize_value: value.unwrap_or_default(),
                weight: Some(weight),
                stock_limit: stock,
                is_prize: !no_prize,
                is_active: !inactive,
            })
            .submit()?;

            let rt = admin.create_prize(&draft).await?;
            println!("Prize type created.");
            print_prize(&rt);
        }

        PrizeCommands::Update {
            id,
            name,
            description,
            value,
            weight,
            is_prize,
            active,
        } => {
            if weight.is_some_and(|w| w < 0.0) {
                return Err(ScratchError::config("Weight cannot be negative"));
            }
            let update = PrizeUpdate {
                name,
                description,
                prize_value: value,
                weight,
                stock_limit: None,
                is_prize,
                is_active: active,
            };
            let rt = admin.update_prize(&id, &update).await?;
            println!("Prize type updated.");
            print_prize(&rt);
        }

        PrizeCommands::Delete { id, force } => {
            if !force && !confirm(&format!("Delete prize type '{}'?", id))? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            admin.delete_prize(&id).await?;
            println!("Prize type '{}' deleted.", id);
        }

        PrizeCommands::Stats => {
            print_value(&admin.prize_stats().await?)?;
        }

        PrizeCommands::Stock { id, limit } => {
            admin.update_prize_stock(&id, limit).await?;
            println!("Stock limit of '{}' set to {}.", id, limit);
        }

        PrizeCommands::Validate => {
            print_value(&admin.validate_prize_configuration().await?)?;
        }
    }

    Ok(())
}

async fn handle_play_command(cmd: PlayCommands, admin: &AdminService) -> Result<()> {
    match cmd {
        PlayCommands::List {
            page,
            limit,
            filters,
            redeemed,
        } => {
            let plays = admin
                .plays(page, limit, &filters.into_filters(redeemed))
                .await?;

            if plays.items.is_empty() {
                println!("No plays found.");
                return Ok(());
            }
            println!("{}", plays_table(&plays.items));
            if let Some(p) = plays.pagination {
                println!("Page {} ({} per page), {} plays in total", p.page, p.limit, p.total);
            }
        }

        PlayCommands::Export { filters, out } => {
            let csv = admin.export_plays(&filters.into_filters(None)).await?;
            tokio::fs::write(&out, &csv).await?;
            println!("Exported {} bytes to {}", csv.len(), out.display());
        }

        PlayCommands::Redeem { id, by, notes } => {
            let redeemed_by = match by {
                Some(name) => name,
                None => Input::new().with_prompt("Your name").interact_text()?,
            };
            let request = FormState::new(RedeemForm {
                redeemed_by,
                notes: notes.unwrap_or_default(),
            })
            .submit()?;

            admin.redeem_play(&id, &request).await?;
            println!("Play {} redeemed.", id);
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn stock_label(rt: &ResultType) -> String {
    match (rt.stock_limit, rt.remaining_stock()) {
        (Some(limit), Some(left)) => format!("{}/{}", left, limit),
        _ => "Unlimited".to_string(),
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_value(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_prize(rt: &ResultType) {
    println!("Prize Type {}:", rt.id);
    println!("  Name: {}", rt.name);
    println!("  Code: {}", rt.code);
    if let Some(description) = &rt.description {
        println!("  Description: {}", description);
    }
    if let Some(value) = &rt.prize_value {
        println!("  Value: {}", value);
    }
    println!("  Weight: {}", rt.weight);
    println!("  Stock: {}", stock_label(rt));
    println!("  Handed out: {}", rt.distributed_count);
    println!("  Redeemed: {}", rt.redeemed_count);
    println!("  Prize: {}", yes_no(rt.is_prize));
    println!("  Active: {}", yes_no(rt.is_active));
}

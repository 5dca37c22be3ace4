use super::{print_play, App};
use clap::Args;
use dialoguer::{Confirm, Input};
use rand::Rng;
use scratch_core::forms::{Form, FormState, PlayerForm};
use scratch_core::{PlayClaimRequest, PlayOutcome, PlayService, Result, ScratchError};
use scratch_reveal::{display, PointerEvent, ScratchCard};
use std::time::{Duration, Instant};

const ART_COLS: usize = 64;
const ART_ROWS: usize = 16;
const STROKE_STEP: f64 = 8.0;

#[derive(Args)]
pub struct PlayArgs {
    /// Token from the play link (prompted for when missing)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Scratch without asking before each stroke
    #[arg(long)]
    pub auto: bool,
}

pub async fn handle_play(args: PlayArgs, app: &App) -> Result<()> {
    let play = PlayService::new(&app.client)?;

    loop {
        let request = prompt_player(args.token.as_deref())?;

        println!("Submitting your entry...");
        let result = match play.claim(&request).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error: {}", e.user_message());
                if ask("Try again?", true)? {
                    continue;
                }
                return Err(e);
            }
        };

        if result.email_sent {
            println!("A copy of your result was sent to {}.", request.email);
        }

        if scratch(app, &result.result, args.auto).await? {
            println!();
            println!("{}", display::render(&result.result));
            println!();
            println!("Share: {}", display::share_text(&app.client.app_name, &result.result));
            println!(
                "WhatsApp: {}",
                display::whatsapp_url(&app.client.app_name, &result.result)
            );
        } else {
            println!("Your play is saved. Check it later with: scratch status {}", result.play_id);
        }

        if args.token.is_some() || !ask("Play again?", false)? {
            return Ok(());
        }
    }
}

pub async fn handle_status(play_id: &str, app: &App) -> Result<()> {
    let play = PlayService::new(&app.client)?;
    let status = play.play_status(play_id).await?;
    print_play(&status);
    Ok(())
}

pub async fn handle_check(token: &str, app: &App) -> Result<()> {
    let play = PlayService::new(&app.client)?;
    let validation = play.validate_token(token.trim()).await?;

    if validation.valid {
        println!("Token is valid and ready to play.");
    } else {
        println!(
            "Token cannot be played: {}",
            validation.reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}

fn ask(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

fn prompt_player(token: Option<&str>) -> Result<PlayClaimRequest> {
    let mut state = FormState::new(PlayerForm::new(token));

    if token.is_none() {
        prompt_field(&mut state, "token", "Token", |f, v| f.token = v.trim().to_string())?;
    }
    prompt_field(&mut state, "firstName", "First name", |f, v| {
        f.first_name = v.to_string()
    })?;
    prompt_field(&mut state, "lastName", "Last name", |f, v| {
        f.last_name = v.to_string()
    })?;
    prompt_field(&mut state, "phone", "Phone number", |f, v| f.phone = v.to_string())?;
    prompt_field(&mut state, "email", "Email", |f, v| f.email = v.to_string())?;
    prompt_field(&mut state, "age", "Age", |f, v| f.set_age_input(v))?;

    loop {
        let accepted = ask("I accept the terms and conditions", false)?;
        state.update(|f| f.accept_terms = accepted);
        match state.errors().for_field("acceptTerms") {
            Some(message) => eprintln!("{}", message),
            None => break,
        }
    }

    state.submit().map_err(ScratchError::from)
}

/// Ask for one field until it passes its own rules.
fn prompt_field(
    state: &mut FormState<PlayerForm>,
    field: &'static str,
    prompt: &str,
    apply: fn(&mut PlayerForm, &str),
) -> Result<()> {
    let current = state.form().clone();
    let initial = match field {
        "age" => current.age.map(|a| a.to_string()).unwrap_or_default(),
        _ => String::new(),
    };

    let input: String = Input::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(true)
        .validate_with(move |value: &String| -> std::result::Result<(), String> {
            let mut candidate = current.clone();
            apply(&mut candidate, value);
            match candidate.validate().for_field(field) {
                Some(message) => Err(message.to_string()),
                None => Ok(()),
            }
        })
        .interact_text()?;

    state.update(|f| apply(f, &input));
    Ok(())
}

/// Run the scratch card until its completion callback fires. Returns false
/// when the player stops before the result is revealed.
async fn scratch(app: &App, outcome: &PlayOutcome, auto: bool) -> Result<bool> {
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();
    let mut card = ScratchCard::new(
        outcome.clone(),
        app.config.card_width,
        app.config.card_height,
        app.config.reveal.clone(),
        move || {
            let _ = done_tx.send(());
        },
    )
    .map_err(|e| ScratchError::config(e.to_string()))?;

    println!();
    println!("Scratch & Win!");

    while !card.is_revealed() {
        println!("{}", card.surface().render_ascii(ART_COLS, ART_ROWS));
        if let Some(indicator) = card.indicator() {
            println!("{}", indicator);
        }

        if !auto && !ask("Scratch?", true)? {
            return Ok(false);
        }

        let now = Instant::now();
        for event in random_stroke(card.surface().width(), card.surface().height()) {
            card.handle(event, now);
        }
    }

    println!("{}", card.surface().render_ascii(ART_COLS, ART_ROWS));
    println!("Revealing your result...");

    loop {
        let now = Instant::now();
        if card.tick(now) {
            break;
        }
        let wait = card
            .completion_due_in(now)
            .unwrap_or(Duration::from_millis(50));
        tokio::time::sleep(wait).await;
    }

    done_rx
        .await
        .map_err(|_| ScratchError::internal("scratch card completion was dropped"))?;
    Ok(true)
}

/// One straight drag across the card at a random position and angle.
fn random_stroke(width: u32, height: u32) -> Vec<PointerEvent> {
    let mut rng = rand::thread_rng();
    let mut x = rng.gen_range(0.0..width.max(1) as f64);
    let mut y = rng.gen_range(0.0..height.max(1) as f64);
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let length = rng.gen_range(80.0..200.0);

    let (dx, dy) = (angle.cos() * STROKE_STEP, angle.sin() * STROKE_STEP);
    let mut events = vec![PointerEvent::Press { x, y }];
    let mut travelled = 0.0;
    while travelled < length {
        x += dx;
        y += dy;
        travelled += STROKE_STEP;
        events.push(PointerEvent::Move { x, y });
    }
    events.push(PointerEvent::Release);
    events
}

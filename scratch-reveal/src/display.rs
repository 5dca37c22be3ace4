//! Text for the revealed result screen.

use scratch_core::{PlayOutcome, PrizeTier};
use url::form_urlencoded;

pub fn headline(outcome: &PlayOutcome) -> &'static str {
    if outcome.is_winner {
        "Congratulations!"
    } else {
        "Better Luck Next Time!"
    }
}

pub fn tier_label(tier: PrizeTier) -> &'static str {
    match tier {
        PrizeTier::Grand => "Grand prize",
        PrizeTier::Medium => "Medium prize",
        PrizeTier::Small => "Small prize",
        PrizeTier::Other => "Prize",
        PrizeTier::NoPrize => "No prize",
    }
}

pub fn code_hint(outcome: &PlayOutcome) -> &'static str {
    if outcome.is_winner {
        "Keep this code safe - you'll need it to claim your prize!"
    } else {
        "Thanks for playing!"
    }
}

/// Steps a winner follows to collect. Empty for a losing play.
pub fn claim_steps(outcome: &PlayOutcome) -> Vec<String> {
    if !outcome.is_winner {
        return Vec::new();
    }
    vec![
        "Visit our store with this result code".to_string(),
        "Show the code to our staff".to_string(),
        format!("Enjoy your {}!", outcome.prize_type),
    ]
}

pub fn share_text(app_name: &str, outcome: &PlayOutcome) -> String {
    if outcome.is_winner {
        format!(
            "I just played {} and WON! My result code is: {} - Prize: {}",
            app_name, outcome.result_code, outcome.prize_type
        )
    } else {
        format!(
            "I just played {} and played! My result code is: {}",
            app_name, outcome.result_code
        )
    }
}

/// WhatsApp link that opens a chat prefilled with the share text.
pub fn whatsapp_url(app_name: &str, outcome: &PlayOutcome) -> String {
    format!(
        "https://wa.me/?text={}",
        encode_component(&share_text(app_name, outcome))
    )
}

// Spaces as %20 rather than the form-style `+`; a literal `+` is already %2B.
fn encode_component(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Subject and body for sharing by email.
pub fn email_share(app_name: &str, outcome: &PlayOutcome) -> (String, String) {
    let (subject, verb) = if outcome.is_winner {
        (format!("I Won! - {}", app_name), "WON")
    } else {
        (format!("Played - {}", app_name), "played")
    };

    let mut body = format!(
        "Hi!\n\nI just played {} and {}!\n\nResult Code: {}\n",
        app_name, verb, outcome.result_code
    );
    if outcome.is_winner {
        body.push_str(&format!("Prize: {}\n", outcome.prize_type));
    }
    (subject, body)
}

/// Full result block for a terminal.
pub fn render(outcome: &PlayOutcome) -> String {
    let mut lines = vec![
        headline(outcome).to_string(),
        String::new(),
        format!("{} ({})", outcome.prize_type, tier_label(outcome.tier())),
    ];
    if let Some(value) = &outcome.prize_value {
        lines.push(value.clone());
    }
    if let Some(description) = &outcome.description {
        lines.push(description.clone());
    }

    lines.push(String::new());
    lines.push(format!("Your Result Code: {}", outcome.result_code));
    lines.push(code_hint(outcome).to_string());

    let steps = claim_steps(outcome);
    if !steps.is_empty() {
        lines.push(String::new());
        lines.push("How to Claim Your Prize".to_string());
        for (i, step) in steps.iter().enumerate() {
            lines.push(format!("  {}. {}", i + 1, step));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(is_winner: bool) -> PlayOutcome {
        PlayOutcome {
            prize_type: if is_winner { "Medium Prize" } else { "No Prize" }.to_string(),
            prize_value: is_winner.then(|| "$50".to_string()),
            description: None,
            is_winner,
            result_code: "RC-9".to_string(),
        }
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text("Scratch & Win", &outcome(true)),
            "I just played Scratch & Win and WON! My result code is: RC-9 - Prize: Medium Prize"
        );
        assert_eq!(
            share_text("Scratch & Win", &outcome(false)),
            "I just played Scratch & Win and played! My result code is: RC-9"
        );
    }

    #[test]
    fn test_whatsapp_url() {
        assert_eq!(
            whatsapp_url("Scratch & Win", &outcome(true)),
            "https://wa.me/?text=I%20just%20played%20Scratch%20%26%20Win%20and%20WON%21%20\
             My%20result%20code%20is%3A%20RC-9%20-%20Prize%3A%20Medium%20Prize"
        );

        let url = whatsapp_url("A+B", &outcome(false));
        assert!(url.starts_with("https://wa.me/?text=I%20just%20played%20A%2BB%20"));
        assert!(!url.contains(' '));
        assert!(!url.contains("Prize"));
    }

    #[test]
    fn test_email_share() {
        let (subject, body) = email_share("Promo", &outcome(true));
        assert_eq!(subject, "I Won! - Promo");
        assert!(body.contains("Prize: Medium Prize"));

        let (subject, body) = email_share("Promo", &outcome(false));
        assert_eq!(subject, "Played - Promo");
        assert!(!body.contains("Prize:"));
    }

    #[test]
    fn test_render_winner_and_loser() {
        let winner = render(&outcome(true));
        assert!(winner.starts_with("Congratulations!"));
        assert!(winner.contains("Medium Prize (Medium prize)"));
        assert!(winner.contains("$50"));
        assert!(winner.contains("  3. Enjoy your Medium Prize!"));

        let loser = render(&outcome(false));
        assert!(loser.starts_with("Better Luck Next Time!"));
        assert!(loser.contains("Thanks for playing!"));
        assert!(!loser.contains("How to Claim"));
    }
}

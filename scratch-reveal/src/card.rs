use crate::config::RevealConfig;
use crate::error::Result;
use crate::surface::Surface;
use rand::Rng;
use scratch_core::PlayOutcome;
use std::fmt;
use std::time::{Duration, Instant};

/// Pointer input in surface coordinates. Touch events drive the card the
/// same way as the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release,
    Leave,
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Unscratched,
    Revealed { at: Instant },
}

/// Which progress message the card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTier {
    Low,
    Mid,
    Revealed,
}

impl ProgressTier {
    pub fn for_progress(progress: f64, config: &RevealConfig) -> Self {
        if progress >= config.threshold {
            Self::Revealed
        } else if progress >= config.mid_tier {
            Self::Mid
        } else {
            Self::Low
        }
    }
}

type Completion = Box<dyn FnOnce() + Send>;

pub struct ScratchCard {
    outcome: PlayOutcome,
    surface: Surface,
    config: RevealConfig,
    state: RevealState,
    drawing: bool,
    progress: f64,
    on_complete: Option<Completion>,
}

impl fmt::Debug for ScratchCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchCard")
            .field("result_code", &self.outcome.result_code)
            .field("state", &self.state)
            .field("drawing", &self.drawing)
            .field("progress", &self.progress)
            .field("completed", &self.is_complete())
            .finish()
    }
}

impl ScratchCard {
    /// Mount a card of `width` by `height` pixels hiding `outcome`.
    /// `on_complete` runs once, a fixed delay after the reveal.
    pub fn new<F>(
        outcome: PlayOutcome,
        width: u32,
        height: u32,
        config: RevealConfig,
        on_complete: F,
    ) -> Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        Self::with_rng(
            outcome,
            width,
            height,
            config,
            &mut rand::thread_rng(),
            on_complete,
        )
    }

    pub fn with_rng<R, F>(
        outcome: PlayOutcome,
        width: u32,
        height: u32,
        config: RevealConfig,
        rng: &mut R,
        on_complete: F,
    ) -> Result<Self>
    where
        R: Rng + ?Sized,
        F: FnOnce() + Send + 'static,
    {
        config.validate()?;
        let surface = Surface::painted(width, height, config.speckles, rng)?;

        tracing::debug!(
            "Mounted {}x{} scratch card for {}",
            width,
            height,
            outcome.result_code
        );

        Ok(Self {
            outcome,
            surface,
            config,
            state: RevealState::Unscratched,
            drawing: false,
            progress: 0.0,
            on_complete: Some(Box::new(on_complete)),
        })
    }

    /// Feed one pointer event. Returns the progress after the event.
    pub fn handle(&mut self, event: PointerEvent, now: Instant) -> f64 {
        match event {
            PointerEvent::Press { x, y } | PointerEvent::TouchStart { x, y } => {
                self.drawing = true;
                self.scratch(x, y, now);
            }
            PointerEvent::Move { x, y } | PointerEvent::TouchMove { x, y } => {
                if self.drawing {
                    self.scratch(x, y, now);
                }
            }
            PointerEvent::Release | PointerEvent::TouchEnd | PointerEvent::Leave => {
                self.drawing = false;
            }
        }
        self.progress
    }

    fn scratch(&mut self, x: f64, y: f64, now: Instant) {
        if !self.surface.contains(x, y) {
            return;
        }

        self.surface.clear_circle(x, y, self.config.brush_radius);
        self.progress = self.surface.revealed_percent();

        if self.state == RevealState::Unscratched && self.progress >= self.config.threshold {
            self.state = RevealState::Revealed { at: now };
            tracing::info!(
                "Scratch card {} revealed at {:.1}%",
                self.outcome.result_code,
                self.progress
            );
        }
    }

    /// Advance time. Fires the completion callback once the delay after the
    /// reveal has passed; returns whether it fired on this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        let RevealState::Revealed { at } = self.state else {
            return false;
        };
        if now.saturating_duration_since(at) < self.config.completion_delay() {
            return false;
        }
        match self.on_complete.take() {
            Some(callback) => {
                tracing::debug!("Scratch card {} complete", self.outcome.result_code);
                callback();
                true
            }
            None => false,
        }
    }

    /// Time left until the completion callback is due, `None` before the
    /// reveal or after it fired.
    pub fn completion_due_in(&self, now: Instant) -> Option<Duration> {
        match self.state {
            RevealState::Revealed { at } if self.on_complete.is_some() => Some(
                self.config
                    .completion_delay()
                    .saturating_sub(now.saturating_duration_since(at)),
            ),
            _ => None,
        }
    }

    pub fn outcome(&self) -> &PlayOutcome {
        &self.outcome
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self.state, RevealState::Revealed { .. })
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// True once the completion callback has run.
    pub fn is_complete(&self) -> bool {
        self.on_complete.is_none()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn tier(&self) -> ProgressTier {
        ProgressTier::for_progress(self.progress, &self.config)
    }

    /// Progress line shown under the card. Hidden once revealed.
    pub fn indicator(&self) -> Option<String> {
        if self.is_revealed() {
            return None;
        }
        Some(match self.tier() {
            ProgressTier::Low => format!(
                "Scratch more to reveal your prize! ({}%)",
                self.progress.round()
            ),
            ProgressTier::Mid | ProgressTier::Revealed => {
                "Keep scratching to reveal your prize!".to_string()
            }
        })
    }

    /// Opacity of the scratch surface, fading out after the reveal.
    pub fn overlay_opacity(&self, now: Instant) -> f64 {
        1.0 - self.fade_progress(now)
    }

    /// Opacity of the revealed prize content, fading in after the reveal.
    pub fn content_opacity(&self, now: Instant) -> f64 {
        self.fade_progress(now)
    }

    fn fade_progress(&self, now: Instant) -> f64 {
        let RevealState::Revealed { at } = self.state else {
            return 0.0;
        };
        let fade = self.config.fade();
        if fade.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(at);
        (elapsed.as_secs_f64() / fade.as_secs_f64()).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const WIDTH: u32 = 200;
    const HEIGHT: u32 = 100;

    fn outcome() -> PlayOutcome {
        PlayOutcome {
            prize_type: "Grand Prize".to_string(),
            prize_value: Some("$500".to_string()),
            description: None,
            is_winner: true,
            result_code: "RC-42".to_string(),
        }
    }

    fn card_with_counter() -> (ScratchCard, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let card = ScratchCard::with_rng(
            outcome(),
            WIDTH,
            HEIGHT,
            RevealConfig::default(),
            &mut StdRng::seed_from_u64(1),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .unwrap();
        (card, calls)
    }

    /// Drag left to right along row `y`, one sample per `step` pixels.
    fn drag(card: &mut ScratchCard, y: f64, step: f64, now: Instant) -> Vec<f64> {
        let mut seen = vec![card.handle(PointerEvent::Press { x: 0.0, y }, now)];
        let mut x = step;
        while x < WIDTH as f64 {
            seen.push(card.handle(PointerEvent::Move { x, y }, now));
            x += step;
        }
        card.handle(PointerEvent::Release, now);
        seen
    }

    #[test]
    fn test_progress_is_monotonic() {
        let (mut card, _) = card_with_counter();
        let now = Instant::now();

        let mut all = Vec::new();
        for y in [10.0, 50.0, 50.0, 90.0] {
            all.extend(drag(&mut card, y, 7.0, now));
        }
        assert!(all.windows(2).all(|w| w[0] <= w[1]));
        assert!(card.progress() > 0.0);
    }

    #[test]
    fn test_moves_without_press_do_nothing() {
        let (mut card, _) = card_with_counter();
        let now = Instant::now();

        card.handle(PointerEvent::Move { x: 100.0, y: 50.0 }, now);
        assert_eq!(card.progress(), 0.0);
        assert!(!card.is_drawing());

        card.handle(PointerEvent::TouchStart { x: 100.0, y: 50.0 }, now);
        assert!(card.is_drawing());
        let after_touch = card.progress();
        assert!(after_touch > 0.0);

        card.handle(PointerEvent::TouchEnd, now);
        card.handle(PointerEvent::TouchMove { x: 20.0, y: 20.0 }, now);
        assert_eq!(card.progress(), after_touch);
    }

    #[test]
    fn test_leave_ends_drag_without_completing() {
        let (mut card, calls) = card_with_counter();
        let now = Instant::now();

        card.handle(PointerEvent::Press { x: 100.0, y: 50.0 }, now);
        card.handle(PointerEvent::Leave, now);
        let progress = card.progress();

        card.handle(PointerEvent::Move { x: 150.0, y: 50.0 }, now);
        assert_eq!(card.progress(), progress);

        // Samples outside the surface clear nothing.
        card.handle(PointerEvent::Press { x: -5.0, y: 50.0 }, now);
        card.handle(PointerEvent::Move { x: 100.0, y: 500.0 }, now);
        assert_eq!(card.progress(), progress);

        assert!(!card.tick(now + Duration::from_secs(60)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(card.state(), RevealState::Unscratched);
    }

    #[test]
    fn test_callback_fires_once_after_delay() {
        let (mut card, calls) = card_with_counter();
        let start = Instant::now();

        let mut y = 5.0;
        while !card.is_revealed() {
            assert!(card.progress() < 30.0);
            assert!(!card.tick(start + Duration::from_secs(10)));
            drag(&mut card, y, 5.0, start);
            y += 10.0;
        }
        assert!(card.progress() >= 30.0);
        assert_eq!(card.indicator(), None);

        assert!(!card.tick(start + Duration::from_millis(1999)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            card.completion_due_in(start + Duration::from_millis(1500)),
            Some(Duration::from_millis(500))
        );

        assert!(card.tick(start + Duration::from_millis(2000)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(card.is_complete());

        // More scratching and later ticks never re-trigger.
        let later = start + Duration::from_secs(5);
        drag(&mut card, 95.0, 5.0, later);
        assert!(!card.tick(later + Duration::from_secs(5)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(card.state(), RevealState::Revealed { at: start });
    }

    #[test]
    fn test_tiers() {
        let config = RevealConfig::default();
        let expected = [
            (0.0, ProgressTier::Low),
            (19.0, ProgressTier::Low),
            (20.0, ProgressTier::Mid),
            (29.0, ProgressTier::Mid),
            (30.0, ProgressTier::Revealed),
            (100.0, ProgressTier::Revealed),
        ];
        for (progress, tier) in expected {
            assert_eq!(ProgressTier::for_progress(progress, &config), tier);
        }
    }

    #[test]
    fn test_indicator_text_changes_with_tier() {
        let (mut card, _) = card_with_counter();
        let now = Instant::now();
        assert_eq!(
            card.indicator().as_deref(),
            Some("Scratch more to reveal your prize! (0%)")
        );

        let mut y = 5.0;
        while card.tier() == ProgressTier::Low {
            drag(&mut card, y, 5.0, now);
            y += 10.0;
        }
        // The first sweep clears rows 0 to 24, a quarter of the card.
        assert_eq!(card.tier(), ProgressTier::Mid);
        assert!(!card.is_revealed());
        assert_eq!(
            card.indicator().as_deref(),
            Some("Keep scratching to reveal your prize!")
        );
    }

    #[test]
    fn test_fades() {
        let (mut card, _) = card_with_counter();
        let start = Instant::now();
        assert_eq!(card.overlay_opacity(start), 1.0);
        assert_eq!(card.content_opacity(start), 0.0);

        card.handle(PointerEvent::Press { x: 100.0, y: 50.0 }, start);
        for y in (0..HEIGHT).step_by(10) {
            for x in (0..WIDTH).step_by(10) {
                card.handle(
                    PointerEvent::Move {
                        x: x as f64,
                        y: y as f64,
                    },
                    start,
                );
            }
        }
        assert!(card.is_revealed());

        let half = start + Duration::from_millis(250);
        assert!((card.overlay_opacity(half) - 0.5).abs() < 1e-9);
        assert!((card.content_opacity(half) - 0.5).abs() < 1e-9);

        let done = start + Duration::from_millis(800);
        assert_eq!(card.overlay_opacity(done), 0.0);
        assert_eq!(card.content_opacity(done), 1.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RevealConfig {
            mid_tier: 50.0,
            ..RevealConfig::default()
        };
        assert!(ScratchCard::new(outcome(), 10, 10, config, || {}).is_err());
    }
}

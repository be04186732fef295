//! Game state and core simulation types
//!
//! Everything the frame loop reads or writes lives in [`GameState`]; there are
//! no free-floating globals. The state owns its seeded RNG so a run can be
//! replayed from `seed` and the same inputs.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;
use crate::highscore::HighScore;
use crate::tuning::{Range, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but not started
    Idle,
    /// Frame loop advancing
    Running,
    /// Run ended, waiting for restart
    GameOver,
}

/// Logical screen size the simulation runs in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Y coordinate of the walkable surface
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_H
    }
}

/// The coder running through the codebase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vy: f32,
    pub grounded: bool,
    pub invincible: bool,
    /// Seconds of invincibility left
    pub inv_timer: f32,
}

impl Player {
    /// A player standing on the ground
    pub fn new(ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground_y - PLAYER_H),
            size: Vec2::new(PLAYER_W, PLAYER_H),
            vy: 0.0,
            grounded: true,
            invincible: false,
            inv_timer: 0.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Change height while keeping the feet where they are
    pub fn set_height(&mut self, h: f32) {
        let bottom = self.bottom();
        self.size.y = h;
        self.pos.y = bottom - h;
    }

    pub fn grant_invincibility(&mut self, seconds: f32) {
        self.invincible = true;
        self.inv_timer = seconds;
    }
}

/// An obstacle. Touching one without invincibility ends the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Own scroll speed (relative to the global speed)
    pub speed: f32,
    /// Drifts toward the player's height
    pub homing: bool,
    /// Jitters vertically
    pub glitchy: bool,
    pub speech: String,
    /// Seconds the speech stays visible
    pub speech_ttl: f32,
}

impl Bug {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A collectible code snippet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub explosive: bool,
}

impl Snippet {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A rubber duck power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duck {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Duck {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Floating text that fades after `ttl` seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechBubble {
    pub text: String,
    /// Anchor (center of the bubble's bottom edge)
    pub pos: Vec2,
    pub ttl: f32,
}

/// Cosmetic duck that tails the player and heckles them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastFollower {
    pub pos: Vec2,
    pub size: Vec2,
    /// Seconds until the next roast line
    pub next_line_in: f32,
}

/// The six chaos perturbations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChaosKind {
    /// Fake OS update progress bar
    FakeUpdate,
    /// Jump becomes crouch
    InvertControls,
    /// Random gravity multiplier
    PhysicsChaos,
    /// Swarm of small fast bugs
    BugStorm,
    /// Score penalty with a banner
    InsultBanner,
    /// Small spawn burst
    RandomGlitch,
}

impl ChaosKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChaosKind::FakeUpdate => "Windows Update",
            ChaosKind::InvertControls => "Invert Controls",
            ChaosKind::PhysicsChaos => "Physics Chaos",
            ChaosKind::BugStorm => "Bug Storm",
            ChaosKind::InsultBanner => "Insult Banner",
            ChaosKind::RandomGlitch => "Random Glitch",
        }
    }
}

/// Fake update overlay timing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FakeUpdate {
    pub started_at: f32,
    pub duration: f32,
}

impl FakeUpdate {
    /// Completion in [0, 1] at session time `now`
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration).clamp(0.0, 1.0)
    }
}

/// Global parameters chaos events perturb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosState {
    /// Indicator for the HUD; at most one kind is shown at a time
    pub active: Option<ChaosKind>,
    pub gravity_multiplier: f32,
    pub controls_inverted: bool,
    pub fake_update: Option<FakeUpdate>,
    /// Explosion flash: draw the screen color-inverted
    pub screen_inverted: bool,
    /// Session time the trigger timer counts from
    pub last_trigger_at: f32,
    /// Seconds after `last_trigger_at` until the next trigger
    pub next_in: f32,
}

impl Default for ChaosState {
    fn default() -> Self {
        Self {
            active: None,
            gravity_multiplier: 1.0,
            controls_inverted: false,
            fake_update: None,
            screen_inverted: false,
            last_trigger_at: 0.0,
            next_in: 0.0,
        }
    }
}

/// Deferred state change applied when its effect expires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RevertAction {
    /// Undo a chaos event's perturbation
    EndChaos(ChaosKind),
    /// Stand back up after a crouch
    StandUp,
    /// Restore normal colors after an explosion
    EndScreenInvert,
    /// Dismiss the roasting duck
    EndRoast,
}

/// A pending revert polled by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEffect {
    /// Session time the action fires at
    pub at: f32,
    pub action: RevertAction,
}

/// One line of the chaos log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Uptime in seconds, increasing across runs
    pub time: f32,
    pub text: String,
}

/// Bounded, newest-first event log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn push(&mut self, time: f32, text: impl Into<String>) {
        self.entries.push_front(LogEntry {
            time,
            text: text.into(),
        });
        self.entries.truncate(EVENT_LOG_CAPACITY);
    }

    /// Newest entry first
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// What the death overlay shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOverInfo {
    pub title: String,
    pub message: String,
    pub tip: Option<String>,
    pub comment: String,
    pub score: u64,
    pub high: u64,
}

/// Compact debug view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub time: f32,
    pub score: f32,
    pub high: u64,
    pub speed: f32,
    pub bugs: usize,
    pub snippets: usize,
    pub ducks: usize,
    pub chaos: Option<ChaosKind>,
    pub pending_reverts: usize,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay RNG
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Seconds since the last reset
    pub time: f32,
    /// Seconds of play across every run this session; stamps the chaos log
    pub uptime: f32,
    /// Global scroll speed (pixels/s)
    pub speed: f32,
    pub score: f32,
    /// Best score, floor of the highest score seen
    pub high: HighScore,
    pub spawn_bug_timer: f32,
    pub spawn_snippet_timer: f32,
    pub spawn_duck_timer: f32,
    pub player: Player,
    pub bugs: Vec<Bug>,
    pub snippets: Vec<Snippet>,
    pub ducks: Vec<Duck>,
    pub bubbles: Vec<SpeechBubble>,
    pub roast: Option<RoastFollower>,
    pub chaos: ChaosState,
    /// Pending reverts (unordered)
    pub scheduled: Vec<ScheduledEffect>,
    pub log: EventLog,
    pub game_over: Option<GameOverInfo>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle session; call `reset` to start running
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let ground_y = viewport.ground_y();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed: tuning.base_speed,
            tuning,
            viewport,
            phase: GamePhase::Idle,
            time: 0.0,
            uptime: 0.0,
            score: 0.0,
            high: HighScore::default(),
            spawn_bug_timer: 0.0,
            spawn_snippet_timer: 0.0,
            spawn_duck_timer: 0.0,
            player: Player::new(ground_y),
            bugs: Vec::new(),
            snippets: Vec::new(),
            ducks: Vec::new(),
            bubbles: Vec::new(),
            roast: None,
            chaos: ChaosState::default(),
            scheduled: Vec::new(),
            log: EventLog::default(),
            game_over: None,
            next_id: 1,
        }
    }

    /// Builder: seed the best score (usually from storage)
    pub fn with_high(mut self, high: HighScore) -> Self {
        self.high = high;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.viewport.ground_y()
    }

    /// Uniform draw in [0, 1)
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform draw in [min, max); degenerate ranges return `min`
    pub fn roll(&mut self, min: f32, max: f32) -> f32 {
        let t = self.unit();
        crate::lerp(min, max, t)
    }

    pub fn roll_range(&mut self, range: Range) -> f32 {
        let t = self.unit();
        range.at(t)
    }

    /// Bernoulli trial with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Append to the chaos log, stamped with session uptime
    pub fn log_event(&mut self, text: impl Into<String>) {
        let time = self.uptime;
        self.log.push(time, text);
    }

    /// Queue a revert `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: RevertAction) {
        self.scheduled.push(ScheduledEffect {
            at: self.time + delay,
            action,
        });
    }

    /// Pop every effect due at or before the current time, in expiry order
    pub fn take_due_effects(&mut self) -> Vec<ScheduledEffect> {
        let now = self.time;
        let mut due: Vec<ScheduledEffect> = Vec::new();
        self.scheduled.retain(|e| {
            if e.at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.at.total_cmp(&b.at));
        due
    }

    /// Total live entities across the three collections
    pub fn entity_count(&self) -> usize {
        self.bugs.len() + self.snippets.len() + self.ducks.len()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            time: self.time,
            score: self.score,
            high: self.high.best,
            speed: self.speed,
            bugs: self.bugs.len(),
            snippets: self.snippets.len(),
            ducks: self.ducks.len(),
            chaos: self.chaos.active,
            pending_reverts: self.scheduled.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Viewport::default(), Tuning::default())
    }

    #[test]
    fn test_new_is_idle_and_grounded() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Idle);
        assert!(s.player.grounded);
        assert_eq!(s.player.bottom(), s.ground_y());
        assert_eq!(s.speed, BASE_SPEED);
    }

    #[test]
    fn test_set_height_keeps_feet_planted() {
        let mut p = Player::new(490.0);
        p.set_height(PLAYER_CROUCH_H);
        assert_eq!(p.bottom(), 490.0);
        assert_eq!(p.size.y, PLAYER_CROUCH_H);
        p.set_height(PLAYER_H);
        assert_eq!(p.pos.y, 490.0 - PLAYER_H);
    }

    #[test]
    fn test_event_log_is_bounded_newest_first() {
        let mut log = EventLog::default();
        for i in 0..(EVENT_LOG_CAPACITY + 5) {
            log.push(i as f32, format!("event {i}"));
        }
        assert_eq!(log.len(), EVENT_LOG_CAPACITY);
        assert_eq!(
            log.latest().map(|e| e.text.as_str()),
            Some(format!("event {}", EVENT_LOG_CAPACITY + 4).as_str())
        );
    }

    #[test]
    fn test_take_due_effects_in_expiry_order() {
        let mut s = state();
        s.schedule(2.0, RevertAction::EndRoast);
        s.schedule(0.5, RevertAction::StandUp);
        s.schedule(9.0, RevertAction::EndScreenInvert);
        s.time = 3.0;
        let due = s.take_due_effects();
        assert_eq!(
            due.iter().map(|e| e.action).collect::<Vec<_>>(),
            vec![RevertAction::StandUp, RevertAction::EndRoast]
        );
        assert_eq!(s.scheduled.len(), 1);
    }

    #[test]
    fn test_fake_update_progress_clamps() {
        let fu = FakeUpdate {
            started_at: 1.0,
            duration: 2.0,
        };
        assert_eq!(fu.progress(0.0), 0.0);
        assert!((fu.progress(2.0) - 0.5).abs() < 1e-6);
        assert_eq!(fu.progress(10.0), 1.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = state();
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Idle\""));
        assert!(json.contains("\"bugs\":0"));
    }

    #[test]
    fn test_roll_degenerate_range() {
        let mut s = state();
        assert_eq!(s.roll(6.0, 6.0), 6.0);
    }
}

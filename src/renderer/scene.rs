//! Scene building for 2D primitives
//!
//! Turns a `GameState` snapshot into a flat list of draw commands. Nothing in
//! here touches the browser, so what gets drawn is testable natively.

use glam::Vec2;

use crate::consts::GROUND_H;
use crate::sim::{Aabb, GameOverInfo, GameState, LogEntry};

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Vertical gradient over the whole viewport
    Background { top: &'static str, bottom: &'static str },
    FillRect { rect: Aabb, color: &'static str },
    StrokeRect {
        rect: Aabb,
        color: &'static str,
        width: f32,
    },
    Text {
        text: String,
        pos: Vec2,
        color: &'static str,
        font: &'static str,
        align: TextAlign,
    },
    /// Boxed speech text anchored at its bottom center
    Bubble { text: String, pos: Vec2, alpha: f32 },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Color-invert the whole frame (exploding snippet)
    pub inverted: bool,
    pub cmds: Vec<DrawCmd>,
}

impl Scene {
    fn rect(&mut self, pos: Vec2, size: Vec2, color: &'static str) {
        self.cmds.push(DrawCmd::FillRect {
            rect: Aabb::new(pos, size),
            color,
        });
    }

    fn stroke(&mut self, pos: Vec2, size: Vec2, color: &'static str, width: f32) {
        self.cmds.push(DrawCmd::StrokeRect {
            rect: Aabb::new(pos, size),
            color,
            width,
        });
    }

    fn text(
        &mut self,
        text: impl Into<String>,
        pos: Vec2,
        color: &'static str,
        font: &'static str,
        align: TextAlign,
    ) {
        self.cmds.push(DrawCmd::Text {
            text: text.into(),
            pos,
            color,
            font,
            align,
        });
    }

    #[cfg(test)]
    fn count(&self, pred: impl Fn(&DrawCmd) -> bool) -> usize {
        self.cmds.iter().filter(|c| pred(c)).count()
    }
}

/// Score line shown in the HUD
pub fn score_text(state: &GameState) -> String {
    format!("Score: {}", state.score.max(0.0).floor() as u64)
}

pub fn high_text(state: &GameState) -> String {
    format!("High: {}", state.high.best)
}

/// "Chaos: ON (Bug Storm)" / "Chaos: OFF"
pub fn chaos_indicator_text(state: &GameState) -> String {
    match state.chaos.active {
        Some(kind) => format!("Chaos: ON ({})", kind.label()),
        None => "Chaos: OFF".to_string(),
    }
}

/// One line of the on-screen chaos log
pub fn log_line(entry: &LogEntry) -> String {
    let secs = entry.time.max(0.0) as u32;
    format!("{:02}:{:02} - {}", secs / 60, secs % 60, entry.text)
}

/// Build the full frame
pub fn build(state: &GameState) -> Scene {
    let mut scene = Scene {
        width: state.viewport.width,
        height: state.viewport.height,
        inverted: state.chaos.screen_inverted,
        cmds: Vec::with_capacity(16 + state.entity_count() * 4),
    };

    scene.cmds.push(DrawCmd::Background {
        top: "#eef9ff",
        bottom: "#f7fbff",
    });
    ground(&mut scene, state);
    player(&mut scene, state);
    for s in &state.snippets {
        scene.rect(s.pos, s.size, "#ffd24a");
        scene.text(
            "<>",
            s.pos + Vec2::new(2.0, s.size.y - 2.0),
            "#7a5a0a",
            "10px monospace",
            TextAlign::Left,
        );
        if s.explosive {
            scene.stroke(s.pos - Vec2::ONE, s.size + Vec2::splat(2.0), "#ff7b7b", 1.0);
        }
    }
    for d in &state.ducks {
        duck(&mut scene, d.pos, d.size);
    }
    for b in &state.bugs {
        scene.rect(b.pos, b.size, "#ff2a2a");
        let label = if b.speech.contains("error") { "error" } else { "bug🐛" };
        scene.text(
            label,
            b.pos + b.size / 2.0,
            "#ffffff",
            "12px monospace",
            TextAlign::Center,
        );
        scene.rect(
            Vec2::new(b.pos.x + b.size.x / 2.0 - 1.0, b.pos.y - 6.0),
            Vec2::new(2.0, 6.0),
            "#8b1f1f",
        );
        if b.speech_ttl > 0.0 {
            scene.cmds.push(DrawCmd::Bubble {
                text: b.speech.clone(),
                pos: Vec2::new(b.pos.x + b.size.x / 2.0, b.pos.y - 28.0),
                alpha: b.speech_ttl.min(1.0),
            });
        }
    }
    if let Some(roast) = &state.roast {
        duck(&mut scene, roast.pos, roast.size);
    }
    for bubble in &state.bubbles {
        scene.cmds.push(DrawCmd::Bubble {
            text: bubble.text.clone(),
            pos: bubble.pos,
            alpha: bubble.ttl.min(1.0),
        });
    }

    hud(&mut scene, state);

    if let Some(update) = &state.chaos.fake_update {
        fake_update(&mut scene, update.progress(state.time));
    }
    if let Some(info) = &state.game_over {
        game_over(&mut scene, info);
    }

    scene
}

fn ground(scene: &mut Scene, state: &GameState) {
    let top = state.ground_y();
    scene.rect(
        Vec2::new(0.0, top),
        Vec2::new(scene.width, GROUND_H),
        "green",
    );

    // Tiles scroll with distance travelled
    let tile_w = 48.0;
    let scroll = state.score.max(0.0) * 18.0;
    let offset = (scroll / 6.0).floor() % tile_w;
    let mut x = -offset;
    while x < scene.width {
        scene.rect(
            Vec2::new(x + 6.0, top + 6.0),
            Vec2::new(tile_w - 12.0, 12.0),
            "#bfe7ff",
        );
        x += tile_w;
    }
}

fn player(scene: &mut Scene, state: &GameState) {
    let p = &state.player;
    scene.rect(p.pos, p.size, "pink");
    scene.rect(p.pos + Vec2::new(6.0, 8.0), Vec2::splat(6.0), "#333333");
    scene.text(
        "Coder",
        p.pos + p.size / 2.0,
        "black",
        "10px monospace",
        TextAlign::Center,
    );
    if p.invincible {
        scene.stroke(
            p.pos - Vec2::splat(6.0),
            p.size + Vec2::splat(12.0),
            "rgba(255,200,55,0.9)",
            3.0,
        );
    }
}

fn duck(scene: &mut Scene, pos: Vec2, size: Vec2) {
    scene.rect(pos, size, "#ffde59");
    scene.rect(
        Vec2::new(pos.x + size.x - 8.0, pos.y + 6.0),
        Vec2::splat(3.0),
        "#333333",
    );
}

fn hud(scene: &mut Scene, state: &GameState) {
    let font = "12px Inter, system-ui, monospace";
    scene.text(score_text(state), Vec2::new(12.0, 20.0), "#0b2340", font, TextAlign::Left);
    scene.text(
        chaos_indicator_text(state),
        Vec2::new(12.0, 38.0),
        "#0b2340",
        font,
        TextAlign::Left,
    );
    scene.text(
        high_text(state),
        Vec2::new(scene.width - 110.0, 20.0),
        "#0b2340",
        font,
        TextAlign::Left,
    );
}

fn fake_update(scene: &mut Scene, progress: f32) {
    let panel = Vec2::new(320.0, 90.0);
    let origin = Vec2::new(scene.width, scene.height) / 2.0 - panel / 2.0;
    scene.rect(origin, panel, "#0b5cab");
    scene.text(
        "Installing updates... do not turn off your runner",
        origin + Vec2::new(panel.x / 2.0, 28.0),
        "#ffffff",
        "12px monospace",
        TextAlign::Center,
    );
    let bar = Vec2::new(panel.x - 40.0, 12.0);
    let bar_pos = origin + Vec2::new(20.0, 55.0);
    scene.stroke(bar_pos, bar, "#ffffff", 1.0);
    scene.rect(bar_pos, Vec2::new(bar.x * progress, bar.y), "#ffffff");
}

fn game_over(scene: &mut Scene, info: &GameOverInfo) {
    scene.rect(
        Vec2::ZERO,
        Vec2::new(scene.width, scene.height),
        "rgba(0,0,0,0.55)",
    );
    let cx = scene.width / 2.0;
    let mut y = scene.height / 2.0 - 60.0;
    scene.text(
        info.title.clone(),
        Vec2::new(cx, y),
        "#ffffff",
        "bold 28px monospace",
        TextAlign::Center,
    );
    y += 36.0;
    scene.text(
        info.message.clone(),
        Vec2::new(cx, y),
        "#ffd0d0",
        "14px monospace",
        TextAlign::Center,
    );
    if let Some(tip) = &info.tip {
        y += 22.0;
        scene.text(
            format!("Tip: {tip}"),
            Vec2::new(cx, y),
            "#bfe7ff",
            "12px monospace",
            TextAlign::Center,
        );
    }
    y += 28.0;
    scene.text(
        format!("Score: {} • High: {}", info.score, info.high),
        Vec2::new(cx, y),
        "#ffffff",
        "14px monospace",
        TextAlign::Center,
    );
    y += 22.0;
    scene.text(
        info.comment.clone(),
        Vec2::new(cx, y),
        "#ffffff",
        "12px monospace",
        TextAlign::Center,
    );
    y += 28.0;
    scene.text(
        "Press R to restart",
        Vec2::new(cx, y),
        "#ffde59",
        "12px monospace",
        TextAlign::Center,
    );
}

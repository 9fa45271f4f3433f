use evo_arena::simulation::controller::SimulationController;
use evo_arena::simulation::creature::{BehaviorState, Creature};
use evo_arena::simulation::event_log::EventKind;
use evo_arena::simulation::food::FOOD_RADIUS;
use evo_arena::simulation::stats::Stats;
use evo_arena::simulation::world::{Vector2, World};
use macroquad::prelude::*;

/// Maps the square world onto the largest centred square of the window.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    scale: f32,
    origin: (f32, f32),
}

impl Viewport {
    pub fn fit(world: &World) -> Self {
        let side = screen_width().min(screen_height());
        Self {
            scale: side / world.size(),
            origin: (screen_width() / 2.0, screen_height() / 2.0),
        }
    }

    pub fn to_world(&self, screen: (f32, f32)) -> Vector2 {
        Vector2::new(
            (screen.0 - self.origin.0) / self.scale,
            (screen.1 - self.origin.1) / self.scale,
        )
    }
}

trait ToScreen {
    type Output;
    fn to_screen(&self, viewport: &Viewport) -> Self::Output;
}

impl ToScreen for Vector2 {
    type Output = (f32, f32);
    fn to_screen(&self, viewport: &Viewport) -> (f32, f32) {
        (
            viewport.origin.0 + self.x * viewport.scale,
            viewport.origin.1 + self.y * viewport.scale,
        )
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, viewport: &Viewport) -> f32 {
        self * viewport.scale
    }
}

pub fn draw_arena(world: &World, viewport: &Viewport) {
    let corner = Vector2::new(-world.half_size(), -world.half_size()).to_screen(viewport);
    let side = world.size().to_screen(viewport);
    draw_rectangle(
        corner.0,
        corner.1,
        side,
        side,
        Color::from_rgba(245, 245, 240, 255),
    );
    draw_rectangle_lines(corner.0, corner.1, side, side, 2.0, DARKGRAY);
}

pub fn draw_foods(controller: &SimulationController, viewport: &Viewport) {
    let radius = FOOD_RADIUS.to_screen(viewport);
    for food in controller.ecosystem().foods.values() {
        if food.is_consumed() {
            continue;
        }
        let (x, y) = food.pos.to_screen(viewport);
        draw_circle(x, y, radius, Color::from_rgba(0, 100, 255, 255));
    }
}

fn tint(creature: &Creature) -> Color {
    let [r, g, b] = creature.color;
    let alpha = if creature.is_dead {
        (1.0 - creature.fade).clamp(0.1, 1.0) * 0.5
    } else {
        1.0
    };
    let base = Color::new(r, g, b, alpha);
    match creature.behavior {
        BehaviorState::Mating => Color::new((r + 0.3).min(1.0), g * 0.7, b * 0.7, alpha),
        BehaviorState::Seeking => Color::new(r * 0.8, (g + 0.2).min(1.0), b * 0.8, alpha),
        BehaviorState::Resting | BehaviorState::Wandering => base,
    }
}

pub fn draw_creatures(controller: &SimulationController, viewport: &Viewport) {
    let selected = controller.selected();

    for creature in controller.ecosystem().creatures.values() {
        let (x, y) = creature.pos.to_screen(viewport);
        let radius = creature.size.to_screen(viewport);
        draw_circle(x, y, radius, tint(creature));

        if creature.is_dead {
            continue;
        }

        // heading
        let tip = (creature.pos + creature.heading() * (creature.size * 1.8)).to_screen(viewport);
        draw_line(x, y, tip.0, tip.1, 1.5, BLACK);

        // energy bar
        let bar_width = radius * 2.5;
        let bar_y = y - radius - 6.0;
        draw_rectangle(
            x - bar_width / 2.0,
            bar_y,
            bar_width,
            2.0,
            Color::from_rgba(100, 100, 100, 200),
        );
        draw_rectangle(
            x - bar_width / 2.0,
            bar_y,
            bar_width * creature.energy_ratio().clamp(0.0, 1.0),
            2.0,
            Color::from_rgba(255, 0, 0, 255),
        );

        if selected == Some(creature.id) {
            draw_circle_lines(x, y, radius + 4.0, 2.0, ORANGE);
        }
    }
}

fn draw_lines(lines: &[String], x: f32, mut y: f32, font_size: f32, color: Color) -> f32 {
    for line in lines {
        draw_text(line, x, y, font_size, color);
        y += font_size + 2.0;
    }
    y
}

pub fn draw_overlay(controller: &SimulationController, stats: &Stats) {
    let font_size = 18.0;
    let mut lines = vec![
        format!("FPS: {:.0}", stats.fps),
        format!("Generation: {}", stats.generation),
        format!("Creatures: {}", stats.creature_count),
        format!("Food: {}", stats.food_count),
        format!("Time: {:.1}s", stats.elapsed_time),
        format!("Births: {}  Deaths: {}", stats.births, stats.deaths),
        format!("Eaten: {}", stats.foods_eaten),
        format!("Best fitness: {:.2}", stats.best_fitness),
    ];
    if controller.is_paused() {
        lines.push("PAUSED (space to resume)".to_string());
    }
    let y = draw_lines(&lines, 10.0, 24.0, font_size, DARKGRAY);

    if let Some(creature) = controller.selected_creature() {
        let info = vec![
            String::new(),
            "Selected".to_string(),
            format!("Generation: {}", creature.generation),
            format!("Age: {:.1}s", creature.age),
            format!("Energy: {:.1}/{:.0}", creature.energy, creature.max_energy),
            format!("Fitness: {:.2}", creature.fitness),
            format!("Children: {}", creature.children_count),
            format!("Mode: {:?}", creature.behavior),
        ];
        draw_lines(&info, 10.0, y, font_size, DARKBLUE);
    }

    let x = screen_width() - 320.0;
    let mut y = 24.0;
    for event in controller.ecosystem().log.recent().take(12) {
        let color = match event.kind {
            EventKind::Birth => DARKGREEN,
            EventKind::Death => GRAY,
            EventKind::Generation => MAROON,
        };
        draw_text(
            &format!("[{:.1}s] {} {}", event.time, event.kind.tag(), event.description),
            x,
            y,
            16.0,
            color,
        );
        y += 18.0;
    }
}

pub fn draw_centered(text: &str, font_size: f32, y_offset: f32, color: Color) {
    let size = measure_text(text, None, font_size as _, 1.0);
    draw_text(
        text,
        screen_width() / 2. - size.width / 2.,
        screen_height() / 2. - size.height / 2. + y_offset,
        font_size,
        color,
    );
}

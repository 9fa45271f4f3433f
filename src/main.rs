use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::Parser;
use evo_arena::simulation::controller::SimulationController;
use evo_arena::simulation::params::Params;
use macroquad::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod graphics;

use graphics::Viewport;

/// World-space radius around a click within which a creature is picked.
const PICK_RADIUS: f32 = 1.5;

#[derive(Parser, Debug)]
#[command(name = "evo_arena", about = "Neuro-evolution in a toroidal arena")]
struct Args {
    /// JSON parameter file; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the target population
    #[arg(long)]
    creatures: Option<usize>,
    /// Override the world side length
    #[arg(long)]
    size: Option<f32>,
}

fn load_params(args: &Args) -> anyhow::Result<Params> {
    let mut params = match &args.config {
        Some(path) => Params::load_from_file(path)
            .with_context(|| format!("failed to load parameters from {}", path.display()))?,
        None => Params::default(),
    };
    if let Some(creatures) = args.creatures {
        params.initial_creatures = creatures;
    }
    if let Some(size) = args.size {
        params.world_size = size;
    }
    params.validate().context("invalid parameters")?;
    Ok(params)
}

fn start(
    args: &Args,
    selection: &Rc<RefCell<Option<String>>>,
) -> anyhow::Result<SimulationController> {
    let params = load_params(args)?;
    let mut controller =
        SimulationController::new(params).context("failed to initialise the simulation")?;

    let selection = Rc::clone(selection);
    controller.set_selected_creature_callback(move |creature| {
        let summary = creature.map(|c| format!("gen {} age {:.1}", c.generation, c.age));
        match &summary {
            Some(s) => info!(creature = %s, "creature selected"),
            None => info!("selection cleared"),
        }
        *selection.borrow_mut() = summary;
    });
    Ok(controller)
}

enum Screen {
    Genesis,
    Running(SimulationController),
    Failed(String),
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Evo Arena".to_owned(),
        window_width: 1200,
        window_height: 900,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("evo_arena=info")),
        )
        .try_init();

    let args = Args::parse();
    let selection: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
    let mut screen = Screen::Genesis;

    info!("starting evo arena");

    loop {
        match &mut screen {
            Screen::Genesis => {
                clear_background(LIGHTGRAY);
                graphics::draw_centered(
                    "Start a new evolution by pressing Enter",
                    30.0,
                    0.0,
                    DARKGRAY,
                );
                if is_key_pressed(KeyCode::Enter) {
                    screen = match start(&args, &selection) {
                        Ok(controller) => Screen::Running(controller),
                        Err(e) => {
                            let message = format!("{e:#}");
                            error!(error = %message, "simulation failed to start");
                            Screen::Failed(message)
                        }
                    };
                }
            }
            Screen::Failed(message) => {
                clear_background(Color::from_rgba(60, 20, 20, 255));
                graphics::draw_centered(message, 22.0, -20.0, WHITE);
                graphics::draw_centered("Press R to retry", 22.0, 20.0, LIGHTGRAY);
                if is_key_pressed(KeyCode::R) {
                    screen = Screen::Genesis;
                }
            }
            Screen::Running(controller) => {
                if is_key_pressed(KeyCode::Space) {
                    controller.toggle_pause();
                }

                let viewport = Viewport::fit(&controller.ecosystem().world);
                if is_mouse_button_pressed(MouseButton::Left) {
                    let world = controller.ecosystem().world;
                    let point = world.wrap_position(viewport.to_world(mouse_position()));
                    controller.select_at(point, PICK_RADIUS);
                }
                if is_mouse_button_pressed(MouseButton::Right) {
                    controller.clear_selection();
                }

                controller.tick(get_frame_time());
                let stats = controller.stats();

                clear_background(WHITE);
                graphics::draw_arena(&controller.ecosystem().world, &viewport);
                graphics::draw_foods(controller, &viewport);
                graphics::draw_creatures(controller, &viewport);
                graphics::draw_overlay(controller, &stats);
                if let Some(summary) = selection.borrow().as_deref() {
                    draw_text(summary, 10.0, screen_height() - 12.0, 18.0, DARKBLUE);
                }
            }
        }

        next_frame().await
    }
}

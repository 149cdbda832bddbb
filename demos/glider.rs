//! Headless run: seed a glider, advance it, export a PNG per snapshot.
//!
//! Run with: `cargo run --example glider`

use automata_gpu::prelude::*;

fn main() -> Result<(), EngineError> {
    env_logger::init();

    let gpu = pollster::block_on(GpuContext::headless())?;
    let mut engine = Engine::new(
        gpu,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        EngineConfig::default()
            .with_surface(500, 500)
            .with_cell_size(10)
            .with_rule(Rule::GameOfLife),
    )?;

    // Glider heading down-right.
    for (x, y) in [(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)] {
        engine.set_cell(x, y, CellState::Alive);
    }

    for generation in 0..=20 {
        if generation % 5 == 0 {
            let path = format!("glider_{generation:03}.png");
            engine.export_png(std::path::Path::new(&path))?;
            let alive = engine
                .read_cells()?
                .iter()
                .filter(|&&c| c == CellState::Alive)
                .count();
            println!("generation {generation}: {alive} alive cells -> {path}");
        }
        engine.advance();
    }

    Ok(())
}

// Cortex (3D neuron view) rendering module
//
// Rasterises the render loop's latest frame onto a Braille canvas. The
// canvas spans normalised device coordinates, -1.0 ~ 1.0 on both axes, so
// the camera's aspect ratio already accounts for the panel shape.

use crate::app::AppState;
use crate::scene::{Region, RenderLoop, Vec3, ViewportController};
use crate::theme::{rgb_color, GLIA_GREY, SYNAPSE_VIOLET};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders,
    },
    Frame,
};

/// Height above a region's origin where its label is printed
const LABEL_LIFT: f64 = 7.5;

/// Projected label anchor for a region, `None` when off screen
fn label_anchor(
    render_loop: &RenderLoop,
    viewport: &ViewportController,
    region: &Region,
) -> Option<(f64, f64)> {
    let anchor = region.origin + Vec3::new(-6.0, LABEL_LIFT, 0.0);
    let p = render_loop.project(viewport, anchor)?;
    if p.x.abs() <= 1.0 && p.y.abs() <= 1.0 {
        Some((p.x, p.y))
    } else {
        None
    }
}

pub fn render_cortex(f: &mut Frame, area: Rect, app: &AppState) {
    let frame = app.render_loop.frame();
    let pool = app.pool();

    let labels: Vec<(f64, f64, &'static str)> = pool
        .regions()
        .iter()
        .filter_map(|region| {
            label_anchor(&app.render_loop, &app.viewport, region)
                .map(|(x, y)| (x, y, region.name))
        })
        .collect();

    let title = format!(
        "━ 🧠 Cortex ({} neurons, θ={:.3}) ",
        pool.len(),
        frame.rotation_y
    );

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default()
                        .fg(SYNAPSE_VIOLET)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(SYNAPSE_VIOLET)),
        )
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            // Sprites arrive far-to-near; nearer proxies overwrite cells
            for sprite in &frame.sprites {
                ctx.draw(&Points {
                    coords: &[(sprite.x, sprite.y)],
                    color: rgb_color(sprite.color),
                });
            }

            ctx.layer();
            let label_style = Style::default().fg(GLIA_GREY);
            for (x, y, name) in &labels {
                ctx.print(*x, *y, Span::styled(*name, label_style));
            }
        });

    f.render_widget(canvas, area);
}

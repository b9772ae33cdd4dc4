//! egui widgets for the film grain settings

use crate::{FilmGrain, MIN_GRAIN_SIZE};
use glam::Vec3;

/// Responses of the widgets whose edits need more than a parameter copy
pub(crate) struct WidgetResponses {
    pub luminance_low: egui::Response,
    pub colored_noise: egui::Response,
    pub pause: egui::Response,
}

impl FilmGrain {
    pub(crate) fn draw_widgets(&mut self, ui: &mut egui::Ui) -> WidgetResponses {
        let mut params = self.params;

        ui.add(
            egui::Slider::new(&mut params.grain_size, MIN_GRAIN_SIZE..=8.0)
                .text("Grain size")
                .logarithmic(true),
        )
        .on_hover_text("Size of one grain in pixels");
        ui.add(egui::Slider::new(&mut params.intensity, 0.0..=1.0).text("Intensity"));

        ui.horizontal(|ui| {
            let mut color = params.grain_color.to_array();
            if ui.color_edit_button_rgb(&mut color).changed() {
                params.grain_color = Vec3::from_array(color);
            }
            ui.label("Grain color");
        });

        ui.checkbox(&mut params.use_luminance_range, "Use luminance range")
            .on_hover_text("Fade the grain out above the luminance range");
        let luminance_low = ui
            .add_enabled_ui(params.use_luminance_range, |ui| {
                ui.horizontal(|ui| {
                    // Each end stops at the other so a drag never swaps them
                    let high = params.luminance_range.y;
                    let low_response = ui.add(
                        egui::DragValue::new(&mut params.luminance_range.x)
                            .speed(0.01)
                            .range(f32::MIN..=high),
                    );
                    let low = params.luminance_range.x;
                    ui.add(
                        egui::DragValue::new(&mut params.luminance_range.y)
                            .speed(0.01)
                            .range(low..=f32::MAX),
                    );
                    ui.label("Luminance range");
                    low_response
                })
                .inner
            })
            .inner;

        let colored_noise = ui.checkbox(&mut params.use_colored_noise, "Colored noise");
        let pause = ui.checkbox(&mut self.paused, "Pause animation");

        if params != self.params {
            self.set_params(params);
        }

        WidgetResponses {
            luminance_low,
            colored_noise,
            pause,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{FilmGrain, FilmGrainParams};
    use helio_graph::RenderPass;

    fn run_frame(pass: &mut FilmGrain, group: Option<&str>) {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| pass.render_ui(ui, group));
        });
    }

    /// Lay the widgets out once, then replay `script` against the center
    /// of the widget picked by `pick`, one event batch per frame
    fn interact(
        pass: &mut FilmGrain,
        pick: fn(&super::WidgetResponses) -> egui::Rect,
        script: impl Fn(egui::Pos2) -> Vec<Vec<egui::Event>>,
    ) {
        let ctx = egui::Context::default();
        let mut target = egui::Rect::NOTHING;

        let mut frame = |pass: &mut FilmGrain, events: Vec<egui::Event>| {
            let input = egui::RawInput {
                events,
                ..Default::default()
            };
            let _ = ctx.run(input, |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    target = pick(&pass.draw_widgets(ui));
                });
            });
            target.center()
        };

        let pos = frame(pass, Vec::new());
        for events in script(pos) {
            frame(pass, events);
        }
    }

    fn button(pos: egui::Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn click(pos: egui::Pos2) -> Vec<Vec<egui::Event>> {
        vec![
            vec![egui::Event::PointerMoved(pos)],
            vec![button(pos, true)],
            vec![button(pos, false)],
        ]
    }

    #[test]
    fn idle_frame_leaves_params_untouched() {
        let mut pass = FilmGrain::default();
        run_frame(&mut pass, None);
        run_frame(&mut pass, Some("Film Grain"));

        assert_eq!(*pass.params(), FilmGrainParams::default());
        assert!(!pass.is_paused());
        assert!(!pass.noise_cache().is_dirty());
    }

    #[test]
    fn colored_noise_toggle_marks_noise_dirty() {
        let mut pass = FilmGrain::default();
        interact(&mut pass, |widgets| widgets.colored_noise.rect, click);

        assert!(!pass.params().use_colored_noise);
        assert!(pass.noise_cache().is_dirty());
        assert!(!pass.is_paused());
    }

    #[test]
    fn pause_toggle_leaves_noise_alone() {
        let mut pass = FilmGrain::default();
        interact(&mut pass, |widgets| widgets.pause.rect, click);

        assert!(pass.is_paused());
        assert!(!pass.noise_cache().is_dirty());
        assert_eq!(*pass.params(), FilmGrainParams::default());
    }

    #[test]
    fn dragging_low_end_stops_at_high_end() {
        let mut pass = FilmGrain::default();
        interact(
            &mut pass,
            |widgets| widgets.luminance_low.rect,
            |pos| {
                let mut frames = vec![
                    vec![egui::Event::PointerMoved(pos)],
                    vec![button(pos, true)],
                ];
                for step in 1..=5 {
                    let to = pos + egui::vec2(50.0 * step as f32, 0.0);
                    frames.push(vec![egui::Event::PointerMoved(to)]);
                }
                let end = pos + egui::vec2(250.0, 0.0);
                frames.push(vec![button(end, false)]);
                frames
            },
        );

        // The drag pushed well past 0.5; the low end stops there and the
        // high end is untouched
        let range = pass.params().luminance_range;
        assert_eq!(range.y, 0.5);
        assert!(range.x > 0.0 && range.x <= range.y);
    }
}

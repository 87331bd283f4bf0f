use crate::prelude::*;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterPanel>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, (ui_system, commit_finished_edits).chain());
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    contexts.ctx_mut().set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..Default::default()
    });
}

/// The panel edits a draft, the real parameters only see finished edits
#[derive(Resource, Default)]
pub struct ParameterPanel {
    draft: Option<GalaxyParameters>,
    dirty: bool,
    pointer_down: bool,
    has_focus: bool,
}

/// An edit is finished once the pointer is released and no text field is being typed into
pub fn edit_finished(dirty: bool, pointer_down: bool, has_focus: bool) -> bool {
    dirty && !pointer_down && !has_focus
}

fn srgb_bytes(color: Color) -> [u8; 3] {
    color.to_srgba().to_u8_array_no_alpha()
}

fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Color) -> egui::Response {
    ui.horizontal(|ui| {
        let mut rgb = srgb_bytes(*color);
        let response = ui.color_edit_button_srgb(&mut rgb);
        ui.label(label);
        if response.changed() {
            *color = Color::srgb_u8(rgb[0], rgb[1], rgb[2]);
        }
        response
    })
    .inner
}

fn parameter_ui(draft: &mut GalaxyParameters, ui: &mut egui::Ui) -> bool {
    let min = GalaxyParameters::MIN;
    let max = GalaxyParameters::MAX;

    let responses = [
        ui.add(
            egui::Slider::new(&mut draft.count, min.count..=max.count)
                .step_by(100.0)
                .text("count"),
        ),
        ui.add(
            egui::Slider::new(&mut draft.size, min.size..=max.size)
                .step_by(0.001)
                .text("size"),
        ),
        ui.add(
            egui::Slider::new(&mut draft.radius, min.radius..=max.radius)
                .step_by(0.01)
                .text("radius"),
        ),
        ui.add(
            egui::Slider::new(&mut draft.branches, min.branches..=max.branches)
                .step_by(1.0)
                .text("branches"),
        ),
        ui.add(
            egui::Slider::new(&mut draft.spin, min.spin..=max.spin)
                .step_by(0.05)
                .text("spin"),
        ),
        ui.add(
            egui::Slider::new(&mut draft.randomness, min.randomness..=max.randomness)
                .step_by(0.001)
                .text("randomness"),
        ),
        ui.add(
            egui::Slider::new(
                &mut draft.randomness_power,
                min.randomness_power..=max.randomness_power,
            )
            .step_by(0.01)
            .text("randomnessPower"),
        ),
        color_row(ui, "insideColor", &mut draft.inside_color),
        color_row(ui, "outsideColor", &mut draft.outside_color),
    ];

    responses.iter().any(|response| response.changed())
}

fn ui_system(
    mut contexts: EguiContexts,
    mut panel: ResMut<ParameterPanel>,
    params: Res<GalaxyParameters>,
) {
    let ctx = contexts.ctx_mut();
    let draft = panel.draft.get_or_insert_with(|| params.clone());

    let mut changed = false;
    egui::SidePanel::right("galaxy_panel")
        .default_width(360.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");
            changed = parameter_ui(draft, ui);
        });

    panel.dirty |= changed;
    panel.pointer_down = ctx.input(|i| i.pointer.any_down());
    panel.has_focus = ctx.memory(|m| m.focused().is_some());
}

/// Pushes a finished draft through the setters and tells the galaxy to regenerate
fn commit_finished_edits(
    mut panel: ResMut<ParameterPanel>,
    mut params: ResMut<GalaxyParameters>,
    mut changes: EventWriter<ParametersChanged>,
) {
    if !edit_finished(panel.dirty, panel.pointer_down, panel.has_focus) {
        return;
    }
    panel.dirty = false;

    let Some(draft) = panel.draft.as_mut() else {
        return;
    };
    let randomness_before = params.randomness;

    if params.commit(draft) {
        if params.randomness != randomness_before {
            debug!(
                randomness = params.randomness,
                "randomness is not part of the offset formula, positions are unaffected"
            );
        }
        changes.write(ParametersChanged);
    }
    // show the clamped values back in the panel
    *draft = params.clone();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_to_commit_without_edits() {
        assert!(!edit_finished(false, false, false));
    }

    #[test]
    fn drags_and_typing_hold_the_commit_back() {
        assert!(!edit_finished(true, true, false));
        assert!(!edit_finished(true, false, true));
        assert!(edit_finished(true, false, false));
    }

    #[test]
    fn colors_round_trip_through_bytes() {
        let color = Color::srgb_u8(0xf7, 0x25, 0x85);
        assert_eq!(srgb_bytes(color), [0xf7, 0x25, 0x85]);
    }
}

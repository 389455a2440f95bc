use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use shallows::plugins::core::CorePlugin;
use shallows::plugins::input::InputPlugin;
use shallows::plugins::water::WaterPlugin;
use shallows::resources::CliArgs;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Shallows".into(),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(EguiPlugin);

    // Must follow DefaultPlugins: parsing logs through the LogPlugin.
    let cli = CliArgs::parse();
    app.insert_resource(cli)
        .add_plugins(InputPlugin)
        .add_plugins(WaterPlugin)
        .add_plugins(CorePlugin)
        .run();
}

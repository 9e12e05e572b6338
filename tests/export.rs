use std::fs;

use cellmap::{
    canvas::SvgCanvas,
    geometry::Viewport,
    grazing::FixedClock,
    snapshot::MapExporter,
    InteractionController, LayoutParameters,
};

fn rendered(viewport: Viewport) -> (String, InteractionController) {
    let mut controller = InteractionController::new(LayoutParameters::default(), viewport)
        .with_clock(FixedClock(90));
    let mut canvas = SvgCanvas::new(viewport.width, viewport.height);
    controller.render(&mut canvas);
    (canvas.finish(), controller)
}

#[test]
fn export_writes_svg_and_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let (svg, controller) = rendered(Viewport::new(1024.0, 768.0));
    let paths = MapExporter::new(dir.path())
        .write(&svg, controller.geometry())
        .unwrap();

    assert_eq!(paths.svg, dir.path().join("cell_1024x768.svg"));
    assert_eq!(paths.json, dir.path().join("cell_1024x768.json"));
    assert_eq!(fs::read_to_string(&paths.svg).unwrap(), svg);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json["geometry"]["slots"]["count"], 10);
    assert!(json["geometry"]["pixels"]["bamboo"]["outer"].as_f64().unwrap() > 0.0);
}

#[test]
fn same_state_renders_identical_svg() {
    let (first, _) = rendered(Viewport::new(640.0, 480.0));
    let (second, _) = rendered(Viewport::new(640.0, 480.0));
    assert_eq!(first, second);
}

#[test]
fn export_into_a_file_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    fs::write(&blocker, "x").unwrap();
    let (svg, controller) = rendered(Viewport::new(320.0, 240.0));
    assert!(MapExporter::new(&blocker)
        .write(&svg, controller.geometry())
        .is_err());
}

use std::sync::{Arc, Mutex};

use cellmap::{
    animation::DEFAULT_ZOOM_MS,
    canvas::RecordingCanvas,
    geometry::Viewport,
    grazing::FixedClock,
    Destination, InteractionController, LayoutParameters, Region,
};

fn controller(params: LayoutParameters) -> (InteractionController, Arc<Mutex<Vec<Destination>>>) {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&fired);
    let controller = InteractionController::new(params, Viewport::new(900.0, 700.0))
        .with_clock(FixedClock(0))
        .on_navigate(move |destination| sink.lock().unwrap().push(destination));
    (controller, fired)
}

#[test]
fn zoom_completes_within_one_frame_of_its_duration() {
    let (mut c, fired) = controller(LayoutParameters::default());
    let centre = c.geometry().center;
    let t0 = 12_345.0;
    assert!(c.click(centre.x, centre.y, t0).zoom_started);

    let frame_ms = 1000.0 / 60.0;
    let mut t = t0;
    let mut completions = 0;
    while t < t0 + DEFAULT_ZOOM_MS * 3.0 {
        t += frame_ms;
        if c.frame(t).is_some() {
            completions += 1;
            assert!(t >= t0 + DEFAULT_ZOOM_MS);
            assert!(t < t0 + DEFAULT_ZOOM_MS + frame_ms);
        }
    }
    assert_eq!(completions, 1);
    assert_eq!(*fired.lock().unwrap(), vec![Destination::School]);
}

#[test]
fn zoom_progress_never_decreases() {
    let (mut c, _) = controller(LayoutParameters::default());
    let centre = c.geometry().center;
    c.click(centre.x, centre.y, 0.0);
    let mut last = 0.0;
    for step in 1..36 {
        c.frame(step as f64 * 16.0);
        let progress = c.zoom().unwrap().progress;
        assert!(progress >= last);
        last = progress;
    }
}

#[test]
fn zoom_frame_draws_an_amber_disk() {
    let (mut c, _) = controller(LayoutParameters::default());
    let centre = c.geometry().center;
    c.click(centre.x, centre.y, 0.0);
    c.frame(300.0);

    let mut idle = RecordingCanvas::new();
    let (mut other, _) = controller(LayoutParameters::default());
    other.render(&mut idle);
    let mut zooming = RecordingCanvas::new();
    c.render(&mut zooming);
    assert_eq!(zooming.ops.len(), idle.ops.len() + 1);
}

#[test]
fn every_clickable_guild_navigates() {
    let params = LayoutParameters::compact();
    let (mut c, fired) = controller(params);
    let geo = c.geometry().clone();
    for guild in 0..geo.slots.count {
        let p = geo.guild_center(guild).polar(0.0, geo.to_px(35.0));
        let outcome = c.click(p.x, p.y, 0.0);
        assert_eq!(outcome.target.map(|t| t.region), Some(Region::Guild { index: guild }));
    }
    assert_eq!(fired.lock().unwrap().len(), geo.slots.count as usize);
}

#[test]
fn hover_follows_the_pointer_and_clears_on_leave() {
    let (mut c, _) = controller(LayoutParameters::default());
    let geo = c.geometry().clone();
    let bamboo = geo.at(geo.slots.angle(3), geo.pixels.bamboo.mid());
    assert!(c.pointer_move(bamboo.x, bamboo.y));
    assert_eq!(c.hover().map(|t| t.region), Some(Region::Bamboo));

    let mut canvas = RecordingCanvas::new();
    c.render(&mut canvas);
    assert!(canvas.texts().contains(&"Bamboo Plantation"));

    assert!(c.pointer_leave());
    assert!(c.hover().is_none());
}

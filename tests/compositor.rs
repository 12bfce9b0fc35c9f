use droste_view::{Area, Dimensions, Media, compose, recursion_frames};
use egui::{Color32, ColorImage};

#[test]
fn test_frames_shrink_towards_selection() {
    let frames = recursion_frames(Dimensions::new(200.0, 200.0), Area::new(50.0, 50.0, 100.0, 100.0), 3);
    let scenes: Vec<Area> = frames.iter().map(|f| f.scene).collect();

    assert_eq!(
        scenes,
        vec![
            Area::new(50.0, 50.0, 100.0, 100.0),
            Area::new(75.0, 75.0, 50.0, 50.0),
            Area::new(87.5, 87.5, 25.0, 25.0),
        ]
    );
}

#[test]
fn test_zero_depth_is_empty() {
    let frames = recursion_frames(Dimensions::new(200.0, 200.0), Area::new(50.0, 50.0, 100.0, 100.0), 0);
    assert!(frames.is_empty());
}

#[test]
fn test_non_square_factors() {
    let frames = recursion_frames(Dimensions::new(400.0, 200.0), Area::new(100.0, 0.0, 200.0, 50.0), 2);

    assert_eq!(frames[1].scene, Area::new(150.0, 0.0, 100.0, 12.5));
}

#[test]
fn test_every_frame_stays_inside_the_previous() {
    let frames = recursion_frames(Dimensions::new(300.0, 150.0), Area::new(20.0, 30.0, 120.0, 60.0), 8);

    for pair in frames.windows(2) {
        let (outer, inner) = (pair[0].scene, pair[1].scene);
        assert!(inner.x >= outer.x && inner.y >= outer.y);
        assert!(inner.x + inner.width <= outer.x + outer.width + 1e-3);
        assert!(inner.y + inner.height <= outer.y + outer.height + 1e-3);
    }
}

#[test]
fn test_compose_keeps_media_and_area() {
    let media = Media::new_ref("tile", "image/png", ColorImage::new([20, 10], Color32::RED));
    let selected = Area::new(5.0, 5.0, 10.0, 5.0);
    let container = compose(Dimensions::new(20.0, 10.0), selected, &media, 5);

    assert_eq!(container.len(), 5);
    assert_eq!(container.init_area, selected);
    assert_eq!(container.media.id(), media.id());
}

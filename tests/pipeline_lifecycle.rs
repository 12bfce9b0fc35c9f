use droste_view::config::RangeConfig;
use droste_view::event::{MouseEvent, Tick};
use droste_view::{Area, Dimensions, Media, MediaHandle, SelectionState, Session, ViewerConfig};
use egui::{Color32, ColorImage, Pos2, pos2};

fn media(name: &str, w: usize, h: usize) -> MediaHandle {
    Media::new_ref(name, "image/png", ColorImage::new([w, h], Color32::LIGHT_BLUE))
}

fn session_with(media: MediaHandle) -> Session {
    let mut session = Session::new(ViewerConfig::default());
    session.set_container_width(1200.0);
    session.load_media(media);
    session
}

fn drag(session: &mut Session, from: Pos2, to: Pos2) {
    session.dispatch_mouse(&MouseEvent::down(from));
    session.dispatch_mouse(&MouseEvent::moved(to));
    session.dispatch_mouse(&MouseEvent::up(to));
    session.pump();
}

#[test]
fn test_reload_does_not_leak_listeners() {
    let mut session = session_with(media("first", 400, 200));
    let active = session.listener_count();
    assert!(active > 0);

    for i in 0..5 {
        session.load_media(media(&format!("next{}", i), 300, 300));
        assert_eq!(session.listener_count(), active);
    }
}

#[test]
fn test_clear_all_leaves_no_listeners() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));

    session.clear_all();

    assert_eq!(session.listener_count(), 0);
    assert!(!session.has_media());
    assert_eq!(session.stage().num_children(), 0);
    assert_eq!(session.stage().size(), Dimensions::new(100.0, 100.0));
}

#[test]
fn test_selection_builds_composite() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));

    let composite = session.composite().unwrap();
    assert_eq!(composite.init_area, Area::new(10.0, 10.0, 100.0, 50.0));
    assert_eq!(composite.len(), 5);
    // base, composite, outline
    assert_eq!(session.stage().num_children(), 3);
}

#[test]
fn test_canvas_width_rebuild_rescales_selection() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));
    let before = session.listener_count();

    session.settings_mut().canvas_width.set_use_default(false);
    session.pump();

    assert_eq!(session.scene_size(), Some(Dimensions::new(800.0, 400.0)));
    assert_eq!(session.stage().size(), Dimensions::new(800.0, 400.0));
    let scaled = Area::new(20.0, 20.0, 200.0, 100.0);
    assert_eq!(session.selection().unwrap().confirmed_area(), Some(scaled));
    assert_eq!(session.composite().unwrap().init_area, scaled);
    assert_eq!(session.listener_count(), before);
    assert_eq!(session.settings().canvas_width.display(), "800");
}

#[test]
fn test_depth_change_only_rebuilds_composite() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));
    let media_id = session.media().unwrap().id();

    session.settings_mut().nb_recursion.input(3.0);
    session.pump();

    let composite = session.composite().unwrap();
    assert_eq!(composite.len(), 3);
    assert_eq!(composite.init_area, Area::new(10.0, 10.0, 100.0, 50.0));
    assert_eq!(session.media().unwrap().id(), media_id);
    assert!(matches!(
        session.selection().unwrap().state(),
        SelectionState::Confirmed { .. }
    ));
}

#[test]
fn test_events_queued_before_teardown_are_dropped() {
    let mut session = session_with(media("first", 400, 200));
    session.dispatch_mouse(&MouseEvent::down(pos2(10.0, 10.0)));
    session.dispatch_mouse(&MouseEvent::moved(pos2(110.0, 60.0)));
    session.dispatch_mouse(&MouseEvent::up(pos2(110.0, 60.0)));

    session.load_media(media("second", 300, 300));
    session.pump();

    assert_eq!(*session.selection().unwrap().state(), SelectionState::Idle);
    assert!(session.composite().is_none());
}

#[test]
fn test_mouse_ignored_without_media() {
    let mut session = Session::new(ViewerConfig::default());
    drag(&mut session, pos2(10.0, 10.0), pos2(50.0, 50.0));

    assert!(session.selection().is_none());
    assert_eq!(session.listener_count(), 0);
}

#[test]
fn test_clear_selection_keeps_base_image() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));

    session.clear_selection();

    assert!(session.composite().is_none());
    assert_eq!(session.stage().num_children(), 1);
    assert!(session.has_media());

    // depth changes have nothing to rebuild from
    session.settings_mut().nb_recursion.input(7.0);
    session.pump();
    assert!(session.composite().is_none());
}

#[test]
fn test_many_moves_in_one_frame_rebuild_once() {
    let mut session = session_with(media("first", 400, 200));
    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));
    assert_eq!(session.rebuild_count(), 1);

    session.dispatch_mouse(&MouseEvent::down(pos2(50.0, 30.0)));
    for step in 1..=10 {
        session.dispatch_mouse(&MouseEvent::moved(pos2(50.0 + step as f32, 30.0)));
    }
    session.dispatch_mouse(&MouseEvent::up(pos2(60.0, 30.0)));
    session.pump();

    assert_eq!(session.rebuild_count(), 2);
    assert_eq!(
        session.composite().unwrap().init_area,
        Area::new(20.0, 10.0, 100.0, 50.0)
    );
    assert_eq!(session.stage().num_children(), 3);
}

#[test]
fn test_tick_requests_repaint_only_after_changes() {
    let tick = Tick { time: 1.0, delta: 0.0 };
    let mut session = Session::new(ViewerConfig::default());
    assert!(!session.tick(tick));
    assert_eq!(session.frame_count(), 0);

    session.set_container_width(1200.0);
    session.load_media(media("first", 400, 200));
    assert!(session.tick(tick));
    assert!(!session.tick(tick));

    drag(&mut session, pos2(10.0, 10.0), pos2(110.0, 60.0));
    assert!(session.tick(tick));
    assert_eq!(session.frame_count(), 3);
}

#[test]
fn test_inverted_range_config_does_not_panic() {
    let config = ViewerConfig {
        nb_recursion: RangeConfig {
            min: 20.0,
            max: 1.0,
            value: 5.0,
            use_default: false,
        },
        ..ViewerConfig::default()
    };
    let mut session = Session::new(config);
    assert_eq!(session.recursion_depth(), 5);

    session.settings_mut().nb_recursion.input(3.0);
    session.pump();
    assert_eq!(session.recursion_depth(), 3);
}

//! Observable contract of the locale crossfade: counter, subscription
//! pairing, pass-through and overlap behavior.

use std::rc::Rc;
use std::time::Duration;

use fadeglot_i18n::testing::RecordingEvents;
use fadeglot_i18n::{LANGUAGE_CHANGED, LocaleEvents};
use fadeglot_widgets::{
    CrossfadeConfig, CrossfadeProps, Generation, ItemSnapshot, LocaleCrossfade,
    SpringTransitions, TransitionEngine, TransitionPhase,
};
use proptest::prelude::*;

const MS_16: Duration = Duration::from_millis(16);

/// Engine double: delegates to the spring engine and records every key it
/// is handed plus the largest number of items seen at once.
struct RecordingEngine {
    inner: SpringTransitions,
    registered: Vec<Generation>,
    max_items: usize,
}

impl RecordingEngine {
    fn new() -> Self {
        Self {
            inner: SpringTransitions::default(),
            registered: Vec::new(),
            max_items: 1,
        }
    }

    fn observe(&mut self) {
        self.max_items = self.max_items.max(self.inner.items().len());
    }
}

impl TransitionEngine for RecordingEngine {
    fn current_key(&self) -> Generation {
        self.inner.current_key()
    }

    fn replace(&mut self, key: Generation) {
        self.registered.push(key);
        self.inner.replace(key);
        self.observe();
    }

    fn tick(&mut self, dt: Duration) -> bool {
        let animating = self.inner.tick(dt);
        self.observe();
        animating
    }

    fn items(&self) -> Vec<ItemSnapshot> {
        self.inner.items()
    }
}

fn mount_recording(
    events: &Rc<RecordingEvents>,
) -> LocaleCrossfade<String, RecordingEngine> {
    LocaleCrossfade::mount_with_engine(
        events.clone(),
        CrossfadeProps::new("Devices".to_owned()),
        RecordingEngine::new(),
    )
    .expect("mount")
}

#[test]
fn rapid_changes_register_consecutive_generations() {
    let events = RecordingEvents::new();
    let mut fade = mount_recording(&events);
    fade.tick(MS_16);
    let g = fade.generation();

    // Two notifications before the first transition completes.
    events.fire(LANGUAGE_CHANGED);
    fade.tick(MS_16);
    events.fire(LANGUAGE_CHANGED);
    fade.tick(MS_16);

    assert_eq!(fade.engine().registered, vec![g + 1, g + 2]);
    assert_eq!(fade.engine().max_items, 2);

    while fade.tick(MS_16) {}
    assert_eq!(fade.render().keys(), vec![g + 2]);
}

#[test]
fn notifications_between_frames_fade_out_visible_content() {
    let events = RecordingEvents::new();
    let mut fade = LocaleCrossfade::mount(events.clone(), CrossfadeProps::new("x")).unwrap();
    while fade.tick(MS_16) {}

    events.fire(LANGUAGE_CHANGED);
    events.fire(LANGUAGE_CHANGED);
    let container = fade.render();
    let phases: Vec<_> = container.items.iter().map(|i| (i.key, i.phase)).collect();
    assert_eq!(
        phases,
        vec![(0, TransitionPhase::Leaving), (2, TransitionPhase::Entering)]
    );
    assert_eq!(container.items[0].style.opacity, 1.0);

    let max_opacity = container
        .items
        .iter()
        .map(|item| item.style.opacity)
        .fold(0.0, f64::max);
    assert!(max_opacity > 0.5, "content vanished: {max_opacity}");
}

#[test]
fn back_to_back_notifications_are_not_coalesced() {
    let events = RecordingEvents::new();
    let mut fade = mount_recording(&events);

    events.fire(LANGUAGE_CHANGED);
    events.fire(LANGUAGE_CHANGED);
    events.fire(LANGUAGE_CHANGED);
    let container = fade.render();

    assert_eq!(container.items.len(), 2);
    assert_eq!(fade.engine().registered, vec![1, 2, 3]);
    assert!(fade.engine().max_items <= 2);
}

#[test]
fn overlap_is_a_true_crossfade() {
    let events = RecordingEvents::new();
    let mut fade = LocaleCrossfade::mount(events.clone(), CrossfadeProps::new("x")).unwrap();
    while fade.tick(MS_16) {}

    events.fire(LANGUAGE_CHANGED);
    let mut overlapping_frames = 0;
    while fade.tick(MS_16) {
        let container = fade.render();
        if container.items.len() == 2 {
            let leaving = container.items[0].style;
            let entering = container.items[1].style;
            if leaving.opacity > 0.0 && entering.opacity > 0.0 {
                overlapping_frames += 1;
            }
        }
    }
    assert!(overlapping_frames > 3, "only {overlapping_frames} overlapping frames");
}

#[test]
fn unmount_leaves_no_listener_behind() {
    let events = RecordingEvents::new();
    let fade = mount_recording(&events);
    assert_eq!(events.listener_count(LANGUAGE_CHANGED), 1);
    fade.unmount();
    assert_eq!(events.listener_count(LANGUAGE_CHANGED), 0);
    assert_eq!(events.fire(LANGUAGE_CHANGED), 0);
    assert_eq!(events.deliveries(), 0);
}

#[test]
fn reduced_motion_never_overlaps() {
    let events = RecordingEvents::new();
    let mut fade = LocaleCrossfade::mount_with(
        events.clone(),
        CrossfadeProps::new("x"),
        CrossfadeConfig::reduced_motion(),
    )
    .unwrap();
    events.fire(LANGUAGE_CHANGED);
    let container = fade.render();
    assert_eq!(container.keys(), vec![1]);
    assert_eq!(container.items[0].phase, TransitionPhase::Resident);
}

#[derive(Debug, Clone)]
enum Step {
    Notify,
    Tick(u64),
    Render,
    SetChildren(u8),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => Just(Step::Notify),
        4 => (1u64..50).prop_map(Step::Tick),
        2 => Just(Step::Render),
        1 => any::<u8>().prop_map(Step::SetChildren),
    ]
}

proptest! {
    #[test]
    fn generation_counts_every_notification(steps in prop::collection::vec(step(), 0..80)) {
        let events = RecordingEvents::new();
        let mut fade = LocaleCrossfade::mount(
            events.clone(),
            CrossfadeProps::new(0u8).class_name("wrapper"),
        )
        .unwrap();
        let mut notified: Generation = 0;
        let mut latest = 0u8;

        for step in steps {
            match step {
                Step::Notify => {
                    events.fire(LANGUAGE_CHANGED);
                    notified += 1;
                }
                Step::Tick(ms) => {
                    fade.tick(Duration::from_millis(ms));
                }
                Step::Render => {}
                Step::SetChildren(value) => {
                    fade.set_children(value);
                    latest = value;
                }
            }
            prop_assert_eq!(fade.generation(), notified);

            let container = fade.render();
            prop_assert_eq!(container.class_name, "wrapper");
            prop_assert!(!container.items.is_empty() && container.items.len() <= 2);
            let in_phase = |phase: TransitionPhase| {
                container.items.iter().filter(|i| i.phase == phase).count()
            };
            let leaving = in_phase(TransitionPhase::Leaving);
            let entering = in_phase(TransitionPhase::Entering);
            prop_assert!(leaving <= 1);
            prop_assert!(entering <= 1);
            prop_assert_eq!(container.items.len() - leaving, 1);
            prop_assert_eq!(container.current().map(|i| i.key), Some(notified));
            for item in &container.items {
                prop_assert_eq!(*item.content, latest);
                prop_assert!((0.0..=1.0).contains(&item.style.opacity));
            }
        }

        prop_assert_eq!(events.listener_count(LANGUAGE_CHANGED), 1);
        drop(fade);
        prop_assert_eq!(events.listener_count(LANGUAGE_CHANGED), 0);
    }

    #[test]
    fn class_name_passes_through(class in proptest::option::of("[a-z][a-z0-9 _-]{0,20}")) {
        let events = RecordingEvents::new();
        let mut props = CrossfadeProps::new("content");
        if let Some(class) = &class {
            props = props.class_name(class.clone());
        }
        let mut fade = LocaleCrossfade::mount(events.clone(), props).unwrap();
        let expected = class.as_deref().unwrap_or("");
        prop_assert_eq!(fade.render().class_name, expected);
        prop_assert_eq!(fade.class_name(), expected);
    }
}

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use common::{Call, RecordingCamera};
use uvckit_camera::{
    CoordinatorConfig, DeviceId, DeviceLifecycleCoordinator, SharedCoordinator, SurfaceState,
};

#[test]
fn replug_cycles_request_and_close_once_each() {
    let camera = RecordingCamera::new();
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());

    for id in [DeviceId(1002), DeviceId(1003), DeviceId(1004)] {
        coordinator.on_device_attached(id);
        coordinator.on_device_attached(id);
        coordinator.on_device_detached(id);
        coordinator.on_device_detached(id);
    }

    assert_eq!(camera.count(&Call::RequestPermission(0)), 3);
    assert_eq!(camera.count(&Call::CloseCamera), 3);
}

#[test]
fn detach_before_attach_is_ignored() {
    let camera = RecordingCamera::new();
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());

    coordinator.on_device_detached(DeviceId(5));
    coordinator.on_device_attached(DeviceId(5));

    assert_eq!(camera.calls(), vec![Call::RequestPermission(0)]);
    assert!(coordinator.state().permission_requested());
}

#[test]
fn second_device_attach_is_ignored_until_detach() {
    let camera = RecordingCamera::new();
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());

    coordinator.on_device_attached(DeviceId(1));
    coordinator.on_device_attached(DeviceId(2));
    // Any detach ends the cycle, even for the other device.
    coordinator.on_device_detached(DeviceId(2));
    coordinator.on_device_attached(DeviceId(2));

    assert_eq!(
        camera.calls(),
        vec![
            Call::RequestPermission(0),
            Call::CloseCamera,
            Call::RequestPermission(0)
        ]
    );
}

#[test]
fn early_surface_waits_for_recreate_by_default() {
    let camera = RecordingCamera::new();
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());

    coordinator.on_surface_created();
    coordinator.on_device_attached(DeviceId(7));
    camera.set_opened(true);
    coordinator.on_device_connected(DeviceId(7), true);
    assert!(!coordinator.state().preview_active());

    coordinator.on_surface_destroyed();
    coordinator.on_surface_created();
    assert!(coordinator.state().preview_active());
    assert_eq!(camera.count(&Call::StartPreview), 1);
}

#[test]
fn resume_on_open_starts_deferred_preview() {
    let camera = RecordingCamera::new();
    let config = CoordinatorConfig::default().with_resume_on_open(true);
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, config);

    coordinator.on_surface_created();
    coordinator.on_device_attached(DeviceId(7));
    camera.set_opened(true);
    coordinator.on_device_connected(DeviceId(7), true);
    coordinator.on_device_connected(DeviceId(7), true);

    assert!(coordinator.state().preview_active());
    assert_eq!(camera.count(&Call::StartPreview), 1);
}

#[test]
fn resume_on_open_needs_a_surface() {
    let camera = RecordingCamera::opened();
    let config = CoordinatorConfig::default().with_resume_on_open(true);
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, config);

    coordinator.on_device_connected(DeviceId(7), true);

    assert!(camera.calls().is_empty());
    assert_eq!(coordinator.state().surface, SurfaceState::Absent);
}

#[test]
fn disconnect_marks_preview_ended() {
    let camera = RecordingCamera::opened();
    let mut coordinator = DeviceLifecycleCoordinator::new(&camera, CoordinatorConfig::default());
    coordinator.on_surface_created();

    camera.set_opened(false);
    coordinator.on_device_disconnected(DeviceId(7));

    assert_eq!(coordinator.state().surface, SurfaceState::Ready);
    assert_eq!(camera.calls(), vec![Call::StartPreview]);
}

#[test]
fn concurrent_attach_requests_once() {
    const THREADS: usize = 8;

    let camera = Arc::new(RecordingCamera::new());
    let coordinator = SharedCoordinator::new(Arc::clone(&camera), CoordinatorConfig::default());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let coordinator = coordinator.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                coordinator.on_device_attached(DeviceId(u32::try_from(i).unwrap()));
                coordinator.on_surface_created();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(camera.count(&Call::RequestPermission(0)), 1);
    assert!(coordinator.state().permission_requested());
}

#[test]
fn concurrent_surface_and_device_callbacks_keep_single_preview() {
    let camera = Arc::new(RecordingCamera::opened());
    let coordinator = SharedCoordinator::new(Arc::clone(&camera), CoordinatorConfig::default());

    let surface = {
        let coordinator = coordinator.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                coordinator.on_surface_created();
                coordinator.on_surface_created();
            }
        })
    };
    let device = {
        let coordinator = coordinator.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                coordinator.on_device_attached(DeviceId(1));
                coordinator.on_device_attached(DeviceId(1));
            }
        })
    };
    surface.join().unwrap();
    device.join().unwrap();

    assert_eq!(camera.count(&Call::StartPreview), 1);
    assert_eq!(camera.count(&Call::RequestPermission(0)), 1);
}

//! Scene Cull Pass Tests
//!
//! End-to-end tests for:
//! - Camera queues: culling mask, frustum test, sort order
//! - Spot / point light shadow queues and caster filters
//! - Directional cascades fitted to the main camera
//! - Editor mode and configuration validation

use glam::{Affine3A, Vec3};

use myth_visibility::errors::MythError;
use myth_visibility::renderer::graph::{RenderLists, SceneCullPass};
use myth_visibility::renderer::settings::ShadowSettings;
use myth_visibility::resources::geometry::BoundingBox;
use myth_visibility::scene::{
    Camera, CameraKey, CullingMask, Light, LightKey, LightKind, LightRenderMode, Renderable,
    RenderableKey, Scene,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wide (120 degree) camera looking down `-Z`.
fn camera_at(position: Vec3) -> Camera {
    let mut camera = Camera::new_perspective(120.0, 1.0, 0.1, 500.0);
    camera.update_view_projection(&Affine3A::from_translation(position));
    camera
}

fn unit_box(center: Vec3) -> Renderable {
    Renderable::new(BoundingBox::from_center_half_size(center, Vec3::splat(0.5)))
}

/// Spot light at the origin pointing down `-Z`.
fn spot_scene() -> (Scene, CameraKey, LightKey) {
    init_logger();
    let mut scene = Scene::new();
    let camera = scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));
    let light = scene.add_light(Light::new_spot(Vec3::ONE, 1.0, 50.0, 30.0, 60.0));
    (scene, camera, light)
}

fn run(scene: &Scene, settings: ShadowSettings) -> RenderLists {
    let mut pass = SceneCullPass::new(settings).expect("valid settings");
    let mut lists = RenderLists::new();
    pass.execute(scene, &mut lists);
    lists
}

fn in_shadow_queue(lists: &RenderLists, light: LightKey, key: RenderableKey) -> bool {
    lists.shadow_queue(light, 0).contains(&key)
}

// ============================================================================
// Spot Light Scenarios
// ============================================================================

#[test]
fn box_inside_spot_cone_is_submitted() {
    let (mut scene, _, light) = spot_scene();
    let inside = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));

    let lists = run(&scene, ShadowSettings::default());

    assert!(lists.shadow_views(light).is_some(), "Spot light should have shadow views");
    assert!(in_shadow_queue(&lists, light, inside));
}

#[test]
fn box_moved_outside_spot_cone_is_removed() {
    let (mut scene, _, light) = spot_scene();
    let key = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));
    let mut pass = SceneCullPass::new(ShadowSettings::default()).expect("valid settings");
    let mut lists = RenderLists::new();

    pass.execute(&scene, &mut lists);
    assert!(in_shadow_queue(&lists, light, key));

    // 76 degrees off axis, beyond the 65 degree half angle, still seen by the camera
    let moved = BoundingBox::from_center_half_size(Vec3::new(12.0, 0.0, -3.0), Vec3::splat(0.5));
    scene.renderables[key].bounds = moved;
    pass.execute(&scene, &mut lists);

    assert!(!in_shadow_queue(&lists, light, key), "Box outside the cone must be removed");
    assert!(
        lists.camera(scene.main_camera.expect("main camera")).is_some_and(|q| q.contains(key)),
        "Box is still visible to the camera"
    );
}

#[test]
fn box_behind_spot_light_is_removed() {
    let (mut scene, _, light) = spot_scene();
    let behind = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, 5.0)));

    let lists = run(&scene, ShadowSettings::default());
    assert!(!in_shadow_queue(&lists, light, behind));
}

#[test]
fn box_beyond_light_range_is_skipped() {
    let (mut scene, _, light) = spot_scene();
    if let LightKind::Spot(spot) = scene.lights[light].kind_mut() {
        spot.range = 5.0;
    }
    let far = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));

    let lists = run(&scene, ShadowSettings::default());
    assert!(!in_shadow_queue(&lists, light, far));
}

#[test]
fn non_casters_are_skipped() {
    let (mut scene, _, light) = spot_scene();
    let mut renderable = unit_box(Vec3::new(0.0, 0.0, -10.0));
    renderable.cast_shadows = false;
    let key = scene.add_renderable(renderable);

    let lists = run(&scene, ShadowSettings::default());
    assert!(!in_shadow_queue(&lists, light, key));
}

#[test]
fn static_casters_are_baked_for_mixed_lights_only() {
    let (mut scene, _, light) = spot_scene();
    let mut renderable = unit_box(Vec3::new(0.0, 0.0, -10.0));
    renderable.is_static = true;
    let key = scene.add_renderable(renderable);

    let lists = run(&scene, ShadowSettings::default());
    assert!(in_shadow_queue(&lists, light, key), "Realtime lights render static casters");

    scene.lights[light].render_mode = LightRenderMode::Mixed;
    let lists = run(&scene, ShadowSettings::default());
    assert!(!in_shadow_queue(&lists, light, key), "Mixed lights skip static casters");
    assert!(lists.shadow_views(light).is_some());
}

#[test]
fn baked_lights_produce_no_shadow_views() {
    let (mut scene, _, light) = spot_scene();
    scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));
    scene.lights[light].render_mode = LightRenderMode::Baked;

    let lists = run(&scene, ShadowSettings::default());
    assert!(lists.shadow_views(light).is_none());
    assert!(lists.shadow_queue(light, 0).is_empty());
}

#[test]
fn culling_mask_hides_renderable_everywhere() {
    let (mut scene, camera, light) = spot_scene();
    scene.cameras[camera].culling_mask = CullingMask::DEFAULT;
    let mut renderable = unit_box(Vec3::new(0.0, 0.0, -10.0));
    renderable.layers = CullingMask::from_layer(3);
    let key = scene.add_renderable(renderable);

    let lists = run(&scene, ShadowSettings::default());
    assert!(!lists.camera(camera).is_some_and(|q| q.contains(key)));
    assert!(!in_shadow_queue(&lists, light, key));
}

#[test]
fn light_outside_every_camera_gets_no_views() {
    let (mut scene, _, light) = spot_scene();
    scene.lights[light].set_position(Vec3::new(0.0, 0.0, -1000.0));
    scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -1010.0)));

    let lists = run(&scene, ShadowSettings::default());
    assert!(lists.shadow_views(light).is_none());
}

#[test]
fn disabled_shadows_produce_no_views() {
    let (mut scene, _, light) = spot_scene();
    scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));

    let settings = ShadowSettings {
        enabled: false,
        ..Default::default()
    };
    let lists = run(&scene, settings);
    assert!(lists.shadow_views(light).is_none());
}

// ============================================================================
// Point Light Scenarios
// ============================================================================

#[test]
fn point_light_caster_lands_in_a_sub_view() {
    init_logger();
    let mut scene = Scene::new();
    scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));
    let light = scene.add_light(Light::new_point(Vec3::ONE, 1.0, 30.0));
    let key = scene.add_renderable(unit_box(Vec3::new(0.0, -3.0, 0.0)));

    let lists = run(&scene, ShadowSettings::default());
    let views = lists.shadow_views(light).expect("point light views");
    assert_eq!(views.len(), 4);

    let hits = (0..4)
        .filter(|&i| lists.shadow_queue(light, i).contains(&key))
        .count();
    assert!(hits >= 1, "Caster below the light should be in at least one view");
}

// ============================================================================
// Directional Light Scenarios
// ============================================================================

fn directional_scene() -> (Scene, LightKey) {
    init_logger();
    let mut scene = Scene::new();
    scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));
    let mut light = Light::new_directional(Vec3::ONE, 1.0);
    light.set_direction(Vec3::new(0.3, -1.0, -0.2));
    let light = scene.add_light(light);
    (scene, light)
}

#[test]
fn near_caster_is_in_first_cascade() {
    let (mut scene, light) = directional_scene();
    let key = scene.add_renderable(unit_box(Vec3::ZERO));

    let lists = run(&scene, ShadowSettings::default());
    let views = lists.shadow_views(light).expect("directional views");
    assert_eq!(views.len(), 4);
    assert!(lists.shadow_queue(light, 0).contains(&key));
}

#[test]
fn casters_beyond_shadow_distance_are_skipped() {
    let (mut scene, light) = directional_scene();
    let far = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -300.0)));
    let unbounded = scene.add_renderable(Renderable::new(BoundingBox::INFINITE));

    let lists = run(&scene, ShadowSettings::default());
    for cascade in 0..4 {
        let queue = lists.shadow_queue(light, cascade);
        assert!(!queue.contains(&far), "Cascade {cascade} contains a distant caster");
        assert!(!queue.contains(&unbounded), "Cascade {cascade} contains an infinite caster");
    }
}

// ============================================================================
// Camera Queues
// ============================================================================

#[test]
fn camera_queues_are_sorted() {
    init_logger();
    let mut scene = Scene::new();
    let camera = scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));

    let near = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, 0.0)));
    let far = scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -20.0)));
    let mut glass_near = unit_box(Vec3::new(1.0, 0.0, 5.0));
    glass_near.transparent = true;
    let glass_near = scene.add_renderable(glass_near);
    let mut glass_far = unit_box(Vec3::new(1.0, 0.0, -30.0));
    glass_far.transparent = true;
    let glass_far = scene.add_renderable(glass_far);
    let mut hidden = unit_box(Vec3::new(0.0, 0.0, -5.0));
    hidden.skip_rendering = true;
    let hidden = scene.add_renderable(hidden);

    let lists = run(&scene, ShadowSettings::default());
    let queues = lists.camera(camera).expect("camera queues");

    let opaque: Vec<_> = queues.opaque.iter().map(|item| item.renderable).collect();
    let transparent: Vec<_> = queues.transparent.iter().map(|item| item.renderable).collect();
    assert_eq!(opaque, vec![near, far], "Opaque front-to-back");
    assert_eq!(transparent, vec![glass_far, glass_near], "Transparent back-to-front");
    assert!(!queues.contains(hidden));
}

#[test]
fn always_visible_bypasses_frustum_but_not_mask() {
    init_logger();
    let mut scene = Scene::new();
    let camera = scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));

    let mut behind = unit_box(Vec3::new(0.0, 0.0, 50.0));
    behind.always_visible = true;
    let behind = scene.add_renderable(behind);

    let mut masked = unit_box(Vec3::new(0.0, 0.0, 50.0));
    masked.always_visible = true;
    masked.layers = CullingMask::empty();
    let masked = scene.add_renderable(masked);

    let lists = run(&scene, ShadowSettings::default());
    let queues = lists.camera(camera).expect("camera queues");
    assert!(queues.contains(behind));
    assert!(!queues.contains(masked));
}

#[test]
fn editor_mode_only_culls_main_camera() {
    init_logger();
    let mut scene = Scene::new();
    let main = scene.add_camera(camera_at(Vec3::new(0.0, 0.0, 10.0)));
    let other = scene.add_camera(camera_at(Vec3::new(100.0, 0.0, 10.0)));
    scene.add_renderable(unit_box(Vec3::ZERO));

    let lists = run(&scene, ShadowSettings::default());
    assert!(lists.camera(main).is_some());
    assert!(lists.camera(other).is_some());

    let editor = ShadowSettings {
        runtime_mode: false,
        ..Default::default()
    };
    let lists = run(&scene, editor);
    assert!(lists.camera(main).is_some());
    assert!(lists.camera(other).is_none(), "Editor mode ignores secondary cameras");
}

#[test]
fn reused_lists_drop_stale_entries() {
    let (mut scene, _, light) = spot_scene();
    scene.add_renderable(unit_box(Vec3::new(0.0, 0.0, -10.0)));
    let mut pass = SceneCullPass::new(ShadowSettings::default()).expect("valid settings");
    let mut lists = RenderLists::new();

    pass.execute(&scene, &mut lists);
    assert!(!lists.shadow_queue(light, 0).is_empty());

    scene.remove_light(light);
    pass.execute(&scene, &mut lists);
    assert!(lists.shadow_views.is_empty());
    assert!(lists.shadow_queues.is_empty());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn invalid_settings_are_rejected_up_front() {
    let settings = ShadowSettings {
        cascade_count: 5,
        ..Default::default()
    };
    assert!(matches!(
        SceneCullPass::new(settings).err(),
        Some(MythError::InvalidCascadeCount { count: 5, max: 4 })
    ));

    let mut pass = SceneCullPass::new(ShadowSettings::default()).expect("valid settings");
    let bad = ShadowSettings {
        point_map_size: 0,
        ..Default::default()
    };
    assert!(pass.set_settings(bad).is_err());
    assert_eq!(pass.settings().point_map_size, 2048, "Rejected settings are not applied");
}

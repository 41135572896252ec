// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod common;

use approx::assert_relative_eq;
use common::{pixel_texture, quad_mesh, textured_model, Call, DeviceLog, RecordingDevice};
use glam::{Mat4, Vec2, Vec3, Vec4};
use mos_core::gfx::{FogLinear, Light, Model, Particle, Particles, RenderBox, RenderTarget};
use mos_core::renderer::api::{PrimitiveTopology, ShaderStage, UniformValue};
use mos_core::renderer::{RenderSettings, ResourceError};
use mos_render::{Drawable, RenderContext, RenderError, Renderer};
use std::cell::RefCell;
use std::rc::Rc;

fn setup() -> (Renderer<RecordingDevice>, Rc<RefCell<DeviceLog>>) {
    let (device, log) = RecordingDevice::new();
    let renderer =
        Renderer::new(device, RenderSettings::default()).expect("renderer should initialize");
    (renderer, log)
}

fn context() -> RenderContext<'static> {
    RenderContext::new(Mat4::IDENTITY, Mat4::IDENTITY)
}

fn buffers_created(log: &Rc<RefCell<DeviceLog>>) -> usize {
    log.borrow().count(|c| matches!(c, Call::CreateBuffer(_)))
}

fn textures_created(log: &Rc<RefCell<DeviceLog>>) -> usize {
    log.borrow().count(|c| matches!(c, Call::CreateTexture(_)))
}

fn mat4(value: UniformValue) -> Mat4 {
    match value {
        UniformValue::Mat4(matrix) => matrix,
        other => panic!("expected a mat4 uniform, got {other:?}"),
    }
}

#[test]
fn test_initialization_links_builtin_programs() {
    let (renderer, log) = setup();

    assert_eq!(renderer.programs().len(), 4);
    let log = log.borrow();
    assert_eq!(log.live_of("program"), 4);
    assert_eq!(log.live_of("shader"), 0, "stage objects are released after linking");
    assert_eq!(log.live_of("buffer"), 2, "box corners and edges");
    assert_eq!(log.calls.first(), Some(&Call::DepthTest(true)));
}

#[test]
fn test_repeated_update_uploads_mesh_once() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let model = textured_model(quad_mesh(), Some(pixel_texture()));
    let buffers_before = buffers_created(&log);

    // --- 2. ACT ---
    for _ in 0..3 {
        renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();
    }

    // --- 3. ASSERT ---
    assert_eq!(buffers_created(&log) - buffers_before, 2, "one vertex and one index buffer");
    assert_eq!(textures_created(&log), 1);
    let draws = log.borrow().draws();
    assert_eq!(draws.len(), 3);
    assert!(draws.iter().all(|&vao| vao == draws[0]));
    assert!(log
        .borrow()
        .calls
        .contains(&Call::DrawElements(draws[0], PrimitiveTopology::TriangleList, 6)));
}

#[test]
fn test_shared_mesh_and_texture_upload_once() {
    let (mut renderer, log) = setup();
    let mesh = quad_mesh();
    let texture = pixel_texture();
    let models: Vec<Model> = (0..5)
        .map(|_| textured_model(mesh.clone(), Some(texture.clone())))
        .collect();
    let buffers_before = buffers_created(&log);

    renderer.update_all(&models, Mat4::IDENTITY, &context()).unwrap();

    assert_eq!(buffers_created(&log) - buffers_before, 2);
    assert_eq!(textures_created(&log), 1);
    assert_eq!(renderer.resources().vertex_arrays().len(), 1);
    assert_eq!(log.borrow().draws().len(), 5);
}

#[test]
fn test_batch_update_draws_in_insertion_order() {
    let (mut renderer, log) = setup();
    let models: Vec<Model> = (0..4).map(|_| textured_model(quad_mesh(), None)).collect();

    renderer.load_all(&models).unwrap();
    let uploaded = log.borrow().created_vertex_arrays();
    renderer.update_all(models.iter().rev(), Mat4::IDENTITY, &context()).unwrap();

    let mut expected: Vec<_> = uploaded[1..].to_vec();
    expected.reverse();
    assert_eq!(log.borrow().draws(), expected);
}

#[test]
fn test_children_are_drawn_depth_first_with_composed_transforms() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let offset = |x: f32| Mat4::from_translation(Vec3::new(x, 0.0, 0.0));
    let mut root = textured_model(quad_mesh(), None);
    root.transform = offset(1.0);
    let mut first = textured_model(quad_mesh(), None);
    first.transform = offset(10.0);
    let mut grandchild = textured_model(quad_mesh(), None);
    grandchild.transform = offset(100.0);
    let second = textured_model(quad_mesh(), None);
    let root = root.with_child(first.with_child(grandchild)).with_child(second);

    // --- 2. ACT ---
    renderer.load(&root).unwrap();
    let uploaded = log.borrow().created_vertex_arrays();
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
    renderer
        .update(&root, Mat4::IDENTITY, &RenderContext::new(view, Mat4::IDENTITY))
        .unwrap();

    // --- 3. ASSERT ---
    // Vertex arrays were created in traversal order during `load`.
    assert_eq!(log.borrow().draws(), uploaded[1..].to_vec());
    let model_views = log.borrow().uniform_values("model_view");
    assert_relative_eq!(mat4(model_views[2]), view * offset(111.0), epsilon = 1e-5);
    assert_relative_eq!(mat4(model_views[3]), view * offset(1.0), epsilon = 1e-5);
}

#[test]
fn test_model_without_mesh_only_draws_children() {
    let (mut renderer, log) = setup();
    let group = Model::default()
        .with_child(textured_model(quad_mesh(), None))
        .with_child(textured_model(quad_mesh(), None));

    renderer.update(&group, Mat4::IDENTITY, &context()).unwrap();

    assert_eq!(log.borrow().draws().len(), 2);
}

#[test]
fn test_unload_empties_tables_and_reload_gets_fresh_handles() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let models: Vec<Model> = (0..3)
        .map(|_| textured_model(quad_mesh(), Some(pixel_texture())))
        .collect();
    let live_before = log.borrow().live.len();

    // --- 2. ACT ---
    renderer.load_all(&models).unwrap();
    let first_upload = renderer
        .resources()
        .vertex_arrays()
        .get(models[0].mesh.as_ref().unwrap().id());
    assert_eq!(renderer.resources().textures().len(), 3);
    renderer.unload_all(&models);

    // --- 3. ASSERT ---
    assert!(renderer.resources().is_empty());
    assert_eq!(log.borrow().live.len(), live_before, "nothing leaked on the device");

    renderer.load(&models[0]).unwrap();
    let second_upload = renderer
        .resources()
        .vertex_arrays()
        .get(models[0].mesh.as_ref().unwrap().id());
    assert!(first_upload.is_some());
    assert_ne!(first_upload, second_upload);
}

#[test]
fn test_texture_shared_by_two_meshes_survives_first_unload() {
    let (mut renderer, _log) = setup();
    let texture = pixel_texture();
    let a = textured_model(quad_mesh(), Some(texture.clone()));
    let b = textured_model(quad_mesh(), Some(texture.clone()));
    renderer.load_all([&a, &b]).unwrap();

    renderer.unload(&a);
    assert!(renderer.resources().textures().contains(texture.id()));

    renderer.unload(&b);
    assert!(!renderer.resources().textures().contains(texture.id()));
}

#[test]
fn test_models_sharing_mesh_and_texture_keep_them_until_last_unload() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let mesh = quad_mesh();
    let texture = pixel_texture();
    let a = textured_model(mesh.clone(), Some(texture.clone()));
    let b = textured_model(mesh.clone(), Some(texture.clone()));
    renderer.update_all([&a, &b], Mat4::IDENTITY, &context()).unwrap();
    let vertex_array = renderer.resources().vertex_arrays().get(mesh.id());

    // --- 2. ACT ---
    renderer.unload(&a);

    // --- 3. ASSERT ---
    assert!(renderer.resources().vertex_arrays().contains(mesh.id()));
    assert!(renderer.resources().textures().contains(texture.id()));
    renderer.update(&b, Mat4::IDENTITY, &context()).unwrap();
    assert_eq!(log.borrow().draws().last().copied(), vertex_array);

    renderer.unload(&b);
    assert!(renderer.resources().is_empty());
    assert_eq!(log.borrow().live_of("texture"), 0);
}

#[test]
fn test_cloned_model_is_a_separate_user() {
    let (mut renderer, _log) = setup();
    let a = textured_model(quad_mesh(), Some(pixel_texture()));
    let b = a.clone();
    renderer.load_all([&a, &b]).unwrap();

    renderer.unload(&b);
    assert!(!renderer.resources().is_empty());

    renderer.unload(&a);
    assert!(renderer.resources().is_empty());
}

#[test]
fn test_render_target_is_created_once() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let target = RenderTarget::new(128, 64);

    // --- 2. ACT ---
    renderer.render_target(&target).unwrap();
    renderer.render_target(&target).unwrap();

    // --- 3. ASSERT ---
    let log = log.borrow();
    assert_eq!(log.count(|c| matches!(c, Call::CreateFramebuffer(_))), 1);
    assert_eq!(log.count(|c| matches!(c, Call::BindFramebuffer(Some(_)))), 2);
    assert_eq!(log.count(|c| *c == Call::Viewport(128, 64)), 2);
    assert!(renderer.targets().contains(&target));
    assert!(renderer
        .resources()
        .textures()
        .contains(target.texture.id()));
}

#[test]
fn test_incomplete_framebuffer_leaks_nothing() {
    let (mut renderer, log) = setup();
    log.borrow_mut().incomplete_framebuffer = true;
    let target = RenderTarget::default();

    let result = renderer.render_target(&target);

    assert!(matches!(
        result,
        Err(RenderError::Resource(ResourceError::IncompleteFramebuffer { .. }))
    ));
    assert_eq!(log.borrow().live_of("texture"), 0);
    assert!(renderer.targets().is_empty());
    assert!(renderer.resources().textures().is_empty());
}

#[test]
fn test_drawing_into_target_then_sampling_it() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let target = RenderTarget::new(32, 32);
    let scene = textured_model(quad_mesh(), None);
    let mirror = textured_model(quad_mesh(), Some(target.texture.clone()));

    // --- 2. ACT ---
    renderer
        .update(&scene, Mat4::IDENTITY, &context().with_target(&target))
        .unwrap();
    renderer
        .update(&mirror, Mat4::IDENTITY, &context().with_resolution(Vec2::new(640.0, 480.0)))
        .unwrap();
    renderer.unload(&mirror);

    // --- 3. ASSERT ---
    let attachment = renderer.resources().textures().get(target.texture.id());
    assert!(attachment.is_some(), "attachments outlive the models sampling them");
    let log = log.borrow();
    assert_eq!(log.count(|c| matches!(c, Call::CreateTexture(_))), 1);
    assert!(log.calls.contains(&Call::BindTexture(0, attachment)));
    assert!(log.calls.contains(&Call::BindFramebuffer(None)));
    assert!(log.calls.contains(&Call::Viewport(640, 480)));
}

#[test]
fn test_former_attachment_is_released_after_its_last_user() {
    // --- 1. ARRANGE ---
    let (mut renderer, log) = setup();
    let target = RenderTarget::new(16, 16);
    let mirror = textured_model(quad_mesh(), Some(target.texture.clone()));
    renderer
        .update(&mirror, Mat4::IDENTITY, &context().with_target(&target))
        .unwrap();
    renderer.unload(&mirror);
    renderer.unload_target(&target);

    // --- 2. ACT ---
    let reader = textured_model(quad_mesh(), Some(target.texture.clone()));
    renderer.load(&reader).unwrap();
    renderer.unload(&reader);

    // --- 3. ASSERT ---
    assert!(!renderer.resources().textures().contains(target.texture.id()));
    assert_eq!(log.borrow().live_of("texture"), 0);
}

#[test]
fn test_zero_resolution_keeps_current_viewport() {
    let (mut renderer, log) = setup();
    let target = RenderTarget::new(64, 32);
    let model = textured_model(quad_mesh(), None);
    renderer
        .update(&model, Mat4::IDENTITY, &context().with_target(&target))
        .unwrap();
    let viewports_before = log.borrow().count(|c| matches!(c, Call::Viewport(..)));

    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();

    let log = log.borrow();
    assert!(log.calls.contains(&Call::Viewport(64, 32)));
    assert_eq!(
        log.count(|c| matches!(c, Call::Viewport(..))),
        viewports_before,
        "the default framebuffer reuses the last viewport"
    );
    let last_bind = log
        .calls
        .iter()
        .rev()
        .find(|c| matches!(c, Call::BindFramebuffer(_)));
    assert_eq!(last_bind, Some(&Call::BindFramebuffer(None)));
}

#[test]
fn test_unload_target_releases_framebuffer_and_attachment() {
    let (mut renderer, log) = setup();
    let target = RenderTarget::default();
    renderer.render_target(&target).unwrap();

    renderer.unload_target(&target);

    assert!(renderer.targets().is_empty());
    assert!(renderer.resources().textures().is_empty());
    assert_eq!(log.borrow().live_of("framebuffer"), 0);
    assert_eq!(log.borrow().live_of("texture"), 0);
}

#[test]
fn test_lightmap_toggle_gates_flag() {
    let (mut renderer, log) = setup();
    let mut model = textured_model(quad_mesh(), None);
    model.material.light_map = Some(pixel_texture());

    renderer.set_lightmaps(false);
    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();
    assert_eq!(log.borrow().last_uniform("has_lightmap"), Some(UniformValue::Bool(false)));

    renderer.set_lightmaps(true);
    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();
    assert_eq!(log.borrow().last_uniform("has_lightmap"), Some(UniformValue::Bool(true)));
}

#[test]
fn test_lightmaps_default_comes_from_settings() {
    let (device, _log) = RecordingDevice::new();
    let settings = RenderSettings {
        lightmaps: false,
        ..Default::default()
    };
    let renderer = Renderer::new(device, settings).unwrap();
    assert!(!renderer.lightmaps());
}

#[test]
fn test_model_uniforms() {
    let (mut renderer, log) = setup();
    let mut model = textured_model(quad_mesh(), Some(pixel_texture()));
    model.material.opacity = 0.5;
    model.receives_light = false;
    let view = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    let context = RenderContext::new(view, Mat4::IDENTITY)
        .with_light(Light::new(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE, Vec3::ONE));

    renderer.update(&model, Mat4::IDENTITY, &context).unwrap();

    let log = log.borrow();
    assert_eq!(log.last_uniform("opacity"), Some(UniformValue::Float(0.5)));
    assert_eq!(log.last_uniform("has_texture"), Some(UniformValue::Bool(true)));
    assert_eq!(log.last_uniform("has_normalmap"), Some(UniformValue::Bool(false)));
    assert_eq!(log.last_uniform("receives_light"), Some(UniformValue::Bool(false)));
    assert_eq!(log.last_uniform("texture_sampler"), Some(UniformValue::Int(0)));
    assert_eq!(
        log.last_uniform("light_position"),
        Some(UniformValue::Vec3(Vec3::new(0.0, 2.0, 0.0))),
        "light position is sent in view space"
    );
}

#[test]
fn test_second_diffuse_map_uses_its_own_unit() {
    let (mut renderer, log) = setup();
    let mut model = textured_model(quad_mesh(), Some(pixel_texture()));
    model.material.diffuse_map_2 = Some(pixel_texture());

    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();

    let second = renderer
        .resources()
        .textures()
        .get(model.material.diffuse_map_2.as_ref().unwrap().id());
    let log = log.borrow();
    assert_eq!(log.last_uniform("has_texture2"), Some(UniformValue::Bool(true)));
    assert_eq!(log.last_uniform("texture2_sampler"), Some(UniformValue::Int(3)));
    assert!(log.calls.contains(&Call::BindTexture(3, second)));
    assert_eq!(renderer.resources().textures().len(), 2);
}

#[test]
fn test_fog_parameters_follow_context() {
    let (mut renderer, log) = setup();
    let model = textured_model(quad_mesh(), None);

    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();
    assert_eq!(log.borrow().last_uniform("has_fog"), Some(UniformValue::Bool(false)));
    assert_eq!(log.borrow().last_uniform("fog_far"), None);

    let fog = FogLinear::new(Vec3::new(0.5, 0.6, 0.7), 2.0, 40.0);
    renderer
        .update(&model, Mat4::IDENTITY, &context().with_fog(fog))
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.last_uniform("has_fog"), Some(UniformValue::Bool(true)));
    assert_eq!(log.last_uniform("fog_color"), Some(UniformValue::Vec3(fog.color)));
    assert_eq!(log.last_uniform("fog_near"), Some(UniformValue::Float(2.0)));
    assert_eq!(log.last_uniform("fog_far"), Some(UniformValue::Float(40.0)));
    assert_eq!(
        log.last_uniform("fog_exponential_power"),
        Some(UniformValue::Float(fog.exponential_power))
    );
}

#[test]
fn test_particles_are_rewritten_not_recreated() {
    let (mut renderer, log) = setup();
    let mut particles = Particles::new(vec![
        Particle::new(Vec3::ZERO, Vec4::ONE, 1.0),
        Particle::new(Vec3::X, Vec4::ONE, 1.0),
    ]);
    let buffers_before = buffers_created(&log);

    renderer.update(&particles, Mat4::IDENTITY, &context()).unwrap();
    particles.particles.push(Particle::new(Vec3::Y, Vec4::ONE, 1.0));
    renderer.update(&particles, Mat4::IDENTITY, &context()).unwrap();

    let log_ref = log.borrow();
    assert_eq!(buffers_created(&log) - buffers_before, 1);
    assert_eq!(log_ref.count(|c| matches!(c, Call::UpdateBuffer(_))), 1);
    let vao = *log_ref.draws().last().unwrap();
    assert!(log_ref
        .calls
        .contains(&Call::DrawArrays(vao, PrimitiveTopology::PointList, 3)));
    assert!(log_ref.last_uniform("has_texture").is_none(), "particles only get mvp and mv");
    drop(log_ref);

    renderer.unload(&particles);
    assert!(renderer.resources().is_empty());
}

#[test]
fn test_box_uses_shared_line_geometry() {
    let (mut renderer, log) = setup();
    let box_vao = log.borrow().created_vertex_arrays()[0];
    let boxes = [
        RenderBox::new(Vec3::ZERO, Vec3::ONE),
        RenderBox::new(Vec3::X, Vec3::splat(2.0)),
    ];

    renderer
        .update_all(boxes.iter().map(Drawable::from), Mat4::IDENTITY, &context())
        .unwrap();

    let log = log.borrow();
    assert_eq!(
        log.count(|c| *c == Call::DrawElements(box_vao, PrimitiveTopology::LineList, 24)),
        2
    );
    assert_eq!(log.created_vertex_arrays().len(), 1);
    assert_eq!(
        log.last_uniform("model_view_projection"),
        Some(UniformValue::Mat4(boxes[1].transform))
    );
}

#[test]
fn test_mixed_drawables_keep_order() {
    let (mut renderer, log) = setup();
    let box_vao = log.borrow().created_vertex_arrays()[0];
    let model = textured_model(quad_mesh(), None);
    let render_box = RenderBox::new(Vec3::ZERO, Vec3::ONE);
    let particles = Particles::new(vec![Particle::default()]);

    renderer
        .update_all(
            [
                Drawable::from(&render_box),
                Drawable::from(&model),
                Drawable::from(&particles),
            ],
            Mat4::IDENTITY,
            &context(),
        )
        .unwrap();

    let draws = log.borrow().draws();
    assert_eq!(draws.len(), 3);
    assert_eq!(draws[0], box_vao);
    assert_ne!(draws[1], draws[2]);
}

#[test]
fn test_shader_compile_failure_reports_log() {
    let (device, log) = RecordingDevice::new();
    log.borrow_mut().fail_compile = Some(ShaderStage::Fragment);

    let err = Renderer::new(device, RenderSettings::default()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("fragment shader 'standard' failed to compile"));
    assert!(message.contains("unexpected token"));
    assert!(log.borrow().live.is_empty(), "partial initialization is rolled back");
}

#[test]
fn test_link_failure_reports_log() {
    let (device, log) = RecordingDevice::new();
    log.borrow_mut().fail_link = true;

    let err = Renderer::new(device, RenderSettings::default()).unwrap_err();

    assert!(err.to_string().contains("varying mismatch"));
    assert!(log.borrow().live.is_empty());
}

#[test]
fn test_clear_buffers_keeps_programs() {
    let (mut renderer, log) = setup();
    let target = RenderTarget::default();
    let model = textured_model(quad_mesh(), Some(pixel_texture()));
    renderer
        .update(&model, Mat4::IDENTITY, &context().with_target(&target))
        .unwrap();

    renderer.clear_buffers();

    assert!(renderer.resources().is_empty());
    assert!(renderer.targets().is_empty());
    assert_eq!(log.borrow().live_of("program"), 4);
    renderer.update(&model, Mat4::IDENTITY, &context()).unwrap();
}

#[test]
fn test_drop_releases_everything() {
    let (mut renderer, log) = setup();
    let target = RenderTarget::default();
    let model = textured_model(quad_mesh(), Some(pixel_texture()));
    renderer
        .update(&model, Mat4::IDENTITY, &context().with_target(&target))
        .unwrap();

    drop(renderer);

    assert!(log.borrow().live.is_empty());
}

#[test]
fn test_clear_uses_color() {
    let (mut renderer, log) = setup();
    renderer.clear(Vec3::new(0.1, 0.2, 0.3));
    renderer.clear_default();

    let log = log.borrow();
    assert!(log
        .calls
        .contains(&Call::Clear(Some(Vec4::new(0.1, 0.2, 0.3, 1.0)), true)));
    assert!(log.calls.contains(&Call::Clear(Some(Vec4::new(0.0, 0.0, 0.0, 1.0)), true)));
}

#[test]
fn test_unload_texture_skips_render_target_attachment() {
    let (mut renderer, _log) = setup();
    let target = RenderTarget::default();
    renderer.render_target(&target).unwrap();

    renderer.unload_texture(&target.texture);
    assert!(renderer
        .resources()
        .textures()
        .contains(target.texture.id()));

    let texture = pixel_texture();
    renderer.load_texture(&texture).unwrap();
    renderer.unload_texture(&texture);
    assert!(!renderer.resources().textures().contains(texture.id()));
}

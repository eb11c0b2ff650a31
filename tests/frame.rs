use framework_dx11::glam::Vec3;
use framework_dx11::renderer::frame::{FramePacket, Pass};
use framework_dx11::resources::{Catalog, Handle, OFFSCREEN_TEXTURE};
use framework_dx11::scene::{LightType, Scene, MAX_LIGHTS};

fn catalog() -> Catalog {
    Catalog {
        shaders: vec![
            "Solid Pixel Shader".into(),
            "Texture Pixel Shader".into(),
            "Texture UnLit Pixel Shader".into(),
        ],
        textures: vec![
            "stone.dds".into(),
            "tex2.dds".into(),
            "conenormal.dds".into(),
            OFFSCREEN_TEXTURE.into(),
        ],
        meshes: vec!["Cube".into()],
    }
}

#[test]
fn starting_scene_resolves_resources_by_name() {
    let scene = Scene::new(catalog(), (1280, 720));
    let catalog = scene.catalog();

    let [cube1, cube2] = scene.objects() else { panic!("expected two cubes") };
    assert_eq!(catalog.shader_name(cube1.pixel_shader), Some("Solid Pixel Shader"));
    assert_eq!(catalog.shader_name(cube2.pixel_shader), Some("Texture Pixel Shader"));
    assert_eq!(cube1.texture().and_then(|t| catalog.texture_name(t)), Some("tex2.dds"));
    assert_eq!(cube1.normal_map(), None);
    assert_eq!(cube2.texture().and_then(|t| catalog.texture_name(t)), Some("stone.dds"));
    assert_eq!(cube2.normal_map().and_then(|t| catalog.texture_name(t)), Some("conenormal.dds"));
    assert_eq!(catalog.mesh_name(cube1.mesh), Some("Cube"));
}

#[test]
fn missing_textures_fall_back_to_the_first_one() {
    let mut catalog = catalog();
    catalog.textures = vec!["brick.png".into()];
    let scene = Scene::new(catalog, (800, 600));

    for obj in scene.objects() {
        assert_eq!(obj.texture().map(|t| t.index()), Some(0));
    }
}

#[test]
fn offscreen_target_is_not_a_fallback_texture() {
    let mut catalog = catalog();
    catalog.textures = vec![OFFSCREEN_TEXTURE.into()];
    let scene = Scene::new(catalog, (800, 600));

    for obj in scene.objects() {
        assert_eq!(obj.texture(), None);
        assert_eq!(obj.normal_map(), None);
        assert!(!obj.material.uses_texture());
    }

    let packet = FramePacket::build(&scene);
    assert!(packet.draws.iter().all(|d| d.texture.is_none() && !d.material.material.uses_texture()));
}

#[test]
fn selecting_the_offscreen_target_draws_untextured() {
    let mut scene = Scene::new(catalog(), (1280, 720));
    let offscreen = scene.catalog().textures.iter().position(|n| n == OFFSCREEN_TEXTURE).unwrap();
    let cube = scene.object_mut(1).unwrap();
    cube.set_texture(Some(Handle::new(offscreen)));
    cube.set_normal_map(Some(Handle::new(offscreen)));
    assert!(cube.material.uses_texture());

    let packet = FramePacket::build(&scene);
    let draw = &packet.draws[1];
    assert_eq!(draw.texture, None);
    assert_eq!(draw.normal_map, None);
    assert!(!draw.material.material.uses_texture());
    assert!(!draw.material.material.uses_normal_map());

    // The other cube keeps its texture.
    assert!(packet.draws[0].texture.is_some());
    assert!(packet.draws[0].material.material.uses_texture());
}

#[test]
fn packet_follows_scene_order_and_camera() {
    let mut scene = Scene::new(catalog(), (1280, 720));
    scene.update(1.0);

    let packet = FramePacket::build(&scene);
    assert_eq!(packet.draws.len(), 2);
    for (i, draw) in packet.draws.iter().enumerate() {
        assert_eq!(draw.object, i);
        assert_eq!(draw.constants.view, scene.camera().view());
        assert_eq!(draw.constants.projection, scene.camera().projection());
        assert_eq!(draw.constants.world, scene.objects()[i].world());
    }

    assert_eq!(packet.lights.light_count, MAX_LIGHTS as i32);
    assert_eq!(packet.lights.eye_position.truncate(), scene.camera().position());
}

#[test]
fn auto_rotation_advances_with_time() {
    let mut scene = Scene::new(catalog(), (1280, 720));
    scene.update(0.5);
    scene.update(0.5);

    let spinning = &scene.objects()[1];
    assert!((spinning.transform.rotation.y - 50.0).abs() < 1e-4);
    assert_eq!(scene.objects()[0].transform.rotation, Vec3::ZERO);
}

#[test]
fn light_edits_reach_the_next_packet() {
    let mut scene = Scene::new(catalog(), (1280, 720));
    let mut light = *scene.lights().light(0).expect("light 0");
    light.set_kind(LightType::Spot);
    light.set_enabled(false);
    scene.lights_mut().update_light(0, light).expect("slot 0 exists");
    assert!(scene.lights_mut().update_light(MAX_LIGHTS, light).is_err());

    let packet = FramePacket::build(&scene);
    assert_eq!(packet.lights.lights[0].kind(), Some(LightType::Spot));
    assert!(!packet.lights.lights[0].is_enabled());
}

#[test]
fn spline_playback_moves_the_camera() {
    let mut scene = Scene::new(catalog(), (1280, 720));
    scene.spline.add_point(Vec3::new(0.0, 0.0, -5.0));
    scene.spline.add_point(Vec3::new(5.0, 0.0, -5.0));
    scene.spline.add_point(Vec3::new(5.0, 5.0, -5.0));
    scene.set_spline_playing(true);
    assert!(scene.spline_playing());

    let before = scene.camera().position();
    scene.update(0.1);
    assert_ne!(scene.camera().position(), before);
}

#[test]
fn passes_run_in_a_fixed_order() {
    assert_eq!(Pass::SEQUENCE, [Pass::Scene, Pass::Composite, Pass::Overlay, Pass::Present]);
}

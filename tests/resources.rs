use std::fs;
use std::path::PathBuf;

use framework_dx11::mesh::obj;
use framework_dx11::resources::{self, MESH_EXTENSIONS, TEXTURE_EXTENSIONS};
use framework_dx11::Error;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("framework-dx11-it-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const PYRAMID: &str = "\
v 0 1 0
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vt 0.5 1
vt 0 0
vt 1 0
f 1/1 2/2 3/3
f 1/1 3/2 4/3
f 1/1 4/2 5/3
f 1/1 5/2 2/3
f 2 5 4 3
";

#[test]
fn loads_meshes_found_in_a_resources_folder() {
    let dir = scratch_dir("meshes");
    fs::write(dir.join("pyramid.OBJ"), PYRAMID).unwrap();
    fs::write(dir.join("notes.txt"), "not a mesh").unwrap();

    let found = resources::scan_dir(&dir, &MESH_EXTENSIONS).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(resources::resource_name(&found[0]), "pyramid.OBJ");

    let mesh = obj::load(&found[0]).unwrap();
    // Four triangles plus a fan-triangulated quad base.
    assert_eq!(mesh.index_count(), 18);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    for v in &mesh.vertices {
        assert!((v.normal.length() - 1.0).abs() < 1e-4);
        assert!(v.tangent.is_finite());
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn malformed_obj_reports_the_line() {
    let dir = scratch_dir("broken");
    let path = dir.join("broken.obj");
    fs::write(&path, "v 0 0 0\nv 1 0 0\nf 1 2 7\n").unwrap();

    match obj::load(&path) {
        Err(Error::Obj { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected an OBJ error, got {other:?}"),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_folder_has_no_textures() {
    let dir = std::env::temp_dir().join("framework-dx11-it-does-not-exist");
    assert!(resources::scan_dir(&dir, &TEXTURE_EXTENSIONS).unwrap().is_empty());
}

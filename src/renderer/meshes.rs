use std::path::Path;

use tracing::{debug, warn};
use windows::Win32::Graphics::Direct3D11::ID3D11Device;

use super::buffers::GpuMesh;
use crate::mesh::{obj, MeshData};
use crate::resources::{self, MeshKind, Registry, MESH_EXTENSIONS};
use crate::scene::CUBE_MESH;
use crate::Result;

pub(crate) type MeshRegistry = Registry<MeshKind, GpuMesh>;

/// Upload the built-in cube and every OBJ file in `dir`. Files that fail
/// to load are logged and skipped.
pub(crate) fn load_dir(device: &ID3D11Device, dir: &Path) -> Result<MeshRegistry> {
    let mut meshes = Registry::new();
    meshes.insert(CUBE_MESH, GpuMesh::new(device, &MeshData::cube())?);

    for path in resources::scan_dir(dir, &MESH_EXTENSIONS)? {
        let uploaded = obj::load(&path)
            .and_then(|mesh| GpuMesh::new(device, &mesh).map_err(Into::into));
        match uploaded {
            Ok(mesh) => {
                debug!("Uploaded mesh {} ({} indices)", path.display(), mesh.index_count);
                meshes.insert(resources::resource_name(&path), mesh);
            },
            Err(e) => warn!("Skipping mesh {}: {e}", path.display()),
        }
    }

    Ok(meshes)
}

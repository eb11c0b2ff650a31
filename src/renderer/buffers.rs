use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem;

use bytemuck::Pod;
use windows::core::Result;
use windows::Win32::Graphics::Direct3D11::*;

use crate::mesh::MeshData;
use crate::util;

/// A constant buffer holding one `T`, updated with `UpdateSubresource`.
pub(crate) struct ConstantBuffer<T: Pod> {
    pub(crate) resource: ID3D11Buffer,
    _data: PhantomData<T>,
}

impl<T: Pod> ConstantBuffer<T> {
    pub(crate) fn new(device: &ID3D11Device) -> Result<Self> {
        let resource = util::try_out_ptr(|v| unsafe {
            device.CreateBuffer(
                &D3D11_BUFFER_DESC {
                    ByteWidth: mem::size_of::<T>() as u32,
                    Usage: D3D11_USAGE_DEFAULT,
                    BindFlags: D3D11_BIND_CONSTANT_BUFFER.0 as u32,
                    CPUAccessFlags: 0,
                    MiscFlags: 0,
                    StructureByteStride: 0,
                },
                None,
                Some(v),
            )
        })?;

        Ok(Self { resource, _data: PhantomData })
    }

    pub(crate) fn update(&self, device_context: &ID3D11DeviceContext, value: &T) {
        unsafe {
            device_context.UpdateSubresource(
                &self.resource,
                0,
                None,
                bytemuck::bytes_of(value).as_ptr() as *const c_void,
                0,
                0,
            );
        }
    }

    pub(crate) fn slot(&self) -> [Option<ID3D11Buffer>; 1] {
        [Some(self.resource.clone())]
    }
}

/// Create an immutable buffer initialized with `data`.
pub(crate) fn immutable_buffer<T: Pod>(
    device: &ID3D11Device,
    data: &[T],
    bind_flag: D3D11_BIND_FLAG,
) -> Result<ID3D11Buffer> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    util::try_out_ptr(|v| unsafe {
        device.CreateBuffer(
            &D3D11_BUFFER_DESC {
                ByteWidth: bytes.len() as u32,
                Usage: D3D11_USAGE_IMMUTABLE,
                BindFlags: bind_flag.0 as u32,
                CPUAccessFlags: 0,
                MiscFlags: 0,
                StructureByteStride: 0,
            },
            Some(&D3D11_SUBRESOURCE_DATA {
                pSysMem: bytes.as_ptr() as *const c_void,
                SysMemPitch: 0,
                SysMemSlicePitch: 0,
            }),
            Some(v),
        )
    })
}

/// A mesh uploaded to the GPU.
pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: ID3D11Buffer,
    pub(crate) index_buffer: ID3D11Buffer,
    pub(crate) index_count: u32,
}

impl GpuMesh {
    pub(crate) fn new(device: &ID3D11Device, mesh: &MeshData) -> Result<Self> {
        Ok(Self {
            vertex_buffer: immutable_buffer(device, &mesh.vertices, D3D11_BIND_VERTEX_BUFFER)?,
            index_buffer: immutable_buffer(device, &mesh.indices, D3D11_BIND_INDEX_BUFFER)?,
            index_count: mesh.index_count(),
        })
    }
}

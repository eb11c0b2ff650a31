//! Helpers around the [`windows`] API.

use std::slice;

use tracing::error;
use windows::core::{Error, Result};
use windows::Win32::Foundation::{E_POINTER, HWND, RECT};
use windows::Win32::Graphics::Direct3D::ID3DBlob;
use windows::Win32::UI::WindowsAndMessaging::GetClientRect;

/// Helper for fallible [`windows`] APIs that have an optional pointer
/// out-param.
///
/// A call that reports success but leaves the out-param empty is turned into
/// an `E_POINTER` error.
///
/// # Example
///
/// ```ignore
/// let rtv: ID3D11RenderTargetView =
///     try_out_ptr(|v| unsafe { device.CreateRenderTargetView(&back_buffer, None, Some(v)) })?;
/// ```
pub fn try_out_ptr<T, F, O>(mut f: F) -> Result<T>
where
    F: FnMut(&mut Option<T>) -> Result<O>,
{
    let mut t: Option<T> = None;
    f(&mut t)?;
    t.ok_or_else(|| Error::from(E_POINTER))
}

/// Helper for fallible [`windows`] APIs that fill in a plain out-param.
pub fn try_out_param<T, F, E, O>(mut f: F) -> std::result::Result<T, E>
where
    T: Default,
    F: FnMut(&mut T) -> std::result::Result<O, E>,
{
    let mut t: T = Default::default();
    f(&mut t)?;
    Ok(t)
}

/// Like [`try_out_ptr`], for APIs that also hand back an error blob, such
/// as `D3DCompile`. On failure the blob is returned along with the error.
pub fn try_out_err_blob<T, F, O>(mut f: F) -> std::result::Result<T, (Error, Option<ID3DBlob>)>
where
    F: FnMut(&mut Option<T>, &mut Option<ID3DBlob>) -> Result<O>,
{
    let mut t: Option<T> = None;
    let mut err_blob: Option<ID3DBlob> = None;
    match f(&mut t, &mut err_blob) {
        Ok(_) => t.ok_or_else(|| (Error::from(E_POINTER), err_blob)),
        Err(e) => Err((e, err_blob)),
    }
}

/// Build a `map_err` adapter that logs the content of an error blob and
/// keeps the error.
///
/// # Example
///
/// ```ignore
/// let blob = try_out_err_blob(|v, err| unsafe { D3DCompile(/* ... */, v, Some(err)) })
///     .map_err(print_error_blob("Compiling vertex shader"))?;
/// ```
pub fn print_error_blob(msg: &str) -> impl Fn((Error, Option<ID3DBlob>)) -> Error + '_ {
    move |(e, err_blob)| {
        match err_blob {
            Some(blob) => {
                let text = unsafe {
                    let ptr = blob.GetBufferPointer() as *const u8;
                    let len = blob.GetBufferSize();
                    String::from_utf8_lossy(slice::from_raw_parts(ptr, len)).into_owned()
                };
                error!("{msg}: {e:?}\n{}", text.trim_end_matches('\0').trim_end());
            },
            None => error!("{msg}: {e:?}"),
        }
        e
    }
}

/// Bytes of a compiled blob.
///
/// # Safety
///
/// The slice borrows the blob's buffer and must not outlive `blob`.
pub unsafe fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize())
}

/// Width and height of the client area of `hwnd`.
pub fn win_size(hwnd: HWND) -> Result<(i32, i32)> {
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }?;
    Ok((rect.right - rect.left, rect.bottom - rect.top))
}

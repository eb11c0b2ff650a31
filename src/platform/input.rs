//! Translation of window messages into imgui and camera input.

use glam::Vec2;
use imgui::Io;
use tracing::warn;
use windows::Win32::Foundation::{HWND, LPARAM, POINT, WPARAM};
use windows::Win32::Graphics::Gdi::ClientToScreen;
use windows::Win32::UI::Input::KeyboardAndMouse::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::input::{KeyState, MouseLook};
use crate::util;

/// A message received by the window procedure, handled out of band by the
/// frame loop.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowMessage(pub(crate) HWND, pub(crate) u32, pub(crate) WPARAM, pub(crate) LPARAM);

/// Input state owned by the frame loop.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pub(crate) keys: KeyState,
    pub(crate) look: MouseLook,
}

// Replication of the Win32 LOWORD and HIWORD macros.
#[inline]
fn loword(l: u32) -> u16 {
    (l & 0xffff) as u16
}

#[inline]
fn hiword(l: u32) -> u16 {
    ((l >> 16) & 0xffff) as u16
}

/// Signed client coordinates packed in a mouse message's `LPARAM`.
fn cursor_position(lparam: isize) -> Vec2 {
    let x = loword(lparam as u32) as i16;
    let y = hiword(lparam as u32) as i16;
    Vec2::new(x as f32, y as f32)
}

fn map_vkey(wparam: u16, lparam: usize) -> VIRTUAL_KEY {
    match VIRTUAL_KEY(wparam) {
        VK_SHIFT => unsafe {
            match MapVirtualKeyA(((lparam & 0x00ff0000) >> 16) as u32, MAPVK_VSC_TO_VK_EX) {
                0 => VIRTUAL_KEY(wparam),
                i => VIRTUAL_KEY(i as _),
            }
        },
        VK_CONTROL => {
            if lparam & 0x01000000 != 0 {
                VK_RCONTROL
            } else {
                VK_LCONTROL
            }
        },
        VK_MENU => {
            if lparam & 0x01000000 != 0 {
                VK_RMENU
            } else {
                VK_LMENU
            }
        },
        _ => VIRTUAL_KEY(wparam),
    }
}

// Handle WM_(SYS)KEYDOWN/WM_(SYS)KEYUP events.
fn handle_key(io: &mut Io, keys: &mut KeyState, state: u32, wparam: usize, lparam: isize) {
    let pressed = (state == WM_KEYDOWN) || (state == WM_SYSKEYDOWN);
    let key_pressed = map_vkey(wparam as _, lparam as _);
    io.keys_down[key_pressed.0 as usize] = pressed;

    match key_pressed {
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => io.key_ctrl = pressed,
        VK_SHIFT | VK_LSHIFT | VK_RSHIFT => io.key_shift = pressed,
        VK_MENU | VK_LMENU | VK_RMENU => io.key_alt = pressed,
        VK_LWIN | VK_RWIN => io.key_super = pressed,
        _ => (),
    };

    // Camera keys are the unmapped virtual keys. Releases always go through
    // so that a key pressed before a text field took focus cannot stick.
    if !pressed {
        keys.release(wparam as u8);
    } else if !io.want_capture_keyboard {
        keys.press(wparam as u8);
    }
}

fn client_center(hwnd: HWND) -> Option<Vec2> {
    match util::win_size(hwnd) {
        Ok((width, height)) => Some(Vec2::new((width / 2) as f32, (height / 2) as f32)),
        Err(e) => {
            warn!("Could not read client size: {e:?}");
            None
        },
    }
}

fn recenter_cursor(hwnd: HWND) {
    let Some(center) = client_center(hwnd) else {
        return;
    };
    let mut point = POINT { x: center.x as i32, y: center.y as i32 };
    unsafe {
        if !ClientToScreen(hwnd, &mut point).as_bool() {
            warn!("ClientToScreen failed");
            return;
        }
        if let Err(e) = SetCursorPos(point.x, point.y) {
            warn!("Could not move cursor: {e:?}");
        }
    }
}

fn begin_mouse_look(hwnd: HWND, look: &mut MouseLook) {
    if look.is_active() {
        return;
    }
    look.begin();
    unsafe {
        ShowCursor(false);
        SetCapture(hwnd);
    }
    recenter_cursor(hwnd);
}

fn end_mouse_look(look: &mut MouseLook) {
    if !look.is_active() {
        return;
    }
    look.end();
    unsafe {
        ShowCursor(true);
        if let Err(e) = ReleaseCapture() {
            warn!("Could not release mouse capture: {e:?}");
        }
    }
}

/// Apply one window message to imgui and to the camera input state.
pub(crate) fn handle_message(io: &mut Io, input: &mut InputState, message: WindowMessage) {
    let WindowMessage(hwnd, umsg, WPARAM(wparam), LPARAM(lparam)) = message;

    match umsg {
        state @ (WM_KEYDOWN | WM_SYSKEYDOWN | WM_KEYUP | WM_SYSKEYUP) if wparam < 256 => {
            handle_key(io, &mut input.keys, state, wparam, lparam)
        },
        WM_LBUTTONDOWN | WM_LBUTTONDBLCLK => {
            io.mouse_down[0] = true;
        },
        WM_RBUTTONDOWN | WM_RBUTTONDBLCLK => {
            io.mouse_down[1] = true;
            if !io.want_capture_mouse {
                begin_mouse_look(hwnd, &mut input.look);
            }
        },
        WM_MBUTTONDOWN | WM_MBUTTONDBLCLK => {
            io.mouse_down[2] = true;
        },
        WM_XBUTTONDOWN | WM_XBUTTONDBLCLK => {
            let btn = if hiword(wparam as _) == XBUTTON1 { 3 } else { 4 };
            io.mouse_down[btn] = true;
        },
        WM_LBUTTONUP => {
            io.mouse_down[0] = false;
        },
        WM_RBUTTONUP => {
            io.mouse_down[1] = false;
            end_mouse_look(&mut input.look);
        },
        WM_MBUTTONUP => {
            io.mouse_down[2] = false;
        },
        WM_XBUTTONUP => {
            let btn = if hiword(wparam as _) == XBUTTON1 { 3 } else { 4 };
            io.mouse_down[btn] = false;
        },
        WM_MOUSEMOVE => {
            if input.look.is_active() {
                if let Some(center) = client_center(hwnd) {
                    if input.look.on_move(cursor_position(lparam), center) {
                        recenter_cursor(hwnd);
                    }
                }
            }
        },
        WM_MOUSEWHEEL => {
            // This `hiword` call is equivalent to GET_WHEEL_DELTA_WPARAM
            let wheel_delta_wparam = hiword(wparam as _);
            io.mouse_wheel += (wheel_delta_wparam as i16 as f32) / WHEEL_DELTA as f32;
        },
        WM_MOUSEHWHEEL => {
            let wheel_delta_wparam = hiword(wparam as _);
            io.mouse_wheel_h += (wheel_delta_wparam as i16 as f32) / WHEEL_DELTA as f32;
        },
        WM_CHAR => io.add_input_character(wparam as u8 as char),
        WM_ACTIVATE => {
            if loword(wparam as _) != 0 {
                recenter_cursor(hwnd);
            }
        },
        WM_KILLFOCUS => {
            input.keys.clear();
            io.keys_down.iter_mut().for_each(|down| *down = false);
            io.mouse_down = [false; 5];
            end_mouse_look(&mut input.look);
        },
        _ => {},
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position_is_signed() {
        let packed = ((-5i16 as u16 as u32) << 16 | 300) as isize;
        assert_eq!(cursor_position(packed), Vec2::new(300.0, -5.0));
    }
}

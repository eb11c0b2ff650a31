//! The Win32 window and the frame loop.
//!
//! The window procedure does no work of its own: it forwards every message
//! through a channel and lets `DefWindowProcA` handle it. The frame loop
//! drains the channel once per frame, before imgui starts a new frame, so
//! that all input is applied at a single point.

use std::ffi::CString;
use std::sync::mpsc::{self, Receiver, Sender};

use imgui::{Context, ConfigFlags};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, error, info};
use windows::core::{s, PCSTR};
use windows::Win32::Foundation::{BOOL, HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{ScreenToClient, HBRUSH};
use windows::Win32::System::LibraryLoader::GetModuleHandleA;
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::config::Config;
use crate::input::{CameraControls, ControlOutcome};
use crate::renderer::{Device, Renderer};
use crate::scene::Scene;
use crate::timing::FrameTimer;
use crate::ui::Inspector;
use crate::{util, Error, Result};

mod input;
mod keys;

use input::{InputState, WindowMessage};

const CLASS_NAME: PCSTR = s!("FrameworkDx11Window");

static MESSAGES: OnceCell<Mutex<Sender<WindowMessage>>> = OnceCell::new();

/// The application: one window, one scene, one renderer.
pub struct App {
    hwnd: HWND,
    imgui: Context,
    renderer: Renderer,
    scene: Scene,
    inspector: Inspector,
    timer: FrameTimer,
    input: InputState,
    rx: Receiver<WindowMessage>,
}

impl App {
    /// Open the window, create the device and load the resources.
    pub fn new(config: Config) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        if MESSAGES.set(Mutex::new(tx)).is_err() {
            return Err(Error::Config {
                key: "window",
                message: String::from("only one window per process is supported"),
            });
        }

        let hwnd = create_window(&config)?;

        let device = Device::new(hwnd, config.window_width, config.window_height, config.debug_device)?;

        let mut imgui = Context::create();
        imgui.io_mut().display_size = [config.window_width as f32, config.window_height as f32];
        imgui.io_mut().config_flags |= ConfigFlags::NAV_ENABLE_KEYBOARD;
        for (key, virtual_key) in keys::KEYS {
            imgui.io_mut()[key] = virtual_key.0 as u32;
        }

        let renderer = Renderer::new(device, &config, &mut imgui)?;

        let mut scene = Scene::new(renderer.catalog(), (config.window_width, config.window_height));
        let camera = scene.camera_mut();
        camera.move_speed = config.camera_move_speed;
        camera.rotate_speed = config.camera_rotate_speed;
        camera.sensitivity = config.mouse_sensitivity;

        unsafe { ShowWindow(hwnd, SW_SHOW) };
        info!("Window open ({}x{})", config.window_width, config.window_height);

        Ok(Self {
            hwnd,
            imgui,
            renderer,
            scene,
            inspector: Inspector::new(config.vsync),
            timer: FrameTimer::new(),
            input: InputState::default(),
            rx,
        })
    }

    /// Pump messages and render until the window closes.
    pub fn run(mut self) -> Result<()> {
        let mut msg = MSG::default();

        loop {
            unsafe {
                while PeekMessageA(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                    if msg.message == WM_QUIT {
                        info!("Quit requested");
                        return Ok(());
                    }
                    TranslateMessage(&msg);
                    DispatchMessageA(&msg);
                }
            }

            self.prepare_input();

            let stats = self.timer.tick();
            self.imgui.io_mut().delta_time = stats.delta.max(f32::MIN_POSITIVE);

            let camera = self.scene.camera_mut();
            if CameraControls.apply(&self.input.keys, camera, stats.delta) == ControlOutcome::Quit {
                debug!("Escape pressed, closing the window");
                unsafe { DestroyWindow(self.hwnd) }?;
                continue;
            }
            self.input.look.apply(camera);

            self.scene.update(stats.delta);

            self.renderer.render_frame(&mut self.scene, &mut self.imgui, &mut self.inspector, &stats)?;
        }
    }

    fn prepare_input(&mut self) {
        let io = self.imgui.io_mut();

        for message in self.rx.try_iter() {
            input::handle_message(io, &mut self.input, message);
        }

        unsafe {
            if GetForegroundWindow() == self.hwnd {
                if let Ok(mut pos) = util::try_out_param(|v| GetCursorPos(v)) {
                    if ScreenToClient(self.hwnd, &mut pos).as_bool() {
                        io.mouse_pos = [pos.x as f32, pos.y as f32];
                    }
                }
            }
        }
    }
}

fn create_window(config: &Config) -> Result<HWND> {
    let title = CString::new(config.title.as_str()).map_err(|e| Error::Config {
        key: "title",
        message: e.to_string(),
    })?;

    let hinstance = unsafe { GetModuleHandleA(None) }?;
    let wnd_class = WNDCLASSA {
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance.into(),
        lpszClassName: CLASS_NAME,
        cbClsExtra: 0,
        cbWndExtra: 0,
        hIcon: HICON(0),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW) }?,
        hbrBackground: HBRUSH(0),
        lpszMenuName: PCSTR::null(),
    };
    if unsafe { RegisterClassA(&wnd_class) } == 0 {
        return Err(windows::core::Error::from_win32().into());
    }

    // Fixed size: no resize border and no maximize box.
    let style = WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX;
    let mut rect = RECT {
        left: 0,
        top: 0,
        right: config.window_width as i32,
        bottom: config.window_height as i32,
    };
    unsafe { AdjustWindowRect(&mut rect, style, BOOL::from(false)) }?;

    let hwnd = unsafe {
        CreateWindowExA(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCSTR(title.as_ptr().cast()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            rect.right - rect.left,
            rect.bottom - rect.top,
            HWND(0),
            HMENU(0),
            hinstance,
            None,
        )
    };
    if hwnd.0 == 0 {
        return Err(windows::core::Error::from_win32().into());
    }

    Ok(hwnd)
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_DESTROY {
        PostQuitMessage(0);
        return LRESULT(0);
    }

    if let Some(tx) = MESSAGES.get() {
        if let Err(e) = tx.lock().send(WindowMessage(hwnd, msg, wparam, lparam)) {
            error!("Could not forward window message: {e:?}");
        }
    }

    DefWindowProcA(hwnd, msg, wparam, lparam)
}

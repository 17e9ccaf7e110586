/// ICED GUI Application Module
///
/// Two pages share one window:
/// - Setup: folder selection, interval presets, custom interval, start
/// - Sketch: the slideshow with countdown and navigation controls
///
/// The focus monitor runs on its own thread; its events are forwarded into
/// `update` by a subscription and applied by the window mirror.
mod title_bar;

use crate::config::AppConfig;
use crate::error::SketchError;
use crate::image_picker::{load_image, open_folder_picker, render, scan_folder};
use crate::interval::{format_countdown, Interval, Preset};
use crate::mirror::WindowMirror;
use crate::monitor::{self, FocusEvent, MonitorHandle};
use crate::platform::{self, WindowPlatform};
use crate::slideshow::{Direction, SlideshowController};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use iced::{
    event, executor,
    widget::{image::Handle, Button, Column, Container, Image, Row, Space, Text, TextInput},
    window, Alignment, Application, Command, ContentFit, Element, Event, Length, Settings,
    Subscription, Theme,
};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Window title, also used to locate the native window for mirroring
pub const WINDOW_TITLE: &str = "Sketch Practice";

/// Clock resolution for the countdown and the advance timer
const CLOCK_TICK: Duration = Duration::from_millis(250);

/// Startup flags for the GUI application
#[derive(Debug, Default, Clone)]
pub struct GuiFlags {
    pub config: AppConfig,
    /// Folder to load on startup
    pub folder: Option<PathBuf>,
    /// Interval overriding the configured default
    pub interval: Option<Interval>,
    /// Start the slideshow right away when the folder has images
    pub start: bool,
    /// Run the focus monitor and window mirror (when the platform supports it)
    pub mirror: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Setup,
    Sketch,
}

#[derive(Debug, Clone)]
pub enum Message {
    // Setup page
    SelectFolder,
    PresetSelected(Preset),
    CustomIntervalChanged(String),
    CustomIntervalSubmitted,
    Start,

    // Sketch page
    Previous,
    Next,
    Flip,
    Rotate,
    ReturnToMain,

    // Title bar
    ToggleAlwaysOnTop,

    // Timers and background events
    ClockTick,
    FocusChanged(FocusEvent),
    FocusIdle,
    FocusMonitorClosed,
    CloseRequested,
}

/// Wait at most `wait` for the next focus event so the subscription future
/// always hands its executor thread back
fn poll_focus(rx: &Receiver<FocusEvent>, wait: Duration) -> Message {
    match rx.recv_timeout(wait) {
        Ok(event) => Message::FocusChanged(event),
        Err(RecvTimeoutError::Timeout) => Message::FocusIdle,
        Err(RecvTimeoutError::Disconnected) => Message::FocusMonitorClosed,
    }
}

/// Decoded image currently on screen
struct Viewer {
    source: DynamicImage,
    handle: Handle,
}

pub struct SketchApp {
    page: Page,
    slideshow: SlideshowController,
    config: AppConfig,

    folder: Option<PathBuf>,
    custom_interval_input: String,

    // Status message
    status_message: String,

    always_on_top: bool,
    viewer: Option<Viewer>,

    // Focus monitoring (None when unsupported or disabled)
    platform: Option<Arc<dyn WindowPlatform>>,
    monitor: Option<MonitorHandle>,
    focus_rx: Option<Receiver<FocusEvent>>,
    mirror: Option<WindowMirror>,
}

impl SketchApp {
    fn load_folder(&mut self, dir: PathBuf) {
        info!("Loading folder {:?}", dir);
        match scan_folder(&dir, self.config.image_order) {
            Ok(images) => {
                let count = images.len();
                self.slideshow.load(images);
                self.status_message = if count == 0 {
                    format!("❌ {}", SketchError::EmptySelection)
                } else {
                    format!("📁 Loaded {} images from {}", count, dir.display())
                };
                self.folder = Some(dir);
            }
            Err(e) => {
                error!("{}", e);
                self.slideshow.load(Vec::new());
                self.folder = None;
                self.status_message = format!("❌ {}", e);
            }
        }
    }

    fn set_interval(&mut self, interval: Interval) {
        self.slideshow.set_interval(interval);
        self.status_message = format!("⏱️ Interval set to {}", interval);
    }

    fn start(&mut self) {
        let started = self
            .slideshow
            .start(Instant::now())
            .map(Path::to_path_buf);

        match started {
            Ok(path) => {
                info!("Starting sketch session...");
                self.show_image(&path);
                self.page = Page::Sketch;
            }
            Err(e) => {
                warn!("Cannot start: {}", e);
                self.status_message = format!("❌ {}", e);
            }
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let shown = self
            .slideshow
            .advance(direction, Instant::now())
            .map(Path::to_path_buf);
        if let Some(path) = shown {
            self.show_image(&path);
        }
    }

    fn show_image(&mut self, path: &Path) {
        match load_image(path) {
            Ok(source) => {
                let handle = render(&source, self.slideshow.orientation());
                self.viewer = Some(Viewer { source, handle });
                self.status_message = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
            }
            Err(e) => {
                error!("{}", e);
                self.viewer = None;
                self.status_message = format!("❌ {}", e);
            }
        }
    }

    /// Redraw the current image after a flip or rotate
    fn refresh_transform(&mut self) {
        let orientation = self.slideshow.orientation();
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.handle = render(&viewer.source, orientation);
        }
    }

    fn return_to_main(&mut self) {
        self.slideshow.stop();
        self.viewer = None;
        self.page = Page::Setup;
        self.status_message = "Back to setup".to_string();
    }

    fn start_focus_monitor(&mut self, poll_interval: Duration) {
        let Some(platform) = self.platform.clone() else {
            info!("Window mirroring not supported on this platform");
            return;
        };
        match monitor::spawn(platform, poll_interval) {
            Ok((handle, rx)) => {
                self.monitor = Some(handle);
                self.focus_rx = Some(rx);
            }
            Err(e) => {
                error!("Failed to start focus monitor: {}", e);
            }
        }
    }

    fn stop_focus_monitor(&mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        self.focus_rx = None;
        self.mirror = None;
    }

    /// Locate our own native window the first time a focus event arrives
    fn ensure_mirror(&mut self) -> Option<&WindowMirror> {
        if self.mirror.is_none() {
            let platform = self.platform.clone()?;
            match platform::find_own_window(platform.as_ref(), WINDOW_TITLE) {
                Ok(Some(target)) => {
                    info!("Mirroring focus state onto window {}", target);
                    self.mirror = Some(WindowMirror::new(platform, target));
                }
                Ok(None) => warn!("Application window not found by title"),
                Err(e) => warn!("Failed to locate application window: {}", e),
            }
        }
        self.mirror.as_ref()
    }

    fn window_level(&self) -> window::Level {
        if self.always_on_top {
            window::Level::AlwaysOnTop
        } else {
            window::Level::Normal
        }
    }
}

impl Application for SketchApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = GuiFlags;

    fn new(flags: GuiFlags) -> (Self, Command<Message>) {
        let interval = flags
            .interval
            .unwrap_or_else(|| flags.config.default_interval());
        let mirror_enabled = flags.mirror && flags.config.mirror_enabled;

        let mut app = SketchApp {
            page: Page::default(),
            slideshow: SlideshowController::new(interval),
            always_on_top: flags.config.always_on_top,
            config: flags.config.clone(),
            folder: None,
            custom_interval_input: String::new(),
            status_message: "Select a folder of reference images to begin".to_string(),
            viewer: None,
            platform: if mirror_enabled { platform::native() } else { None },
            monitor: None,
            focus_rx: None,
            mirror: None,
        };

        if mirror_enabled {
            app.start_focus_monitor(flags.config.monitor_poll_interval());
        }

        if let Some(folder) = flags.folder {
            app.load_folder(folder);
            if flags.start {
                app.start();
            }
        }

        let cmd = if app.always_on_top {
            window::change_level(window::Id::MAIN, window::Level::AlwaysOnTop)
        } else {
            Command::none()
        };

        (app, cmd)
    }

    fn title(&self) -> String {
        String::from(WINDOW_TITLE)
    }

    fn subscription(&self) -> Subscription<Message> {
        // Drive the countdown and the advance timer while sketching
        struct ClockPoller;

        let clock_sub = if self.page == Page::Sketch && self.slideshow.is_running() {
            iced::subscription::unfold(std::any::TypeId::of::<ClockPoller>(), (), |_| async move {
                std::thread::sleep(CLOCK_TICK);
                (Message::ClockTick, ())
            })
        } else {
            Subscription::none()
        };

        // Forward focus monitor events onto the UI loop
        struct FocusPoller;

        let focus_sub = match self.focus_rx.clone() {
            Some(rx) => iced::subscription::unfold(
                std::any::TypeId::of::<FocusPoller>(),
                Some(rx),
                |rx| async move {
                    let Some(rx) = rx else {
                        return iced::futures::future::pending().await;
                    };
                    match poll_focus(&rx, CLOCK_TICK) {
                        Message::FocusMonitorClosed => (Message::FocusMonitorClosed, None),
                        message => (message, Some(rx)),
                    }
                },
            ),
            None => Subscription::none(),
        };

        let close_sub = event::listen_with(|event, _status| match event {
            Event::Window(_, window::Event::CloseRequested) => Some(Message::CloseRequested),
            _ => None,
        });

        Subscription::batch([clock_sub, focus_sub, close_sub])
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::SelectFolder => {
                info!("Select folder button clicked");
                if let Some(dir) = open_folder_picker() {
                    self.load_folder(dir);
                }
            }

            Message::PresetSelected(preset) => {
                self.set_interval(preset.interval());
            }

            Message::CustomIntervalChanged(value) => {
                self.custom_interval_input = value;
            }

            Message::CustomIntervalSubmitted => {
                match Interval::parse_custom(&self.custom_interval_input) {
                    Ok(interval) => self.set_interval(interval),
                    Err(e) => {
                        warn!("Rejected custom interval: {}", e);
                        self.status_message = format!("❌ {}", e);
                    }
                }
            }

            Message::Start => {
                self.start();
            }

            Message::Previous => {
                self.navigate(Direction::Backward);
            }

            Message::Next => {
                self.navigate(Direction::Forward);
            }

            Message::Flip => {
                self.slideshow.flip();
                self.refresh_transform();
            }

            Message::Rotate => {
                self.slideshow.rotate90();
                self.refresh_transform();
            }

            Message::ReturnToMain => {
                self.return_to_main();
            }

            Message::ToggleAlwaysOnTop => {
                self.always_on_top = !self.always_on_top;
                info!("Always on top: {}", self.always_on_top);
                return window::change_level(window::Id::MAIN, self.window_level());
            }

            Message::ClockTick => {
                let fired = self
                    .slideshow
                    .poll_timer(Instant::now())
                    .map(Path::to_path_buf);
                if let Some(path) = fired {
                    self.show_image(&path);
                }
            }

            Message::FocusChanged(event) => {
                if let Some(mirror) = self.ensure_mirror() {
                    mirror.apply(event);
                }
            }

            Message::FocusIdle => {}

            Message::FocusMonitorClosed => {
                warn!("Focus monitor channel closed");
                self.focus_rx = None;
            }

            Message::CloseRequested => {
                info!("Window closing, stopping background tasks");
                self.slideshow.stop();
                self.stop_focus_monitor();
                return window::close(window::Id::MAIN);
            }
        }

        Command::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let page = match self.page {
            Page::Setup => self.render_setup(),
            Page::Sketch => self.render_sketch(),
        };

        let content = Column::new()
            .push(title_bar::view(self.slideshow.len(), self.always_on_top))
            .push(page)
            .push(
                // Status bar
                Container::new(Text::new(&self.status_message).size(14))
                    .width(Length::Fill)
                    .padding(10),
            );

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl SketchApp {
    fn render_setup(&self) -> Element<'_, Message> {
        let folder_label = match self.folder {
            Some(ref dir) => format!("Folder: {}", dir.display()),
            None => "No folder selected".to_string(),
        };

        let mut presets = Row::new().spacing(8).align_items(Alignment::Center);
        for preset in Preset::ALL {
            let label = if preset.interval() == self.slideshow.interval() {
                format!("▶ {}", preset.label())
            } else {
                preset.label().to_string()
            };
            presets = presets.push(
                Button::new(Text::new(label))
                    .on_press(Message::PresetSelected(preset))
                    .padding(8),
            );
        }
        presets = presets.push(
            TextInput::new("Custom (seconds)", &self.custom_interval_input)
                .on_input(Message::CustomIntervalChanged)
                .on_submit(Message::CustomIntervalSubmitted)
                .padding(8)
                .width(Length::Fixed(160.0)),
        );

        let column = Column::new()
            .spacing(15)
            .padding(20)
            .push(
                Button::new(Text::new("📁 Select Folder"))
                    .on_press(Message::SelectFolder)
                    .padding(10),
            )
            .push(Text::new(folder_label).size(12))
            .push(Space::new(Length::Fill, Length::Fixed(10.0)))
            .push(Text::new(format!("⏱️ Interval: {}", self.slideshow.interval())).size(18))
            .push(presets)
            .push(Space::new(Length::Fill, Length::Fill))
            .push(
                Button::new(Text::new("▶ Start"))
                    .on_press_maybe((!self.slideshow.is_empty()).then_some(Message::Start))
                    .padding(12),
            );

        Container::new(column)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn render_sketch(&self) -> Element<'_, Message> {
        let picture: Element<'_, Message> = match self.viewer {
            Some(ref viewer) => Image::new(viewer.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => Container::new(Text::new("Image unavailable"))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x()
                .center_y()
                .into(),
        };

        let countdown = format_countdown(self.slideshow.remaining_time(Instant::now()));
        let position = match self.slideshow.cursor() {
            Some(i) => format!("{}/{}", i + 1, self.slideshow.len()),
            None => String::new(),
        };

        let controls = Row::new()
            .spacing(10)
            .align_items(Alignment::Center)
            .push(Button::new(Text::new("⏮ Previous")).on_press(Message::Previous).padding(10))
            .push(Button::new(Text::new("Next ⏭")).on_press(Message::Next).padding(10))
            .push(Button::new(Text::new("↔ Flip")).on_press(Message::Flip).padding(10))
            .push(Button::new(Text::new("⟳ Rotate")).on_press(Message::Rotate).padding(10))
            .push(Space::new(Length::Fill, Length::Shrink))
            .push(Text::new(position).size(14))
            .push(Button::new(Text::new("↩ Return")).on_press(Message::ReturnToMain).padding(10));

        Column::new()
            .spacing(10)
            .padding(10)
            .push(Container::new(picture).height(Length::FillPortion(9)))
            .push(
                Container::new(Text::new(countdown).size(28))
                    .width(Length::Fill)
                    .center_x(),
            )
            .push(controls)
            .into()
    }
}

/// Run the GUI with startup flags
pub fn run(flags: GuiFlags) -> iced::Result {
    info!("[GUI] Starting GUI...");

    SketchApp::run(Settings {
        flags,
        window: window::Settings {
            size: iced::Size::new(1000.0, 700.0),
            min_size: Some(iced::Size::new(640.0, 480.0)),
            exit_on_close_request: false,
            ..Default::default()
        },
        ..Default::default()
    })
}

use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{event, keyboard, window};
use iced::{Color, Element, Event, Length, Size, Subscription, Task, Theme};
use rfd::FileDialog;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod error;
mod imaging;
mod state;
mod ui;

use imaging::{FullImageLoader, Raster, ThumbnailGenerator};
use state::data::ImageRef;
use state::library::{self, Library, ScanResult};
use state::output::OutputStage;
use state::picker::{ClickMode, Picker};
use state::settings::Settings;
use state::staging::{AreaId, StagingAreaSet};
use ui::layout::{self, PaneSizes, BUTTON_ROW_HEIGHT, PADDING, TAB_BAR_HEIGHT};
use ui::widgets::{self, Picture};

/// The separate window showing the output image
struct DisplayWindow {
    id: window::Id,
    size: Size,
    fullscreen: bool,
    picture: Picture,
}

/// Main application state
struct Presenter {
    main_window: window::Id,
    main_size: Size,
    display: Option<DisplayWindow>,
    settings: Settings,
    /// Images of the opened folder and the list filter
    library: Library,
    thumbnailer: ThumbnailGenerator,
    thumbnails: HashMap<ImageRef, Handle>,
    /// Highlighted entries of the image list
    picker: Picker,
    modifiers: keyboard::Modifiers,
    staging: StagingAreaSet,
    staging_preview: Picture,
    output: OutputStage,
    output_preview: Picture,
    loader: FullImageLoader,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    WindowOpened(window::Id),
    WindowClosed(window::Id),
    WindowResized(window::Id, Size),
    ModifiersChanged(keyboard::Modifiers),
    /// User clicked the folder button
    ChooseFolder,
    /// Background folder scan finished
    FolderScanned(Result<ScanResult, String>),
    ThumbnailReady(ImageRef, Raster),
    FilterChanged(String),
    ImageClicked(ImageRef),
    AddTab,
    CloseTab(AreaId),
    SelectTab(AreaId),
    /// Promote the active tab's selection to the output
    UpdateOutput,
    OpenDisplayWindow,
    ToggleFullscreen,
    ClearOutput,
}

impl Presenter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let main_size = Size::new(layout::MAIN_WINDOW_WIDTH, layout::MAIN_WINDOW_HEIGHT);

        let (main_window, open) = window::open(window::Settings {
            size: main_size,
            ..window::Settings::default()
        });

        let mut tasks = vec![open.map(Message::WindowOpened)];
        let mut status = String::from("Ready. Choose a folder to list its images.");

        // Reopen last session's folder if it is still there
        if let Some(folder) = settings.last_folder.clone().filter(|f| f.is_dir()) {
            status = format!("Scanning {}...", folder.display());
            tasks.push(scan_folder_task(folder));
        }

        tracing::info!("🎨 Image presenter initialized");

        let presenter = Presenter {
            main_window,
            main_size,
            display: None,
            thumbnailer: ThumbnailGenerator::new(settings.thumbnail_size),
            settings,
            library: Library::new(),
            thumbnails: HashMap::new(),
            picker: Picker::new(),
            modifiers: keyboard::Modifiers::default(),
            staging: StagingAreaSet::new(),
            staging_preview: Picture::default(),
            output: OutputStage::new(),
            output_preview: Picture::default(),
            loader: FullImageLoader,
            status,
        };

        (presenter, Task::batch(tasks))
    }

    fn title(&self, id: window::Id) -> String {
        if self.is_display(id) {
            String::from("Image Display")
        } else {
            String::from("D&D Image Manager")
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WindowOpened(id) => {
                tracing::debug!("🪟 Window {:?} opened", id);
                Task::none()
            }
            Message::WindowClosed(id) => {
                if id == self.main_window {
                    return iced::exit();
                }
                if self.is_display(id) {
                    self.display = None;
                }
                Task::none()
            }
            Message::WindowResized(id, size) => {
                if id == self.main_window {
                    self.main_size = size;
                    self.refresh_staging_preview();
                    self.refresh_output_preview();
                } else if let Some(display) = self.display.as_mut().filter(|d| d.id == id) {
                    display.size = size;
                    display
                        .picture
                        .set(self.output.render(layout::display_canvas(size)));
                }
                Task::none()
            }
            Message::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers;
                Task::none()
            }
            Message::ChooseFolder => {
                // Show the native folder picker dialog
                let Some(folder) = FileDialog::new().set_title("Select Folder").pick_folder()
                else {
                    return Task::none();
                };

                self.settings.last_folder = Some(folder.clone());
                self.settings.save();

                self.status = format!("Scanning {}...", folder.display());
                scan_folder_task(folder)
            }
            Message::FolderScanned(Ok(scan)) => {
                let unreadable = scan.unreadable_count;
                self.library.set_scan(scan);
                self.thumbnails.clear();

                let folder = self
                    .library
                    .folder()
                    .map(|f| f.display().to_string())
                    .unwrap_or_default();
                self.status = format!("{} images in {}", self.library.images().len(), folder);
                if unreadable > 0 {
                    self.status.push_str(&format!(" ({} entries unreadable)", unreadable));
                }

                // The list was rebuilt; show the active tab's picks in it again
                self.reflect_active_selection();

                let thumbnailer = &self.thumbnailer;
                Task::batch(self.library.images().iter().cloned().map(|image| {
                    Task::perform(
                        thumbnailer.clone().generate_async(image),
                        |(image, raster)| Message::ThumbnailReady(image, raster),
                    )
                }))
            }
            Message::FolderScanned(Err(e)) => {
                tracing::warn!("⚠️  Folder scan failed: {}", e);
                self.status = format!("Could not read folder: {}", e);
                Task::none()
            }
            Message::ThumbnailReady(image, raster) => {
                // Drop results that belong to a folder no longer shown
                if self.library.contains(&image) {
                    if let Some(handle) = widgets::to_handle(&raster) {
                        self.thumbnails.insert(image, handle);
                    }
                }
                Task::none()
            }
            Message::FilterChanged(filter) => {
                self.library.set_filter(filter);
                Task::none()
            }
            Message::ImageClicked(image) => {
                let visible = self.library.visible();
                let mode = click_mode(self.modifiers);

                if let Some(selection) = self.picker.click(&image, mode, &visible) {
                    tracing::debug!("🖱️  Picked {} images", self.picker.selected().len());
                    stage_pick(&mut self.staging, &mut self.picker, selection);
                    self.refresh_staging_preview();
                }
                Task::none()
            }
            Message::AddTab => {
                self.staging.add_area();
                self.on_active_area_changed();
                Task::none()
            }
            Message::CloseTab(id) => {
                if self.staging.close_area(id) {
                    self.on_active_area_changed();
                }
                Task::none()
            }
            Message::SelectTab(id) => {
                if self.staging.set_active(id) {
                    self.on_active_area_changed();
                }
                Task::none()
            }
            Message::UpdateOutput => {
                self.update_output();
                Task::none()
            }
            Message::OpenDisplayWindow => {
                if let Some(display) = &self.display {
                    return window::gain_focus(display.id);
                }

                let size = Size::new(
                    self.settings.display_width as f32,
                    self.settings.display_height as f32,
                );
                let (id, open) = window::open(window::Settings {
                    size,
                    ..window::Settings::default()
                });

                let mut picture = Picture::default();
                picture.set(self.output.render(layout::display_canvas(size)));
                self.display = Some(DisplayWindow {
                    id,
                    size,
                    fullscreen: false,
                    picture,
                });

                open.map(Message::WindowOpened)
            }
            Message::ToggleFullscreen => {
                let Some(display) = self.display.as_mut() else {
                    return Task::none();
                };

                display.fullscreen = !display.fullscreen;
                let mode = if display.fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                window::change_mode(display.id, mode)
            }
            Message::ClearOutput => {
                self.output.clear();
                self.output_preview.clear();
                if let Some(display) = self.display.as_mut() {
                    display.picture.clear();
                }
                Task::none()
            }
        }
    }

    /// Build the window identified by `id`
    fn view(&self, id: window::Id) -> Element<'_, Message> {
        match self.display.as_ref().filter(|d| d.id == id) {
            Some(display) => container(widgets::picture_view(&display.picture))
                .width(Length::Fill)
                .height(Length::Fill)
                .style(|_| container::Style::default().background(Color::BLACK))
                .into(),
            None => self.main_view(),
        }
    }

    fn main_view(&self) -> Element<'_, Message> {
        let thumbnail_size = self.thumbnailer.size();
        let list = column(self.library.visible().iter().map(|image| {
            widgets::thumbnail_row(
                image,
                self.thumbnails.get(image),
                self.picker.is_selected(image),
                thumbnail_size,
            )
        }))
        .spacing(4);

        let left = column![
            button(text("Choose Folder"))
                .on_press(Message::ChooseFolder)
                .padding(6),
            text_input("Filter images...", self.library.filter())
                .on_input(Message::FilterChanged),
            scrollable(list).height(Length::Fill),
            text(&self.status).size(12),
        ]
        .spacing(PADDING)
        .width(Length::Fixed(layout::LEFT_PANEL_WIDTH));

        let staging = column![
            container(widgets::tab_strip(&self.staging)).height(Length::Fixed(TAB_BAR_HEIGHT)),
            widgets::picture_view(&self.staging_preview),
            container(button(text("Update Output Image")).on_press(Message::UpdateOutput))
                .height(Length::Fixed(BUTTON_ROW_HEIGHT))
                .center_y(Length::Fixed(BUTTON_ROW_HEIGHT)),
        ]
        .height(Length::FillPortion(1));

        let fullscreen_label = if self.display.as_ref().is_some_and(|d| d.fullscreen) {
            "Exit Full Screen"
        } else {
            "Show Full Screen"
        };

        let output = column![
            widgets::picture_view(&self.output_preview),
            container(
                row![
                    button(text("Open Separate Window")).on_press(Message::OpenDisplayWindow),
                    button(text(fullscreen_label)).on_press(Message::ToggleFullscreen),
                    button(text("Clear")).on_press(Message::ClearOutput),
                ]
                .spacing(PADDING),
            )
            .center_y(Length::Fixed(BUTTON_ROW_HEIGHT)),
        ]
        .height(Length::FillPortion(1));

        row![
            left,
            column![staging, output]
                .spacing(PADDING)
                .width(Length::Fill),
        ]
        .spacing(PADDING)
        .padding(PADDING)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::close_events().map(Message::WindowClosed),
            window::resize_events().map(|(id, size)| Message::WindowResized(id, size)),
            event::listen_with(|event, _status, _id| match event {
                Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                    Some(Message::ModifiersChanged(modifiers))
                }
                _ => None,
            }),
        ])
    }

    /// Set the application theme
    fn theme(&self, _id: window::Id) -> Theme {
        Theme::Dark
    }

    fn is_display(&self, id: window::Id) -> bool {
        self.display.as_ref().is_some_and(|d| d.id == id)
    }

    /// Tab added, closed or switched
    fn on_active_area_changed(&mut self) {
        self.reflect_active_selection();
        self.refresh_staging_preview();
    }

    /// Highlight the active area's selection in the image list
    ///
    /// The picker suppresses its change notification while doing so;
    /// otherwise the reflection would be stored straight back into the area.
    fn reflect_active_selection(&mut self) {
        let selection = self.staging.reflect_active_selection_to_source();
        self.picker.reflect(selection);
    }

    fn refresh_staging_preview(&mut self) {
        let target = PaneSizes::for_window(self.main_size).staging_preview;
        let raster = self
            .staging
            .active_mut()
            .composed_preview(target, &self.loader);
        self.staging_preview.set(raster);
    }

    fn refresh_output_preview(&mut self) {
        let target = PaneSizes::for_window(self.main_size).output_preview;
        self.output_preview.set(self.output.render(target));
    }

    /// Promote the active selection and render it on every output surface
    fn update_output(&mut self) {
        let selection = self.staging.active().selection();
        if selection.is_empty() {
            self.output.clear();
            self.status = String::from("Output cleared: no image selected.");
        } else {
            self.output.promote(selection, &self.loader);
            self.status = format!("Output shows {} images.", self.output.selection().len());
        }

        self.refresh_output_preview();
        if let Some(display) = self.display.as_mut() {
            display
                .picture
                .set(self.output.render(layout::display_canvas(display.size)));
        }
    }
}

/// Map held modifier keys to list click behavior
fn click_mode(modifiers: keyboard::Modifiers) -> ClickMode {
    if modifiers.shift() {
        ClickMode::Extend
    } else if modifiers.command() {
        ClickMode::Toggle
    } else {
        ClickMode::Replace
    }
}

/// Store a list pick in the active area
///
/// Picks past the area's limit are dropped, so the list is re-highlighted
/// with what was actually kept.
fn stage_pick(staging: &mut StagingAreaSet, picker: &mut Picker, selection: Vec<ImageRef>) {
    staging.sync_selection_from_source(selection);

    let staged = staging.reflect_active_selection_to_source();
    if picker.selected() != staged {
        picker.reflect(staged);
    }
}

fn scan_folder_task(folder: PathBuf) -> Task<Message> {
    Task::perform(library::scan_folder_async(folder), Message::FolderScanned)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    iced::daemon(Presenter::title, Presenter::update, Presenter::view)
        .subscription(Presenter::subscription)
        .theme(Presenter::theme)
        .run_with(Presenter::new)
}

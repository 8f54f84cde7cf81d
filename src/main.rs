use iced::keyboard::{self, key::Named, Key};
use iced::widget::{button, column, container, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length, Subscription, Task, Theme};
use iced_aw::Wrap;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod gallery;
mod state;
mod thumbnail;
mod ui;

use config::TaggerConfig;
use gallery::{group_by_category, CategoryGroup, Lightbox};
use state::data::{AnnotationPatch, Category, ExportedImage, Filter, ImageId, SizeClass};
use state::export;
use state::manifest::Manifest;
use state::session::{ExportOptions, TaggingSession};
use state::store::SqliteStore;
use ui::CategoryChoice;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Tagging,
    Gallery,
}

/// Main application state
struct Tagger {
    session: TaggingSession<SqliteStore>,
    config: TaggerConfig,
    screen: Screen,
    /// Full-size preview over the tagging grid
    preview: Option<ImageId>,
    /// Collection open in the gallery preview
    open_category: Option<Category>,
    lightbox: Lightbox,
    /// Data file shown in the gallery preview instead of the live tags
    gallery_file: Option<(PathBuf, Vec<ExportedImage>)>,
    /// Generated thumbnails by image
    thumbnails: HashMap<ImageId, PathBuf>,
    thumbnail_cache: Option<PathBuf>,
    /// Status line shown under the toolbar
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    FilterSelected(Filter),
    CategoryPicked(ImageId, CategoryChoice),
    SizePicked(ImageId, SizeClass),
    TitleChanged(ImageId, String),
    AltChanged(ImageId, String),
    CropAnchorChanged(ImageId, String),
    ToggleCover(ImageId),
    /// Assign a category to every image of a folder
    QuickTag(String, Category),
    Preview(ImageId),
    ClosePreview,
    ExportJson,
    CopySource,
    ResetAll,
    RescanManifest,
    ManifestScanned(Manifest),
    ThumbnailsReady(Vec<(ImageId, PathBuf)>),
    ShowGallery,
    ShowTagging,
    /// Preview a gallery data file from disk
    OpenGalleryFile,
    /// Preview the current tags again
    UseLiveGallery,
    OpenCollection(Category),
    CloseCollection,
    OpenLightbox(usize),
    NextImage,
    PrevImage,
    CloseLightbox,
    /// Escape closes the innermost overlay
    Escape,
}

impl Tagger {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = TaggerConfig::load();

        let manifest = match &config.manifest_path {
            Some(path) => Manifest::load_json(path).unwrap_or_else(|err| {
                warn!(error = %err, "manifest file unusable, using built-in manifest");
                Manifest::builtin()
            }),
            None => Manifest::builtin(),
        };

        // The tagger cannot do anything useful without somewhere to keep annotations
        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => SqliteStore::default_path().expect("Could not determine user data directory"),
        };
        let store = SqliteStore::open(&db_path)
            .expect("Failed to open annotation store. Check permissions and disk space.");

        let options = ExportOptions { credit: config.credit.clone() };
        let session = TaggingSession::open(manifest, store, options);

        let thumbnail_cache = thumbnail::cache_dir()
            .inspect_err(|err| warn!(error = %err, "thumbnail cache unavailable"))
            .ok();

        let mut status = format!(
            "Ready. {}/{} images tagged.",
            session.tagged_count(),
            session.manifest().len()
        );
        if let Ok(Some(saved)) = session.store().updated_at() {
            status.push_str(&format!(" Last saved {}.", saved.format("%Y-%m-%d %H:%M UTC")));
        }

        let mut tagger = Tagger {
            session,
            config,
            screen: Screen::Tagging,
            preview: None,
            open_category: None,
            lightbox: Lightbox::default(),
            gallery_file: None,
            thumbnails: HashMap::new(),
            thumbnail_cache,
            status,
        };

        let task = tagger.request_thumbnails();
        (tagger, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FilterSelected(filter) => {
                self.session.set_filter(filter);
            }
            Message::CategoryPicked(id, choice) => {
                self.session.edit(&id, AnnotationPatch::category(choice.category()));
            }
            Message::SizePicked(id, size) => {
                self.session.edit(&id, AnnotationPatch::size(size));
            }
            Message::TitleChanged(id, title) => {
                self.session.edit(&id, AnnotationPatch::title(title));
            }
            Message::AltChanged(id, alt) => {
                self.session.edit(&id, AnnotationPatch::alt(alt));
            }
            Message::CropAnchorChanged(id, anchor) => {
                self.session.edit(&id, AnnotationPatch::crop_anchor(anchor));
            }
            Message::ToggleCover(id) => {
                self.session.toggle_cover(&id);
            }
            Message::QuickTag(folder, category) => {
                self.session.quick_assign(&folder, category);
                self.status = format!("Assigned /{} to {}.", folder, category);
            }
            Message::Preview(id) => {
                self.preview = Some(id);
            }
            Message::ClosePreview => {
                self.preview = None;
            }
            Message::ExportJson => {
                self.export_json();
            }
            Message::CopySource => {
                match export::to_source_snippet(&self.session.export()) {
                    Ok(snippet) => {
                        self.status = "Copied gallery data module to clipboard.".to_string();
                        return iced::clipboard::write(snippet);
                    }
                    Err(err) => {
                        warn!(error = %err, "could not build source snippet");
                        self.status = format!("Copy failed: {}", err);
                    }
                }
            }
            Message::ResetAll => {
                let confirmed = MessageDialog::new()
                    .set_title("Reset all tags")
                    .set_description("Remove every annotation? This cannot be undone.")
                    .set_buttons(MessageButtons::YesNo)
                    .show();

                if confirmed == MessageDialogResult::Yes {
                    self.session.reset();
                    self.status = "All annotations cleared.".to_string();
                }
            }
            Message::RescanManifest => {
                self.status = format!("Scanning {}...", self.config.site_root.display());
                return Task::perform(
                    scan_manifest_async(self.config.site_root.clone(), self.config.scan_folders.clone()),
                    Message::ManifestScanned,
                );
            }
            Message::ManifestScanned(manifest) => {
                if manifest.is_empty() {
                    self.status = "Scan found no images; keeping the current manifest.".to_string();
                } else {
                    self.status = format!("Manifest rescanned: {} images.", manifest.len());
                    self.session.replace_manifest(manifest);
                    return self.request_thumbnails();
                }
            }
            Message::ThumbnailsReady(done) => {
                info!(count = done.len(), "thumbnails ready");
                self.thumbnails.extend(done);
            }
            Message::ShowGallery => {
                self.screen = Screen::Gallery;
                self.preview = None;
            }
            Message::ShowTagging => {
                self.screen = Screen::Tagging;
                self.open_category = None;
                self.lightbox.close();
            }
            Message::OpenGalleryFile => {
                self.open_gallery_file();
            }
            Message::UseLiveGallery => {
                self.gallery_file = None;
                self.open_category = None;
                self.lightbox.close();
            }
            Message::OpenCollection(category) => {
                self.open_category = Some(category);
                self.lightbox.close();
            }
            Message::CloseCollection => {
                self.open_category = None;
                self.lightbox.close();
            }
            Message::OpenLightbox(index) => {
                self.lightbox.open(index);
            }
            Message::NextImage => {
                let len = self.open_group().map_or(0, |group| group.len());
                self.lightbox.next(len);
            }
            Message::PrevImage => {
                let len = self.open_group().map_or(0, |group| group.len());
                self.lightbox.prev(len);
            }
            Message::CloseLightbox => {
                self.lightbox.close();
            }
            Message::Escape => {
                if self.preview.is_some() {
                    self.preview = None;
                } else if self.lightbox.is_open() {
                    self.lightbox.close();
                } else if self.open_category.is_some() {
                    self.open_category = None;
                }
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let resolve = |id: &ImageId| self.display_path(id);

        match self.screen {
            Screen::Gallery => {
                let groups = self.groups();
                match self.open_category.and_then(|c| groups.iter().find(|g| g.category == c)) {
                    Some(group) => ui::gallery::collection(group, &self.lightbox, &resolve),
                    None => ui::gallery::overview(&groups, self.gallery_source(), &resolve),
                }
            }
            Screen::Tagging => match &self.preview {
                Some(id) => self.preview_view(id),
                None => self.tagging_view(),
            },
        }
    }

    fn tagging_view(&self) -> Element<Message> {
        let toolbar = ui::toolbar::toolbar(
            &self.session.counts(),
            self.session.filter(),
            self.session.progress(),
            &self.config.quick_tags,
            &self.status,
        );

        let visible = self.session.visible();
        let body: Element<Message> = if visible.is_empty() {
            container(text("No images match this filter.").size(14).color(ui::MUTED))
                .center_x(Length::Fill)
                .padding(96)
                .into()
        } else {
            let cards = visible
                .iter()
                .map(|id| {
                    ui::card::image_card(id, &self.session.annotation(id), self.thumbnail_path(id))
                })
                .collect();
            scrollable(
                container(Wrap::with_elements(cards).spacing(12.0).line_spacing(12.0)).padding(12),
            )
            .height(Length::Fill)
            .into()
        };

        column![toolbar, body].into()
    }

    fn preview_view(&self, id: &ImageId) -> Element<Message> {
        let close = button(text("✕ Close").size(12))
            .on_press(Message::ClosePreview)
            .style(button::secondary);

        column![
            row![text(id.to_string()).size(12).color(ui::MUTED), close]
                .spacing(12)
                .align_y(Alignment::Center),
            ui::card::picture(self.display_path(id), Length::Fill, ContentFit::Contain),
        ]
        .spacing(12)
        .padding(24)
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key {
            Key::Named(Named::Escape) => Some(Message::Escape),
            Key::Named(Named::ArrowRight) => Some(Message::NextImage),
            Key::Named(Named::ArrowLeft) => Some(Message::PrevImage),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Gallery projection of the opened data file, or of what an export
    /// would publish right now
    fn groups(&self) -> Vec<CategoryGroup> {
        match &self.gallery_file {
            Some((_, images)) => group_by_category(images),
            None => group_by_category(&self.session.export()),
        }
    }

    fn gallery_source(&self) -> Option<&Path> {
        self.gallery_file.as_ref().map(|(path, _)| path.as_path())
    }

    fn open_group(&self) -> Option<CategoryGroup> {
        let category = self.open_category?;
        self.groups().into_iter().find(|group| group.category == category)
    }

    fn thumbnail_path(&self, id: &ImageId) -> Option<PathBuf> {
        self.thumbnails.get(id).cloned()
    }

    /// Full-size file for an image, if it exists under the site root
    fn display_path(&self, id: &ImageId) -> Option<PathBuf> {
        let path = self.config.resolve_image(id.as_str());
        if path.is_file() {
            Some(path)
        } else {
            self.thumbnail_path(id)
        }
    }

    /// Queue thumbnail generation for manifest images that have none yet
    fn request_thumbnails(&mut self) -> Task<Message> {
        let Some(cache) = self.thumbnail_cache.clone() else {
            return Task::none();
        };

        let jobs: Vec<(ImageId, PathBuf)> = self
            .session
            .manifest()
            .iter()
            .filter(|id| !self.thumbnails.contains_key(*id))
            .map(|id| (id.clone(), self.config.resolve_image(id.as_str())))
            .filter(|(_, source)| source.is_file())
            .collect();

        if jobs.is_empty() {
            return Task::none();
        }

        info!(count = jobs.len(), "generating thumbnails");
        Task::perform(thumbnail::generate_batch(jobs, cache), Message::ThumbnailsReady)
    }

    fn open_gallery_file(&mut self) {
        let picked = FileDialog::new()
            .set_title("Open gallery data")
            .add_filter("JSON", &["json"])
            .pick_file();

        let Some(path) = picked else {
            return;
        };

        match export::read_json(&path) {
            Ok(images) => {
                info!(path = %path.display(), images = images.len(), "gallery data opened");
                self.status = format!("Previewing {} ({} images)", path.display(), images.len());
                self.gallery_file = Some((path, images));
                self.open_category = None;
                self.lightbox.close();
            }
            Err(err) => {
                warn!(error = %err, path = %path.display(), "gallery data unreadable");
                self.status = format!("Could not open {}: {}", path.display(), err);
            }
        }
    }

    fn export_json(&mut self) {
        let images = self.session.export();

        let target = FileDialog::new()
            .set_title("Export gallery data")
            .set_file_name(&self.config.export_file_name)
            .add_filter("JSON", &["json"])
            .save_file();

        let Some(path) = target else {
            return;
        };

        match export::write_json(&path, &images) {
            Ok(()) => {
                self.status = format!("✅ Exported {} images to {}", images.len(), path.display());
            }
            Err(err) => {
                warn!(error = %err, path = %path.display(), "export failed");
                self.status = format!("Export failed: {}", err);
            }
        }
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application("BJN Gallery Tagger", Tagger::update, Tagger::view)
        .subscription(Tagger::subscription)
        .theme(Tagger::theme)
        .window_size((1400.0, 900.0))
        .centered()
        .run_with(Tagger::new)
}

/// Rebuild the manifest from the site folders off the UI thread
async fn scan_manifest_async(site_root: PathBuf, folders: Vec<String>) -> Manifest {
    tokio::task::spawn_blocking(move || Manifest::scan(&site_root, &folders))
        .await
        .unwrap_or_else(|err| {
            warn!(error = %err, "manifest scan task failed");
            Manifest::from_paths(Vec::<String>::new())
        })
}

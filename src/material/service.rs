//! Material service: owns the theming pipeline and reacts to events
//!
//! One instance is built in `main` and shared as `Arc<MaterialService>`.
//! Generation (decode, quantize, score, scheme) runs on the blocking pool;
//! the result is rendered, persisted and published on a watch channel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use area_color::{FALLBACK_SEED, Variant};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use super::cache::{BoundedMap, ColorCache, file_mtime};
use super::error::{MaterialError, Result};
use super::quantizer::quantize_image;
use super::scheme::ColorScheme;
use super::seed::pick_seed;
use super::template::TemplateRenderer;
use super::{blur, external, scss};
use crate::config::Config;
use crate::events::MaterialEvent;
use crate::state::{MaterialState, StateStore};

/// User-facing options that shape the generated scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceOptions {
    pub dark_mode: bool,
    pub variant: Variant,
    pub blur_enabled: bool,
}

/// The theme currently in effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedTheme {
    pub wallpaper: PathBuf,
    pub variant: Variant,
    pub dark_mode: bool,
    pub seed: u32,
    /// Scheme for the active dark-mode setting
    pub colors: ColorScheme,
    /// Scheme with dark mode forced on
    pub dark_colors: ColorScheme,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub colors_cache_size: usize,
    pub template_cache_size: usize,
    pub last_wallpaper: Option<PathBuf>,
    pub last_scheme: Option<Variant>,
    pub last_dark_mode: Option<bool>,
    /// Schemes generated from scratch (cache misses)
    pub generations: u64,
}

/// Inputs of the last publish, for skipping redundant work
#[derive(Debug, Clone, PartialEq)]
struct LastPublish {
    path: PathBuf,
    variant: Variant,
    dark_mode: bool,
    mtime: Option<SystemTime>,
}

struct Generated {
    seed: u32,
    colors: ColorScheme,
    dark_colors: ColorScheme,
}

pub struct MaterialService {
    config: Config,
    store: StateStore,
    cache: ColorCache,
    /// Seed picked for each image, stamped with the image mtime
    seeds: Mutex<BoundedMap<PathBuf, (SystemTime, u32)>>,
    renderer: TemplateRenderer,
    options: Mutex<ServiceOptions>,
    wallpaper: Mutex<Option<PathBuf>>,
    last: Mutex<Option<LastPublish>>,
    path_locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
    published: watch::Sender<Option<Arc<PublishedTheme>>>,
    stats: watch::Sender<CacheStats>,
    generations: AtomicU64,
    /// Saved colors were missing or incomplete at startup
    colors_missing: bool,
}

impl MaterialService {
    pub fn new(config: Config, store: StateStore) -> anyhow::Result<Self> {
        let state = store.load();
        let renderer = TemplateRenderer::new(config.cache.template_memo_entries)?;
        let (published, _) = watch::channel(None);
        let (stats, _) = watch::channel(CacheStats::default());

        info!(
            "Material service: scheme={}, dark_mode={}, blur={}, wallpaper={:?}",
            state.color_scheme, state.dark_mode, state.blur_enabled, state.wallpaper
        );

        Ok(Self {
            cache: ColorCache::new(config.cache.max_entries),
            seeds: Mutex::new(BoundedMap::new(config.cache.max_entries)),
            renderer,
            options: Mutex::new(ServiceOptions {
                dark_mode: state.dark_mode,
                variant: state.color_scheme,
                blur_enabled: state.blur_enabled,
            }),
            colors_missing: !state.colors.is_complete(),
            wallpaper: Mutex::new(state.wallpaper),
            last: Mutex::new(None),
            path_locks: Mutex::new(HashMap::new()),
            published,
            stats,
            generations: AtomicU64::new(0),
            config,
            store,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PublishedTheme>>> {
        self.published.subscribe()
    }

    /// Snapshots sent in answer to [`MaterialEvent::Stats`]
    pub fn subscribe_stats(&self) -> watch::Receiver<CacheStats> {
        self.stats.subscribe()
    }

    pub fn current(&self) -> Option<Arc<PublishedTheme>> {
        self.published.borrow().clone()
    }

    pub fn options(&self) -> ServiceOptions {
        *lock(&self.options)
    }

    pub fn wallpaper(&self) -> Option<PathBuf> {
        lock(&self.wallpaper).clone()
    }

    pub fn cache_stats(&self) -> CacheStats {
        let last = lock(&self.last).clone();
        CacheStats {
            colors_cache_size: self.cache.len(),
            template_cache_size: self.renderer.memo_len(),
            last_wallpaper: last.as_ref().map(|l| l.path.clone()),
            last_scheme: last.as_ref().map(|l| l.variant),
            last_dark_mode: last.as_ref().map(|l| l.dark_mode),
            generations: self.generations.load(Ordering::Relaxed),
        }
    }

    /// Process events until the sender side is dropped
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<MaterialEvent>) {
        self.start().await;
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        info!("Event channel closed, material service stopping");
    }

    /// Apply the saved blur setting and publish an initial theme
    pub async fn start(&self) {
        self.apply_blur();

        match self.wallpaper() {
            Some(path) if !self.colors_missing => self.apply(path, false).await,
            _ => {
                info!("Colors not found, using default wallpaper");
                let default = self.config.paths.default_wallpaper.clone();
                *lock(&self.wallpaper) = Some(default.clone());
                self.apply(default, false).await;
                external::run_hooks(&self.config.hooks.colors_not_found).await;
            }
        }
    }

    pub async fn handle_event(&self, event: MaterialEvent) {
        match event {
            MaterialEvent::WallpaperChanged { path } => {
                *lock(&self.wallpaper) = Some(path.clone());
                self.apply(path, false).await;
                self.run_matugen().await;
            }
            MaterialEvent::DarkModeChanged { enabled } => {
                if self.update_options(|o| o.dark_mode = enabled) {
                    self.regenerate_current(false).await;
                }
            }
            MaterialEvent::SchemeChanged { scheme } => {
                if self.update_options(|o| o.variant = scheme) {
                    self.regenerate_current(false).await;
                    self.run_matugen().await;
                }
            }
            MaterialEvent::BlurChanged { enabled } => {
                if self.update_options(|o| o.blur_enabled = enabled) {
                    self.apply_blur();
                    self.rewrite_prelude();
                    self.save_state();
                }
            }
            MaterialEvent::Regenerate => self.regenerate_current(true).await,
            MaterialEvent::ClearCache => {
                info!("Clearing color cache and template memo");
                self.clear_caches();
            }
            MaterialEvent::Stats => {
                let stats = self.cache_stats();
                debug!("Cache stats: {:?}", stats);
                self.stats.send_replace(stats);
            }
        }
    }

    pub fn clear_caches(&self) {
        self.cache.clear();
        lock(&self.seeds).clear();
        self.renderer.clear_memo();
    }

    /// Change options; on a real change the caches are dropped.
    /// Returns whether anything changed.
    fn update_options(&self, change: impl FnOnce(&mut ServiceOptions)) -> bool {
        let changed = {
            let mut options = lock(&self.options);
            let before = *options;
            change(&mut *options);
            *options != before
        };
        if changed {
            debug!("Options changed to {:?}, clearing caches", self.options());
            self.clear_caches();
        }
        changed
    }

    async fn regenerate_current(&self, force: bool) {
        let path = self
            .wallpaper()
            .unwrap_or_else(|| self.config.paths.default_wallpaper.clone());
        self.apply(path, force).await;
    }

    /// Generate and publish for `path`, degrading to the default wallpaper
    /// and then to the fallback seed. Never fails.
    pub async fn apply(&self, path: PathBuf, force: bool) {
        let err = match self.refresh(&path, force).await {
            Ok(()) => return,
            Err(e) => e,
        };
        warn!("Theme generation for {:?} failed: {}", path, err);

        let default = self.config.paths.default_wallpaper.clone();
        if path != default {
            match self.refresh(&default, force).await {
                Ok(()) => {
                    info!("Fell back to default wallpaper {:?}", default);
                    return;
                }
                Err(e) => warn!("Default wallpaper {:?} failed too: {}", default, e),
            }
        }

        if self.current().is_some() {
            warn!("Keeping last published theme");
            return;
        }
        self.publish_fallback(default).await;
    }

    async fn refresh(&self, path: &Path, force: bool) -> Result<()> {
        let options = self.options();
        let mtime = file_mtime(path);
        if !force && self.is_unchanged(path, &options, mtime) {
            debug!("Nothing changed for {:?}, skipping generation", path);
            return Ok(());
        }

        let generated = self.schemes_for(path, options.variant, options.dark_mode).await?;
        self.publish(path, options, generated, mtime).await
    }

    fn is_unchanged(&self, path: &Path, options: &ServiceOptions, mtime: Option<SystemTime>) -> bool {
        let current = LastPublish {
            path: path.to_path_buf(),
            variant: options.variant,
            dark_mode: options.dark_mode,
            mtime,
        };
        mtime.is_some() && self.current().is_some() && lock(&self.last).as_ref() == Some(&current)
    }

    /// Schemes for `path` under the active dark flag and with dark forced on,
    /// from cache when the image is unchanged.
    async fn schemes_for(&self, path: &Path, variant: Variant, dark: bool) -> Result<Generated> {
        if let Some(generated) = self.cached(path, variant, dark) {
            return Ok(generated);
        }

        let path_lock = self.path_lock(path);
        let result = {
            let _guard = path_lock.lock().await;
            self.generate_locked(path, variant, dark).await
        };
        drop(path_lock);
        self.release_path_lock(path);
        result
    }

    /// Generation for `path`; the caller holds its path lock
    async fn generate_locked(&self, path: &Path, variant: Variant, dark: bool) -> Result<Generated> {
        // Another task may have finished this image while we waited
        if let Some(generated) = self.cached(path, variant, dark) {
            return Ok(generated);
        }

        // An image edited while it was being decoded must not be cached
        let mtime = file_mtime(path);
        let max_colors = self.config.quantizer.max_colors;
        let max_edge = self.config.quantizer.max_edge;
        let image = path.to_path_buf();
        let (seed, colors, dark_colors) = tokio::task::spawn_blocking(move || -> Result<_> {
            let palette = quantize_image(&image, max_colors, max_edge)?;
            let seed = pick_seed(&palette);
            let colors = ColorScheme::generate(seed, dark, variant);
            let dark_colors = if dark {
                colors.clone()
            } else {
                ColorScheme::generate(seed, true, variant)
            };
            Ok((seed, colors, dark_colors))
        })
        .await
        .map_err(|e| MaterialError::Worker(e.to_string()))??;

        self.generations.fetch_add(1, Ordering::Relaxed);
        info!("Generated {} scheme for {:?} from seed #{:06X}", variant, path, seed & 0xFFFFFF);

        match mtime {
            Some(stamp) if file_mtime(path) == mtime => {
                lock(&self.seeds).insert(path.to_path_buf(), (stamp, seed));
                self.cache.put(path, dark, variant, colors.clone());
                if !dark {
                    self.cache.put(path, true, variant, dark_colors.clone());
                }
            }
            _ => debug!("{:?} changed during generation, not caching", path),
        }

        Ok(Generated { seed, colors, dark_colors })
    }

    fn cached(&self, path: &Path, variant: Variant, dark: bool) -> Option<Generated> {
        let mtime = file_mtime(path)?;
        let seed = match lock(&self.seeds).get(&path.to_path_buf()) {
            Some((stamp, seed)) if *stamp == mtime => *seed,
            _ => return None,
        };
        let colors = self.cache.get(path, dark, variant)?;
        let dark_colors = if dark {
            colors.clone()
        } else {
            self.cache.get(path, true, variant)?
        };
        Some(Generated { seed, colors, dark_colors })
    }

    fn path_lock(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        lock(&self.path_locks)
            .entry(path.to_path_buf())
            .or_default()
            .clone()
    }

    /// Forget the lock for `path` once no task holds or waits on it
    fn release_path_lock(&self, path: &Path) {
        let mut locks = lock(&self.path_locks);
        if locks.get(path).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(path);
        }
    }

    async fn publish(
        &self,
        path: &Path,
        options: ServiceOptions,
        generated: Generated,
        mtime: Option<SystemTime>,
    ) -> Result<()> {
        let out_dir = &self.config.paths.output_dir;
        self.renderer.render_dir(
            &self.config.paths.templates_dir,
            out_dir,
            &generated.colors,
            options.dark_mode,
            &generated.dark_colors,
        )?;
        scss::write_prelude(out_dir, &generated.colors, options.dark_mode, options.blur_enabled)?;

        *lock(&self.wallpaper) = Some(path.to_path_buf());
        *lock(&self.last) = Some(LastPublish {
            path: path.to_path_buf(),
            variant: options.variant,
            dark_mode: options.dark_mode,
            mtime,
        });
        self.send(PublishedTheme {
            wallpaper: path.to_path_buf(),
            variant: options.variant,
            dark_mode: options.dark_mode,
            seed: generated.seed,
            colors: generated.colors,
            dark_colors: generated.dark_colors,
        });
        self.save_state();
        external::run_hooks(&self.config.hooks.reload).await;
        Ok(())
    }

    /// Last resort when no image could be read and nothing is published yet
    async fn publish_fallback(&self, wallpaper: PathBuf) {
        let options = self.options();
        warn!("Publishing colors from fallback seed #{:06X}", FALLBACK_SEED & 0xFFFFFF);
        let colors = ColorScheme::generate(FALLBACK_SEED, options.dark_mode, options.variant);
        let dark_colors = ColorScheme::generate(FALLBACK_SEED, true, options.variant);

        let out_dir = &self.config.paths.output_dir;
        if let Err(e) = self.renderer.render_dir(
            &self.config.paths.templates_dir,
            out_dir,
            &colors,
            options.dark_mode,
            &dark_colors,
        ) {
            error!("Failed to render fallback theme: {}", e);
        }
        if let Err(e) = scss::write_prelude(out_dir, &colors, options.dark_mode, options.blur_enabled) {
            error!("Failed to write SCSS prelude: {}", e);
        }

        self.send(PublishedTheme {
            wallpaper,
            variant: options.variant,
            dark_mode: options.dark_mode,
            seed: FALLBACK_SEED,
            colors,
            dark_colors,
        });
        self.save_state();
    }

    fn send(&self, theme: PublishedTheme) {
        info!(
            "Published {} theme (dark_mode={}) for {:?}",
            theme.variant, theme.dark_mode, theme.wallpaper
        );
        self.published.send_replace(Some(Arc::new(theme)));
    }

    fn apply_blur(&self) {
        let blur = &self.config.blur;
        if let Err(e) = blur::apply_blur(&blur.compositor_config, &blur.blur_conf, self.options().blur_enabled) {
            warn!("Failed to update compositor blur config: {}", e);
        }
    }

    fn rewrite_prelude(&self) {
        let Some(theme) = self.current() else {
            return;
        };
        let options = self.options();
        if let Err(e) = scss::write_prelude(
            &self.config.paths.output_dir,
            &theme.colors,
            theme.dark_mode,
            options.blur_enabled,
        ) {
            warn!("Failed to write SCSS prelude: {}", e);
        }
    }

    fn save_state(&self) {
        let options = self.options();
        let state = MaterialState {
            dark_mode: options.dark_mode,
            color_scheme: options.variant,
            blur_enabled: options.blur_enabled,
            wallpaper: self.wallpaper(),
            colors: self.current().map(|t| t.colors.clone()).unwrap_or_default(),
        };
        if let Err(e) = self.store.save(&state) {
            warn!("Failed to save material state: {:#}", e);
        }
    }

    async fn run_matugen(&self) {
        if !self.config.matugen.enabled {
            return;
        }
        let Some(wallpaper) = self.current().map(|t| t.wallpaper.clone()) else {
            return;
        };
        let variant = self.options().variant;
        if let Err(e) = external::run_matugen(&self.config.matugen.binary, variant, &wallpaper).await {
            warn!("matugen failed: {}", e);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Light and dark outputs of the fixture template for a black and white
    /// checkerboard (fallback seed, Tonal Spot, light mode)
    const CHECKERBOARD_CSS: &str = "surface: #F9F9FF;\nprimary: #445E91;\ndark: false;\n";
    const CHECKERBOARD_DARK_CSS: &str = "surface: #111318;\nprimary: #ADC6FF;\ndark: true;\n";

    struct Fixture {
        dir: tempfile::TempDir,
        service: Arc<MaterialService>,
    }

    impl Fixture {
        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn out(&self, name: &str) -> String {
            std::fs::read_to_string(self.path("out").join(name)).unwrap()
        }
    }

    fn write_checkerboard(path: &Path) {
        let img = image::RgbaImage::from_fn(16, 16, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([0, 0, 0, 255])
            } else {
                image::Rgba([255, 255, 255, 255])
            }
        });
        img.save(path).unwrap();
    }

    fn write_solid(path: &Path, rgb: [u8; 3]) {
        let img = image::RgbaImage::from_pixel(32, 32, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
        img.save(path).unwrap();
    }

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.paths.templates_dir = dir.join("templates");
        config.paths.output_dir = dir.join("out");
        config.paths.default_wallpaper = dir.join("default.png");
        config.blur.compositor_config = dir.join("hyprland.conf");
        config.blur.blur_conf = dir.join("blur.conf");
        config.hooks.reload = Vec::new();
        config.hooks.colors_not_found = Vec::new();
        config
    }

    fn fixture_with(state: MaterialState) -> Fixture {
        fixture_with_config(state, |_, _| {})
    }

    fn fixture_with_config(state: MaterialState, configure: impl FnOnce(&Path, &mut Config)) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("templates")).unwrap();
        std::fs::write(
            dir.path().join("templates").join("colors.css"),
            "surface: {{ surface }};\nprimary: {{ primary }};\ndark: {{ dark_mode }};\n",
        )
        .unwrap();
        write_solid(&dir.path().join("default.png"), [30, 136, 229]);

        let store = StateStore::at(dir.path().join("state.json"));
        store.save(&state).unwrap();
        let mut config = config_in(dir.path());
        configure(dir.path(), &mut config);
        let service = Arc::new(MaterialService::new(config, store).unwrap());
        Fixture { dir, service }
    }

    fn fixture() -> Fixture {
        fixture_with(MaterialState {
            dark_mode: false,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn wallpaper_change_publishes_and_renders() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);

        fx.service
            .handle_event(MaterialEvent::WallpaperChanged { path: wall.clone() })
            .await;

        let theme = fx.service.current().expect("published");
        assert_eq!(theme.wallpaper, wall);
        assert!(!theme.dark_mode);
        assert!(theme.colors.is_complete());
        assert!(theme.dark_colors.is_complete());
        assert_ne!(theme.colors, theme.dark_colors);

        let css = fx.out("colors.css");
        assert!(css.contains(&format!("surface: {};", theme.colors.get("surface").unwrap())));
        assert!(css.contains("dark: false;"));
        assert!(fx.out("dark_colors.css").contains("dark: true;"));
        assert!(fx.out("colors.scss").starts_with("$darkmode: false;\n"));

        let saved = StateStore::at(fx.path("state.json")).load();
        assert_eq!(saved.wallpaper, Some(wall));
        assert_eq!(saved.colors, theme.colors);
    }

    #[tokio::test]
    async fn checkerboard_is_golden() {
        let first = {
            let fx = fixture();
            let wall = fx.path("checker.png");
            write_checkerboard(&wall);
            fx.service.apply(wall, false).await;
            let theme = fx.service.current().unwrap();
            (theme.colors.clone(), fx.out("colors.css"), fx.out("dark_colors.css"))
        };

        let fx = fixture();
        let wall = fx.path("checker.png");
        write_checkerboard(&wall);
        fx.service.apply(wall.clone(), false).await;
        let theme = fx.service.current().unwrap();
        assert_eq!(theme.colors, first.0);
        assert_eq!(fx.out("colors.css"), first.1);
        assert_eq!(fx.out("dark_colors.css"), first.2);

        assert_eq!(first.1, CHECKERBOARD_CSS);
        assert_eq!(first.2, CHECKERBOARD_DARK_CSS);
        assert_eq!(theme.colors.get("primary"), Some("#445E91"));
        assert_eq!(theme.colors.get("surface"), Some("#F9F9FF"));

        // Black and white have no usable chroma, so the seed is the fallback
        assert_eq!(theme.seed, FALLBACK_SEED);
        assert_eq!(theme.colors, ColorScheme::generate(FALLBACK_SEED, false, Variant::TonalSpot));

        // Forced regeneration rewrites identical bytes
        fx.service.clear_caches();
        fx.service.apply(wall, true).await;
        assert_eq!(fx.out("colors.css"), first.1);
    }

    #[tokio::test]
    async fn unchanged_inputs_skip_generation() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [40, 160, 90]);

        fx.service.apply(wall.clone(), false).await;
        fx.service.apply(wall.clone(), false).await;
        assert_eq!(fx.service.cache_stats().generations, 1);

        // Different dark flag for the same image comes from a fresh generation
        // because option changes clear the cache
        fx.service
            .handle_event(MaterialEvent::DarkModeChanged { enabled: true })
            .await;
        let stats = fx.service.cache_stats();
        assert_eq!(stats.generations, 2);
        assert_eq!(stats.last_dark_mode, Some(true));
        assert!(fx.service.current().unwrap().dark_mode);

        // Same value again is not a change
        fx.service
            .handle_event(MaterialEvent::DarkModeChanged { enabled: true })
            .await;
        assert_eq!(fx.service.cache_stats().generations, 2);
    }

    #[tokio::test]
    async fn cache_serves_unchanged_image() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [40, 160, 90]);

        fx.service.apply(wall.clone(), false).await;
        // Forced apply bypasses the skip rule but hits the cache
        fx.service.apply(wall.clone(), true).await;
        assert_eq!(fx.service.cache_stats().generations, 1);

        // Touching the file invalidates the cached scheme
        let later = SystemTime::now() + Duration::from_secs(5);
        std::fs::File::options()
            .write(true)
            .open(&wall)
            .unwrap()
            .set_modified(later)
            .unwrap();
        fx.service.apply(wall, false).await;
        assert_eq!(fx.service.cache_stats().generations, 2);
    }

    #[tokio::test]
    async fn scheme_change_updates_variant() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [120, 60, 200]);
        fx.service.apply(wall, false).await;

        fx.service
            .handle_event(MaterialEvent::SchemeChanged { scheme: Variant::Monochrome })
            .await;
        let theme = fx.service.current().unwrap();
        assert_eq!(theme.variant, Variant::Monochrome);
        assert_eq!(fx.service.options().variant, Variant::Monochrome);
        assert_eq!(StateStore::at(fx.path("state.json")).load().color_scheme, Variant::Monochrome);
    }

    #[tokio::test]
    async fn broken_wallpaper_falls_back_to_default() {
        let fx = fixture();
        fx.service
            .handle_event(MaterialEvent::WallpaperChanged { path: fx.path("missing.png") })
            .await;
        let theme = fx.service.current().unwrap();
        assert_eq!(theme.wallpaper, fx.path("default.png"));
        assert_eq!(fx.service.wallpaper(), Some(fx.path("default.png")));
        assert_eq!(
            StateStore::at(fx.path("state.json")).load().wallpaper,
            Some(fx.path("default.png"))
        );
    }

    #[tokio::test]
    async fn fallback_seed_when_nothing_published() {
        let fx = fixture();
        std::fs::remove_file(fx.path("default.png")).unwrap();
        fx.service.apply(fx.path("missing.png"), false).await;
        let theme = fx.service.current().unwrap();
        assert_eq!(theme.seed, FALLBACK_SEED);
        assert!(theme.colors.is_complete());
    }

    #[tokio::test]
    async fn last_known_good_is_kept() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        fx.service.apply(wall.clone(), false).await;
        let before = fx.service.current().unwrap();

        std::fs::remove_file(fx.path("default.png")).unwrap();
        fx.service.apply(fx.path("missing.png"), false).await;
        assert_eq!(fx.service.current().unwrap(), before);
    }

    #[tokio::test]
    async fn bad_template_keeps_previous_theme() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        fx.service.apply(wall, false).await;
        let before = fx.service.current().unwrap();

        std::fs::write(fx.path("templates").join("bad.conf"), "{{ notARole }}").unwrap();
        let other = fx.path("other.png");
        write_solid(&other, [20, 200, 40]);
        fx.service.apply(other, false).await;
        assert_eq!(fx.service.current().unwrap(), before);
    }

    #[tokio::test]
    async fn startup_without_colors_uses_default_wallpaper() {
        let fx = fixture_with(MaterialState {
            wallpaper: Some(PathBuf::from("/walls/saved.png")),
            ..Default::default()
        });
        fx.service.start().await;
        let theme = fx.service.current().unwrap();
        assert_eq!(theme.wallpaper, fx.path("default.png"));
        assert!(theme.dark_mode);
    }

    #[tokio::test]
    async fn colors_not_found_runs_startup_hooks() {
        let fx = fixture_with_config(MaterialState::default(), |dir, config| {
            config.hooks.colors_not_found = vec![format!("touch {}", dir.join("reloaded").display())];
        });
        fx.service.start().await;
        assert!(fx.path("reloaded").exists());
        assert_eq!(fx.service.current().unwrap().wallpaper, fx.path("default.png"));
    }

    #[tokio::test]
    async fn saved_colors_skip_startup_hooks() {
        let dir = tempfile::tempdir().unwrap();
        let wall = dir.path().join("saved.png");
        write_solid(&wall, [200, 40, 40]);
        let state = MaterialState {
            wallpaper: Some(wall),
            colors: ColorScheme::generate(FALLBACK_SEED, true, Variant::TonalSpot),
            ..Default::default()
        };
        let fx = fixture_with_config(state, |dir, config| {
            config.hooks.colors_not_found = vec![format!("touch {}", dir.join("reloaded").display())];
        });
        fx.service.start().await;
        assert!(!fx.path("reloaded").exists());
    }

    #[tokio::test]
    async fn startup_with_partial_colors_uses_default_wallpaper() {
        let fx = fixture_with(MaterialState {
            wallpaper: Some(PathBuf::from("/walls/saved.png")),
            colors: [("primary".to_string(), "#445E91".to_string())].into_iter().collect(),
            ..Default::default()
        });
        fx.service.start().await;
        assert_eq!(fx.service.current().unwrap().wallpaper, fx.path("default.png"));
    }

    #[tokio::test]
    async fn startup_with_saved_colors_keeps_wallpaper() {
        let dir = tempfile::tempdir().unwrap();
        let wall = dir.path().join("saved.png");
        write_solid(&wall, [200, 40, 40]);
        let fx = fixture_with(MaterialState {
            wallpaper: Some(wall.clone()),
            colors: ColorScheme::generate(FALLBACK_SEED, true, Variant::TonalSpot),
            ..Default::default()
        });
        fx.service.start().await;
        assert_eq!(fx.service.current().unwrap().wallpaper, wall);
    }

    #[tokio::test]
    async fn blur_toggle_updates_prelude_and_compositor() {
        let fx = fixture();
        std::fs::write(fx.path("hyprland.conf"), "general {}\n").unwrap();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        fx.service.start().await;
        fx.service.apply(wall, false).await;
        assert!(std::fs::read_to_string(fx.path("hyprland.conf")).unwrap().contains("source="));

        fx.service
            .handle_event(MaterialEvent::BlurChanged { enabled: false })
            .await;
        assert_eq!(std::fs::read_to_string(fx.path("hyprland.conf")).unwrap(), "general {}\n");
        assert!(fx.out("colors.scss").contains("$opacity-high: 1;"));
        assert!(!StateStore::at(fx.path("state.json")).load().blur_enabled);
    }

    #[tokio::test]
    async fn clear_cache_event_empties_caches() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        fx.service.apply(wall, false).await;
        let stats = fx.service.cache_stats();
        assert_eq!(stats.colors_cache_size, 2);
        assert_eq!(stats.template_cache_size, 2);

        fx.service.handle_event(MaterialEvent::ClearCache).await;
        let stats = fx.service.cache_stats();
        assert_eq!(stats.colors_cache_size, 0);
        assert_eq!(stats.template_cache_size, 0);
    }

    #[tokio::test]
    async fn stats_event_sends_snapshot() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        let mut stats = fx.service.subscribe_stats();
        fx.service.apply(wall.clone(), false).await;
        assert!(!stats.has_changed().unwrap());

        fx.service.handle_event(MaterialEvent::Stats).await;
        assert!(stats.has_changed().unwrap());
        let snapshot = stats.borrow_and_update().clone();
        assert_eq!(snapshot, fx.service.cache_stats());
        assert_eq!(snapshot.generations, 1);
        assert_eq!(snapshot.last_wallpaper, Some(wall));
        assert_eq!(snapshot.last_scheme, Some(Variant::TonalSpot));
        assert_eq!(snapshot.last_dark_mode, Some(false));
    }

    #[tokio::test]
    async fn run_consumes_events_until_closed() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);
        let mut updates = fx.service.subscribe();

        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(fx.service.clone().run(rx));
        tx.send(MaterialEvent::WallpaperChanged { path: wall.clone() }).await.unwrap();
        drop(tx);
        task.await.unwrap();

        assert!(updates.has_changed().unwrap());
        let theme = updates.borrow_and_update().clone().unwrap();
        assert_eq!(theme.wallpaper, wall);
    }

    #[tokio::test]
    async fn concurrent_applies_generate_once() {
        let fx = fixture();
        let wall = fx.path("wall.png");
        write_solid(&wall, [200, 40, 40]);

        let a = {
            let service = fx.service.clone();
            let wall = wall.clone();
            tokio::spawn(async move { service.apply(wall, true).await })
        };
        let b = {
            let service = fx.service.clone();
            let wall = wall.clone();
            tokio::spawn(async move { service.apply(wall, true).await })
        };
        a.await.unwrap();
        b.await.unwrap();
        assert_eq!(fx.service.cache_stats().generations, 1);
        assert!(lock(&fx.service.path_locks).is_empty());
    }

    #[tokio::test]
    async fn path_locks_do_not_accumulate() {
        let fx = fixture();
        for i in 0..5u8 {
            let wall = fx.path(&format!("wall{i}.png"));
            write_solid(&wall, [40 * i, 120, 200]);
            fx.service.apply(wall, false).await;
        }
        // A failed generation releases its lock too; the default wallpaper
        // it falls back to is the sixth generation
        fx.service.apply(fx.path("missing.png"), false).await;
        assert_eq!(fx.service.cache_stats().generations, 6);
        assert!(lock(&fx.service.path_locks).is_empty());
    }
}

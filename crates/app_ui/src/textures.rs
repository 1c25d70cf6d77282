//! Decoded image textures, keyed by file path

use egui::{ColorImage, TextureHandle, TextureOptions};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Edge length thumbnails are downscaled to
pub const THUMBNAIL_EDGE: u32 = 256;

/// Most thumbnails kept uploaded at once
pub const THUMBNAIL_CAPACITY: usize = 512;

/// Decode state of one image
pub enum TextureSlot {
    Ready(TextureHandle),
    Failed,
}

impl TextureSlot {
    pub fn texture(&self) -> Option<&TextureHandle> {
        match self {
            TextureSlot::Ready(handle) => Some(handle),
            TextureSlot::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TextureSlot::Failed)
    }
}

/// Decode `path` into an egui image, downscaled to fit `max_edge` if given
pub fn decode(path: &Path, max_edge: Option<u32>) -> Result<ColorImage, image::ImageError> {
    let mut img = image::open(path)?;
    if let Some(edge) = max_edge {
        if img.width() > edge || img.height() > edge {
            img = img.thumbnail(edge, edge);
        }
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        rgba.as_flat_samples().as_slice(),
    ))
}

/// One image waiting to be decoded off the UI thread
#[derive(Debug, Clone)]
pub struct DecodeJob {
    pub key: String,
    pub file: PathBuf,
    max_edge: Option<u32>,
}

impl DecodeJob {
    /// Decode the image. Blocks; run it on a worker thread.
    pub fn run(self) -> Decoded {
        let image = decode(&self.file, self.max_edge).map_err(|e| {
            tracing::warn!("Failed to decode {:?}: {}", self.file, e);
            e.to_string()
        });
        Decoded {
            key: self.key,
            image,
        }
    }
}

/// Result of a [`DecodeJob`], handed back to [`TextureCache::finish`]
pub struct Decoded {
    pub key: String,
    pub image: Result<ColorImage, String>,
}

/// Lazily decoded textures.
///
/// Requests are queued; [`TextureCache::start_jobs`] hands out at most
/// `per_frame` decodes at a time for the caller to run in the background,
/// and [`TextureCache::finish`] uploads the results.
pub struct TextureCache {
    slots: HashMap<String, (TextureSlot, u64)>,
    queue: VecDeque<(String, PathBuf)>,
    queued: HashSet<String>,
    in_flight: HashSet<String>,
    per_frame: usize,
    max_edge: Option<u32>,
    capacity: usize,
    clock: u64,
}

impl TextureCache {
    /// Cache for grid thumbnails
    pub fn thumbnails(per_frame: usize) -> Self {
        Self::new(per_frame, Some(THUMBNAIL_EDGE), THUMBNAIL_CAPACITY)
    }

    /// Cache for full-size viewer images
    pub fn full_size() -> Self {
        Self::new(1, None, 2)
    }

    fn new(per_frame: usize, max_edge: Option<u32>, capacity: usize) -> Self {
        Self {
            slots: HashMap::new(),
            queue: VecDeque::new(),
            queued: HashSet::new(),
            in_flight: HashSet::new(),
            per_frame: per_frame.max(1),
            max_edge,
            capacity: capacity.max(1),
            clock: 0,
        }
    }

    /// Slot for `key`, queueing a decode of `file` if it has none yet
    pub fn request(&mut self, key: &str, file: &Path) -> Option<&TextureSlot> {
        self.clock += 1;
        match self.slots.get_mut(key) {
            Some((slot, used)) => {
                *used = self.clock;
                Some(&*slot)
            }
            None => {
                if !self.in_flight.contains(key) && self.queued.insert(key.to_string()) {
                    self.queue.push_back((key.to_string(), file.to_path_buf()));
                }
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&TextureSlot> {
        self.slots.get(key).map(|(slot, _)| slot)
    }

    /// Hand out queued decodes, keeping at most `per_frame` in flight
    pub fn start_jobs(&mut self) -> Vec<DecodeJob> {
        let mut jobs = Vec::new();

        while self.in_flight.len() < self.per_frame {
            let Some((key, file)) = self.queue.pop_front() else {
                break;
            };
            self.queued.remove(&key);
            self.in_flight.insert(key.clone());
            jobs.push(DecodeJob {
                key,
                file,
                max_edge: self.max_edge,
            });
        }
        jobs
    }

    /// Upload a finished decode; returns false if its key was dropped meanwhile
    pub fn finish(&mut self, ctx: &egui::Context, decoded: Decoded) -> bool {
        if !self.in_flight.remove(&decoded.key) {
            return false;
        }

        let slot = match decoded.image {
            Ok(image) => TextureSlot::Ready(ctx.load_texture(
                decoded.key.clone(),
                image,
                TextureOptions::LINEAR,
            )),
            Err(_) => TextureSlot::Failed,
        };
        self.clock += 1;
        self.slots.insert(decoded.key, (slot, self.clock));
        self.evict();

        ctx.request_repaint();
        true
    }

    /// Drop least recently requested slots beyond capacity
    fn evict(&mut self) {
        while self.slots.len() > self.capacity {
            let oldest = self
                .slots
                .iter()
                .min_by_key(|(_, (_, used))| *used)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.slots.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop textures and pending decodes whose key is not in `keep`
    pub fn retain<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: HashSet<&str> = keep.into_iter().collect();
        self.slots.retain(|key, _| keep.contains(key.as_str()));
        self.queue.retain(|(key, _)| keep.contains(key.as_str()));
        self.queued.retain(|key| keep.contains(key.as_str()));
        self.in_flight.retain(|key| keep.contains(key.as_str()));
    }

    /// Decodes queued or running
    pub fn pending(&self) -> usize {
        self.queue.len() + self.in_flight.len()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 100, 50, 255]))
            .save(path)
            .unwrap();
    }

    fn run_all(cache: &mut TextureCache, ctx: &egui::Context) -> usize {
        let jobs = cache.start_jobs();
        let started = jobs.len();
        for job in jobs {
            cache.finish(ctx, job.run());
        }
        started
    }

    #[test]
    fn test_decode_downscales() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.png");
        write_png(&path, 1024, 512);

        let thumb = decode(&path, Some(THUMBNAIL_EDGE)).unwrap();
        assert_eq!(thumb.size, [256, 128]);

        let full = decode(&path, None).unwrap();
        assert_eq!(full.size, [1024, 512]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(decode(&path, None).is_err());
        assert!(decode(&dir.path().join("missing.png"), None).is_err());
    }

    #[test]
    fn test_request_does_not_decode() {
        let dir = tempdir().unwrap();
        let ctx = egui::Context::default();
        let mut cache = TextureCache::thumbnails(2);

        let path = dir.path().join("a.png");
        write_png(&path, 8, 8);
        assert!(cache.request("a.png", &path).is_none());

        // Nothing is uploaded until a started job is finished
        let mut jobs = cache.start_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(cache.request("a.png", &path).is_none());
        assert_eq!(cache.pending(), 1);
        assert!(cache.is_empty());

        let decoded = jobs.remove(0).run();
        assert!(cache.finish(&ctx, decoded));
        assert!(cache.get("a.png").and_then(|s| s.texture()).is_some());
        assert_eq!(cache.pending(), 0);
    }

    #[test]
    fn test_bounded_in_flight() {
        let dir = tempdir().unwrap();
        let ctx = egui::Context::default();
        let mut cache = TextureCache::thumbnails(2);

        for name in ["a.png", "b.png", "c.png"] {
            let path = dir.path().join(name);
            write_png(&path, 8, 8);
            assert!(cache.request(name, &path).is_none());
        }
        // Re-requesting does not queue twice
        cache.request("a.png", &dir.path().join("a.png"));
        assert_eq!(cache.pending(), 3);

        let first = cache.start_jobs();
        assert_eq!(first.len(), 2);
        // Nothing more starts while two are running
        assert!(cache.start_jobs().is_empty());

        for job in first {
            cache.finish(&ctx, job.run());
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(run_all(&mut cache, &ctx), 1);
        assert!(cache.get("c.png").and_then(|s| s.texture()).is_some());
        assert_eq!(run_all(&mut cache, &ctx), 0);
    }

    #[test]
    fn test_failed_slot_and_retain() {
        let dir = tempdir().unwrap();
        let ctx = egui::Context::default();
        let mut cache = TextureCache::full_size();

        let good = dir.path().join("good.png");
        write_png(&good, 4, 4);
        cache.request("good", &good);
        run_all(&mut cache, &ctx);
        cache.request("bad", &dir.path().join("bad.png"));
        run_all(&mut cache, &ctx);

        assert!(cache.get("bad").unwrap().is_failed());
        // Failures are remembered, not retried
        assert!(cache.request("bad", &dir.path().join("bad.png")).is_some());
        assert_eq!(cache.pending(), 0);

        cache.retain(["good"]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("bad").is_none());
    }

    #[test]
    fn test_late_result_for_dropped_key_is_ignored() {
        let dir = tempdir().unwrap();
        let ctx = egui::Context::default();
        let mut cache = TextureCache::thumbnails(4);

        let path = dir.path().join("old.png");
        write_png(&path, 4, 4);
        cache.request("old.png", &path);
        let job = cache.start_jobs().remove(0);

        cache.retain(std::iter::empty());
        assert!(!cache.finish(&ctx, job.run()));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_evicts_least_recently_requested() {
        let dir = tempdir().unwrap();
        let ctx = egui::Context::default();
        let mut cache = TextureCache::new(4, Some(THUMBNAIL_EDGE), 2);

        let paths: Vec<_> = ["a.png", "b.png", "c.png"]
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                write_png(&path, 4, 4);
                path
            })
            .collect();

        cache.request("a.png", &paths[0]);
        cache.request("b.png", &paths[1]);
        run_all(&mut cache, &ctx);
        // Touch a so b is the oldest
        assert!(cache.request("a.png", &paths[0]).is_some());

        cache.request("c.png", &paths[2]);
        run_all(&mut cache, &ctx);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a.png").is_some());
        assert!(cache.get("b.png").is_none());
        assert!(cache.get("c.png").is_some());
    }
}
